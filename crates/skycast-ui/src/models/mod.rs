pub mod forecast_model;

pub use forecast_model::{
    format_temperature, CurrentView, DailyRow, DetailRow, ForecastModel, ForecastViewState,
    HourlyRow,
};
