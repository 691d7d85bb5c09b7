pub mod forecast_service;

pub use forecast_service::{
    client_from_config, options_from_config, request_fetch, ChannelObserver,
    ForecastServiceMessage,
};
