use skycast_core::{AppError, ReqwestErrorExt, WeatherError};
use skycast_forecast::ForecastError;

/// Map a client error onto the application hierarchy without consuming it.
pub fn to_app_error(e: &ForecastError) -> AppError {
    match e {
        ForecastError::InvalidQuery(q) => AppError::Weather(WeatherError::InvalidQuery(q.clone())),
        ForecastError::Transport(cause) => AppError::Network(cause.into_network_error()),
        ForecastError::Http { status, .. } if *status == 401 || *status == 403 => {
            AppError::Weather(WeatherError::InvalidApiKey)
        }
        ForecastError::Http { status, .. } if *status >= 500 => {
            AppError::Weather(WeatherError::ServiceUnavailable)
        }
        ForecastError::Http { status, body } => {
            AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, body)))
        }
        ForecastError::EmptyResponse => AppError::Weather(WeatherError::EmptyResponse),
        ForecastError::Decode(err) => {
            AppError::Weather(WeatherError::InvalidResponse(err.to_string()))
        }
        ForecastError::Cancelled => AppError::Weather(WeatherError::Cancelled),
    }
}

/// Static message shown to the user for a failed fetch.
pub fn user_message(e: &ForecastError) -> &'static str {
    to_app_error(e).user_message()
}
