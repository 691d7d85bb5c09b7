//! Centralized error types for skycast.
//!
//! Every error surfaced to the user goes through [`AppError::user_message`],
//! which returns a static English string. The `Display` impls keep the full
//! technical context for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Recover a typed error from an `anyhow` chain. Anything unrecognised becomes `Other`.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(e) => AppError::Config(e),
            Err(err) => match err.downcast::<std::io::Error>() {
                Ok(e) => AppError::Io(e),
                Err(err) => AppError::Other(err),
            },
        }
    }

    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid location query: {0}")]
    InvalidQuery(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Empty response from weather API")]
    EmptyResponse,

    #[error("Malformed weather data: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidQuery(_) => "Invalid location",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::EmptyResponse => "No data received from the weather service.",
            WeatherError::InvalidResponse(_) => "Received unexpected weather data.",
            WeatherError::Cancelled => "Request cancelled.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
///
/// Status codes are handled before this point, so only transport failures arrive here.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for &reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() || self.is_body() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            NetworkError::Timeout.into(),
            ConfigError::Invalid("test".into()).into(),
            WeatherError::ServiceUnavailable.into(),
            WeatherError::EmptyResponse.into(),
            anyhow::anyhow!("boom").into(),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = WeatherError::InvalidApiKey.into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::InvalidApiKey)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::InvalidQuery("".into()));
        assert_eq!(app_err.user_message(), "Invalid location");

        let app_err = AppError::Network(NetworkError::Timeout);
        assert!(app_err.user_message().contains("timed out"));
    }

    #[test]
    fn test_from_anyhow_recovers_config_error() {
        let err = anyhow::Error::from(ConfigError::ParseError("expected `=`".into()))
            .context("Failed to load config");
        let app_err = AppError::from_anyhow(err);
        assert!(matches!(app_err, AppError::Config(ConfigError::ParseError(_))));
        assert_eq!(
            app_err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }

    #[test]
    fn test_from_anyhow_recovers_io_error() {
        use anyhow::Context;

        let err = std::fs::read_to_string("/nonexistent/skycast/config.toml")
            .context("Failed to read config file")
            .unwrap_err();
        let app_err = AppError::from_anyhow(err);
        assert!(matches!(app_err, AppError::Io(_)));
        assert_eq!(app_err.user_message(), "A file operation failed. Please try again.");
    }

    #[test]
    fn test_from_anyhow_falls_back_to_other() {
        let app_err = AppError::from_anyhow(anyhow::anyhow!("no config directory"));
        assert!(matches!(app_err, AppError::Other(_)));
        assert_eq!(app_err.to_string(), "no config directory");
    }

    #[test]
    fn test_display_keeps_context() {
        let app_err = AppError::Weather(WeatherError::ApiError("400: q missing".into()));
        assert_eq!(
            app_err.to_string(),
            "Weather service error: Weather API error: 400: q missing"
        );
    }
}
