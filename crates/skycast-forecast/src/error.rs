//! Forecast client error taxonomy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Empty response body")]
    EmptyResponse,

    #[error("Failed to decode forecast: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,
}

/// Field-less mirror of [`ForecastError`] for matching and mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidQuery,
    Transport,
    Http,
    EmptyResponse,
    Decode,
    Cancelled,
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether a caller-initiated retry could succeed. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::EmptyResponse => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidQuery(_) | Self::Decode(_) | Self::Cancelled => false,
        }
    }
}
