//! WeatherAPI `forecast.json` client.

use std::time::Duration;

use serde::de::Error as _;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use crate::error::ForecastError;
use crate::types::ForecastResponse;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-request knobs. Air quality and alerts are always requested as `no` unless set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    pub days: u8,
    pub air_quality: bool,
    pub alerts: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            days: DEFAULT_FORECAST_DAYS,
            air_quality: false,
            alerts: false,
        }
    }
}

impl ForecastOptions {
    pub fn with_days(days: u8) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }
}

/// Settings used to construct a [`ForecastClient`].
#[derive(Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    /// `None` defers to reqwest's defaults.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Stateless forecast client. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ForecastClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ForecastClient {
    /// Create a client with the default request timeout.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ForecastError> {
        Self::from_settings(ClientSettings {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        })
    }

    pub fn from_settings(settings: ClientSettings) -> Result<Self, ForecastError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ForecastError::Transport)?;

        Ok(Self {
            client,
            api_key: settings.api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `forecast.json` request URL for `query`.
    pub fn build_url(&self, query: &str, options: &ForecastOptions) -> Result<Url, ForecastError> {
        if query.trim().is_empty() {
            return Err(ForecastError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/forecast.json?key={}&q={}&days={}&aqi={}&alerts={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query),
            options.days,
            yes_no(options.air_quality),
            yes_no(options.alerts),
        );

        Url::parse(&url).map_err(|e| ForecastError::InvalidQuery(format!("{}: {}", query, e)))
    }

    /// Fetch a multi-day forecast for `query` (place name or `"lat,lon"`).
    ///
    /// Issues exactly one GET; failures are classified, never retried.
    #[instrument(skip(self, options), level = "info")]
    pub async fn fetch(
        &self,
        query: &str,
        options: &ForecastOptions,
    ) -> Result<ForecastResponse, ForecastError> {
        let url = self.build_url(query, options)?;
        tracing::info!("Fetching {}-day forecast for {}", options.days, query);

        // reqwest errors carry the request URL, which includes the API key.
        let response = self.client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!("Forecast request failed: {}", e);
            ForecastError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!("Failed to read forecast body: {}", e);
            ForecastError::Transport(e)
        })?;

        if !status.is_success() {
            tracing::error!("Forecast API returned status {}", status);
            return Err(ForecastError::Http {
                status: status.as_u16(),
                body,
            });
        }

        decode_body(&body)
    }

    /// Like [`fetch`](Self::fetch), but resolves to [`ForecastError::Cancelled`]
    /// as soon as `cancel` fires.
    pub async fn fetch_with_cancel(
        &self,
        query: &str,
        options: &ForecastOptions,
        cancel: &CancellationToken,
    ) -> Result<ForecastResponse, ForecastError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Forecast request for {} cancelled", query);
                Err(ForecastError::Cancelled)
            }
            result = self.fetch(query, options) => result,
        }
    }
}

/// Decode a response body, classifying empty bodies separately from schema mismatches.
pub fn decode_body(body: &str) -> Result<ForecastResponse, ForecastError> {
    if body.trim().is_empty() {
        tracing::warn!("Forecast API returned an empty body");
        return Err(ForecastError::EmptyResponse);
    }

    let forecast: ForecastResponse = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Forecast decode failed: {}", e);
        ForecastError::Decode(e)
    })?;

    if forecast.forecast.days.is_empty() {
        return Err(ForecastError::Decode(serde_json::Error::custom(
            "forecast.forecastday must not be empty",
        )));
    }

    tracing::debug!(
        "Decoded forecast for {} with {} days",
        forecast.location.name,
        forecast.forecast.days.len()
    );
    Ok(forecast)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
