//! Forecast backend: async fetching off the UI thread.
//! Progress and outcome are sent via mpsc for the UI thread to poll.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_core::WeatherConfig;
use skycast_forecast::{
    ClientSettings, ForecastClient, ForecastError, ForecastOptions, ForecastResponse,
    LocationResolver,
};
use tokio_util::sync::CancellationToken;

use crate::observer::ForecastObserver;
use crate::session::ForecastSession;

/// Messages sent from async operations back to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastServiceMessage {
    LoadingChanged(bool),
    Failed(String),
    Loaded(Box<ForecastResponse>),
}

/// Forwards observer callbacks onto a channel.
pub struct ChannelObserver {
    tx: Sender<ForecastServiceMessage>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<ForecastServiceMessage>) -> Self {
        Self { tx }
    }

    fn send(&self, msg: ForecastServiceMessage) {
        if self.tx.send(msg).is_err() {
            tracing::debug!("Forecast receiver dropped, discarding message");
        }
    }
}

impl ForecastObserver for ChannelObserver {
    fn on_loading_change(&self, loading: bool) {
        self.send(ForecastServiceMessage::LoadingChanged(loading));
    }

    fn on_error(&self, message: &str) {
        self.send(ForecastServiceMessage::Failed(message.to_string()));
    }

    fn on_result(&self, forecast: &ForecastResponse) {
        self.send(ForecastServiceMessage::Loaded(Box::new(forecast.clone())));
    }
}

/// Request a forecast asynchronously on `runtime`.
/// Sends `LoadingChanged`, then `Failed` or `Loaded`, on the channel.
pub fn request_fetch<R>(
    tx: &Sender<ForecastServiceMessage>,
    runtime: &tokio::runtime::Handle,
    session: Arc<ForecastSession<R>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()>
where
    R: LocationResolver + 'static,
{
    let observer = ChannelObserver::new(tx.clone());

    runtime.spawn(async move {
        // The outcome is already delivered through the observer.
        let _ = session.run_with_cancel(&observer, &cancel).await;
    })
}

/// Build a client from the `[weather]` config section.
pub fn client_from_config(config: &WeatherConfig) -> Result<ForecastClient, ForecastError> {
    ForecastClient::from_settings(ClientSettings {
        api_key: config.api_key.clone(),
        base_url: config.base_url.clone(),
        timeout: config.timeout(),
    })
}

pub fn options_from_config(config: &WeatherConfig) -> ForecastOptions {
    ForecastOptions::with_days(config.days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_options_from_config() {
        let mut config = WeatherConfig::default();
        config.days = 3;
        let options = options_from_config(&config);
        assert_eq!(options.days, 3);
        assert!(!options.air_quality);
        assert!(!options.alerts);
    }

    #[test]
    fn test_client_from_config() {
        let mut config = WeatherConfig::default();
        config.base_url = "http://localhost:9999/v1/".into();
        let client = client_from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_channel_observer_forwards() {
        let (tx, rx) = std::sync::mpsc::channel();
        let observer = ChannelObserver::new(tx);
        observer.on_loading_change(false);
        observer.on_error("Invalid location");

        let messages: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            messages,
            vec![
                ForecastServiceMessage::LoadingChanged(false),
                ForecastServiceMessage::Failed("Invalid location".into()),
            ]
        );
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        ChannelObserver::new(tx).on_loading_change(true);
    }
}
