//! Resolve-then-fetch flow with observer notification.

use skycast_forecast::{
    ForecastClient, ForecastError, ForecastOptions, ForecastResponse, LocationResolver,
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error_mapping;
use crate::observer::ForecastObserver;

/// One location resolver plus one client. Holds no per-fetch state, so a
/// session can be shared and run repeatedly.
pub struct ForecastSession<R> {
    client: ForecastClient,
    resolver: R,
    options: ForecastOptions,
}

impl<R: LocationResolver> ForecastSession<R> {
    pub fn new(client: ForecastClient, resolver: R, options: ForecastOptions) -> Self {
        Self {
            client,
            resolver,
            options,
        }
    }

    pub fn client(&self) -> &ForecastClient {
        &self.client
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Resolve a location, fetch its forecast and report to `observer`.
    pub async fn run(
        &self,
        observer: &dyn ForecastObserver,
    ) -> Result<ForecastResponse, ForecastError> {
        self.run_with_cancel(observer, &CancellationToken::new())
            .await
    }

    #[instrument(skip_all, level = "info")]
    pub async fn run_with_cancel(
        &self,
        observer: &dyn ForecastObserver,
        cancel: &CancellationToken,
    ) -> Result<ForecastResponse, ForecastError> {
        observer.on_loading_change(true);

        let result = match self.resolve_with_cancel(cancel).await {
            Some(query) => {
                let result = self
                    .client
                    .fetch_with_cancel(&query, &self.options, cancel)
                    .await;
                if let Err(e) = &result {
                    tracing::error!("Forecast fetch for {} failed: {}", query, e);
                }
                result
            }
            None => {
                tracing::info!("Location resolution cancelled");
                Err(ForecastError::Cancelled)
            }
        };

        observer.on_loading_change(false);
        match &result {
            Ok(forecast) => observer.on_result(forecast),
            Err(e) => observer.on_error(error_mapping::user_message(e)),
        }

        result
    }

    /// `None` if `cancel` fires before a query is available.
    async fn resolve_with_cancel(&self, cancel: &CancellationToken) -> Option<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            query = self.resolver.resolve() => Some(query),
        }
    }

    /// Manual retry: restarts from location resolution, nothing is resumed.
    pub async fn retry(
        &self,
        observer: &dyn ForecastObserver,
    ) -> Result<ForecastResponse, ForecastError> {
        tracing::info!("Retrying forecast fetch");
        self.run(observer).await
    }
}
