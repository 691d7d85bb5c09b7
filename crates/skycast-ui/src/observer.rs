//! Callback contract between a fetch session and whatever renders it.

use skycast_forecast::ForecastResponse;

/// Receives the outcome of one fetch.
///
/// Per call: `on_loading_change(false)` always precedes exactly one of
/// `on_error` / `on_result`.
pub trait ForecastObserver: Send + Sync {
    fn on_loading_change(&self, loading: bool);

    /// `message` is a static, user-facing string.
    fn on_error(&self, message: &str);

    fn on_result(&self, forecast: &ForecastResponse);
}

impl<T: ForecastObserver + ?Sized> ForecastObserver for std::sync::Arc<T> {
    fn on_loading_change(&self, loading: bool) {
        (**self).on_loading_change(loading);
    }

    fn on_error(&self, message: &str) {
        (**self).on_error(message);
    }

    fn on_result(&self, forecast: &ForecastResponse) {
        (**self).on_result(forecast);
    }
}
