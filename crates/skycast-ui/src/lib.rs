//! Headless presentation layer for skycast
//!
//! Runs the resolve-then-fetch flow, reports it through [`ForecastObserver`]
//! or an mpsc channel, and keeps a display-ready view-model.

pub mod error_mapping;
pub mod models;
pub mod observer;
pub mod services;
pub mod session;

pub use models::{ForecastModel, ForecastViewState};
pub use observer::ForecastObserver;
pub use services::{request_fetch, ForecastServiceMessage};
pub use session::ForecastSession;
