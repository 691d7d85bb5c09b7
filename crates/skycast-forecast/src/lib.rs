//! Forecast client for skycast
//!
//! Builds WeatherAPI `forecast.json` requests, decodes the response into
//! immutable value types and classifies failures. Location resolution turns
//! platform permission events into the query string the client consumes.

pub mod client;
pub mod error;
pub mod location;
pub mod types;

pub use client::{
    decode_body, ClientSettings, ForecastClient, ForecastOptions, DEFAULT_BASE_URL,
    DEFAULT_FORECAST_DAYS, DEFAULT_TIMEOUT,
};
pub use error::{ErrorKind, ForecastError};
pub use location::{
    Coordinates, EventDrivenResolver, LocationEvent, LocationResolver, LocationState,
    StaticLocation, DEFAULT_LOCATION,
};
pub use types::*;
