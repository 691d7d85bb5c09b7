//! Headless view-model for the forecast screen.
//!
//! Holds loading/error flags plus display-ready strings for the current
//! conditions, the daily list and today's hourly strip. Rendering and icon
//! download belong to whatever front end reads [`ForecastViewState`].

use std::sync::mpsc::Receiver;

use parking_lot::Mutex;
use skycast_forecast::{
    CurrentConditions, ForecastDay, ForecastResponse, HourlyConditions,
};

use crate::observer::ForecastObserver;
use crate::services::ForecastServiceMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub title: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location_name: String,
    pub temperature: String,
    pub condition: String,
    pub icon_url: String,
    pub feels_like: String,
    pub details: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRow {
    /// Weekday name, or the raw date if it doesn't parse
    pub day: String,
    pub temperature: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyRow {
    /// e.g. `3PM`, or the raw time if it doesn't parse
    pub label: String,
    pub temperature: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastViewState {
    pub loading: bool,
    pub has_data: bool,
    pub error_message: Option<String>,
    pub current: Option<CurrentView>,
    pub daily: Vec<DailyRow>,
    pub hourly: Vec<HourlyRow>,
}

impl ForecastViewState {
    pub fn daily_header(&self) -> String {
        format!("{}-Day Forecast", self.daily.len())
    }
}

/// Observer that keeps a [`ForecastViewState`] up to date.
#[derive(Debug, Default)]
pub struct ForecastModel {
    state: Mutex<ForecastViewState>,
}

impl ForecastModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ForecastViewState {
        self.state.lock().clone()
    }

    /// Apply one message from the forecast service channel.
    pub fn apply(&self, msg: ForecastServiceMessage) {
        match msg {
            ForecastServiceMessage::LoadingChanged(loading) => self.on_loading_change(loading),
            ForecastServiceMessage::Failed(message) => self.on_error(&message),
            ForecastServiceMessage::Loaded(forecast) => self.on_result(&forecast),
        }
    }

    /// Drain pending service messages without blocking. Returns how many were applied.
    pub fn poll(&self, rx: &Receiver<ForecastServiceMessage>) -> usize {
        let mut applied = 0;
        while let Ok(msg) = rx.try_recv() {
            self.apply(msg);
            applied += 1;
        }
        applied
    }
}

impl ForecastObserver for ForecastModel {
    fn on_loading_change(&self, loading: bool) {
        let mut state = self.state.lock();
        state.loading = loading;
        if loading {
            state.error_message = None;
        }
    }

    fn on_error(&self, message: &str) {
        tracing::debug!("Forecast model error: {}", message);
        self.state.lock().error_message = Some(message.to_string());
    }

    fn on_result(&self, forecast: &ForecastResponse) {
        let mut state = self.state.lock();
        state.error_message = None;
        state.current = Some(current_view(&forecast.location.name, &forecast.current));
        state.daily = forecast.forecast.days.iter().map(daily_row).collect();
        state.hourly = forecast.hourly_today().iter().map(hourly_row).collect();
        state.has_data = true;
        tracing::debug!(
            "Forecast model updated: {} days, {} hours",
            state.daily.len(),
            state.hourly.len()
        );
    }
}

/// Whole degrees, truncated toward zero.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°", celsius.trunc() as i64)
}

fn current_view(location_name: &str, current: &CurrentConditions) -> CurrentView {
    CurrentView {
        location_name: location_name.to_string(),
        temperature: format_temperature(current.temperature_celsius),
        condition: current.condition.text.clone(),
        icon_url: current.condition.icon_url(),
        feels_like: format!("Feels like {}", format_temperature(current.temperature_celsius)),
        details: vec![
            DetailRow {
                title: "Wind",
                value: format!("{} km/h", current.wind_kph.trunc() as i64),
            },
            DetailRow {
                title: "Humidity",
                value: format!("{}%", current.humidity_percent),
            },
            DetailRow {
                title: "Pressure",
                value: format!("{} mb", current.pressure_mb.trunc() as i64),
            },
            DetailRow {
                title: "Visibility",
                value: format!("{} km", current.visibility_km),
            },
        ],
    }
}

fn daily_row(day: &ForecastDay) -> DailyRow {
    DailyRow {
        day: day
            .parsed_date()
            .map(|d| d.format("%A").to_string())
            .unwrap_or_else(|| day.date.clone()),
        temperature: format_temperature(day.day_summary.average_temperature_celsius),
        icon_url: day.day_summary.condition.icon_url(),
    }
}

fn hourly_row(hour: &HourlyConditions) -> HourlyRow {
    HourlyRow {
        label: hour
            .parsed_time()
            .map(|t| t.format("%-I%p").to_string())
            .unwrap_or_else(|| hour.time.clone()),
        temperature: format_temperature(hour.temperature_celsius),
        icon_url: hour.condition.icon_url(),
    }
}
