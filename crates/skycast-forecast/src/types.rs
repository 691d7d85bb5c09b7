use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Complete forecast bundle as returned by `forecast.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: MultiDayForecast,
}

impl ForecastResponse {
    /// First forecast day, which the provider always reports as today.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.days.first()
    }

    /// Hourly breakdown for today, empty if there is no forecast day.
    pub fn hourly_today(&self) -> &[HourlyConditions] {
        self.today().map(|d| d.hours.as_slice()).unwrap_or(&[])
    }
}

/// Resolved place the forecast belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "temp_c")]
    pub temperature_celsius: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    #[serde(rename = "humidity")]
    pub humidity_percent: i32,
    pub pressure_mb: f64,
    #[serde(rename = "vis_km")]
    pub visibility_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDayForecast {
    /// Days in provider (chronological) order.
    #[serde(rename = "forecastday")]
    pub days: Vec<ForecastDay>,
}

/// One calendar day: summary plus hourly breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "hour")]
    pub hours: Vec<HourlyConditions>,
    #[serde(rename = "day")]
    pub day_summary: DaySummary,
}

impl ForecastDay {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyConditions {
    /// `YYYY-MM-DD HH:mm`
    pub time: String,
    #[serde(rename = "temp_c")]
    pub temperature_celsius: f64,
    pub condition: Condition,
}

impl HourlyConditions {
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, HOUR_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    #[serde(rename = "avgtemp_c")]
    pub average_temperature_celsius: f64,
    pub condition: Condition,
}

/// Provider-supplied weather description plus an icon reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`
    #[serde(rename = "icon")]
    pub icon_path: String,
}

impl Condition {
    /// Fetchable icon URL. Protocol-relative paths get an `https:` scheme.
    pub fn icon_url(&self) -> String {
        if self.icon_path.starts_with("//") {
            format!("https:{}", self.icon_path)
        } else {
            self.icon_path.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(text: &str) -> serde_json::Value {
        serde_json::json!({
            "text": text,
            "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png",
            "code": 1000
        })
    }

    #[test]
    fn test_current_conditions_wire_aliases() {
        let json = serde_json::json!({
            "temp_c": 12.5,
            "temp_f": 54.5,
            "condition": condition("Sunny"),
            "wind_kph": 9.4,
            "humidity": 71,
            "pressure_mb": 1016.0,
            "vis_km": 10.0
        });

        let current: CurrentConditions = serde_json::from_value(json).unwrap();
        assert_eq!(current.temperature_celsius, 12.5);
        assert_eq!(current.wind_kph, 9.4);
        assert_eq!(current.humidity_percent, 71);
        assert_eq!(current.pressure_mb, 1016.0);
        assert_eq!(current.visibility_km, 10.0);
        assert_eq!(current.condition.text, "Sunny");
    }

    #[test]
    fn test_missing_temp_c_is_rejected() {
        let json = serde_json::json!({
            "condition": condition("Sunny"),
            "wind_kph": 9.4,
            "humidity": 71,
            "pressure_mb": 1016.0,
            "vis_km": 10.0
        });

        let result: Result<CurrentConditions, _> = serde_json::from_value(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("temp_c"), "unexpected error: {}", err);
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let summary = DaySummary {
            average_temperature_celsius: 3.2,
            condition: Condition {
                text: "Cloudy".into(),
                icon_path: "//cdn/119.png".into(),
            },
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["avgtemp_c"], 3.2);
        assert_eq!(json["condition"]["icon"], "//cdn/119.png");
    }

    #[test]
    fn test_icon_url_adds_scheme() {
        let c = Condition {
            text: "Sunny".into(),
            icon_path: "//cdn.weatherapi.com/weather/64x64/day/113.png".into(),
        };
        assert_eq!(
            c.icon_url(),
            "https://cdn.weatherapi.com/weather/64x64/day/113.png"
        );
    }

    #[test]
    fn test_icon_url_keeps_absolute_url() {
        let c = Condition {
            text: "Sunny".into(),
            icon_path: "http://localhost/113.png".into(),
        };
        assert_eq!(c.icon_url(), "http://localhost/113.png");
    }

    #[test]
    fn test_parsed_date_and_time() {
        let hour = HourlyConditions {
            time: "2025-04-23 15:00".into(),
            temperature_celsius: 8.0,
            condition: Condition {
                text: "Clear".into(),
                icon_path: String::new(),
            },
        };
        let day = ForecastDay {
            date: "2025-04-23".into(),
            hours: vec![hour.clone()],
            day_summary: DaySummary {
                average_temperature_celsius: 6.0,
                condition: hour.condition.clone(),
            },
        };

        assert_eq!(
            day.parsed_date(),
            NaiveDate::from_ymd_opt(2025, 4, 23)
        );
        let t = hour.parsed_time().unwrap();
        assert_eq!(t.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn test_parsed_date_malformed() {
        let day = ForecastDay {
            date: "23/04/2025".into(),
            hours: Vec::new(),
            day_summary: DaySummary {
                average_temperature_celsius: 0.0,
                condition: Condition {
                    text: String::new(),
                    icon_path: String::new(),
                },
            },
        };
        assert!(day.parsed_date().is_none());
    }
}
