use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::classify::{BackgroundProfile, Classification, WeatherCode};

/// Temperature unit sent to the forecast service.
///
/// The service performs the conversion; values come back already in the
/// requested unit and the client never converts locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the `temperature_unit` request parameter.
    pub fn api_value(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Display suffix, e.g. `24°C`.
    pub fn suffix(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_value())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureUnit::try_from(s)
    }
}

/// A geocoded city the user picked from the suggestion list.
///
/// Set exactly once per selection and immutable until replaced wholesale by
/// the next selection; its coordinates drive every subsequent forecast
/// request, including unit-toggle re-fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCity {
    pub name: String,
    pub country: String,
    /// First-level administrative region, when the geocoder knows it.
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl SelectedCity {
    /// "Name, Region, Country", skipping parts the geocoder left blank.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(admin1) = &self.admin1 {
            if !admin1.is_empty() {
                parts.push(admin1);
            }
        }
        if !self.country.is_empty() {
            parts.push(&self.country);
        }
        parts.join(", ")
    }
}

/// Parameters of a forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub unit: TemperatureUnit,
}

/// Current conditions as reported by the forecast service.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurrent {
    pub temperature: f64,
    pub wind_speed: f64,
    pub code: WeatherCode,
}

/// One point of the hourly series.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHourlyPoint {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub code: WeatherCode,
}

/// One day of the daily series. Sunrise/sunset/UV are optional upstream;
/// absence is carried through as an explicit unavailable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDailyPoint {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub code: WeatherCode,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub uv_index_max: Option<f64>,
}

/// Provider-neutral forecast payload handed to the view projector.
///
/// Constructed fresh on every successful fetch and replaced wholesale,
/// never mutated field-by-field across fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastData {
    pub current: RawCurrent,
    pub hourly: Vec<RawHourlyPoint>,
    pub daily: Vec<RawDailyPoint>,
}

/// Display-ready summary of the current conditions.
///
/// Humidity and feels-like are not supplied by the current-conditions
/// payload; they stay `None` and render as an unavailable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub wind_speed: i32,
    pub humidity: Option<i32>,
    pub feels_like: Option<i32>,
    pub classification: Classification,
}

/// One display-ready hourly entry. Entry 0 is always labeled "Now".
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub label: String,
    pub temperature: i32,
    pub classification: Classification,
}

/// One display-ready daily entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub day_name: String,
    pub high: i32,
    pub low: i32,
    pub classification: Classification,
}

/// Today's sunrise, sunset, and peak UV index, formatted for display.
/// `None` renders as an unavailable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraDetails {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub uv_index_max: Option<String>,
}

/// The fully-projected structure handed to the presentation surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
    pub extras: ExtraDetails,
    pub background: BackgroundProfile,
}
