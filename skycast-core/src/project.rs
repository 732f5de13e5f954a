//! View projection: pure functions from raw forecast data to the
//! display-ready view model. Identical input always yields an identical
//! view model; any fetch failure aborts the update before these run.

use crate::classify::{background_for, classify};
use crate::model::{
    CurrentConditions, DailyEntry, ExtraDetails, ForecastData, HourlyEntry, RawCurrent,
    RawDailyPoint, RawHourlyPoint, ViewModel,
};

/// Hourly entries shown, at most.
pub const HOURLY_LIMIT: usize = 24;
/// Daily entries shown, at most.
pub const DAILY_LIMIT: usize = 7;

/// Round a measurement to its integer display value.
fn display_round(value: f64) -> i32 {
    value.round() as i32
}

/// Project current conditions. Humidity and feels-like are not present in
/// the current-conditions payload and stay explicitly unavailable.
pub fn project_current(raw: &RawCurrent) -> CurrentConditions {
    CurrentConditions {
        temperature: display_round(raw.temperature),
        wind_speed: display_round(raw.wind_speed),
        humidity: None,
        feels_like: None,
        classification: classify(raw.code),
    }
}

/// Project the hourly series, truncated to [`HOURLY_LIMIT`] entries.
///
/// Entry 0 is labeled "Now" regardless of its timestamp; the rest carry
/// their local hour. A display convention, not a claim about the data.
pub fn project_hourly(series: &[RawHourlyPoint]) -> Vec<HourlyEntry> {
    series
        .iter()
        .take(HOURLY_LIMIT)
        .enumerate()
        .map(|(i, point)| HourlyEntry {
            label: if i == 0 {
                "Now".to_string()
            } else {
                point.time.format("%-I %p").to_string()
            },
            temperature: display_round(point.temperature),
            classification: classify(point.code),
        })
        .collect()
}

/// Project the daily series, truncated to [`DAILY_LIMIT`] entries.
pub fn project_daily(series: &[RawDailyPoint]) -> Vec<DailyEntry> {
    series
        .iter()
        .take(DAILY_LIMIT)
        .map(|point| DailyEntry {
            day_name: point.date.format("%A").to_string(),
            high: display_round(point.temp_max),
            low: display_round(point.temp_min),
            classification: classify(point.code),
        })
        .collect()
}

/// Sunrise, sunset, and peak UV index, taken only from the first element of
/// the daily series (today). Absent fields render as unavailable.
pub fn project_extras(daily: &[RawDailyPoint]) -> ExtraDetails {
    let today = daily.first();
    ExtraDetails {
        sunrise: today
            .and_then(|d| d.sunrise)
            .map(|t| t.format("%H:%M").to_string()),
        sunset: today
            .and_then(|d| d.sunset)
            .map(|t| t.format("%H:%M").to_string()),
        uv_index_max: today
            .and_then(|d| d.uv_index_max)
            .map(|uv| format!("{uv:.1}")),
    }
}

/// Assemble the full view model, backdrop included.
pub fn view_model(data: &ForecastData) -> ViewModel {
    ViewModel {
        current: project_current(&data.current),
        hourly: project_hourly(&data.hourly),
        daily: project_daily(&data.daily),
        extras: project_extras(&data.daily),
        background: background_for(data.current.code),
    }
}
