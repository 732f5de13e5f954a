//! Open-Meteo implementations of the geocoding and forecast services.
//!
//! Both endpoints are keyless. Forecast series arrive as parallel arrays
//! keyed by timestamp; decoding zips them into provider-neutral points,
//! truncating to the shortest array and skipping entries with timestamps
//! that fail to parse.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    model::{
        ForecastData, ForecastRequest, RawCurrent, RawDailyPoint, RawHourlyPoint, SelectedCity,
    },
    provider::{ForecastService, GeocodingService},
};

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_FIELDS: &str = "temperature_2m,weathercode";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,weathercode,sunrise,sunset,uv_index_max";
/// Wind speed is always requested in km/h; only the temperature unit is
/// user-selectable.
const WINDSPEED_UNIT: &str = "kmh";

const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub struct OpenMeteoClient {
    http: Client,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    async fn get_body(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Transport { service, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { service, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                service,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl GeocodingService for OpenMeteoClient {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<SelectedCity>, FetchError> {
        debug!(query, limit, "geocoding lookup");
        let params = [
            ("name", query.to_string()),
            ("count", limit.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.get_body("geocoding", GEOCODING_URL, &params).await?;
        parse_geocoding(&body)
    }
}

#[async_trait]
impl ForecastService for OpenMeteoClient {
    async fn fetch(&self, request: &ForecastRequest) -> Result<ForecastData, FetchError> {
        debug!(
            latitude = request.latitude,
            longitude = request.longitude,
            unit = %request.unit,
            "forecast lookup"
        );
        let params = [
            ("latitude", request.latitude.to_string()),
            ("longitude", request.longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", "auto".to_string()),
            ("temperature_unit", request.unit.api_value().to_string()),
            ("windspeed_unit", WINDSPEED_UNIT.to_string()),
        ];
        let body = self.get_body("forecast", FORECAST_URL, &params).await?;
        parse_forecast(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<GeoResult> for SelectedCity {
    fn from(result: GeoResult) -> Self {
        SelectedCity {
            name: result.name,
            country: result.country.unwrap_or_default(),
            admin1: result.admin1,
            latitude: result.latitude,
            longitude: result.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastWire {
    current_weather: CurrentWire,
    hourly: HourlyWire,
    daily: DailyWire,
}

#[derive(Debug, Deserialize)]
struct CurrentWire {
    temperature: f64,
    windspeed: f64,
    weathercode: u16,
}

#[derive(Debug, Deserialize)]
struct HourlyWire {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weathercode: Vec<u16>,
}

#[derive(Debug, Deserialize)]
struct DailyWire {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weathercode: Vec<u16>,
    sunrise: Option<Vec<String>>,
    sunset: Option<Vec<String>>,
    uv_index_max: Option<Vec<f64>>,
}

fn parse_geocoding(body: &str) -> Result<Vec<SelectedCity>, FetchError> {
    let parsed: GeoResponse = serde_json::from_str(body).map_err(|source| FetchError::Decode {
        service: "geocoding",
        source,
    })?;

    let results = parsed.results.unwrap_or_default();
    if results.is_empty() {
        return Err(FetchError::Empty {
            service: "geocoding",
        });
    }

    Ok(results.into_iter().map(SelectedCity::from).collect())
}

fn parse_forecast(body: &str) -> Result<ForecastData, FetchError> {
    let parsed: ForecastWire = serde_json::from_str(body).map_err(|source| FetchError::Decode {
        service: "forecast",
        source,
    })?;

    let current = RawCurrent {
        temperature: parsed.current_weather.temperature,
        wind_speed: parsed.current_weather.windspeed,
        code: parsed.current_weather.weathercode,
    };

    let mut hourly = Vec::new();
    for ((time, temperature), code) in parsed
        .hourly
        .time
        .iter()
        .zip(&parsed.hourly.temperature_2m)
        .zip(&parsed.hourly.weathercode)
    {
        match NaiveDateTime::parse_from_str(time, HOUR_FORMAT) {
            Ok(time) => hourly.push(RawHourlyPoint {
                time,
                temperature: *temperature,
                code: *code,
            }),
            Err(err) => warn!(%time, %err, "skipping hourly entry with malformed timestamp"),
        }
    }

    let mut daily = Vec::new();
    for (i, date) in parsed.daily.time.iter().enumerate() {
        let (Some(temp_max), Some(temp_min), Some(code)) = (
            parsed.daily.temperature_2m_max.get(i),
            parsed.daily.temperature_2m_min.get(i),
            parsed.daily.weathercode.get(i),
        ) else {
            break;
        };
        match NaiveDate::parse_from_str(date, DATE_FORMAT) {
            Ok(date) => daily.push(RawDailyPoint {
                date,
                temp_max: *temp_max,
                temp_min: *temp_min,
                code: *code,
                sunrise: optional_time(parsed.daily.sunrise.as_ref(), i),
                sunset: optional_time(parsed.daily.sunset.as_ref(), i),
                uv_index_max: parsed
                    .daily
                    .uv_index_max
                    .as_ref()
                    .and_then(|values| values.get(i))
                    .copied(),
            }),
            Err(err) => warn!(%date, %err, "skipping daily entry with malformed date"),
        }
    }

    Ok(ForecastData {
        current,
        hourly,
        daily,
    })
}

fn optional_time(series: Option<&Vec<String>>, index: usize) -> Option<NaiveDateTime> {
    series
        .and_then(|values| values.get(index))
        .and_then(|value| NaiveDateTime::parse_from_str(value, HOUR_FORMAT).ok())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary so multibyte text cannot split mid-character.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_parses_results() {
        let body = r#"{
            "results": [
                {"name": "Madrid", "latitude": 40.4165, "longitude": -3.7026,
                 "country": "Spain", "admin1": "Madrid"},
                {"name": "Madrid", "latitude": 4.73, "longitude": -73.3,
                 "country": "Colombia"}
            ]
        }"#;
        let cities = parse_geocoding(body).expect("parse should succeed");
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].display_name(), "Madrid, Madrid, Spain");
        assert_eq!(cities[1].admin1, None);
        assert_eq!(cities[1].country, "Colombia");
    }

    #[test]
    fn geocoding_empty_and_missing_results_are_empty_errors() {
        for body in [r#"{"results": []}"#, r#"{"generationtime_ms": 0.5}"#] {
            let err = parse_geocoding(body).unwrap_err();
            assert!(err.is_empty(), "body {body}");
        }
    }

    #[test]
    fn geocoding_malformed_body_is_a_decode_error() {
        let err = parse_geocoding("not json").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    const FORECAST_BODY: &str = r#"{
        "current_weather": {"temperature": 24.6, "windspeed": 11.4, "weathercode": 61},
        "hourly": {
            "time": ["2026-08-23T13:00", "garbled", "2026-08-23T15:00"],
            "temperature_2m": [24.6, 24.9, 25.2],
            "weathercode": [61, 61, 80]
        },
        "daily": {
            "time": ["2026-08-23", "2026-08-24"],
            "temperature_2m_max": [28.4, 27.1],
            "temperature_2m_min": [17.6, 16.9],
            "weathercode": [61, 3],
            "sunrise": ["2026-08-23T06:12", "2026-08-24T06:13"],
            "sunset": ["2026-08-23T20:45", "2026-08-24T20:43"]
        }
    }"#;

    #[test]
    fn forecast_parses_current_and_series() {
        let data = parse_forecast(FORECAST_BODY).expect("parse should succeed");
        assert_eq!(data.current.temperature, 24.6);
        assert_eq!(data.current.code, 61);

        // The garbled hourly timestamp is skipped, not fatal.
        assert_eq!(data.hourly.len(), 2);
        assert_eq!(data.hourly[1].code, 80);

        assert_eq!(data.daily.len(), 2);
        assert_eq!(
            data.daily[0].sunrise.map(|t| t.format("%H:%M").to_string()),
            Some("06:12".to_string())
        );
        // uv_index_max absent from the payload: explicit unavailable marker.
        assert_eq!(data.daily[0].uv_index_max, None);
    }

    #[test]
    fn forecast_ragged_parallel_arrays_truncate_to_shortest() {
        let body = r#"{
            "current_weather": {"temperature": 20.0, "windspeed": 5.0, "weathercode": 0},
            "hourly": {
                "time": ["2026-08-23T13:00", "2026-08-23T14:00", "2026-08-23T15:00"],
                "temperature_2m": [24.6, 24.9],
                "weathercode": [0, 0, 0]
            },
            "daily": {
                "time": ["2026-08-23", "2026-08-24"],
                "temperature_2m_max": [28.4],
                "temperature_2m_min": [17.6, 16.9],
                "weathercode": [61, 3]
            }
        }"#;
        let data = parse_forecast(body).expect("parse should succeed");
        assert_eq!(data.hourly.len(), 2);
        assert_eq!(data.daily.len(), 1);
    }

    #[test]
    fn forecast_without_current_weather_is_a_decode_error() {
        let err = parse_forecast(r#"{"hourly": {}, "daily": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode {
                service: "forecast",
                ..
            }
        ));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert!(truncated.len() < 250);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_never_splits_a_multibyte_character() {
        // 'é' spans bytes 199..201, straddling the 200-byte cutoff.
        let body = format!("{}é and the rest of a long error page", "x".repeat(199));
        let truncated = truncate_body(&body);
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));
    }
}
