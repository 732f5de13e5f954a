//! Text rendering of the view model. This is the presentation surface: it
//! only formats what the projector produced, it never reaches back to the
//! services.

use skycast_core::model::{CurrentConditions, DailyEntry, ExtraDetails, HourlyEntry};
use skycast_core::{AnimationKind, BackgroundProfile, SelectedCity, TemperatureUnit, ViewModel};

const MISSING: &str = "--";
const HOURLY_PER_ROW: usize = 6;

/// Render the full view for one city.
pub fn view(city: &SelectedCity, unit: TemperatureUnit, view: &ViewModel) -> String {
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push(format!(" {}", city.display_name()));
    lines.extend(current_lines(&view.current, unit));
    lines.push(extras_line(&view.extras));
    lines.push(backdrop_line(&view.background));

    if !view.hourly.is_empty() {
        lines.push(String::new());
        lines.push(" Next hours".to_string());
        lines.extend(hourly_lines(&view.hourly));
    }

    if !view.daily.is_empty() {
        lines.push(String::new());
        lines.push(" Week ahead".to_string());
        lines.extend(daily_lines(&view.daily));
    }

    lines.join("\n")
}

fn opt_value(value: Option<i32>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn current_lines(current: &CurrentConditions, unit: TemperatureUnit) -> Vec<String> {
    vec![
        format!(
            " {}{}  {}",
            current.temperature,
            unit.suffix(),
            current.classification.label
        ),
        format!(
            " Wind {} km/h | Feels like {} | Humidity {}",
            current.wind_speed,
            opt_value(current.feels_like),
            opt_value(current.humidity)
        ),
    ]
}

fn extras_line(extras: &ExtraDetails) -> String {
    format!(
        " Sunrise {} | Sunset {} | UV index {}",
        extras.sunrise.as_deref().unwrap_or(MISSING),
        extras.sunset.as_deref().unwrap_or(MISSING),
        extras.uv_index_max.as_deref().unwrap_or(MISSING)
    )
}

fn backdrop_line(profile: &BackgroundProfile) -> String {
    format!(
        " Backdrop: {} ({})",
        profile.background,
        animation_text(profile)
    )
}

fn animation_text(profile: &BackgroundProfile) -> String {
    match (profile.animation, profile.particles) {
        (AnimationKind::None, _) => "still".to_string(),
        (AnimationKind::SunGlow, _) => "sun glow".to_string(),
        (AnimationKind::Clouds, Some(count)) => format!("{count} drifting clouds"),
        (AnimationKind::Clouds, None) => "drifting clouds".to_string(),
        (AnimationKind::Rain, Some(count)) => format!("rain, {count} drops"),
        (AnimationKind::Rain, None) => "rain".to_string(),
        (AnimationKind::Thunderstorm, Some(count)) => {
            format!("lightning over {count} drops")
        }
        (AnimationKind::Thunderstorm, None) => "lightning".to_string(),
        (AnimationKind::Snow, _) => "falling snow".to_string(),
        (AnimationKind::Fog, _) => "drifting fog".to_string(),
    }
}

fn hourly_lines(entries: &[HourlyEntry]) -> Vec<String> {
    entries
        .chunks(HOURLY_PER_ROW)
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|entry| format!("{:>5} {:>4}", entry.label, format!("{}°", entry.temperature)))
                .collect();
            format!("  {}", cells.join("  "))
        })
        .collect()
}

fn daily_lines(entries: &[DailyEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "  {:<10} {:>4} / {:<4} {}",
                entry.day_name,
                format!("{}°", entry.high),
                format!("{}°", entry.low),
                entry.classification.label
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::model::{ForecastData, RawCurrent, RawDailyPoint, RawHourlyPoint};
    use skycast_core::project;

    fn a_city() -> SelectedCity {
        SelectedCity {
            name: "Madrid".to_string(),
            country: "Spain".to_string(),
            admin1: Some("Madrid".to_string()),
            latitude: 40.4165,
            longitude: -3.7026,
        }
    }

    fn a_view(code: u16) -> ViewModel {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date");
        let data = ForecastData {
            current: RawCurrent {
                temperature: 24.2,
                wind_speed: 11.8,
                code,
            },
            hourly: (0..3u32)
                .map(|h| RawHourlyPoint {
                    time: date.and_hms_opt(12 + h, 0, 0).expect("valid time"),
                    temperature: 24.0 + f64::from(h),
                    code,
                })
                .collect(),
            daily: vec![RawDailyPoint {
                date,
                temp_max: 28.4,
                temp_min: 17.6,
                code,
                sunrise: date.and_hms_opt(6, 12, 0),
                sunset: date.and_hms_opt(20, 45, 0),
                uv_index_max: Some(7.25),
            }],
        };
        project::view_model(&data)
    }

    #[test]
    fn renders_header_current_and_series() {
        let text = view(&a_city(), TemperatureUnit::Celsius, &a_view(0));
        assert!(text.contains("Madrid, Madrid, Spain"));
        assert!(text.contains("24°C  Clear sky"));
        assert!(text.contains("Wind 12 km/h"));
        assert!(text.contains("Now"));
        assert!(text.contains("Monday"));
        assert!(text.contains("28° / 18°"));
    }

    #[test]
    fn unavailable_fields_render_as_markers() {
        let text = view(&a_city(), TemperatureUnit::Celsius, &a_view(0));
        assert!(text.contains("Feels like --"));
        assert!(text.contains("Humidity --"));
    }

    #[test]
    fn extras_render_from_todays_daily_entry() {
        let text = view(&a_city(), TemperatureUnit::Celsius, &a_view(0));
        assert!(text.contains("Sunrise 06:12"));
        assert!(text.contains("Sunset 20:45"));
        assert!(text.contains("UV index 7.2"));
    }

    #[test]
    fn storm_backdrop_names_the_particle_count() {
        let text = view(&a_city(), TemperatureUnit::Celsius, &a_view(95));
        assert!(text.contains("Backdrop: storms (lightning over 30 drops)"));
    }

    #[test]
    fn rain_backdrop_uses_fifty_drops() {
        let line = backdrop_line(&skycast_core::background_for(61));
        assert_eq!(line, " Backdrop: rain (rain, 50 drops)");
    }

    #[test]
    fn fog_backdrop_is_still() {
        let line = backdrop_line(&skycast_core::background_for(45));
        assert_eq!(line, " Backdrop: foggy (still)");
    }

    #[test]
    fn fahrenheit_suffix_follows_the_unit() {
        let text = view(&a_city(), TemperatureUnit::Fahrenheit, &a_view(0));
        assert!(text.contains("24°F"));
    }
}
