//! Weather-code classification.
//!
//! Open-Meteo reports conditions as WMO weather codes. Both the display
//! descriptor and the decorative backdrop derive from one canonical
//! code-to-category table, so the two views can never silently disagree
//! about what a code means.

/// WMO weather condition code as reported by the forecast service.
///
/// The enumeration is externally defined; codes are never constructed
/// locally. Unrecognized codes are read as clear sky by policy.
pub type WeatherCode = u16;

/// Semantic weather category derived from a [`WeatherCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShower,
    SnowShower,
    Thunderstorm,
}

impl Category {
    /// Canonical mapping table. Group boundaries follow the WMO enumeration
    /// used by Open-Meteo and are not negotiable.
    pub fn of(code: WeatherCode) -> Self {
        match code {
            0 => Category::Clear,
            1..=3 => Category::PartlyCloudy,
            45 | 48 => Category::Fog,
            51 | 53 | 55 | 56 | 57 => Category::Drizzle,
            61 | 63 | 65 | 66 | 67 => Category::Rain,
            71 | 73 | 75 | 77 => Category::Snow,
            80..=82 => Category::RainShower,
            85 | 86 => Category::SnowShower,
            95 | 96 | 99 => Category::Thunderstorm,
            // Unlisted codes read as clear sky. Policy, not an error.
            _ => Category::Clear,
        }
    }
}

/// Display descriptor for a weather code: semantic category plus the icon
/// identifier and human-readable label the presentation surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub icon: &'static str,
    pub label: &'static str,
}

/// Animation directive attached to a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationKind {
    #[default]
    None,
    SunGlow,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
}

/// Decorative backdrop for a weather code: background image identifier,
/// animation kind, and optional particle/element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundProfile {
    pub background: &'static str,
    pub animation: AnimationKind,
    pub particles: Option<u32>,
}

/// Raindrop count for rain and drizzle backdrops.
const RAIN_DROPS: u32 = 50;
/// Raindrop count behind a thunderstorm (rendered together with a lightning flash).
const STORM_DROPS: u32 = 30;
/// Drifting cloud elements on the partly-cloudy backdrop.
const CLOUD_COUNT: u32 = 4;

/// Map a weather code to its display descriptor.
///
/// Pure and total: every integer maps to exactly one [`Classification`],
/// falling back to clear sky for codes outside the defined groups.
pub fn classify(code: WeatherCode) -> Classification {
    let category = Category::of(code);
    let (icon, label) = match category {
        Category::Clear => ("sun", "Clear sky"),
        Category::PartlyCloudy => ("cloud-sun", "Partly cloudy"),
        Category::Fog => ("fog", "Fog"),
        Category::Drizzle => ("rain", "Drizzle"),
        Category::Rain => ("rain", "Rain"),
        Category::Snow => ("snow", "Snow"),
        Category::RainShower => ("rain", "Rain showers"),
        Category::SnowShower => ("snow", "Snow showers"),
        Category::Thunderstorm => ("thunderstorm", "Thunderstorm"),
    };
    Classification {
        category,
        icon,
        label,
    }
}

/// Map a weather code to its decorative backdrop.
///
/// Derived from the same canonical table as [`classify`], so every code in
/// a rain-like category gets the rain backdrop, freezing rain included.
/// Fog and snow set a background only; they carry no animation.
pub fn background_for(code: WeatherCode) -> BackgroundProfile {
    match Category::of(code) {
        Category::Clear => BackgroundProfile {
            background: "clear",
            animation: AnimationKind::SunGlow,
            particles: None,
        },
        Category::PartlyCloudy => BackgroundProfile {
            background: "clouds",
            animation: AnimationKind::Clouds,
            particles: Some(CLOUD_COUNT),
        },
        Category::Fog => BackgroundProfile {
            background: "foggy",
            animation: AnimationKind::None,
            particles: None,
        },
        Category::Drizzle | Category::Rain | Category::RainShower => BackgroundProfile {
            background: "rain",
            animation: AnimationKind::Rain,
            particles: Some(RAIN_DROPS),
        },
        Category::Snow | Category::SnowShower => BackgroundProfile {
            background: "snow",
            animation: AnimationKind::None,
            particles: None,
        },
        Category::Thunderstorm => BackgroundProfile {
            background: "storms",
            animation: AnimationKind::Thunderstorm,
            particles: Some(STORM_DROPS),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_groups_match_wmo_boundaries() {
        let groups: &[(&[WeatherCode], Category)] = &[
            (&[0], Category::Clear),
            (&[1, 2, 3], Category::PartlyCloudy),
            (&[45, 48], Category::Fog),
            (&[51, 53, 55, 56, 57], Category::Drizzle),
            (&[61, 63, 65, 66, 67], Category::Rain),
            (&[71, 73, 75, 77], Category::Snow),
            (&[80, 81, 82], Category::RainShower),
            (&[85, 86], Category::SnowShower),
            (&[95, 96, 99], Category::Thunderstorm),
        ];

        for (codes, expected) in groups {
            for code in *codes {
                assert_eq!(Category::of(*code), *expected, "code {code}");
            }
        }
    }

    #[test]
    fn unrecognized_codes_fall_back_to_clear() {
        for code in [4, 44, 50, 58, 70, 78, 90, 100, 200, u16::MAX] {
            assert_eq!(Category::of(code), Category::Clear, "code {code}");
            assert_eq!(classify(code).label, "Clear sky");
            let bg = background_for(code);
            assert_eq!(bg.background, "clear");
            assert_eq!(bg.animation, AnimationKind::SunGlow);
        }
    }

    #[test]
    fn clear_sky_descriptor() {
        let c = classify(0);
        assert_eq!(c.category, Category::Clear);
        assert_eq!(c.icon, "sun");
        assert_eq!(c.label, "Clear sky");

        let bg = background_for(0);
        assert_eq!(bg.background, "clear");
        assert_eq!(bg.animation, AnimationKind::SunGlow);
        assert_eq!(bg.particles, None);
    }

    #[test]
    fn rain_descriptor_and_backdrop() {
        let c = classify(61);
        assert_eq!(c.category, Category::Rain);
        assert_eq!(c.label, "Rain");

        let bg = background_for(61);
        assert_eq!(bg.animation, AnimationKind::Rain);
        assert_eq!(bg.particles, Some(50));
    }

    #[test]
    fn thunderstorm_backdrop_uses_thirty_drops() {
        let bg = background_for(95);
        assert_eq!(bg.background, "storms");
        assert_eq!(bg.animation, AnimationKind::Thunderstorm);
        assert_eq!(bg.particles, Some(30));
    }

    #[test]
    fn fog_has_no_animation() {
        let bg = background_for(45);
        assert_eq!(bg.background, "foggy");
        assert_eq!(bg.animation, AnimationKind::None);
        assert_eq!(bg.particles, None);
    }

    #[test]
    fn every_rain_like_code_gets_the_rain_backdrop() {
        // 66/67 (freezing rain) included: the unified table closes the gap
        // where they previously fell through to the clear backdrop.
        for code in [51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 80, 81, 82] {
            let bg = background_for(code);
            assert_eq!(bg.background, "rain", "code {code}");
            assert_eq!(bg.animation, AnimationKind::Rain, "code {code}");
            assert_eq!(bg.particles, Some(50), "code {code}");
        }
    }

    #[test]
    fn snow_codes_set_background_without_animation() {
        for code in [71, 73, 75, 77, 85, 86] {
            let bg = background_for(code);
            assert_eq!(bg.background, "snow", "code {code}");
            assert_eq!(bg.animation, AnimationKind::None, "code {code}");
        }
    }
}
