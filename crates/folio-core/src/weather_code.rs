// ── WMO weather code classification ──
//
// Open-Meteo reports present weather as a WMO code (0–99). Only the codes
// Open-Meteo actually emits get a dedicated label; every other number falls
// back to "variable", and a missing or non-finite code to "unknown".

use strum::{Display, EnumIter};

/// Weather condition group for a WMO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum WeatherKind {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    Showers,
    SnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    Variable,
    Unknown,
}

/// Display data for a classified code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherMeta {
    pub kind: WeatherKind,
    pub label: &'static str,
    /// Emoji glyph shown next to the label.
    pub icon: &'static str,
    /// Font Awesome class for themes that prefer an icon font.
    pub icon_class: &'static str,
}

impl WeatherKind {
    /// Classify an integer WMO code. First match wins.
    pub fn from_wmo(code: i64) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::Showers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormWithHail,
            _ => Self::Variable,
        }
    }

    /// Classify a code as decoded from JSON.
    ///
    /// Fractional codes are not in the table and classify as
    /// [`Variable`](Self::Variable); missing or non-finite codes as
    /// [`Unknown`](Self::Unknown).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::as_conversions,
        clippy::float_cmp
    )]
    pub fn from_code(code: Option<f64>) -> Self {
        match code {
            Some(c) if c.is_finite() && c.fract() == 0.0 && c.abs() <= 1e15 => {
                Self::from_wmo(c as i64)
            }
            Some(c) if c.is_finite() => Self::Variable,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow grains",
            Self::Showers => "Showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with hail",
            Self::Variable => "Variable weather",
            Self::Unknown => "Unknown conditions",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "🌤️",
            Self::Overcast => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle | Self::Rain | Self::FreezingRain => "🌧️",
            Self::Snow | Self::SnowGrains | Self::SnowShowers => "🌨️",
            Self::Showers => "🌦️",
            Self::Thunderstorm | Self::ThunderstormWithHail => "⛈️",
            Self::Variable | Self::Unknown => "🌡️",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Clear => "fa-sun",
            Self::PartlyCloudy => "fa-cloud-sun",
            Self::Fog => "fa-smog",
            Self::Drizzle | Self::Rain | Self::FreezingRain | Self::Showers => "fa-cloud-rain",
            Self::Snow | Self::SnowGrains | Self::SnowShowers => "fa-snowflake",
            Self::Thunderstorm | Self::ThunderstormWithHail => "fa-bolt",
            Self::Overcast | Self::Variable | Self::Unknown => "fa-cloud",
        }
    }

    pub fn meta(self) -> WeatherMeta {
        WeatherMeta {
            kind: self,
            label: self.label(),
            icon: self.icon(),
            icon_class: self.icon_class(),
        }
    }
}

/// Map a weather code to its label and icons. Total: never fails.
pub fn classify(code: Option<f64>) -> WeatherMeta {
    WeatherKind::from_code(code).meta()
}
