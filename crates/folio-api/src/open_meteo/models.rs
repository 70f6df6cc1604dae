use serde::Deserialize;

use crate::lenient;

/// Response body of `GET /v1/forecast`, reduced to the requested fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub daily: Option<DailySummary>,
}

/// The `current` block. `time` is local wall-clock time in the requested
/// timezone, e.g. `2024-05-01T14:15`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weather_code: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub wind_speed_10m: Option<f64>,
}

/// First day of the `daily` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySummary {
    #[serde(default, deserialize_with = "lenient::first_number")]
    pub temperature_2m_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::first_number")]
    pub temperature_2m_max: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_a_typical_forecast() {
        let forecast: Forecast = serde_json::from_value(json!({
            "latitude": 48.86,
            "longitude": 2.35,
            "current": {
                "time": "2024-05-01T14:15",
                "interval": 900,
                "temperature_2m": 17.4,
                "relative_humidity_2m": 62,
                "weather_code": 61,
                "wind_speed_10m": 11.9
            },
            "daily": {
                "time": ["2024-05-01"],
                "temperature_2m_min": [9.8],
                "temperature_2m_max": [19.1]
            }
        }))
        .unwrap();

        let current = forecast.current.unwrap();
        assert_eq!(current.time.as_deref(), Some("2024-05-01T14:15"));
        assert_eq!(current.weather_code, Some(61.0));
        assert_eq!(current.relative_humidity_2m, Some(62.0));
        let daily = forecast.daily.unwrap();
        assert_eq!(daily.temperature_2m_min, Some(9.8));
        assert_eq!(daily.temperature_2m_max, Some(19.1));
    }

    #[test]
    fn odd_shapes_become_missing_values() {
        let forecast: Forecast = serde_json::from_value(json!({
            "current": {
                "time": 1_714_572_900,
                "temperature_2m": "n/a",
                "weather_code": null
            },
            "daily": {
                "temperature_2m_min": 9.8,
                "temperature_2m_max": []
            }
        }))
        .unwrap();

        let current = forecast.current.unwrap();
        assert!(current.time.is_none());
        assert!(current.temperature_2m.is_none());
        assert!(current.weather_code.is_none());
        assert!(current.wind_speed_10m.is_none());
        let daily = forecast.daily.unwrap();
        assert!(daily.temperature_2m_min.is_none());
        assert!(daily.temperature_2m_max.is_none());
    }

    #[test]
    fn missing_blocks_are_tolerated() {
        let forecast: Forecast = serde_json::from_value(json!({})).unwrap();
        assert!(forecast.current.is_none());
        assert!(forecast.daily.is_none());
    }
}
