//! Display formatting for numeric readings and observation times.

use chrono::{DateTime, NaiveDateTime};

/// Shown wherever a reading is missing or not a finite number.
pub const NO_DATA: &str = "—";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Round a reading to the nearest integer for display.
///
/// Ties round half away from zero (`2.5 → "3"`, `-2.5 → "-3"`), and a
/// result of negative zero renders as `"0"`. Missing, NaN and infinite
/// values render as [`NO_DATA`].
#[allow(clippy::float_cmp)]
pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let rounded = v.round();
            if rounded == 0.0 {
                "0".into()
            } else {
                format!("{rounded}")
            }
        }
        None => NO_DATA.into(),
    }
}

/// Render an observation timestamp as a 24-hour `HH:MM` clock.
///
/// Naive timestamps (`2024-05-01T14:15`) are already wall-clock time in
/// the timezone the forecast was requested for and are shown as-is.
/// RFC 3339 timestamps keep their own offset. The process timezone is
/// never consulted. Returns `None` when `raw` is not a timestamp.
pub fn format_clock(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format("%H:%M").to_string());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%H:%M").to_string())
}
