// ── Weather widget ──
//
// Reads coordinates from the host, renders the current conditions from
// Open-Meteo, then keeps the host fresh on a fixed interval. Each host gets
// at most one refresh timer no matter how often it is initialized; the
// registry below is the only long-lived state in the crate.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use folio_api::{Forecast, ForecastQuery, OpenMeteoClient};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WidgetsConfig;
use crate::error::CoreError;
use crate::format::{format_clock, format_number};
use crate::host::{ContentRegion, HostDescriptor, HostId, RenderSink};
use crate::html::escape_html;
use crate::weather_code::{WeatherMeta, classify};
use crate::widgets::WidgetState;

/// Host attribute holding the latitude.
pub const LATITUDE_ATTRIBUTE: &str = "lat";
/// Host attribute holding the longitude.
pub const LONGITUDE_ATTRIBUTE: &str = "lon";
/// Host attribute holding the IANA timezone name.
pub const TIMEZONE_ATTRIBUTE: &str = "timezone";

// ── Settings ─────────────────────────────────────────────────────────

/// Everything a fetch cycle needs, read once from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    pub region: ContentRegion,
    pub query: ForecastQuery,
}

impl WeatherSettings {
    /// Parse the host's coordinates. Both must be finite numbers; the
    /// timezone falls back to `default_timezone`.
    pub fn from_host(host: &HostDescriptor, default_timezone: &str) -> Result<Self, CoreError> {
        let latitude = coordinate(host, LATITUDE_ATTRIBUTE)?;
        let longitude = coordinate(host, LONGITUDE_ATTRIBUTE)?;
        let timezone = host
            .attribute(TIMEZONE_ATTRIBUTE)
            .unwrap_or(default_timezone)
            .to_owned();

        Ok(Self {
            region: host.content_region(),
            query: ForecastQuery {
                latitude,
                longitude,
                timezone,
            },
        })
    }
}

fn coordinate(host: &HostDescriptor, name: &str) -> Result<f64, CoreError> {
    host.attribute(name)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::ConfigurationMissing {
            message: format!("`{name}` is not a finite number"),
        })
}

// ── Report ───────────────────────────────────────────────────────────

/// Data behind a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub condition: WeatherMeta,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Observation time as `HH:MM`, when the payload carried one.
    pub updated_at: Option<String>,
}

impl WeatherReport {
    pub fn from_forecast(forecast: &Forecast) -> Self {
        let current = forecast.current.clone().unwrap_or_default();
        let daily = forecast.daily.clone().unwrap_or_default();

        Self {
            condition: classify(current.weather_code),
            temperature: current.temperature_2m,
            wind_speed: current.wind_speed_10m,
            humidity: current.relative_humidity_2m,
            min: daily.temperature_2m_min,
            max: daily.temperature_2m_max,
            updated_at: current.time.as_deref().and_then(format_clock),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────

/// Controller for weather hosts.
///
/// Cheaply cloneable via `Arc<WeatherInner>`. Owns the refresh timer
/// registry: one background task per initialized host, cancelled together
/// by [`shutdown()`](Self::shutdown).
#[derive(Clone)]
pub struct WeatherWidget {
    inner: Arc<WeatherInner>,
}

struct WeatherInner {
    client: OpenMeteoClient,
    sink: Arc<dyn RenderSink>,
    default_timezone: String,
    refresh_interval: Duration,
    timers: DashMap<HostId, JoinHandle<()>>,
    cancel: CancellationToken,
}

impl WeatherWidget {
    pub fn new(client: OpenMeteoClient, sink: Arc<dyn RenderSink>, config: &WidgetsConfig) -> Self {
        Self {
            inner: Arc::new(WeatherInner {
                client,
                sink,
                default_timezone: config.default_timezone.clone(),
                refresh_interval: config.refresh_interval,
                timers: DashMap::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Build the Open-Meteo client from `config` and wrap it.
    pub fn from_config(
        config: &WidgetsConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, CoreError> {
        let client = OpenMeteoClient::new(config.open_meteo_url.clone(), &config.transport())?;
        Ok(Self::new(client, sink, config))
    }

    /// Initialize `host`: render one cycle now, then keep refreshing.
    ///
    /// The first cycle is awaited before returning. Calling this again for
    /// the same host runs another immediate cycle but never schedules a
    /// second timer. Must be called from within a Tokio runtime.
    pub async fn init(&self, host: &HostDescriptor) -> WidgetState<WeatherReport> {
        let settings = match WeatherSettings::from_host(host, &self.inner.default_timezone) {
            Ok(settings) => settings,
            Err(e) => {
                debug!(host = %host.id(), reason = %e, "weather widget not configured");
                let state = WidgetState::Unconfigured;
                self.render(&host.content_region(), &state);
                return state;
            }
        };

        if !self.has_timer(host.id()) {
            self.render(&settings.region, &WidgetState::Loading);
        }

        let state = self.load_and_render(&settings).await;
        self.ensure_timer(&settings);
        state
    }

    /// One fetch cycle: request, classify, render success or fallback.
    pub async fn load_and_render(&self, settings: &WeatherSettings) -> WidgetState<WeatherReport> {
        let result = self
            .inner
            .client
            .forecast(&settings.query)
            .await
            .map(|forecast| WeatherReport::from_forecast(&forecast))
            .map_err(CoreError::from);

        let state = WidgetState::settle(result);
        match &state {
            WidgetState::Success(report) => info!(
                region = %settings.region,
                condition = %report.condition.kind,
                "weather widget rendered"
            ),
            WidgetState::Failure(reason) => {
                warn!(region = %settings.region, error = %reason, "weather refresh failed");
            }
            WidgetState::Unconfigured | WidgetState::Loading => {}
        }
        self.render(&settings.region, &state);
        state
    }

    /// Returns `true` if `host` already has a refresh timer.
    pub fn has_timer(&self, host: &HostId) -> bool {
        self.inner.timers.contains_key(host)
    }

    /// Number of hosts with a refresh timer.
    pub fn active_timers(&self) -> usize {
        self.inner.timers.len()
    }

    /// Stop every refresh timer and wait for in-flight cycles to finish.
    ///
    /// Final: later initializations still render but schedule no timer.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let hosts: Vec<HostId> = self
            .inner
            .timers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        for host in hosts {
            if let Some((_, handle)) = self.inner.timers.remove(&host) {
                if let Err(e) = handle.await {
                    warn!(%host, error = %e, "refresh task ended abnormally");
                }
            }
        }
        debug!("weather refresh stopped");
    }

    /// Schedule the refresh timer for this host unless one exists.
    ///
    /// The registry entry is checked and filled under one shard lock, so
    /// concurrent initializations of a host still produce a single timer.
    fn ensure_timer(&self, settings: &WeatherSettings) -> bool {
        if self.inner.cancel.is_cancelled() {
            debug!(host = %settings.region.host, "widget shut down; no refresh timer");
            return false;
        }
        match self.inner.timers.entry(settings.region.host.clone()) {
            Entry::Occupied(_) => {
                debug!(host = %settings.region.host, "refresh timer already active");
                false
            }
            Entry::Vacant(slot) => {
                let widget = self.clone();
                let cancel = self.inner.cancel.child_token();
                let period = self.inner.refresh_interval;
                slot.insert(tokio::spawn(refresh_task(
                    widget,
                    settings.clone(),
                    period,
                    cancel,
                )));
                debug!(
                    host = %settings.region.host,
                    every_secs = period.as_secs(),
                    "refresh timer scheduled"
                );
                true
            }
        }
    }

    fn render(&self, region: &ContentRegion, state: &WidgetState<WeatherReport>) {
        self.inner.sink.render(region, &markup(state));
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Re-run the fetch cycle for one host every `period`.
async fn refresh_task(
    widget: WeatherWidget,
    settings: WeatherSettings,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                widget.load_and_render(&settings).await;
            }
        }
    }
}

// ── Markup ───────────────────────────────────────────────────────────

/// Render a weather widget state.
pub fn markup(state: &WidgetState<WeatherReport>) -> String {
    match state {
        WidgetState::Unconfigured => "<p class=\"placeholder-text\">Invalid coordinates.</p>\n".into(),
        WidgetState::Loading => "<p class=\"placeholder-text\">Loading weather…</p>\n".into(),
        WidgetState::Success(report) => success_markup(report),
        WidgetState::Failure(reason) => format!(
            "<p class=\"placeholder-text\">Unable to load the weather ({}).</p>\n",
            escape_html(reason)
        ),
    }
}

fn success_markup(report: &WeatherReport) -> String {
    let condition = &report.condition;
    let mut html = format!(
        "<div class=\"weather-summary\">\n\
         \x20 <p class=\"weather-condition\">{}</p>\n\
         \x20 <span class=\"weather-hero-icon {}\" aria-hidden=\"true\">{}</span>\n\
         </div>\n",
        escape_html(condition.label),
        condition.icon_class,
        condition.icon,
    );

    html.push_str("<dl class=\"weather-stats\">\n");
    html.push_str(&stat_row(
        "fa-temperature-three-quarters",
        "Temperature",
        &format!("{}°C", format_number(report.temperature)),
    ));
    html.push_str(&stat_row(
        "fa-wind",
        "Wind",
        &format!("{} km/h", format_number(report.wind_speed)),
    ));
    html.push_str(&stat_row(
        "fa-droplet",
        "Humidity",
        &format!("{}%", format_number(report.humidity)),
    ));
    html.push_str(&stat_row(
        "fa-arrows-up-down",
        "Min / Max",
        &format!(
            "{}°C / {}°C",
            format_number(report.min),
            format_number(report.max)
        ),
    ));
    html.push_str("</dl>\n");

    let (title, updated) = match &report.updated_at {
        Some(clock) => {
            let clock = escape_html(clock);
            (
                format!(" title=\"Last updated: {clock}\""),
                format!("Updated {clock} · "),
            )
        }
        None => (String::new(), String::new()),
    };
    html.push_str(&format!(
        "<p class=\"weather-footnote\"{title}>\n\
         \x20 <i class=\"fa-solid fa-rotate-right\" aria-hidden=\"true\"></i>\n\
         \x20 {updated}Auto-refresh · Open-Meteo\n\
         </p>\n"
    ));
    html
}

fn stat_row(icon_class: &str, label: &str, value: &str) -> String {
    format!(
        "  <div class=\"weather-row\">\n\
         \x20   <dt><i class=\"fa-solid {icon_class}\" aria-hidden=\"true\"></i>{label}</dt>\n\
         \x20   <dd><strong>{value}</strong></dd>\n\
         \x20 </div>\n"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::format::NO_DATA;

    fn host() -> HostDescriptor {
        HostDescriptor::new("weather-widget")
            .with_attribute(LATITUDE_ATTRIBUTE, "48.85")
            .with_attribute(LONGITUDE_ATTRIBUTE, " 2.35 ")
    }

    #[test]
    fn settings_use_default_timezone() {
        let settings = WeatherSettings::from_host(&host(), "Europe/Paris").unwrap();
        assert!((settings.query.latitude - 48.85).abs() < f64::EPSILON);
        assert!((settings.query.longitude - 2.35).abs() < f64::EPSILON);
        assert_eq!(settings.query.timezone, "Europe/Paris");

        let tokyo = host().with_attribute(TIMEZONE_ATTRIBUTE, "Asia/Tokyo");
        let settings = WeatherSettings::from_host(&tokyo, "Europe/Paris").unwrap();
        assert_eq!(settings.query.timezone, "Asia/Tokyo");
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        for bad in ["", "north", "NaN", "inf"] {
            let h = host().with_attribute(LATITUDE_ATTRIBUTE, bad);
            let err = WeatherSettings::from_host(&h, "UTC").unwrap_err();
            assert!(err.is_configuration_missing(), "{bad}: {err}");
        }
        let no_lon = HostDescriptor::new("w").with_attribute(LATITUDE_ATTRIBUTE, "1");
        assert!(WeatherSettings::from_host(&no_lon, "UTC").is_err());
    }

    #[test]
    fn report_extracts_current_and_first_daily_values() {
        let forecast: Forecast = serde_json::from_value(json!({
            "current": {
                "time": "2024-05-01T14:15",
                "temperature_2m": 17.5,
                "relative_humidity_2m": 62,
                "weather_code": 61,
                "wind_speed_10m": 11.2
            },
            "daily": {
                "temperature_2m_min": [9.8, 1.0],
                "temperature_2m_max": [19.1, 2.0]
            }
        }))
        .unwrap();

        let report = WeatherReport::from_forecast(&forecast);
        assert_eq!(report.condition.label, "Rain");
        assert_eq!(report.updated_at.as_deref(), Some("14:15"));

        let html = markup(&WidgetState::Success(report));
        assert!(html.contains("<p class=\"weather-condition\">Rain</p>"));
        assert!(html.contains("🌧️"));
        assert!(html.contains("<strong>18°C</strong>"));
        assert!(html.contains("<strong>11 km/h</strong>"));
        assert!(html.contains("<strong>62%</strong>"));
        assert!(html.contains("<strong>10°C / 19°C</strong>"));
        assert!(html.contains("title=\"Last updated: 14:15\""));
        assert!(html.contains("Updated 14:15 · Auto-refresh · Open-Meteo"));
    }

    #[test]
    fn empty_forecast_renders_placeholders() {
        let report = WeatherReport::from_forecast(&Forecast::default());
        assert_eq!(report.condition.label, "Unknown conditions");

        let html = markup(&WidgetState::Success(report));
        assert!(html.contains(&format!("<strong>{NO_DATA}°C</strong>")));
        assert!(html.contains(&format!("<strong>{NO_DATA}°C / {NO_DATA}°C</strong>")));
        assert!(!html.contains("title="));
    }

    #[test]
    fn fallback_messages() {
        assert!(markup(&WidgetState::Unconfigured).contains("Invalid coordinates."));
        assert!(
            markup(&WidgetState::Failure("Network error (HTTP 500)".into()))
                .contains("Unable to load the weather (Network error (HTTP 500)).")
        );
    }
}
