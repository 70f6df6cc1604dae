#![allow(clippy::unwrap_used)]
// Integration tests for `WeatherWidget` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use folio_core::{
    HostDescriptor, MemorySink, RenderSink, WeatherKind, WeatherWidget, WidgetState, WidgetsConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(refresh_interval: Duration) -> (MockServer, WeatherWidget, Arc<MemorySink>) {
    let server = MockServer::start().await;
    let config = WidgetsConfig {
        open_meteo_url: Url::parse(&server.uri()).unwrap(),
        refresh_interval,
        ..WidgetsConfig::default()
    };
    let sink = Arc::new(MemorySink::new());
    let widget =
        WeatherWidget::from_config(&config, Arc::clone(&sink) as Arc<dyn RenderSink>).unwrap();
    (server, widget, sink)
}

fn host() -> HostDescriptor {
    HostDescriptor::new("weather-widget")
        .with_attribute("lat", "48.85")
        .with_attribute("lon", "2.35")
        .with_region("weather-content")
}

fn rainy() -> serde_json::Value {
    json!({
        "current": {
            "time": "2024-05-01T14:15",
            "temperature_2m": 12.4,
            "relative_humidity_2m": 88,
            "weather_code": 61,
            "wind_speed_10m": 20.6
        },
        "daily": {
            "temperature_2m_min": [8.2],
            "temperature_2m_max": [14.9]
        }
    })
}

async fn mount_forecast(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("timezone", "Europe/Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

// ── Unconfigured ────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_coordinates_render_message_without_requests_or_timer() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    let host = HostDescriptor::new("weather-widget")
        .with_attribute("lat", "somewhere")
        .with_attribute("lon", "2.35");

    let state = widget.init(&host).await;

    assert!(matches!(state, WidgetState::Unconfigured));
    let html = sink.last(&host.content_region()).unwrap();
    assert!(html.contains("Invalid coordinates."));
    assert_eq!(request_count(&server).await, 0);
    assert_eq!(widget.active_timers(), 0);
    assert!(!widget.has_timer(host.id()));
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rain_code_renders_rain() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    mount_forecast(&server, rainy()).await;
    let host = host();

    let state = widget.init(&host).await;

    match &state {
        WidgetState::Success(report) => {
            assert_eq!(report.condition.kind, WeatherKind::Rain);
            assert_eq!(report.condition.label, "Rain");
        }
        other => panic!("expected success, got {other:?}"),
    }

    let html = sink.last(&host.content_region()).unwrap();
    assert!(html.contains(">Rain</p>"));
    assert!(html.contains("🌧️"));
    assert!(html.contains("fa-cloud-rain"));
    assert!(html.contains("<strong>12°C</strong>"));
    assert!(html.contains("<strong>21 km/h</strong>"));
    assert!(html.contains("<strong>88%</strong>"));
    assert!(html.contains("<strong>8°C / 15°C</strong>"));
    assert!(html.contains("Last updated: 14:15"));

    widget.shutdown().await;
}

#[tokio::test]
async fn test_timezone_attribute_is_forwarded() {
    let (server, widget, _sink) = setup(Duration::from_secs(1800)).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "Asia/Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rainy()))
        .expect(1)
        .mount(&server)
        .await;

    let state = widget
        .init(&host().with_attribute("timezone", "Asia/Tokyo"))
        .await;

    assert!(state.is_success());
    widget.shutdown().await;
}

// ── Timer registry ──────────────────────────────────────────────────

#[tokio::test]
async fn test_second_init_does_not_add_a_timer() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    mount_forecast(&server, rainy()).await;
    let host = host();

    widget.init(&host).await;
    assert!(widget.has_timer(host.id()));
    assert_eq!(widget.active_timers(), 1);

    widget.init(&host).await;
    assert_eq!(widget.active_timers(), 1);

    // Each init runs one immediate cycle; no timer has fired yet.
    assert_eq!(request_count(&server).await, 2);
    // Loading is only shown before the first cycle.
    assert_eq!(sink.writes(&host.content_region()), 3);

    widget.shutdown().await;
    assert_eq!(widget.active_timers(), 0);
}

#[tokio::test]
async fn test_concurrent_inits_share_one_timer() {
    let (server, widget, _sink) = setup(Duration::from_secs(1800)).await;
    mount_forecast(&server, rainy()).await;
    let host = host();

    tokio::join!(widget.init(&host), widget.init(&host), widget.init(&host));

    assert_eq!(widget.active_timers(), 1);
    widget.shutdown().await;
}

#[tokio::test]
async fn test_timer_refreshes_until_shutdown() {
    let (server, widget, _sink) = setup(Duration::from_millis(100)).await;
    mount_forecast(&server, rainy()).await;

    widget.init(&host()).await;
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(
        request_count(&server).await >= 2,
        "expected at least one refresh"
    );

    widget.shutdown().await;
    let after_shutdown = request_count(&server).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(request_count(&server).await, after_shutdown);
}

// ── Failure ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failure_replaces_previous_success() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    let host = host();
    let region = host.content_region();

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rainy()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(widget.init(&host).await.is_success());
    assert!(sink.last(&region).unwrap().contains("Rain"));

    let settings = folio_core::WeatherSettings::from_host(&host, "Europe/Paris").unwrap();
    let state = widget.load_and_render(&settings).await;

    assert_eq!(state, WidgetState::Failure("Network error (HTTP 503)".into()));
    let html = sink.last(&region).unwrap();
    assert!(!html.contains("Rain"));
    assert!(html.contains("Unable to load the weather (Network error (HTTP 503))."));

    widget.shutdown().await;
}

#[tokio::test]
async fn test_failed_first_cycle_still_schedules_timer() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let host = host();

    let state = widget.init(&host).await;

    assert!(state.is_failure());
    assert!(sink.last(&host.content_region()).unwrap().contains("HTTP 500"));
    assert!(widget.has_timer(host.id()));
    widget.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_renders_escaped_fallback() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    mount_forecast(&server, rainy()).await;
    let host = host();
    let region = host.content_region();

    assert!(widget.init(&host).await.is_success());
    assert!(sink.last(&region).unwrap().contains("Rain"));

    // Same host and sink, nothing listening on the endpoint.
    let offline = WidgetsConfig {
        open_meteo_url: Url::parse("http://127.0.0.1:1").unwrap(),
        timeout: Duration::from_secs(5),
        ..WidgetsConfig::default()
    };
    let unreachable =
        WeatherWidget::from_config(&offline, Arc::clone(&sink) as Arc<dyn RenderSink>).unwrap();

    let state = unreachable.init(&host).await;

    let WidgetState::Failure(reason) = &state else {
        panic!("expected failure, got {state:?}");
    };
    assert!(reason.starts_with("Unreachable"), "{reason}");
    let html = sink.last(&region).unwrap();
    assert!(!html.contains("Rain"));
    assert!(html.contains("Unable to load the weather (Unreachable"), "{html}");
    assert!(html.contains("&amp;longitude="), "{html}");
    assert!(!html.contains("&longitude="), "{html}");

    unreachable.shutdown().await;
    widget.shutdown().await;
}

#[tokio::test]
async fn test_init_after_shutdown_schedules_no_timer() {
    let (server, widget, sink) = setup(Duration::from_secs(1800)).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rainy()))
        .mount(&server)
        .await;
    widget.shutdown().await;

    let late = HostDescriptor::new("late")
        .with_attribute("lat", "48.85")
        .with_attribute("lon", "2.35");
    let state = widget.init(&late).await;

    assert!(state.is_success());
    assert!(sink.last(&late.content_region()).unwrap().contains("Rain"));
    assert!(!widget.has_timer(late.id()));
    assert_eq!(widget.active_timers(), 0);
}
