// Open-Meteo HTTP client
//
// Builds the forecast query for a single point: current conditions,
// a one-day min/max, km/h wind speed, and the caller's timezone.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::fetch::{JsonFetcher, RequestOptions};
use crate::open_meteo::models::Forecast;
use crate::transport::TransportConfig;

/// `current=` fields, in request order.
pub const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "weather_code",
    "wind_speed_10m",
];

/// `daily=` fields, in request order.
pub const DAILY_FIELDS: &[&str] = &["temperature_2m_min", "temperature_2m_max"];

const REQUEST_OPTIONS: RequestOptions = RequestOptions::no_store();

/// A single-point forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// Client for the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    fetcher: JsonFetcher,
    base_url: Url,
}

impl OpenMeteoClient {
    /// Public API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.open-meteo.com";

    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            fetcher: JsonFetcher::new(http),
            base_url,
        }
    }

    /// Build the full forecast URL for `query`.
    ///
    /// `{base}/v1/forecast?latitude=..&longitude=..&current=..&daily=..
    /// &forecast_days=1&wind_speed_unit=kmh&timezone=..`
    pub fn forecast_url(&self, query: &ForecastQuery) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(["v1", "forecast"]);

        url.query_pairs_mut()
            .append_pair("latitude", &query.latitude.to_string())
            .append_pair("longitude", &query.longitude.to_string())
            .append_pair("current", &CURRENT_FIELDS.join(","))
            .append_pair("daily", &DAILY_FIELDS.join(","))
            .append_pair("forecast_days", "1")
            .append_pair("wind_speed_unit", "kmh")
            .append_pair("timezone", &query.timezone);

        Ok(url)
    }

    /// Fetch the forecast for a single point.
    ///
    /// `GET /v1/forecast`
    pub async fn forecast(&self, query: &ForecastQuery) -> Result<Forecast, Error> {
        let url = self.forecast_url(query)?;
        debug!(
            latitude = query.latitude,
            longitude = query.longitude,
            timezone = %query.timezone,
            "fetching forecast"
        );
        self.fetcher.get_json(url, &REQUEST_OPTIONS).await
    }
}
