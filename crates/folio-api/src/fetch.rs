// JSON fetch helper
//
// The single network access point for every widget. Performs a GET,
// classifies non-2xx responses as `Error::Network`, and decodes the body.
// No retries and no timeout beyond what the transport enforces.

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// HTTP cache directive attached to a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Let intermediaries apply their usual caching rules.
    #[default]
    Default,
    /// Ask every cache on the path to bypass and not store the response.
    NoStore,
}

impl CacheMode {
    fn header_value(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoStore => Some("no-store"),
        }
    }
}

/// Per-request options: content negotiation and caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    pub accept: Option<&'static str>,
    pub cache: CacheMode,
}

impl RequestOptions {
    pub const fn no_store() -> Self {
        Self {
            accept: None,
            cache: CacheMode::NoStore,
        }
    }

    pub const fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }
}

/// Thin wrapper over `reqwest::Client` that speaks JSON.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally, so
/// both API clients can share one connection pool.
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    http: reqwest::Client,
}

impl JsonFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send a GET request and decode the JSON body.
    ///
    /// Fails with [`Error::Network`] on a non-success status,
    /// [`Error::Transport`] when no response arrives, and
    /// [`Error::Deserialization`] when the body is not the expected JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        options: &RequestOptions,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let mut request = self.http.get(url.clone());
        if let Some(accept) = options.accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some(cache) = options.cache.header_value() {
            request = request.header(CACHE_CONTROL, cache);
        }

        let resp = request.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), %url, "non-success response");
            return Err(Error::Network {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
