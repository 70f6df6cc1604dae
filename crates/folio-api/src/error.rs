use thiserror::Error;

/// Top-level error type for the `folio-api` crate.
///
/// Every outbound request funnels through [`JsonFetcher`](crate::JsonFetcher),
/// so these variants are the complete failure taxonomy of the fetch layer.
/// `folio-core` maps them into widget-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP status ─────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    #[error("Network error (HTTP {status})")]
    Network { status: u16, url: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The request never completed (DNS failure, connection refused, reset).
    #[error("Unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    /// The HTTP client itself could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Decode error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never produced a response.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}
