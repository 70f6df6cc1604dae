// ── Core error types ──
//
// Widget-facing errors. Every fetch-layer failure is translated into one
// of these before it reaches a controller, and every controller renders
// them as a fallback rather than propagating them.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Host configuration ───────────────────────────────────────────
    /// The host lacks a usable identifier or coordinates. A recognized
    /// empty state, not a failure.
    #[error("Configuration missing: {message}")]
    ConfigurationMissing { message: String },

    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Network error (HTTP {status})")]
    Network { status: u16 },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Unreachable: {reason}")]
    Unreachable { reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for the empty "not configured" state.
    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, Self::ConfigurationMissing { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<folio_api::Error> for CoreError {
    fn from(err: folio_api::Error) -> Self {
        match err {
            folio_api::Error::Network { status, .. } => CoreError::Network { status },
            folio_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Network {
                    status: status.as_u16(),
                },
                None if e.is_decode() => CoreError::Decode {
                    message: e.to_string(),
                },
                None => CoreError::Unreachable {
                    reason: e.to_string(),
                },
            },
            folio_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            folio_api::Error::InvalidBaseUrl { url } => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            folio_api::Error::Client(message) => CoreError::Internal(message),
            folio_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
