//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use folio_config::ConfigError;
use folio_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found")]
    #[diagnostic(
        code(folio::no_config),
        help("Expected at: {path}\nSee `folio config path` for the default location.")
    )]
    NoConfig { path: String },

    #[error("No widget hosts configured")]
    #[diagnostic(
        code(folio::no_hosts),
        help(
            "Declare at least one host in {path}, e.g.\n\n\
             [hosts.weather-widget]\n\
             kind = \"weather\"\n\
             attributes = {{ lat = \"48.8566\", lon = \"2.3522\" }}"
        )
    )]
    NoHosts { path: String },

    #[error("Host '{id}' not found in configuration")]
    #[diagnostic(code(folio::host_not_found), help("Configured hosts: {available}"))]
    HostNotFound { id: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(folio::config), help("Check the config file and FOLIO_* variables."))]
    Config(#[from] ConfigError),

    // ── Widgets ──────────────────────────────────────────────────────

    #[error("Could not set up widgets: {0}")]
    #[diagnostic(code(folio::widgets))]
    Widgets(#[from] CoreError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(folio::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::NoHosts { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::HostNotFound { .. } => exit_code::NOT_FOUND,
            Self::Widgets(err) if err.is_configuration_missing() => exit_code::USAGE,
            Self::Widgets(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}
