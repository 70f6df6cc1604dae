//! Configuration for the folio bootstrap.
//!
//! A TOML file describes the page: global defaults, API endpoints, and one
//! `[hosts.<id>]` table per widget host. Environment variables prefixed
//! with `FOLIO_` override the file (`FOLIO_DEFAULTS__TIMEOUT=10`). The
//! result is translated into `folio_core::WidgetsConfig` plus the list of
//! host descriptors; core never reads files itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use folio_core::config::{DEFAULT_REFRESH_INTERVAL, DEFAULT_REPOSITORY_LIMIT, DEFAULT_TIMEZONE};
use folio_core::{HostDescriptor, WidgetKind, WidgetsConfig};

/// Largest page size the GitHub API accepts.
const MAX_REPOSITORY_LIMIT: u8 = 100;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// API roots.
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Widget hosts, keyed by host id.
    #[serde(default)]
    pub hosts: BTreeMap<String, HostSection>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Weather refresh period in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Timezone for weather hosts that do not set one.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Identifier fragments marking a profile host as unconfigured.
    #[serde(default = "default_placeholder_tokens")]
    pub placeholder_tokens: Vec<String>,

    /// Repositories shown by the profile widget.
    #[serde(default = "default_repository_limit")]
    pub repository_limit: u8,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            timezone: default_timezone(),
            placeholder_tokens: default_placeholder_tokens(),
            repository_limit: default_repository_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.into()
}
fn default_placeholder_tokens() -> Vec<String> {
    WidgetsConfig::default().placeholder_tokens
}
fn default_repository_limit() -> u8 {
    DEFAULT_REPOSITORY_LIMIT
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Endpoints {
    #[serde(default = "default_github")]
    pub github: String,

    #[serde(default = "default_open_meteo")]
    pub open_meteo: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github: default_github(),
            open_meteo: default_open_meteo(),
        }
    }
}

fn default_github() -> String {
    folio_core::config::GITHUB_URL.into()
}
fn default_open_meteo() -> String {
    folio_core::config::OPEN_METEO_URL.into()
}

/// One widget host on the page.
#[derive(Debug, Deserialize, Serialize)]
pub struct HostSection {
    /// Controller for this host.
    pub kind: WidgetKind,

    /// Render into this sub-region instead of the host itself.
    pub region: Option<String>,

    /// String attributes read by the widget (`github-user`, `lat`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl HostSection {
    pub fn descriptor(&self, id: &str) -> HostDescriptor {
        let mut host = self
            .attributes
            .iter()
            .fold(HostDescriptor::new(id), |host, (name, value)| {
                host.with_attribute(name.as_str(), value.as_str())
            });
        if let Some(region) = &self.region {
            host = host.with_region(region.as_str());
        }
        host
    }
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    /// Validate and build the core widget configuration.
    pub fn widgets_config(&self) -> Result<WidgetsConfig, ConfigError> {
        let github_url = parse_endpoint("endpoints.github", &self.endpoints.github)?;
        let open_meteo_url = parse_endpoint("endpoints.open_meteo", &self.endpoints.open_meteo)?;

        let d = &self.defaults;
        if d.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if d.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.refresh_interval_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if d.repository_limit == 0 || d.repository_limit > MAX_REPOSITORY_LIMIT {
            return Err(ConfigError::Validation {
                field: "defaults.repository_limit".into(),
                reason: format!("must be between 1 and {MAX_REPOSITORY_LIMIT}"),
            });
        }
        if d.timezone.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "defaults.timezone".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(WidgetsConfig {
            github_url,
            open_meteo_url,
            timeout: Duration::from_secs(d.timeout),
            refresh_interval: Duration::from_secs(d.refresh_interval_secs),
            default_timezone: d.timezone.trim().to_owned(),
            placeholder_tokens: d.placeholder_tokens.clone(),
            repository_limit: d.repository_limit,
        })
    }

    /// Every configured host, ordered by id.
    pub fn hosts(&self) -> Vec<(WidgetKind, HostDescriptor)> {
        self.hosts
            .iter()
            .map(|(id, section)| (section.kind, section.descriptor(id)))
            .collect()
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn parse_endpoint(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL {raw}: {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("not a base URL: {raw}"),
        });
    }
    Ok(url)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "folio", "folio").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("folio");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// A missing file contributes nothing; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FOLIO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}
