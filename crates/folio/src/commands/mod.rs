//! Command handlers and the config plumbing they share.

pub mod config_cmd;
pub mod render;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use folio_config::Config;
use folio_core::{HostDescriptor, WidgetKind, WidgetsConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(folio_config::config_path)
}

/// Load the config. An explicit `--config` must exist; the default file may
/// be absent, leaving defaults and `FOLIO_*` variables.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    match &global.config {
        Some(path) if !path.is_file() => Err(CliError::NoConfig {
            path: path.display().to_string(),
        }),
        Some(path) => Ok(folio_config::load_config_from(path)?),
        None => Ok(folio_config::load_config()?),
    }
}

/// Validated widget settings with CLI overrides applied.
pub fn widgets_config(config: &Config, global: &GlobalOpts) -> Result<WidgetsConfig, CliError> {
    let mut widgets = config.widgets_config()?;
    if let Some(secs) = global.timeout {
        widgets.timeout = Duration::from_secs(secs);
    }
    Ok(widgets)
}

/// Configured hosts, narrowed to `only` when non-empty.
pub fn select_hosts(
    config: &Config,
    only: &[String],
    global: &GlobalOpts,
) -> Result<Vec<(WidgetKind, HostDescriptor)>, CliError> {
    let hosts = config.hosts();
    if hosts.is_empty() {
        return Err(CliError::NoHosts {
            path: config_file(global).display().to_string(),
        });
    }
    if only.is_empty() {
        return Ok(hosts);
    }

    if let Some(missing) = only
        .iter()
        .find(|id| !hosts.iter().any(|(_, host)| host.id().as_str() == id.as_str()))
    {
        let available: Vec<&str> = hosts.iter().map(|(_, host)| host.id().as_str()).collect();
        return Err(CliError::HostNotFound {
            id: missing.clone(),
            available: available.join(", "),
        });
    }

    Ok(hosts
        .into_iter()
        .filter(|(_, host)| only.iter().any(|id| id == host.id().as_str()))
        .collect())
}
