// ── Page: the data widgets of one landing page ──
//
// Owns one controller per widget kind and dispatches hosts to them. Hosts
// are initialized concurrently and each is fault-isolated: a failing
// widget renders its own fallback and never affects the others.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::config::WidgetsConfig;
use crate::error::CoreError;
use crate::host::{HostDescriptor, HostId, RenderSink};
use crate::widgets::WidgetState;
use crate::widgets::profile::ProfileWidget;
use crate::widgets::weather::WeatherWidget;

/// Which controller a host belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Profile,
    Weather,
}

/// Outcome of initializing one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetReport {
    pub host: HostId,
    pub kind: WidgetKind,
    /// Final state name: `unconfigured`, `success`, or `failure`.
    pub state: &'static str,
    /// Failure reason, when the cycle failed.
    pub error: Option<String>,
}

impl WidgetReport {
    fn new<T>(host: &HostDescriptor, kind: WidgetKind, state: &WidgetState<T>) -> Self {
        let error = match state {
            WidgetState::Failure(reason) => Some(reason.clone()),
            WidgetState::Unconfigured | WidgetState::Loading | WidgetState::Success(_) => None,
        };
        Self {
            host: host.id().clone(),
            kind,
            state: state.name(),
            error,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// The widget controllers of a page, sharing one sink.
#[derive(Clone)]
pub struct Page {
    profile: ProfileWidget,
    weather: WeatherWidget,
}

impl Page {
    pub fn new(profile: ProfileWidget, weather: WeatherWidget) -> Self {
        Self { profile, weather }
    }

    /// Build both controllers from `config`, rendering into `sink`.
    pub fn from_config(
        config: &WidgetsConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(
            ProfileWidget::from_config(config, Arc::clone(&sink))?,
            WeatherWidget::from_config(config, sink)?,
        ))
    }

    pub fn weather(&self) -> &WeatherWidget {
        &self.weather
    }

    /// Initialize one host with the controller for `kind`.
    pub async fn init(&self, kind: WidgetKind, host: &HostDescriptor) -> WidgetReport {
        debug!(host = %host.id(), %kind, "initializing widget");
        match kind {
            WidgetKind::Profile => {
                let state = self.profile.init(host).await;
                WidgetReport::new(host, kind, &state)
            }
            WidgetKind::Weather => {
                let state = self.weather.init(host).await;
                WidgetReport::new(host, kind, &state)
            }
        }
    }

    /// Initialize every host concurrently. Reports come back in input order.
    pub async fn init_all(&self, hosts: &[(WidgetKind, HostDescriptor)]) -> Vec<WidgetReport> {
        join_all(hosts.iter().map(|(kind, host)| self.init(*kind, host))).await
    }

    /// Stop background refresh.
    pub async fn shutdown(&self) {
        self.weather.shutdown().await;
    }
}
