// ── Runtime widget configuration ──
//
// These types describe *where* the widgets fetch from and how often they
// refresh. Built by folio-config (or tests) and handed in; core never
// touches disk.

use std::time::Duration;

use folio_api::{GithubClient, OpenMeteoClient, TransportConfig};
use url::Url;

/// Default GitHub REST API root.
pub const GITHUB_URL: &str = GithubClient::DEFAULT_BASE_URL;

/// Default Open-Meteo API root.
pub const OPEN_METEO_URL: &str = OpenMeteoClient::DEFAULT_BASE_URL;

/// Refresh period of the weather widget.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Timezone used when a weather host does not name one.
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Number of repositories listed by the profile widget.
pub const DEFAULT_REPOSITORY_LIMIT: u8 = 3;

/// Configuration shared by every widget on a page.
#[derive(Debug, Clone)]
pub struct WidgetsConfig {
    /// GitHub REST API root.
    pub github_url: Url,
    /// Open-Meteo API root.
    pub open_meteo_url: Url,
    /// Request timeout enforced by the transport.
    pub timeout: Duration,
    /// How often a weather host re-fetches after its first cycle.
    pub refresh_interval: Duration,
    /// Fallback timezone for weather hosts.
    pub default_timezone: String,
    /// Identifier fragments that mark a profile host as not yet configured
    /// (compared case-insensitively).
    pub placeholder_tokens: Vec<String>,
    /// Repositories requested and rendered by the profile widget.
    pub repository_limit: u8,
}

impl Default for WidgetsConfig {
    fn default() -> Self {
        Self {
            github_url: GITHUB_URL
                .parse()
                .expect("built-in GitHub URL is valid"),
            open_meteo_url: OPEN_METEO_URL
                .parse()
                .expect("built-in Open-Meteo URL is valid"),
            timeout: Duration::from_secs(30),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            default_timezone: DEFAULT_TIMEZONE.into(),
            placeholder_tokens: vec!["YOUR-".into(), "TON-".into()],
            repository_limit: DEFAULT_REPOSITORY_LIMIT,
        }
    }
}

impl WidgetsConfig {
    /// Transport settings for the API clients.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }

    /// Returns `true` if `identifier` still carries a placeholder token.
    pub fn is_placeholder(&self, identifier: &str) -> bool {
        let upper = identifier.to_uppercase();
        self.placeholder_tokens
            .iter()
            .filter(|token| !token.is_empty())
            .any(|token| upper.contains(&token.to_uppercase()))
    }
}
