// ── GitHub profile widget ──
//
// Reads a login from the host, fetches the profile and the most recently
// updated repositories concurrently, and renders a summary card. Either
// request failing sends the whole cycle to the failure fallback.

use std::sync::Arc;

use folio_api::{GithubClient, Repository, UserProfile};
use tracing::{debug, info, warn};

use crate::config::WidgetsConfig;
use crate::error::CoreError;
use crate::host::{ContentRegion, HostDescriptor, RenderSink};
use crate::html::escape_html;
use crate::widgets::WidgetState;

/// Host attribute holding the GitHub login.
pub const USER_ATTRIBUTE: &str = "github-user";

/// Data behind a successful render.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub repositories: Vec<Repository>,
}

/// Controller for GitHub profile hosts.
///
/// Cheaply cloneable; clones share the HTTP client and the sink.
#[derive(Clone)]
pub struct ProfileWidget {
    inner: Arc<ProfileInner>,
}

struct ProfileInner {
    client: GithubClient,
    sink: Arc<dyn RenderSink>,
    config: WidgetsConfig,
}

impl ProfileWidget {
    pub fn new(client: GithubClient, sink: Arc<dyn RenderSink>, config: WidgetsConfig) -> Self {
        Self {
            inner: Arc::new(ProfileInner {
                client,
                sink,
                config,
            }),
        }
    }

    /// Build the GitHub client from `config` and wrap it.
    pub fn from_config(
        config: &WidgetsConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, CoreError> {
        let client = GithubClient::new(config.github_url.clone(), &config.transport())?;
        Ok(Self::new(client, sink, config.clone()))
    }

    /// Run one fetch cycle for `host` and render the outcome.
    ///
    /// Never fails: configuration gaps render the setup instruction and
    /// fetch errors render the failure fallback.
    pub async fn init(&self, host: &HostDescriptor) -> WidgetState<ProfileView> {
        let region = host.content_region();

        let user = match self.identifier(host) {
            Ok(user) => user,
            Err(e) => {
                debug!(host = %host.id(), reason = %e, "profile widget not configured");
                let state = WidgetState::Unconfigured;
                self.render(&region, &state);
                return state;
            }
        };

        self.render(&region, &WidgetState::Loading);

        let state = WidgetState::settle(self.fetch(&user).await);
        match &state {
            WidgetState::Success(view) => info!(
                host = %host.id(),
                user = %user,
                repositories = view.repositories.len(),
                "profile widget rendered"
            ),
            WidgetState::Failure(reason) => {
                warn!(host = %host.id(), user = %user, error = %reason, "profile widget failed");
            }
            WidgetState::Unconfigured | WidgetState::Loading => {}
        }
        self.render(&region, &state);
        state
    }

    /// The configured login, or `ConfigurationMissing` when absent or still
    /// a placeholder.
    fn identifier(&self, host: &HostDescriptor) -> Result<String, CoreError> {
        let user = host
            .attribute(USER_ATTRIBUTE)
            .ok_or_else(|| CoreError::ConfigurationMissing {
                message: format!("no `{USER_ATTRIBUTE}` attribute"),
            })?;
        if self.inner.config.is_placeholder(user) {
            return Err(CoreError::ConfigurationMissing {
                message: format!("`{USER_ATTRIBUTE}` is still a placeholder ({user})"),
            });
        }
        Ok(user.to_owned())
    }

    /// Fetch profile and repositories concurrently.
    async fn fetch(&self, user: &str) -> Result<ProfileView, CoreError> {
        let limit = self.inner.config.repository_limit;
        let client = &self.inner.client;

        let (profile, mut repositories) = tokio::try_join!(
            client.user_profile(user),
            client.recent_repositories(user, limit),
        )?;
        repositories.truncate(usize::from(limit));

        Ok(ProfileView {
            profile,
            repositories,
        })
    }

    fn render(&self, region: &ContentRegion, state: &WidgetState<ProfileView>) {
        self.inner.sink.render(region, &markup(state));
    }
}

// ── Markup ───────────────────────────────────────────────────────────

/// Render a profile widget state.
pub fn markup(state: &WidgetState<ProfileView>) -> String {
    match state {
        WidgetState::Unconfigured => format!(
            "<p class=\"widget-title\">GitHub</p>\n\
             <p class=\"placeholder-text\">Set your GitHub username in the \
             <code>{USER_ATTRIBUTE}</code> attribute.</p>\n"
        ),
        WidgetState::Loading => "<p class=\"widget-title\">GitHub</p>\n\
             <p class=\"placeholder-text\">Loading…</p>\n"
            .to_owned(),
        WidgetState::Success(view) => success_markup(view),
        WidgetState::Failure(reason) => format!(
            "<p class=\"widget-title\">GitHub</p>\n\
             <p class=\"placeholder-text\">Unable to load the widget ({}).</p>\n",
            escape_html(reason)
        ),
    }
}

fn success_markup(view: &ProfileView) -> String {
    let profile = &view.profile;
    let mut html = String::from("<div class=\"github-header\">\n");

    if let Some(avatar) = &profile.avatar_url {
        html.push_str(&format!(
            "  <img class=\"github-avatar\" src=\"{}\" alt=\"\" loading=\"lazy\" decoding=\"async\" />\n",
            escape_html(avatar)
        ));
    }
    html.push_str(&format!(
        "  <div class=\"github-meta\">\n\
         \x20   <p class=\"widget-title\">{}</p>\n\
         \x20   <p class=\"placeholder-text\">@{} · {} public repos</p>\n\
         \x20 </div>\n\
         </div>\n",
        escape_html(profile.display_name()),
        escape_html(&profile.login),
        profile.public_repos.unwrap_or(0),
    ));

    html.push_str(&repository_list(&view.repositories));

    if let Some(url) = &profile.html_url {
        html.push_str(&format!(
            "<a class=\"widget-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">View profile</a>\n",
            escape_html(url)
        ));
    }
    html
}

fn repository_list(repositories: &[Repository]) -> String {
    if repositories.is_empty() {
        return "<p class=\"placeholder-text\">No recent public repositories found.</p>\n".into();
    }

    let mut html = String::from("<ul class=\"github-repos\">\n");
    for repo in repositories {
        let name = escape_html(&repo.name);
        let title = match &repo.html_url {
            Some(url) => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{name}</a>",
                escape_html(url)
            ),
            None => format!("<span>{name}</span>"),
        };
        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| format!("<span class=\"github-repo-desc\">{}</span>", escape_html(d)))
            .unwrap_or_default();
        html.push_str(&format!("  <li>{title}{description}</li>\n"));
    }
    html.push_str("</ul>\n");
    html
}
