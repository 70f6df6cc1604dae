// GitHub HTTP client
//
// URL construction for the user endpoints; the transport work is
// delegated to `JsonFetcher`. Both requests carry the GitHub media type
// and ask caches not to store the response.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::fetch::{JsonFetcher, RequestOptions};
use crate::github::models::{Repository, UserProfile};
use crate::transport::TransportConfig;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const REQUEST_OPTIONS: RequestOptions = RequestOptions::no_store().with_accept(GITHUB_MEDIA_TYPE);

/// Client for the public GitHub user endpoints.
#[derive(Debug, Clone)]
pub struct GithubClient {
    fetcher: JsonFetcher,
    base_url: Url,
}

impl GithubClient {
    /// Public API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.github.com";

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

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/users/{user}[/{tail}...]`, with `user` percent-encoded as a
    /// single path segment.
    fn user_url(&self, user: &str, tail: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push("users")
            .push(user)
            .extend(tail);
        Ok(url)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch a user's public profile.
    ///
    /// `GET /users/{user}`
    pub async fn user_profile(&self, user: &str) -> Result<UserProfile, Error> {
        let url = self.user_url(user, &[])?;
        debug!(user, "fetching profile");
        self.fetcher.get_json(url, &REQUEST_OPTIONS).await
    }

    /// Fetch the `limit` most recently updated public repositories.
    ///
    /// `GET /users/{user}/repos?sort=updated&per_page={limit}`
    pub async fn recent_repositories(
        &self,
        user: &str,
        limit: u8,
    ) -> Result<Vec<Repository>, Error> {
        let mut url = self.user_url(user, &["repos"])?;
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", &limit.to_string());
        debug!(user, limit, "fetching recent repositories");
        self.fetcher.get_json(url, &REQUEST_OPTIONS).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> GithubClient {
        GithubClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn user_url_encodes_the_login_as_one_segment() {
        let c = client("https://api.github.com");
        let url = c.user_url("a/b c", &["repos"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%20c/repos");
    }

    #[test]
    fn user_url_keeps_a_base_path_prefix() {
        let c = client("https://ghe.example.com/api/v3/");
        let url = c.user_url("ada", &[]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/users/ada");
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let c = client("mailto:someone@example.com");
        assert!(matches!(
            c.user_url("ada", &[]),
            Err(Error::InvalidBaseUrl { .. })
        ));
    }
}
