use axum::body::Bytes;
use zeroize::Zeroizing;

use crate::{
    config::Config,
    error::{AppError, Result},
};

/// GitHub requires a user agent on every API request.
const USER_AGENT: &str = concat!("repo-shelf/", env!("CARGO_PKG_VERSION"));

/// Thin pass-through client for the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<Zeroizing<String>>,
}

impl GithubClient {
    /// Creates a new `GithubClient`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.github_api_url.clone(),
            token: config.github_token.clone(),
        }
    }

    /// Fetches `username`'s public repositories and returns the upstream JSON body untouched.
    ///
    /// One attempt, no caching. Any transport error, non-success status, or
    /// non-JSON body is reported as [`AppError::UpstreamUnavailable`].
    ///
    /// # Arguments
    ///
    /// * `username` - The GitHub login, sent as a single path segment.
    ///
    /// # Returns
    ///
    /// A `Result` containing the response body.
    pub async fn list_repos(&self, username: &str) -> Result<Bytes> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid GitHub API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("GitHub API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);

        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "GitHub answered {} for user {}",
                status, username
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        sonic_rs::from_slice::<sonic_rs::Value>(&body)
            .map_err(|e| AppError::UpstreamUnavailable(format!("Invalid JSON from GitHub: {}", e)))?;

        tracing::debug!("📦 Relaying {} bytes of repositories for {}", body.len(), username);
        Ok(body)
    }
}
