use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    favourite::{FavouriteRepository, NewFavourite},
    repository::RepositorySummary,
};

/// Errors returned by [`ApiClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),

    /// The server answered with an error status.
    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// Whether the server refused the request for lack of a valid session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RepoIdBody<'a> {
    repo_id: &'a str,
}

/// HTTP client for the backend. Keeps the session cookie between calls the way
/// a browser does for credentialed requests.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a new `ApiClient` for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::BaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::builder().cookie_store(true).build()?,
            base_url,
        })
    }

    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Passes a successful response through; otherwise returns the server's `{"error"}` message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let message = sonic_rs::from_slice::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        Err(ClientError::Api { status, message })
    }

    /// Lists `username`'s public repositories through the proxy.
    pub async fn search_repos(&self, username: &str) -> Result<Vec<RepositorySummary>, ClientError> {
        let response = self
            .http
            .get(self.url(["api", "github", username, "repos"]))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Logs in; on success the client keeps the session cookie.
    ///
    /// # Arguments
    ///
    /// * `email` - The user's email address.
    /// * `password` - The user's password.
    ///
    /// # Returns
    ///
    /// An empty `Result`, or the server's error message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(["api", "login"]))
            .json(&Credentials { email, password })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Logs out and drops the session cookie.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url(["api", "logout"])).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Lists the logged-in user's favourites. Fails with a 401 when there is no session.
    pub async fn list_favourites(&self) -> Result<Vec<FavouriteRepository>, ClientError> {
        let response = self.http.get(self.url(["api", "favorites"])).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Saves a favourite and returns the rows the server inserted.
    pub async fn add_favourite(
        &self,
        favourite: &NewFavourite,
    ) -> Result<Vec<FavouriteRepository>, ClientError> {
        let response = self
            .http
            .post(self.url(["api", "favorites"]))
            .json(favourite)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Removes a favourite by repository ID.
    ///
    /// # Arguments
    ///
    /// * `repo_id` - The repository ID, in decimal string form.
    ///
    /// # Returns
    ///
    /// An empty `Result`, or the server's error message.
    pub async fn remove_favourite(&self, repo_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(["api", "favorites"]))
            .json(&RepoIdBody { repo_id })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
