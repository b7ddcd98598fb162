use std::collections::BTreeSet;

use crate::{
    client::api::{ApiClient, ClientError},
    models::{favourite::FavouriteRepository, repository::RepositorySummary},
};

/// Shown when a search fails, whatever the reason.
pub const SEARCH_FAILED: &str = "Failed to fetch repositories";

/// What the search page shows: the last results, whether the user is logged
/// in, and which repositories they have saved.
#[derive(Debug, Default, Clone)]
pub struct ViewState {
    pub repos: Vec<RepositorySummary>,
    pub logged_in: bool,
    pub favourite_ids: BTreeSet<String>,
    pub error: Option<String>,
}

impl ViewState {
    /// Creates an empty, logged-out `ViewState`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `repo` is among the saved favourites.
    pub fn is_favourite(&self, repo: &RepositorySummary) -> bool {
        self.favourite_ids.contains(&repo.id.to_string())
    }

    fn apply_favourites(&mut self, favourites: &[FavouriteRepository]) {
        self.logged_in = true;
        self.favourite_ids = favourites.iter().map(|f| f.repo_id.clone()).collect();
    }

    fn apply_logged_out(&mut self) {
        self.logged_in = false;
        self.favourite_ids.clear();
    }

    fn apply_search(&mut self, result: Result<Vec<RepositorySummary>, ClientError>) {
        match result {
            Ok(repos) => {
                self.repos = repos;
                self.error = None;
            }
            Err(e) => {
                tracing::debug!("Search failed: {}", e);
                self.repos.clear();
                self.error = Some(SEARCH_FAILED.to_string());
            }
        }
    }

    /// Asks the backend whether the session cookie is still good.
    ///
    /// A 401 means logged out; any other failure leaves the state as it was.
    pub async fn refresh_session(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        match api.list_favourites().await {
            Ok(favourites) => {
                self.apply_favourites(&favourites);
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                self.apply_logged_out();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Replaces the results with `username`'s repositories. Blank usernames are ignored.
    pub async fn search(&mut self, api: &ApiClient, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            return;
        }
        self.repos.clear();
        self.error = None;
        let result = api.search_repos(username).await;
        self.apply_search(result);
    }

    /// Logs in and loads the user's favourites.
    ///
    /// # Arguments
    ///
    /// * `api` - The backend client.
    /// * `email` - The user's email address.
    /// * `password` - The user's password.
    ///
    /// # Returns
    ///
    /// An empty `Result`, or the error that stopped the login.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        api.login(email, password).await?;
        self.refresh_session(api).await
    }

    /// Logs out and forgets the saved favourites.
    pub async fn logout(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        api.logout().await?;
        self.apply_logged_out();
        Ok(())
    }

    /// Saves `repo` if it is not a favourite yet, removes it otherwise.
    ///
    /// A 401 from the backend also logs the view out.
    ///
    /// # Arguments
    ///
    /// * `api` - The backend client.
    /// * `repo` - The repository to toggle.
    ///
    /// # Returns
    ///
    /// A `Result` containing whether `repo` is a favourite afterwards.
    pub async fn toggle_favourite(
        &mut self,
        api: &ApiClient,
        repo: &RepositorySummary,
    ) -> Result<bool, ClientError> {
        let repo_id = repo.id.to_string();
        let result = if self.favourite_ids.contains(&repo_id) {
            api.remove_favourite(&repo_id).await.map(|_| {
                self.favourite_ids.remove(&repo_id);
                false
            })
        } else {
            api.add_favourite(&repo.to_new_favourite()).await.map(|_| {
                self.favourite_ids.insert(repo_id);
                true
            })
        };

        if matches!(&result, Err(e) if e.is_unauthorized()) {
            self.apply_logged_out();
        }
        result
    }
}
