use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    config::Config,
    models::favourite::{FavouriteRepository, NewFavourite},
    ports::{FavouritesStore, StoreError},
};

/// The collection favourites are stored in.
pub const TABLE: &str = "favourite_repositories";

/// PostgreSQL's `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Favourites store backed by Supabase's PostgREST endpoint.
#[derive(Clone)]
pub struct RestFavouritesStore {
    http: reqwest::Client,
    table_url: String,
    api_key: Zeroizing<String>,
}

/// Error body PostgREST sends on failure.
#[derive(Deserialize, Default)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Row sent on insert. Absent optional fields are left out of the body so the
/// table's column defaults apply.
#[derive(Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    repo_id: &'a str,
    repo_name: &'a str,
    repo_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_stars: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a FavouriteRepository> for InsertRow<'a> {
    fn from(row: &'a FavouriteRepository) -> Self {
        Self {
            user_id: &row.user_id,
            repo_id: &row.repo_id,
            repo_name: &row.repo_name,
            repo_url: &row.repo_url,
            repo_description: row.repo_description.as_deref(),
            repo_stars: row.repo_stars,
            repo_language: row.repo_language.as_deref(),
            created_at: row.created_at,
        }
    }
}

/// Maps a failed PostgREST answer to a [`StoreError`].
///
/// Only `unique_violation` is a conflict; other 409s (foreign keys, exclusion
/// constraints) pass their message through.
///
/// # Arguments
///
/// * `status` - The response status.
/// * `body` - The raw response body.
///
/// # Returns
///
/// The `StoreError` to report.
fn classify_failure(status: StatusCode, body: &[u8]) -> StoreError {
    let error: PostgrestError = sonic_rs::from_slice(body).unwrap_or_default();
    if error.code.as_deref() == Some(UNIQUE_VIOLATION) {
        return StoreError::Conflict;
    }

    StoreError::Rejected(
        error
            .message
            .unwrap_or_else(|| format!("Store request failed with status {}", status)),
    )
}

impl RestFavouritesStore {
    /// Creates a new `RestFavouritesStore` for the project in `config`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            table_url: format!("{}/rest/v1/{}", config.supabase_url, TABLE),
            api_key: config.supabase_key.clone(),
        }
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, &self.table_url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
    }

    /// Sends `request` and returns the body of a successful response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        Err(classify_failure(status, &body))
    }
}

#[async_trait]
impl FavouritesStore for RestFavouritesStore {
    async fn insert(
        &self,
        user_id: &str,
        favourite: NewFavourite,
    ) -> Result<FavouriteRepository, StoreError> {
        let row = FavouriteRepository::new(user_id, favourite);
        let body = self
            .execute(
                self.request(reqwest::Method::POST)
                    .header("Prefer", "return=representation")
                    .json(&[InsertRow::from(&row)]),
            )
            .await?;

        let mut inserted: Vec<FavouriteRepository> = sonic_rs::from_slice(&body)
            .map_err(|e| StoreError::Rejected(format!("Unexpected insert response: {}", e)))?;
        Ok(inserted.pop().unwrap_or(row))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<FavouriteRepository>, StoreError> {
        let body = self
            .execute(
                self.request(reqwest::Method::GET)
                    .query(&[("select", "*".to_string()), ("user_id", format!("eq.{}", user_id))]),
            )
            .await?;

        sonic_rs::from_slice(&body)
            .map_err(|e| StoreError::Rejected(format!("Unexpected select response: {}", e)))
    }

    async fn delete(&self, user_id: &str, repo_id: &str) -> Result<(), StoreError> {
        self.execute(self.request(reqwest::Method::DELETE).query(&[
            ("user_id", format!("eq.{}", user_id)),
            ("repo_id", format!("eq.{}", repo_id)),
        ]))
        .await?;
        Ok(())
    }
}
