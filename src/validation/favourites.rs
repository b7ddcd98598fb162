use chrono::{DateTime, Utc};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::favourite::{NewFavourite, deserialize_optional_repo_id},
};

/// The request payload for adding a favourite.
#[derive(Deserialize, Validate, Debug)]
pub struct AddFavouriteRequest {
    #[serde(default, deserialize_with = "deserialize_optional_repo_id")]
    #[garde(required, length(min = 1))]
    pub repo_id: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub repo_name: Option<String>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub repo_url: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub repo_description: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub repo_stars: Option<i64>,
    #[serde(default)]
    #[garde(skip)]
    pub repo_language: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The request payload for removing a favourite.
#[derive(Deserialize, Validate, Debug)]
pub struct RemoveFavouriteRequest {
    #[serde(default, deserialize_with = "deserialize_optional_repo_id")]
    #[garde(required, length(min = 1))]
    pub repo_id: Option<String>,
}

impl AddFavouriteRequest {
    /// Checks the required repository fields and converts the payload into a `NewFavourite`.
    pub fn into_new_favourite(self) -> Result<NewFavourite> {
        if let Err(report) = self.validate() {
            tracing::debug!("Add favourite rejected: {}", report);
            return Err(AppError::Validation("Missing repository data".to_string()));
        }

        match (self.repo_id, self.repo_name, self.repo_url) {
            (Some(repo_id), Some(repo_name), Some(repo_url)) => Ok(NewFavourite {
                repo_id,
                repo_name,
                repo_url,
                repo_description: self.repo_description,
                repo_stars: self.repo_stars,
                repo_language: self.repo_language,
                created_at: self.created_at,
            }),
            _ => Err(AppError::Validation("Missing repository data".to_string())),
        }
    }
}

impl RemoveFavouriteRequest {
    /// Returns the repository ID to remove.
    pub fn into_repo_id(self) -> Result<String> {
        if let Err(report) = self.validate() {
            tracing::debug!("Remove favourite rejected: {}", report);
            return Err(AppError::Validation("Missing repo_id".to_string()));
        }
        self.repo_id
            .ok_or_else(|| AppError::Validation("Missing repo_id".to_string()))
    }
}
