use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::favourite::NewFavourite;

/// The fields of an upstream GitHub repository object the client reads.
///
/// The proxy never builds these; it relays the upstream body as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: i64,
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RepositorySummary {
    /// The add-favourite payload for this repository.
    pub fn to_new_favourite(&self) -> NewFavourite {
        NewFavourite {
            repo_id: self.id.to_string(),
            repo_name: self.name.clone(),
            repo_url: self.html_url.clone(),
            repo_description: self.description.clone(),
            repo_stars: Some(self.stargazers_count),
            repo_language: self.language.clone(),
            created_at: self.created_at,
        }
    }
}
