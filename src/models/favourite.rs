use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio_postgres::Row;

/// A repository a user has saved, with the metadata captured when it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteRepository {
    /// The ID of the user who saved the repository.
    pub user_id: String,
    /// The upstream repository ID, in decimal string form.
    #[serde(deserialize_with = "deserialize_repo_id")]
    pub repo_id: String,
    /// The repository name.
    pub repo_name: String,
    /// The repository's web URL.
    pub repo_url: String,
    /// The repository description.
    #[serde(default)]
    pub repo_description: Option<String>,
    /// The star count at the time it was saved.
    #[serde(default)]
    pub repo_stars: Option<i64>,
    /// The primary language.
    #[serde(default)]
    pub repo_language: Option<String>,
    /// When the repository was created upstream.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl FavouriteRepository {
    /// Builds the stored record for `favourite` owned by `user_id`.
    pub fn new(user_id: &str, favourite: NewFavourite) -> Self {
        Self {
            user_id: user_id.to_string(),
            repo_id: favourite.repo_id,
            repo_name: favourite.repo_name,
            repo_url: favourite.repo_url,
            repo_description: favourite.repo_description,
            repo_stars: favourite.repo_stars,
            repo_language: favourite.repo_language,
            created_at: favourite.created_at,
        }
    }
}

impl From<&Row> for FavouriteRepository {
    fn from(row: &Row) -> Self {
        Self {
            user_id: row.get("user_id"),
            repo_id: row.get("repo_id"),
            repo_name: row.get("repo_name"),
            repo_url: row.get("repo_url"),
            repo_description: row.get("repo_description"),
            repo_stars: row.get("repo_stars"),
            repo_language: row.get("repo_language"),
            created_at: row.get("created_at"),
        }
    }
}

/// A validated favourite, ready to be inserted for some user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFavourite {
    pub repo_id: String,
    pub repo_name: String,
    pub repo_url: String,
    pub repo_description: Option<String>,
    pub repo_stars: Option<i64>,
    pub repo_language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository IDs arrive either as JSON strings or as the upstream integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
        }
    }
}

fn deserialize_repo_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// Same as `deserialize_repo_id` for request fields that may be absent.
pub fn deserialize_optional_repo_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
