use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;

use crate::{
    models::favourite::{FavouriteRepository, NewFavourite},
    ports::{FavouritesStore, StoreError},
};

/// Favourites store backed directly by PostgreSQL.
#[derive(Clone)]
pub struct PgFavouritesStore {
    pool: Pool,
}

impl PgFavouritesStore {
    /// Creates a new `PgFavouritesStore`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Database pool error: {}", e)))
    }
}

fn map_pg_error(err: tokio_postgres::Error) -> StoreError {
    match err.code() {
        Some(code) if *code == SqlState::UNIQUE_VIOLATION => StoreError::Conflict,
        _ => StoreError::Rejected(
            err.as_db_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| err.to_string()),
        ),
    }
}

#[async_trait]
impl FavouritesStore for PgFavouritesStore {
    async fn insert(
        &self,
        user_id: &str,
        favourite: NewFavourite,
    ) -> Result<FavouriteRepository, StoreError> {
        let client = self.client().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO favourite_repositories
                    (user_id, repo_id, repo_name, repo_url, repo_description,
                     repo_stars, repo_language, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING user_id, repo_id, repo_name, repo_url, repo_description,
                          repo_stars, repo_language, created_at
                "#,
                &[
                    &user_id,
                    &favourite.repo_id,
                    &favourite.repo_name,
                    &favourite.repo_url,
                    &favourite.repo_description,
                    &favourite.repo_stars,
                    &favourite.repo_language,
                    &favourite.created_at,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(FavouriteRepository::from(&row))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<FavouriteRepository>, StoreError> {
        let client = self.client().await?;
        let rows = client
            .query(
                r#"
                SELECT user_id, repo_id, repo_name, repo_url, repo_description,
                       repo_stars, repo_language, created_at
                FROM favourite_repositories
                WHERE user_id = $1
                ORDER BY saved_at ASC
                "#,
                &[&user_id],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(rows.iter().map(FavouriteRepository::from).collect())
    }

    async fn delete(&self, user_id: &str, repo_id: &str) -> Result<(), StoreError> {
        let client = self.client().await?;
        let deleted = client
            .execute(
                "DELETE FROM favourite_repositories WHERE user_id = $1 AND repo_id = $2",
                &[&user_id, &repo_id],
            )
            .await
            .map_err(map_pg_error)?;
        tracing::debug!("🗑️ Deleted {} favourite row(s) for user {}", deleted, user_id);
        Ok(())
    }
}
