use async_trait::async_trait;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::models::{
    favourite::{FavouriteRepository, NewFavourite},
    user::AuthUser,
};

/// Errors raised by an [`AuthProvider`].
#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider refused the credentials or the token.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The provider could not be reached or answered with something unexpected.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`FavouritesStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// `(user_id, repo_id)` already exists.
    #[error("duplicate favourite")]
    Conflict,

    /// The store refused the operation; the message is safe to show the caller.
    #[error("{0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("{0}")]
    Unavailable(String),
}

/// Port for the identity provider that owns sessions.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verifies an email/password pair and returns the session token it issues.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &Zeroizing<String>,
    ) -> Result<String, AuthError>;

    /// Resolves a session token to the user it belongs to.
    async fn resolve_user(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Port for the `favourite_repositories` row store.
///
/// Every method is a single store operation scoped to one user.
#[async_trait]
pub trait FavouritesStore: Send + Sync {
    async fn insert(
        &self,
        user_id: &str,
        favourite: NewFavourite,
    ) -> Result<FavouriteRepository, StoreError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<FavouriteRepository>, StoreError>;

    /// Deletes the matching row if there is one. Deleting nothing is not an error.
    async fn delete(&self, user_id: &str, repo_id: &str) -> Result<(), StoreError>;
}
