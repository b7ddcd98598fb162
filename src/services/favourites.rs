use crate::{
    error::Result,
    models::{
        favourite::{FavouriteRepository, NewFavourite},
        user::AuthUser,
    },
    state::AppState,
};

/// Lists every favourite saved by `user`.
pub async fn list_favourites(state: &AppState, user: &AuthUser) -> Result<Vec<FavouriteRepository>> {
    let favourites = state.favourites.list_by_user(&user.id).await?;
    tracing::debug!("📋 {} favourite(s) for user {}", favourites.len(), user.id);
    Ok(favourites)
}

/// Saves `favourite` for `user`.
///
/// Duplicates are left to the store's `(user_id, repo_id)` uniqueness rule.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The owner of the new favourite.
/// * `favourite` - The validated favourite.
///
/// # Returns
///
/// A `Result` containing the stored record.
pub async fn add_favourite(
    state: &AppState,
    user: &AuthUser,
    favourite: NewFavourite,
) -> Result<FavouriteRepository> {
    let repo_id = favourite.repo_id.clone();
    let record = state.favourites.insert(&user.id, favourite).await?;
    tracing::info!("⭐ User {} saved repository {}", user.id, repo_id);
    Ok(record)
}

/// Removes `repo_id` from `user`'s favourites. Succeeds whether or not it was saved.
pub async fn remove_favourite(state: &AppState, user: &AuthUser, repo_id: &str) -> Result<()> {
    state.favourites.delete(&user.id, repo_id).await?;
    tracing::info!("🗑️ User {} removed repository {}", user.id, repo_id);
    Ok(())
}
