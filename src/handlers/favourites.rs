use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::Result,
    handlers::{JsonBody, MessageResponse},
    middleware_layer::session::AuthenticatedUser,
    services::favourites as favourite_service,
    state::AppState,
    validation::favourites::{AddFavouriteRequest, RemoveFavouriteRequest},
};

/// Lists the caller's favourites.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
///
/// # Returns
///
/// A `Result` containing the response with the caller's favourites.
#[axum::debug_handler]
pub async fn list_favourites(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response> {
    let favourites = favourite_service::list_favourites(&state, &user).await?;
    Ok((StatusCode::OK, Json(favourites)).into_response())
}

/// Adds a favourite for the caller.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
/// * `payload` - The add favourite request payload.
///
/// # Returns
///
/// A `Result` containing a 201 response with the inserted rows.
#[axum::debug_handler]
pub async fn add_favourite(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    JsonBody(payload): JsonBody<AddFavouriteRequest>,
) -> Result<Response> {
    let favourite = payload.into_new_favourite()?;
    let record = favourite_service::add_favourite(&state, &user, favourite).await?;
    Ok((StatusCode::CREATED, Json(vec![record])).into_response())
}

/// Removes one of the caller's favourites.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
/// * `payload` - The remove favourite request payload.
///
/// # Returns
///
/// A `Result` containing the response.
#[axum::debug_handler]
pub async fn remove_favourite(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    JsonBody(payload): JsonBody<RemoveFavouriteRequest>,
) -> Result<Response> {
    let repo_id = payload.into_repo_id()?;
    favourite_service::remove_favourite(&state, &user, &repo_id).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Removed from favourites"))).into_response())
}
