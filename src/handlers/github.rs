use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::Result,
    handlers::MessageResponse,
    state::AppState,
};

/// Liveness message served at `/`.
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello from repo-shelf"))
}

/// Relays a GitHub user's public repositories.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `username` - The GitHub login from the path.
///
/// # Returns
///
/// A `Result` containing the upstream JSON body.
#[axum::debug_handler]
pub async fn list_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    tracing::debug!("🔎 Listing repositories for {}", username);
    let body = state.github.list_repos(&username).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
