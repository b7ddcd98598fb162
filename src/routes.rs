use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the CORS layer for the configured client origin, with credentials.
fn cors_layer(client_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = client_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid CLIENT_ORIGIN {}: {}", client_origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400)))
}

/// Builds the application router.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing the `Router`, or an error if the CORS origin is invalid.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.client_origin)?;

    let public_routes = Router::new()
        .route("/", get(handlers::github::index))
        .route(
            "/api/github/{username}/repos",
            get(handlers::github::list_repos),
        )
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route(
            "/api/favorites",
            get(handlers::favourites::list_favourites)
                .post(handlers::favourites::add_favourite)
                .delete(handlers::favourites::remove_favourite),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::session::resolve_session,
        ))
        .with_state(state);

    Ok(Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors))
}
