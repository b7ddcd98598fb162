use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    models::user::AuthUser,
    state::AppState,
};

/// Name of the cookie carrying the provider's session token.
pub const SESSION_COOKIE: &str = "supabase_token";

/// What the session middleware learned about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    /// No session cookie.
    Anonymous,
    /// A session cookie the provider did not accept.
    Rejected,
    /// A session cookie resolved to this user.
    Authenticated(AuthUser),
}

/// Extracts the session token from the request cookies.
fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolves the session cookie (if any) to a user and records the outcome as a
/// [`SessionContext`] request extension.
///
/// Never fails the request; handlers that need a user use [`AuthenticatedUser`].
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The `Response` from the rest of the chain.
pub async fn resolve_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let context = match extract_session_token(&cookies) {
        None => SessionContext::Anonymous,
        Some(token) => match state.auth.resolve_user(&token).await {
            Ok(user) => {
                tracing::debug!("✅ Session resolved for user: {}", user.id);
                SessionContext::Authenticated(user)
            }
            Err(e) => {
                tracing::warn!("❌ Session token rejected: {}", e);
                SessionContext::Rejected
            }
        },
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// The caller's identity; rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AuthUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionContext>() {
            Some(SessionContext::Authenticated(user)) => Ok(AuthenticatedUser(user.clone())),
            Some(SessionContext::Rejected) => Err(AppError::InvalidSession),
            Some(SessionContext::Anonymous) | None => Err(AppError::NotAuthenticated),
        }
    }
}
