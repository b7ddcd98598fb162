use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;
use zeroize::Zeroizing;

use crate::{
    config::Config,
    error::{AppError, Result},
    handlers::MessageResponse,
    middleware_layer::session::SESSION_COOKIE,
    state::AppState,
};

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Builds the session cookie.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `value` - The provider's session token.
///
/// # Returns
///
/// An HTTP-only, `SameSite=Lax` cookie scoped to `/`, secure unless disabled.
fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_secure(config.secure_cookies);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie
}

/// Builds a cookie that clears the session cookie, with the attributes it was set with.
fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.make_removal();
    cookie
}

/// Handles user login.
///
/// Every failure, including a malformed body, answers with the same
/// "Login failed" message.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The response cookies.
/// * `payload` - The login request payload, or why it could not be read.
///
/// # Returns
///
/// A `Result` containing the response, with the session cookie set on success.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload
        .map_err(|e| AppError::AuthenticationFailed(format!("Unreadable login body: {}", e)))?;

    let email = payload.email;
    let password = Zeroizing::new(payload.password);
    tracing::info!("🔐 Login attempt for: {}", email);

    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::AuthenticationFailed(
            "Missing email or password".to_string(),
        ));
    }

    let token = state.auth.sign_in_with_password(&email, &password).await?;

    cookies.add(session_cookie(&state.config, token));
    tracing::info!("✅ Session cookie set for: {}", email);

    Ok((StatusCode::OK, Json(MessageResponse::new("Token set"))).into_response())
}

/// Handles user logout. Succeeds whether or not a session existed.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The response cookies.
///
/// # Returns
///
/// A `Response` clearing the session cookie.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    cookies.add(removal_cookie(&state.config));
    tracing::info!("👋 Session cookie cleared");

    (StatusCode::OK, Json(MessageResponse::new("Logged out"))).into_response()
}

#[cfg(test)]
mod tests {
    use tower_cookies::cookie::time::Duration;

    use super::*;

    fn production_config() -> Config {
        let mut config = Config::local("http://127.0.0.1:9", "http://127.0.0.1:9");
        config.secure_cookies = true;
        config
    }

    fn assert_session_attributes(cookie: &Cookie<'_>) {
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));

        let header = cookie.to_string();
        for attribute in ["HttpOnly", "Secure", "SameSite=Lax", "Path=/"] {
            assert!(header.contains(attribute), "{attribute} missing from {header}");
        }
    }

    #[test]
    fn session_cookie_is_http_only_and_secure_by_default() {
        let cookie = session_cookie(&production_config(), "jwt-abc".to_string());
        assert_eq!(cookie.value(), "jwt-abc");
        assert_session_attributes(&cookie);
    }

    #[test]
    fn removal_cookie_keeps_the_session_attributes() {
        let cookie = removal_cookie(&production_config());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_session_attributes(&cookie);
        assert!(cookie.to_string().contains("Max-Age=0"));
    }

    #[test]
    fn plain_http_config_drops_only_the_secure_flag() {
        let config = Config::local("http://127.0.0.1:9", "http://127.0.0.1:9");
        let cookie = session_cookie(&config, "jwt-abc".to_string());
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.http_only(), Some(true));
        assert!(!cookie.to_string().contains("Secure"));
    }
}
