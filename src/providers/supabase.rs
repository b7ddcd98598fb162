use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    config::Config,
    models::user::AuthUser,
    ports::{AuthError, AuthProvider},
};

/// Auth provider backed by a Supabase project's GoTrue endpoints.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: reqwest::Client,
    auth_url: String,
    api_key: Zeroizing<String>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl SupabaseAuth {
    /// Creates a new `SupabaseAuth` for the project in `config`.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            auth_url: format!("{}/auth/v1", config.supabase_url),
            api_key: config.supabase_key.clone(),
        }
    }
}

/// 4xx answers mean the provider looked at the credentials and said no.
fn classify_failure(status: StatusCode, body: String) -> AuthError {
    if status.is_client_error() {
        AuthError::InvalidCredentials(format!("{}: {}", status, body))
    } else {
        AuthError::Unavailable(format!("{}: {}", status, body))
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &Zeroizing<String>,
    ) -> Result<String, AuthError> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", self.api_key.as_str())
            .json(&PasswordGrant {
                email,
                password: password.as_str(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, String::from_utf8_lossy(&body).into_owned()));
        }

        let token: TokenResponse = sonic_rs::from_slice(&body)
            .map_err(|e| AuthError::Unavailable(format!("Unexpected token response: {}", e)))?;

        tracing::debug!("🔑 Provider issued a session for {}", email);
        Ok(token.access_token)
    }

    async fn resolve_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .header("apikey", self.api_key.as_str())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, String::from_utf8_lossy(&body).into_owned()));
        }

        sonic_rs::from_slice(&body)
            .map_err(|e| AuthError::Unavailable(format!("Unexpected user response: {}", e)))
    }
}
