use serde::{Deserialize, Serialize};

/// The identity the auth provider resolves a session token to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque provider-assigned identifier, used as `user_id` in favourites.
    pub id: String,
    /// The user's email address, when the provider returns it.
    #[serde(default)]
    pub email: Option<String>,
}
