#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{Json, Router, extract::Path, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use zeroize::Zeroizing;

use repo_shelf::{
    config::Config,
    models::{
        favourite::{FavouriteRepository, NewFavourite},
        user::AuthUser,
    },
    ports::{AuthError, AuthProvider, FavouritesStore, StoreError},
    routes,
    services::github::GithubClient,
    state::AppState,
};

pub const EMAIL: &str = "octo@example.com";
pub const PASSWORD: &str = "correct horse battery staple";
pub const USER_ID: &str = "8a6f6c1e-0c1d-4f7a-9a55-3b1d2f0e9c11";

/// Token the fake provider issues for the test user.
pub fn token_for(user_id: &str) -> String {
    format!("token-{}", user_id)
}

/// Auth provider that knows a fixed set of users.
pub struct FakeAuth {
    users: Vec<(String, String, AuthUser)>,
}

impl FakeAuth {
    pub fn with_user(email: &str, password: &str, id: &str) -> Self {
        Self {
            users: vec![(
                email.to_string(),
                password.to_string(),
                AuthUser {
                    id: id.to_string(),
                    email: Some(email.to_string()),
                },
            )],
        }
    }

    pub fn add_user(mut self, email: &str, password: &str, id: &str) -> Self {
        self.users.push((
            email.to_string(),
            password.to_string(),
            AuthUser {
                id: id.to_string(),
                email: Some(email.to_string()),
            },
        ));
        self
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &Zeroizing<String>,
    ) -> Result<String, AuthError> {
        self.users
            .iter()
            .find(|(e, p, _)| e == email && p == password.as_str())
            .map(|(_, _, user)| token_for(&user.id))
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid login credentials".to_string()))
    }

    async fn resolve_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.users
            .iter()
            .map(|(_, _, user)| user)
            .find(|user| token_for(&user.id) == token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredentials("invalid JWT".to_string()))
    }
}

/// In-memory favourites table with the `(user_id, repo_id)` uniqueness rule.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<FavouriteRepository>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    /// Number of store operations attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<FavouriteRepository> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavouritesStore for MemoryStore {
    async fn insert(
        &self,
        user_id: &str,
        favourite: NewFavourite,
    ) -> Result<FavouriteRepository, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.user_id == user_id && r.repo_id == favourite.repo_id)
        {
            return Err(StoreError::Conflict);
        }
        let row = FavouriteRepository::new(user_id, favourite);
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<FavouriteRepository>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: &str, repo_id: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .retain(|r| !(r.user_id == user_id && r.repo_id == repo_id));
        Ok(())
    }
}

/// Stand-in for `GET /users/{username}/repos` on the GitHub API.
async fn user_repos(Path(username): Path<String>) -> impl IntoResponse {
    if username != "octocat" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not Found", "status": "404" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!([
            {
                "id": 1296269,
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "html_url": "https://github.com/octocat/Hello-World",
                "description": "My first repository on GitHub!",
                "language": null,
                "stargazers_count": 80,
                "created_at": "2011-01-26T19:01:12Z"
            },
            {
                "id": 132935648,
                "name": "boysenberry-repo-1",
                "full_name": "octocat/boysenberry-repo-1",
                "html_url": "https://github.com/octocat/boysenberry-repo-1",
                "description": "Testing",
                "language": "Ruby",
                "stargazers_count": 0,
                "created_at": "2018-05-10T17:51:29Z"
            }
        ])),
    )
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Starts the backend with `auth`, `store` and a stub GitHub API; returns its base URL.
pub async fn spawn_backend(auth: FakeAuth, store: Arc<dyn FavouritesStore>) -> String {
    let github_url = serve(Router::new().route("/users/{username}/repos", get(user_repos))).await;

    let config = Config::local(&github_url, "http://127.0.0.1:9");
    let github = GithubClient::new(reqwest::Client::new(), &config);
    let state = AppState::from_parts(config, Arc::new(auth), store, github);

    serve(routes::build_router(state).unwrap()).await
}

/// A client that keeps cookies between requests, like a browser.
pub fn cookie_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

/// A running backend wired to fakes.
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(FakeAuth::with_user(EMAIL, PASSWORD, USER_ID)).await
    }

    pub async fn spawn_with(auth: FakeAuth) -> Self {
        let store = Arc::new(MemoryStore::default());
        let base_url = spawn_backend(auth, store.clone()).await;

        Self {
            base_url,
            store,
            client: cookie_client(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .send()
            .await
            .unwrap()
    }
}

/// The first `Set-Cookie` header for the session cookie, if any.
pub fn session_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("supabase_token="))
        .map(str::to_string)
}
