use std::env;
use std::net::{IpAddr, SocketAddr};
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Supabase project (auth and REST endpoints live under it).
    pub supabase_url: String,
    /// The Supabase API key sent as `apikey` on every provider call.
    pub supabase_key: Zeroizing<String>,
    /// When set, favourites are stored in this PostgreSQL database instead of Supabase REST.
    pub database_url: Option<String>,
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// Optional token for authenticated GitHub requests.
    pub github_token: Option<Zeroizing<String>>,
    /// The browser origin allowed to call the API with credentials.
    pub client_origin: String,
    /// The address the server binds to.
    pub bind_addr: SocketAddr,
    /// Whether the session cookie carries the `Secure` attribute.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`, or an error naming the missing or invalid variable.
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let supabase_key =
            Zeroizing::new(env::var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?);

        let host: IpAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("Invalid PORT")?;

        Ok(Self {
            supabase_url: trim_base_url(&supabase_url),
            supabase_key,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            github_api_url: trim_base_url(
                &env::var("GITHUB_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string()),
            ),
            github_token: env::var("GITHUB_TOKEN")
                .ok()
                .filter(|v| !v.is_empty())
                .map(Zeroizing::new),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            bind_addr: SocketAddr::new(host, port),
            secure_cookies: env::var("COOKIE_SECURE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid COOKIE_SECURE")?,
        })
    }

    /// A plain-HTTP configuration pointing the upstream URLs at `github_api_url`
    /// and `supabase_url`, for local runs and tests.
    pub fn local(github_api_url: &str, supabase_url: &str) -> Self {
        Self {
            supabase_url: trim_base_url(supabase_url),
            supabase_key: Zeroizing::new("local-anon-key".to_string()),
            database_url: None,
            github_api_url: trim_base_url(github_api_url),
            github_token: None,
            client_origin: "http://localhost:5173".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            secure_cookies: false,
        }
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
