use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::ports::{AuthProvider, FavouritesStore};
use crate::providers::supabase::SupabaseAuth;
use crate::repositories::{favourite_pg::PgFavouritesStore, favourite_rest::RestFavouritesStore};
use crate::services::github::GithubClient;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// The identity provider that issues and resolves session tokens.
    pub auth: Arc<dyn AuthProvider>,
    /// The favourites row store.
    pub favourites: Arc<dyn FavouritesStore>,
    /// The GitHub API client.
    pub github: GithubClient,
}

impl AppState {
    /// Creates a new `AppState` wired to the real external services.
    ///
    /// Favourites go to PostgreSQL when `DATABASE_URL` is configured and to
    /// Supabase's REST API otherwise.
    ///
    /// # Arguments
    ///
    /// * `config` - The application configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        tracing::info!("✅ HTTP client initialized");

        let auth: Arc<dyn AuthProvider> = Arc::new(SupabaseAuth::new(http.clone(), &config));
        tracing::info!("✅ Supabase auth provider at {}", config.supabase_url);

        let favourites: Arc<dyn FavouritesStore> = match &config.database_url {
            Some(database_url) => {
                let pool = db::create_pool(database_url)?;
                db::ensure_schema(&pool).await?;
                tracing::info!("✅ Favourites stored in PostgreSQL");
                Arc::new(PgFavouritesStore::new(pool))
            }
            None => {
                tracing::info!("✅ Favourites stored through Supabase REST");
                Arc::new(RestFavouritesStore::new(http.clone(), &config))
            }
        };

        let github = GithubClient::new(http, &config);

        Ok(Self::from_parts(config, auth, favourites, github))
    }

    /// Assembles an `AppState` from already-built collaborators.
    pub fn from_parts(
        config: Config,
        auth: Arc<dyn AuthProvider>,
        favourites: Arc<dyn FavouritesStore>,
        github: GithubClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            favourites,
            github,
        }
    }
}
