use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use std::time::Duration;

use crate::ports::StoreError;

/// Creates the schema the PostgreSQL favourites store relies on.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS favourite_repositories (
    user_id          TEXT        NOT NULL,
    repo_id          TEXT        NOT NULL,
    repo_name        TEXT        NOT NULL,
    repo_url         TEXT        NOT NULL,
    repo_description TEXT,
    repo_stars       BIGINT,
    repo_language    TEXT,
    created_at       TIMESTAMPTZ,
    saved_at         TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (user_id, repo_id)
)
"#;

/// Creates a new database connection pool.
///
/// # Arguments
///
/// * `database_url` - The URL of the PostgreSQL database.
///
/// # Returns
///
/// A `Result` containing the `Pool`.
pub fn create_pool(database_url: &str) -> anyhow::Result<Pool> {
    let mut cfg = Config::new();
    let pg_config: tokio_postgres::Config = database_url.parse()?;

    if let Some(tokio_postgres::config::Host::Tcp(hostname)) = pg_config.get_hosts().first() {
        cfg.host = Some(hostname.to_string());
    }

    if let Some(port) = pg_config.get_ports().first() {
        cfg.port = Some(*port);
    }

    if let Some(dbname) = pg_config.get_dbname() {
        cfg.dbname = Some(dbname.to_string());
    }

    if let Some(user) = pg_config.get_user() {
        cfg.user = Some(user.to_string());
    }

    if let Some(password) = pg_config.get_password() {
        cfg.password = Some(String::from_utf8_lossy(password).to_string());
    }

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    cfg.pool = Some(PoolConfig {
        max_size: 16,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(2)),
            recycle: Some(Duration::from_secs(1)),
        },
        ..Default::default()
    });

    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
}

/// Creates `favourite_repositories` if it does not exist yet.
pub async fn ensure_schema(pool: &Pool) -> Result<(), StoreError> {
    let client = pool
        .get()
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    client
        .batch_execute(SCHEMA)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    tracing::info!("✅ favourite_repositories schema ready");
    Ok(())
}
