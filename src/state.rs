use std::{str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect_with(options)
            .await
            .context("connect to database")?;

        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }

    /// Single-connection in-memory database with the schema applied.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        use crate::config::{Environment, SessionConfig};

        // every connection to `sqlite::memory:` is its own database
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            database_max_connections: 1,
            env: Environment::Test,
            host: "localhost".into(),
            port: 0,
            session: SessionConfig::default(),
        });

        let state = Self::from_parts(db, config);
        state.migrate().await.expect("migrations apply");
        state
    }
}
