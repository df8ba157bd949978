//! Application state

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;

use crate::config::Config;
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
}

impl AppState {
    /// Connect, migrate, and optionally seed demo data
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let statement_timeout = config.database_statement_timeout_ms.to_string();
        let options = PgConnectOptions::from_str(&config.database_url)?
            .options([("statement_timeout", statement_timeout.as_str())]);

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        if config.seed_demo_data {
            crate::seed::seed_if_empty(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, tools)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}
