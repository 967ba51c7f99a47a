use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager and the repositories built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected storage failure during a dynamically built statement.
    /// Carries the statement shape and parameters for diagnosis, never
    /// raw credentials.
    #[error("Query execution failed: {statement}")]
    QueryExecution {
        statement: String,
        params: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Wrap a storage failure with the offending statement shape and params
    pub fn query_execution(
        statement: &str,
        params: &[serde_json::Value],
        source: sqlx::Error,
    ) -> Self {
        DatabaseError::QueryExecution {
            statement: statement.to_string(),
            params: serde_json::Value::Array(params.to_vec()).to_string(),
            source,
        }
    }
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Centralized connection pool manager. One shared pool, created lazily
/// from DATABASE_URL and safe for concurrent use by in-flight requests.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = POOL.get_or_try_init(Self::connect).await?;
        Ok(pool.clone())
    }

    async fn connect() -> Result<PgPool, DatabaseError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        // Validate before handing the URL to sqlx so we can log the target
        // without leaking credentials
        let parsed = url::Url::parse(&database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&database_url)
            .await?;

        info!(
            "Created database pool for {}{}",
            parsed.host_str().unwrap_or("localhost"),
            parsed.path()
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
