//! Connection pool lifecycle and transaction helpers
//!
//! The pool is built once in `main` from [`DatabaseConfig`] and handed to the
//! router as state. Nothing in this crate holds a global pool.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Database setup errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DB_* and DATABASE_URL settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Creates the bounded connection pool.
///
/// Requests beyond `max_connections` wait for a free connection for at most
/// `connect_timeout_secs` before failing with a pool timeout.
pub async fn create_pool(config: &DatabaseConfig) -> DbResult<PgPool> {
    let options = config
        .connect_options()
        .map_err(|e| DbError::Config(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Applies the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

/// Rolls back `tx`, waiting for the server to acknowledge before the
/// connection is returned to the pool.
///
/// Dropping a [`Transaction`] only queues the rollback for the next use of
/// the connection, so failure paths call this explicitly.
pub async fn rollback(tx: Transaction<'static, Postgres>, operation: &'static str) {
    match tx.rollback().await {
        Ok(()) => tracing::debug!(operation, "Transaction rolled back"),
        Err(e) => tracing::error!(operation, error = %e, "Failed to roll back transaction"),
    }
}
