//! # Database Connection Utilities
//!
//! SQLite connection-pool management with retry logic and health checks.

use std::time::Duration;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::PersistenceError;

/// Connection pool type alias for SQLite
pub type SqlitePool = sqlx::SqlitePool;

/// Establish SQLite connection pool from configuration
pub async fn establish_sqlite_pool(
    config: &DatabaseConfig,
) -> Result<SqlitePool, PersistenceError> {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
        .map_err(|e| PersistenceError::ConnectionFailed {
            source: Box::new(e),
        })?;

    info!(
        "SQLite connection pool established with {} max connections",
        config.max_connections
    );

    Ok(pool)
}

/// Establish the SQLite pool, retrying transient failures with backoff
///
/// Delay doubles per attempt, capped at 60 seconds. The final attempt's
/// error is surfaced unchanged.
pub async fn establish_sqlite_pool_with_retry(
    config: &DatabaseConfig,
    max_retries: u32,
    initial_delay: Duration,
) -> Result<SqlitePool, PersistenceError> {
    let mut delay = initial_delay;

    for attempt in 1..=max_retries {
        match establish_sqlite_pool(config).await {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                tracing::warn!(
                    "Database connection attempt {} failed ({}), retrying in {:?}",
                    attempt,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(60));
            }
        }
    }

    establish_sqlite_pool(config).await
}

/// Test SQLite connection health
pub async fn test_sqlite_connection_health(pool: &SqlitePool) -> Result<(), PersistenceError> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| PersistenceError::query("health check", e))?;
    Ok(())
}
