//! SQLite persistence for curator
//!
//! Owns the three tables of the core: `submissions` (entity storage),
//! `allocated_ids` (identifier reservations), and `rotation_ledger`
//! (append-only selection history). The unique constraints on
//! `allocated_ids` and `rotation_ledger` are load-bearing: they are what
//! turns concurrent duplicate work into detectable insert conflicts.

pub mod entities;
pub mod repositories;

pub use entities::*;
pub use repositories::*;

use std::time::Duration;

use sqlx::SqlitePool;

use common::persistence::establish_sqlite_pool_with_retry;
use common::{DatabaseConfig, PersistenceError};

const CONNECT_RETRIES: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Open the configured database and prepare the curator schema
///
/// Transient connection failures are retried with backoff; migrations run
/// when the configuration asks for them.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, PersistenceError> {
    let pool =
        establish_sqlite_pool_with_retry(config, CONNECT_RETRIES, CONNECT_RETRY_DELAY).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(pool)
}

/// Create the curator schema if it does not exist
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), PersistenceError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            public_id TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            owner_ref TEXT NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (kind, public_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS allocated_ids (
            kind TEXT NOT NULL,
            public_id TEXT NOT NULL,
            allocated_at TEXT NOT NULL,
            PRIMARY KEY (kind, public_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS rotation_ledger (
            id TEXT PRIMARY KEY,
            scope_key TEXT NOT NULL,
            item_ref TEXT NOT NULL,
            destination_ref TEXT NOT NULL,
            selected_at TEXT NOT NULL,
            period_tag TEXT,
            UNIQUE (scope_key, period_tag)
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_submissions_scope
            ON submissions (kind, scope_key)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_rotation_ledger_scope_time
            ON rotation_ledger (scope_key, selected_at)
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| PersistenceError::MigrationFailed {
                details: e.to_string(),
            })?;
    }

    tracing::debug!("Curator schema migrations completed");
    Ok(())
}
