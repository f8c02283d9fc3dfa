//! Append-only rotation ledger
//!
//! The ledger is the sole durable state the rotation core owns. Timestamps
//! are stored as fixed-width RFC 3339 text (microsecond precision, UTC `Z`)
//! so lexicographic comparison in SQL matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use common::PersistenceError;

use crate::persistence::entities::LedgerEntry;

/// Outcome of a conditional period-bound append
#[derive(Debug)]
pub enum PeriodAppend {
    /// This entry won the (scope, period) slot
    Inserted,
    /// Another entry already holds the slot; it is returned unchanged
    Existing(LedgerEntry),
}

/// SQLite-backed rotation ledger
#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a windowed history entry
    ///
    /// Performs no duplicate checking; deduplication for period-bound
    /// features goes through [`append_for_period`].
    ///
    /// [`append_for_period`]: LedgerRepository::append_for_period
    pub async fn append(&self, entry: &LedgerEntry) -> Result<(), PersistenceError> {
        self.insert(entry)
            .await
            .map_err(|e| PersistenceError::query("append ledger entry", e))?;

        tracing::info!(
            scope_key = %entry.scope_key,
            item_ref = %entry.item_ref,
            "Ledger entry appended"
        );
        Ok(())
    }

    /// Conditionally append a period-bound entry
    ///
    /// The `UNIQUE (scope_key, period_tag)` constraint makes the
    /// check-and-commit a single atomic step: when another entry already
    /// holds the (scope, period) slot the insert conflicts and the winning
    /// entry is returned instead.
    pub async fn append_for_period(
        &self,
        entry: &LedgerEntry,
    ) -> Result<PeriodAppend, PersistenceError> {
        let Some(period_tag) = entry.period_tag.as_deref() else {
            return Err(PersistenceError::QueryFailed {
                operation: "append_for_period".to_string(),
                details: "entry carries no period tag".to_string(),
            });
        };

        match self.insert(entry).await {
            Ok(_) => {
                tracing::info!(
                    scope_key = %entry.scope_key,
                    item_ref = %entry.item_ref,
                    period_tag = %period_tag,
                    "Period selection committed"
                );
                Ok(PeriodAppend::Inserted)
            }
            Err(e) if PersistenceError::is_unique_violation(&e) => {
                let existing = self
                    .entry_for_period(&entry.scope_key, period_tag)
                    .await?
                    .ok_or_else(|| PersistenceError::NotFound {
                        details: format!(
                            "conflicting entry for scope {} period {} disappeared",
                            entry.scope_key, period_tag
                        ),
                    })?;

                tracing::debug!(
                    scope_key = %entry.scope_key,
                    period_tag = %period_tag,
                    winner = %existing.item_ref,
                    "Period slot already taken"
                );
                Ok(PeriodAppend::Existing(existing))
            }
            Err(e) => Err(PersistenceError::query("append period ledger entry", e)),
        }
    }

    /// Item references selected in a scope since a timestamp, most recent
    /// first
    ///
    /// Re-querying is safe and idempotent.
    pub async fn recent_selections(
        &self,
        scope_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<String>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT item_ref FROM rotation_ledger
            WHERE scope_key = ? AND selected_at >= ?
            ORDER BY selected_at DESC
            "#,
        )
        .bind(scope_key)
        .bind(format_timestamp(since))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("query recent selections", e))?;

        Ok(rows.iter().map(|row| row.get("item_ref")).collect())
    }

    /// Latest entry for a scope at or after a period start, if any
    pub async fn current_selection(
        &self,
        scope_key: &str,
        period_start: DateTime<Utc>,
    ) -> Result<Option<LedgerEntry>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, scope_key, item_ref, destination_ref, selected_at, period_tag
            FROM rotation_ledger
            WHERE scope_key = ? AND selected_at >= ?
            ORDER BY selected_at DESC
            LIMIT 1
            "#,
        )
        .bind(scope_key)
        .bind(format_timestamp(period_start))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("query current selection", e))?;

        row.map(|row| row_to_entry(&row)).transpose()
    }

    /// Entry holding a specific (scope, period) slot, if any
    pub async fn entry_for_period(
        &self,
        scope_key: &str,
        period_tag: &str,
    ) -> Result<Option<LedgerEntry>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, scope_key, item_ref, destination_ref, selected_at, period_tag
            FROM rotation_ledger
            WHERE scope_key = ? AND period_tag = ?
            "#,
        )
        .bind(scope_key)
        .bind(period_tag)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("query period entry", e))?;

        row.map(|row| row_to_entry(&row)).transpose()
    }

    async fn insert(&self, entry: &LedgerEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO rotation_ledger (
                id, scope_key, item_ref, destination_ref, selected_at, period_tag
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.scope_key)
        .bind(&entry.item_ref)
        .bind(&entry.destination_ref)
        .bind(format_timestamp(entry.selected_at))
        .bind(&entry.period_tag)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry, PersistenceError> {
    Ok(LedgerEntry {
        id: Uuid::parse_str(row.get::<String, _>("id").as_str()).map_err(|e| {
            PersistenceError::SerializationFailed {
                details: e.to_string(),
            }
        })?,
        scope_key: row.get("scope_key"),
        item_ref: row.get("item_ref"),
        destination_ref: row.get("destination_ref"),
        selected_at: DateTime::parse_from_rfc3339(row.get::<String, _>("selected_at").as_str())
            .map_err(|e| PersistenceError::SerializationFailed {
                details: e.to_string(),
            })?
            .with_timezone(&Utc),
        period_tag: row.get("period_tag"),
    })
}
