//! Submission storage
//!
//! CRUD access to member submissions plus the two queries the core
//! algorithms feed on: the per-prefix identifier scan for the allocator and
//! the per-scope listing used to build candidate pools.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use common::{PaginatedResponse, Pagination, PersistenceError};

use crate::allocation::{EntityKind, PublicId};
use crate::persistence::entities::Submission;
use crate::rotation::Candidate;

/// SQLite-backed submission repository
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: SqlitePool,
}

impl SubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new submission
    ///
    /// The `UNIQUE (kind, public_id)` constraint backs up the allocator
    /// invariant; a duplicate surfaces as `ConstraintViolation`.
    pub async fn create(&self, submission: &Submission) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, kind, public_id, scope_key, owner_ref, title, body,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(submission.id.to_string())
        .bind(submission.kind.as_str())
        .bind(submission.public_id.as_str())
        .bind(&submission.scope_key)
        .bind(&submission.owner_ref)
        .bind(&submission.title)
        .bind(&submission.body)
        .bind(format_timestamp(submission.created_at))
        .bind(format_timestamp(submission.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if PersistenceError::is_unique_violation(&e) {
                PersistenceError::ConstraintViolation {
                    constraint: format!(
                        "submissions kind={} public_id={}",
                        submission.kind, submission.public_id
                    ),
                }
            } else {
                PersistenceError::query("insert submission", e)
            }
        })?;

        tracing::info!(
            kind = %submission.kind,
            public_id = %submission.public_id,
            scope_key = %submission.scope_key,
            "Submission created"
        );
        Ok(())
    }

    /// Fetch a submission by its public identifier
    pub async fn get_by_public_id(
        &self,
        kind: EntityKind,
        public_id: &PublicId,
    ) -> Result<Option<Submission>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, kind, public_id, scope_key, owner_ref, title, body,
                   created_at, updated_at
            FROM submissions
            WHERE kind = ? AND public_id = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(public_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("get submission", e))?;

        row.map(|row| row_to_submission(&row)).transpose()
    }

    /// List submissions of a kind in a scope, newest first
    pub async fn list_by_scope(
        &self,
        kind: EntityKind,
        scope_key: &str,
        pagination: Pagination,
    ) -> Result<PaginatedResponse<Submission>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, public_id, scope_key, owner_ref, title, body,
                   created_at, updated_at
            FROM submissions
            WHERE kind = ? AND scope_key = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(kind.as_str())
        .bind(scope_key)
        .bind(pagination.limit as i64)
        .bind(pagination.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("list submissions", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(row_to_submission(row)?);
        }

        let count_row =
            sqlx::query("SELECT COUNT(*) as count FROM submissions WHERE kind = ? AND scope_key = ?")
                .bind(kind.as_str())
                .bind(scope_key)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| PersistenceError::query("count submissions", e))?;
        let total_count = count_row.get::<i64, _>("count") as u64;

        Ok(PaginatedResponse::new(items, total_count, pagination))
    }

    /// All public identifiers stored for a kind
    pub async fn public_ids_with_prefix(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<String>, PersistenceError> {
        let rows = sqlx::query("SELECT public_id FROM submissions WHERE kind = ?")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PersistenceError::query("scan submission identifiers", e))?;

        Ok(rows.iter().map(|row| row.get("public_id")).collect())
    }

    /// Delete a submission; returns whether a row was removed
    ///
    /// The public identifier is never reused after deletion.
    pub async fn delete(
        &self,
        kind: EntityKind,
        public_id: &PublicId,
    ) -> Result<bool, PersistenceError> {
        let result = sqlx::query("DELETE FROM submissions WHERE kind = ? AND public_id = ?")
            .bind(kind.as_str())
            .bind(public_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| PersistenceError::query("delete submission", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Build a rotation candidate pool from a scope's submissions
    pub async fn candidate_pool(
        &self,
        kind: EntityKind,
        scope_key: &str,
    ) -> Result<Vec<Candidate>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT public_id, owner_ref, created_at
            FROM submissions
            WHERE kind = ? AND scope_key = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(scope_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("build candidate pool", e))?;

        let mut pool = Vec::with_capacity(rows.len());
        for row in &rows {
            pool.push(Candidate {
                item_ref: row.get("public_id"),
                owner_ref: row.get("owner_ref"),
                created_at: parse_timestamp(row.get::<String, _>("created_at").as_str())?,
            });
        }
        Ok(pool)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::SerializationFailed {
            details: e.to_string(),
        })
}

fn row_to_submission(row: &sqlx::sqlite::SqliteRow) -> Result<Submission, PersistenceError> {
    let kind_str: String = row.get("kind");
    let kind =
        EntityKind::parse(&kind_str).ok_or_else(|| PersistenceError::SerializationFailed {
            details: format!("unknown entity kind: {kind_str}"),
        })?;

    let public_id_str: String = row.get("public_id");
    let public_id =
        PublicId::parse(&public_id_str).ok_or_else(|| PersistenceError::SerializationFailed {
            details: format!("malformed public identifier: {public_id_str}"),
        })?;

    Ok(Submission {
        id: Uuid::parse_str(row.get::<String, _>("id").as_str()).map_err(|e| {
            PersistenceError::SerializationFailed {
                details: e.to_string(),
            }
        })?,
        kind,
        public_id,
        scope_key: row.get("scope_key"),
        owner_ref: row.get("owner_ref"),
        title: row.get("title"),
        body: row.get("body"),
        created_at: parse_timestamp(row.get::<String, _>("created_at").as_str())?,
        updated_at: parse_timestamp(row.get::<String, _>("updated_at").as_str())?,
    })
}
