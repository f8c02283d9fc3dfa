//! Identifier allocator backed by a reservation table
//!
//! The allocator computes the next numeric suffix as one greater than the
//! maximum currently visible for the prefix, then reserves the identifier by
//! inserting into `allocated_ids`. The `UNIQUE (kind, public_id)` constraint
//! turns concurrent duplicate computations into insert conflicts, which the
//! allocator resolves by refreshing the maximum and retrying within a
//! bounded attempt budget.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use common::PersistenceError;

use super::{
    AllocationError, EntityKind, PublicId, DEFAULT_MAX_ALLOCATION_ATTEMPTS, MAX_SUFFIX,
};

/// Allocates unique public identifiers per entity kind
pub struct IdAllocator {
    pool: SqlitePool,
    max_attempts: u32,
}

impl IdAllocator {
    /// Create an allocator with the default retry budget
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Create an allocator with a custom retry budget
    pub fn with_max_attempts(pool: SqlitePool, max_attempts: u32) -> Self {
        Self {
            pool,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Allocate the next identifier for an entity kind
    ///
    /// The returned identifier is reserved durably before this method
    /// returns; a crash between allocation and entity save leaves a gap,
    /// never a duplicate.
    pub async fn allocate(&self, kind: EntityKind) -> Result<PublicId, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let max = self.current_max(kind).await?;
            if max >= MAX_SUFFIX {
                return Err(AllocationError::Exhausted {
                    prefix: kind.prefix(),
                });
            }

            let candidate = PublicId::from_parts(kind.prefix(), max + 1).ok_or(
                AllocationError::Exhausted {
                    prefix: kind.prefix(),
                },
            )?;

            match sqlx::query(
                "INSERT INTO allocated_ids (kind, public_id, allocated_at) VALUES (?, ?, ?)",
            )
            .bind(kind.as_str())
            .bind(candidate.as_str())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            {
                Ok(_) => {
                    debug!(
                        kind = %kind,
                        public_id = %candidate,
                        attempt = attempt,
                        "Allocated public identifier"
                    );
                    return Ok(candidate);
                }
                Err(e) if PersistenceError::is_unique_violation(&e) => {
                    warn!(
                        kind = %kind,
                        public_id = %candidate,
                        attempt = attempt,
                        "Identifier reservation conflict, retrying with refreshed maximum"
                    );
                    continue;
                }
                Err(e) => {
                    return Err(PersistenceError::query("reserve public identifier", e).into())
                }
            }
        }

        Err(AllocationError::Conflict {
            attempts: self.max_attempts,
        })
    }

    /// Maximum numeric suffix currently visible for a kind
    ///
    /// Scans both reserved identifiers and persisted submissions so that
    /// rows imported without going through the allocator still advance the
    /// sequence.
    pub async fn current_max(&self, kind: EntityKind) -> Result<u32, AllocationError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT public_id FROM allocated_ids WHERE kind = ?
            UNION
            SELECT public_id FROM submissions WHERE kind = ?
            "#,
        )
        .bind(kind.as_str())
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::query("scan public identifiers", e))?;

        Ok(rows
            .iter()
            .filter_map(|(id,)| parse_suffix(id, kind.prefix()))
            .max()
            .unwrap_or(0))
    }
}

/// Parse the trailing digit run of an identifier with the expected prefix
fn parse_suffix(id: &str, prefix: char) -> Option<u32> {
    let rest = id.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}
