//! Anti-repeat rotation selection
//!
//! Picks one candidate from a pool for a scope, excluding items featured
//! within a lookback window, and durably records committed picks in the
//! rotation ledger. Period-bound features (one spotlight per week per
//! scope) route through a conditional ledger insert so the "already
//! selected this period" check and the commit are a single atomic step.

pub mod sampler;
pub mod selector;

pub use sampler::{IndexSampler, RandomSampler, SeededSampler};
pub use selector::RotationSelector;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use common::{PersistenceError, ShowcaseError};

use crate::persistence::entities::LedgerEntry;

/// One selectable item in a rotation pool
///
/// Pools are supplied fresh per selection call; the core never caches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque store key of the item
    pub item_ref: String,
    /// Reference to the owning user
    pub owner_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied period bounds for period-bound selection
///
/// The core hardcodes no calendar; the caller decides what a period is and
/// labels it (e.g. an ISO week like `2026-W36`).
#[derive(Debug, Clone)]
pub struct RotationPeriod {
    /// Inclusive start of the current period
    pub start: DateTime<Utc>,
    /// Label guaranteeing at most one committed selection per period
    pub tag: String,
}

impl RotationPeriod {
    pub fn new(start: DateTime<Utc>, tag: impl Into<String>) -> Self {
        Self {
            start,
            tag: tag.into(),
        }
    }
}

/// Result of a committed selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Store key of the chosen item
    pub item_ref: String,
    /// Ledger entry backing the pick; `None` for ephemeral uniform picks
    pub entry: Option<LedgerEntry>,
    /// Whether this call created the pick, as opposed to returning an
    /// existing one for the period
    pub is_new: bool,
}

/// Errors surfaced by rotation selection
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Selection requested over zero candidates
    #[error("Cannot select from an empty candidate pool")]
    EmptyPool,

    /// Underlying store failure, propagated unchanged
    #[error(transparent)]
    Storage(#[from] PersistenceError),
}

impl ShowcaseError for SelectionError {}
