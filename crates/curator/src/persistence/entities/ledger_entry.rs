//! Rotation ledger entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only record of one rotation selection
///
/// Entries are created exactly once per successful selection and retained
/// indefinitely; the core never mutates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,

    /// Unit of isolation for rotation history, e.g. a community identifier
    /// namespaced by feature
    pub scope_key: String,

    /// Store key of the selected item
    pub item_ref: String,

    /// Where the selection was announced, e.g. a target channel
    pub destination_ref: String,

    pub selected_at: DateTime<Utc>,

    /// Period label (e.g. ISO week) for period-bound features; `None` for
    /// plain windowed history
    pub period_tag: Option<String>,
}

impl LedgerEntry {
    /// Entry for windowed (non-period) selection history
    pub fn windowed(
        scope_key: impl Into<String>,
        item_ref: impl Into<String>,
        destination_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            scope_key: scope_key.into(),
            item_ref: item_ref.into(),
            destination_ref: destination_ref.into(),
            selected_at: Utc::now(),
            period_tag: None,
        }
    }

    /// Entry for a period-bound selection, at most one per (scope, period)
    pub fn for_period(
        scope_key: impl Into<String>,
        item_ref: impl Into<String>,
        destination_ref: impl Into<String>,
        period_tag: impl Into<String>,
    ) -> Self {
        Self {
            period_tag: Some(period_tag.into()),
            ..Self::windowed(scope_key, item_ref, destination_ref)
        }
    }
}
