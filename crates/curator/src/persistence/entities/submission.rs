//! User-submitted content entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::{EntityKind, PublicId};

/// A member-submitted entity in a community scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Store primary key
    pub id: Uuid,

    /// Entity kind, determines the identifier prefix
    pub kind: EntityKind,

    /// Human-readable public identifier, unique per kind
    pub public_id: PublicId,

    /// Community scope this submission belongs to
    pub scope_key: String,

    /// Reference to the owning user
    pub owner_ref: String,

    pub title: String,
    pub body: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Create a new submission with fresh timestamps
    pub fn new(
        kind: EntityKind,
        public_id: PublicId,
        scope_key: impl Into<String>,
        owner_ref: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            public_id,
            scope_key: scope_key.into(),
            owner_ref: owner_ref.into(),
            title: title.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
