//! Public identifier allocation
//!
//! Every submitted entity gets a short human-readable identifier: one
//! uppercase prefix letter denoting the entity kind followed by exactly five
//! zero-padded decimal digits, e.g. `O00042`. Within an entity kind no two
//! live entities share an identifier, and numeric suffixes grow
//! monotonically; gaps left by deleted entities are never reclaimed.
//!
//! Allocation is made safe under concurrency by reserving each identifier in
//! a table with a `UNIQUE (kind, public_id)` constraint and retrying with a
//! refreshed maximum when the insert loses a race. See [`IdAllocator`].

mod allocator;

pub use allocator::IdAllocator;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use common::{PersistenceError, ShowcaseError};

/// Number of decimal digits in the numeric suffix
pub const SUFFIX_WIDTH: usize = 5;

/// Largest numeric suffix representable in the fixed-width format
pub const MAX_SUFFIX: u32 = 99_999;

/// Bounded attempt count for the allocate retry loop
pub const DEFAULT_MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Shape check pattern for public identifiers: `^[A-Z]\d{5}$`
static PUBLIC_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][0-9]{5}$").expect("Invalid public id regex pattern"));

/// Validates a potential public identifier string
///
/// Purely a shape check; performs no existence lookup.
pub fn is_valid_public_id(s: &str) -> bool {
    PUBLIC_ID_PATTERN.is_match(s)
}

/// Kinds of user-submitted entities
///
/// Each kind maps to a fixed identifier prefix letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Prompt,
    Trivia,
    DailyQuestion,
}

impl EntityKind {
    /// Identifier prefix letter for this kind
    pub fn prefix(&self) -> char {
        match self {
            EntityKind::Character => 'O',
            EntityKind::Prompt => 'P',
            EntityKind::Trivia => 'T',
            EntityKind::DailyQuestion => 'Q',
        }
    }

    /// Database representation of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Prompt => "prompt",
            EntityKind::Trivia => "trivia",
            EntityKind::DailyQuestion => "daily_question",
        }
    }

    /// Parse the database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "character" => Some(EntityKind::Character),
            "prompt" => Some(EntityKind::Prompt),
            "trivia" => Some(EntityKind::Trivia),
            "daily_question" => Some(EntityKind::DailyQuestion),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated public identifier
///
/// Exactly 6 ASCII characters: one uppercase prefix letter plus a
/// zero-padded 5-digit numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(String);

impl PublicId {
    /// Build an identifier from a prefix letter and numeric suffix
    ///
    /// Returns `None` when the suffix exceeds the fixed-width maximum.
    pub fn from_parts(prefix: char, suffix: u32) -> Option<Self> {
        if !prefix.is_ascii_uppercase() || suffix > MAX_SUFFIX {
            return None;
        }
        Some(Self(format!("{prefix}{suffix:0width$}", width = SUFFIX_WIDTH)))
    }

    /// Parse and validate an identifier string
    pub fn parse(s: &str) -> Option<Self> {
        if is_valid_public_id(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix letter
    pub fn prefix(&self) -> char {
        self.0.chars().next().unwrap_or('?')
    }

    /// The numeric suffix
    pub fn suffix(&self) -> u32 {
        self.0[1..].parse().unwrap_or(0)
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors surfaced by identifier allocation
#[derive(Error, Debug)]
pub enum AllocationError {
    /// Numeric suffix space for a prefix is exhausted
    #[error("Identifier space exhausted for prefix {prefix}: numeric suffix space is full")]
    Exhausted { prefix: char },

    /// Repeated uniqueness conflicts exceeded the retry budget
    #[error("Failed to allocate a unique identifier after {attempts} attempts")]
    Conflict { attempts: u32 },

    /// Underlying store failure, propagated unchanged
    #[error(transparent)]
    Storage(#[from] PersistenceError),
}

impl ShowcaseError for AllocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_shape_validation() {
        assert!(is_valid_public_id("O00001"));
        assert!(is_valid_public_id("Q99999"));

        assert!(!is_valid_public_id("O1"));
        assert!(!is_valid_public_id("o00001"));
        assert!(!is_valid_public_id("OA0001"));
        assert!(!is_valid_public_id("O000001"));
        assert!(!is_valid_public_id(""));
    }

    #[test]
    fn test_public_id_from_parts() {
        let id = PublicId::from_parts('O', 42).unwrap();
        assert_eq!(id.as_str(), "O00042");
        assert_eq!(id.prefix(), 'O');
        assert_eq!(id.suffix(), 42);

        assert!(PublicId::from_parts('O', MAX_SUFFIX).is_some());
        assert!(PublicId::from_parts('O', MAX_SUFFIX + 1).is_none());
        assert!(PublicId::from_parts('o', 1).is_none());
    }

    #[test]
    fn test_public_id_parse_round_trip() {
        let id = PublicId::parse("T00123").unwrap();
        assert_eq!(id.to_string(), "T00123");
        assert!(PublicId::parse("T-0123").is_none());
    }

    #[test]
    fn test_entity_kind_prefixes_are_distinct() {
        let kinds = [
            EntityKind::Character,
            EntityKind::Prompt,
            EntityKind::Trivia,
            EntityKind::DailyQuestion,
        ];
        let mut prefixes: Vec<char> = kinds.iter().map(|k| k.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), kinds.len());
    }

    #[test]
    fn test_entity_kind_string_round_trip() {
        for kind in [
            EntityKind::Character,
            EntityKind::Prompt,
            EntityKind::Trivia,
            EntityKind::DailyQuestion,
        ] {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("unknown"), None);
    }
}
