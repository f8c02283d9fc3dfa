//! # Curator
//!
//! Core library of the Showcase community-content backend. Members submit
//! entities (characters, prompts, trivia, daily questions) into per-community
//! scopes; this crate owns the two pieces that carry correctness risk:
//!
//! - **Identifier allocation** ([`allocation`]): short human-readable public
//!   identifiers (`O00042`), unique per entity kind, allocated through a
//!   reservation table with a unique constraint and a bounded
//!   retry-on-conflict loop.
//! - **Rotation selection** ([`rotation`]): picking a candidate from a pool
//!   while excluding recently-featured items, with the pick durably recorded
//!   in an append-only ledger and at most one committed selection per period
//!   per scope.
//!
//! Persistence ([`persistence`]) is SQLite via sqlx; request handlers,
//! authentication, and scheduling live outside this crate.

pub mod allocation;
pub mod config;
pub mod persistence;
pub mod rotation;

pub use allocation::{is_valid_public_id, AllocationError, EntityKind, IdAllocator, PublicId};
pub use rotation::{
    Candidate, IndexSampler, RandomSampler, RotationPeriod, RotationSelector, Selection,
    SelectionError,
};
