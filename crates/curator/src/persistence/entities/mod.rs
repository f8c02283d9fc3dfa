//! Persistent entity types

pub mod ledger_entry;
pub mod submission;

pub use ledger_entry::LedgerEntry;
pub use submission::Submission;
