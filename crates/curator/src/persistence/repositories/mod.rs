//! Repository implementations over SQLite

pub mod ledger_repository;
pub mod submission_repository;

pub use ledger_repository::{LedgerRepository, PeriodAppend};
pub use submission_repository::SubmissionRepository;
