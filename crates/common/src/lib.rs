//! # Common Showcase
//!
//! Shared foundations for the Showcase community-content backend.
//! This crate provides the building blocks the service crates depend on:
//!
//! - Error taxonomy with the `ShowcaseError` marker trait
//! - Layered configuration loading (defaults -> file -> environment)
//! - SQLite connection-pool management and pagination helpers
//! - Tracing-based structured logging initialization
//!
//! ## Design Principles
//! - Minimal dependencies to avoid bloat in dependent crates
//! - Use thiserror for typed, matchable errors
//! - Trait-based abstractions for dependency injection

pub mod config;
pub mod error;
pub mod journal;
pub mod persistence;

// Re-export commonly used types at the crate root for convenience
pub use config::*;
pub use error::*;
pub use persistence::{PaginatedResponse, Pagination};

/// Version of the common crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(VERSION.chars().any(|c| c.is_ascii_digit()));
    }
}
