//! # Persistence Abstractions
//!
//! Common patterns for database access across Showcase components:
//! connection-pool management with retry and pagination helpers.

pub mod connection;
pub mod pagination;

// Re-export commonly used types
pub use connection::*;
pub use pagination::*;
