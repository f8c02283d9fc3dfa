//! Error handling for Showcase
//!
//! This module defines the core error handling infrastructure used throughout
//! the Showcase system. It provides:
//! - `ShowcaseError` trait for consistent error handling
//! - Specific error types for the persistence and configuration domains
//! - Integration with `thiserror` for ergonomic error handling
//!
//! # Design Principles
//! - All errors implement Send + Sync for async compatibility
//! - Use thiserror for typed, matchable errors
//! - Provide clear, actionable error messages
//! - Support error chaining and context

use thiserror::Error;

/// Base trait for all Showcase-specific errors
///
/// This trait ensures all Showcase errors are:
/// - Thread-safe (Send + Sync)
/// - Static lifetime (no borrowed data)
/// - Implement standard Error trait
pub trait ShowcaseError: std::error::Error + Send + Sync + 'static {}

/// Persistence-related errors
///
/// These errors occur during database operations: connection management,
/// queries, and constraint enforcement.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database connection failed
    #[error("Database connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Database query failed
    #[error("Database query failed during {operation}: {details}")]
    QueryFailed { operation: String, details: String },

    /// Constraint violation
    #[error("Database constraint violation: {constraint}")]
    ConstraintViolation { constraint: String },

    /// Record not found
    #[error("Record not found: {details}")]
    NotFound { details: String },

    /// Serialization failed
    #[error("Serialization failed: {details}")]
    SerializationFailed { details: String },

    /// Database migration failed
    #[error("Database migration failed: {details}")]
    MigrationFailed { details: String },
}

impl ShowcaseError for PersistenceError {}

impl PersistenceError {
    /// Wrap an sqlx error with the operation it occurred in
    pub fn query(operation: impl Into<String>, err: sqlx::Error) -> Self {
        Self::QueryFailed {
            operation: operation.into(),
            details: err.to_string(),
        }
    }

    /// Whether the underlying sqlx error is a unique-constraint violation
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {details}")]
    ValidationFailed { details: String },
}

impl ShowcaseError for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::ConstraintViolation {
            constraint: "allocated_ids.kind_public_id".to_string(),
        };
        assert!(err.to_string().contains("constraint violation"));

        let err = PersistenceError::QueryFailed {
            operation: "insert rotation_ledger".to_string(),
            details: "table locked".to_string(),
        };
        assert!(err.to_string().contains("insert rotation_ledger"));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::InvalidValue {
            key: "max_connections".to_string(),
            value: "0".to_string(),
            reason: "must be greater than 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("max_connections"));
        assert!(msg.contains("must be greater than 0"));
    }
}
