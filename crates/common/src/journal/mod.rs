//! Structured logging via tracing
//!
//! Lightweight logging setup shared by all Showcase binaries: a fmt
//! subscriber with an `EnvFilter`, configurable through [`LoggingConfig`].
//!
//! [`LoggingConfig`]: crate::config::LoggingConfig

pub mod init;

pub use init::init_logging;
