//! Curator service configuration
//!
//! Layered loading via the common figment loader: compiled defaults, then
//! `config.toml`, then `SHOWCASE_*` environment overrides (nested fields
//! with `__`, e.g. `SHOWCASE_DATABASE__URL`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use common::config::{load_config_with_options, ConfigLoader, ConfigValidation, LoadOptions};
use common::{ConfigurationError, DatabaseConfig, LoggingConfig};

use crate::allocation::DEFAULT_MAX_ALLOCATION_ATTEMPTS;

/// Top-level curator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CuratorConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub rotation: RotationConfig,
    pub allocation: AllocationConfig,
}

/// Rotation feature settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Default lookback window for exclusion-mode selection
    pub default_lookback: Duration,

    /// Default destination reference for announced selections
    pub spotlight_destination: String,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            // Four weeks of anti-repeat history
            default_lookback: Duration::from_secs(28 * 24 * 60 * 60),
            spotlight_destination: "announcements".to_string(),
        }
    }
}

/// Identifier allocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Retry budget for reservation conflicts
    pub max_attempts: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        }
    }
}

impl CuratorConfig {
    /// Load configuration with optional path override
    pub fn load(path_override: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        let options = LoadOptions {
            config_path: path_override,
            ..Default::default()
        };
        let config: Self = load_config_with_options(options)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigLoader<CuratorConfig> for CuratorConfig {
    fn load(path_override: Option<PathBuf>) -> Result<CuratorConfig, ConfigurationError> {
        CuratorConfig::load(path_override)
    }

    fn load_from_file(path: &Path) -> Result<CuratorConfig, ConfigurationError> {
        let config: CuratorConfig = common::config::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidation for CuratorConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.database.validate()?;

        if self.allocation.max_attempts == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "allocation.max_attempts".to_string(),
                value: self.allocation.max_attempts.to_string(),
                reason: "Retry budget must be at least 1".to_string(),
            });
        }

        if self.rotation.spotlight_destination.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                key: "rotation.spotlight_destination".to_string(),
                value: String::new(),
                reason: "Destination reference cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = self.database.warnings();
        if self.rotation.default_lookback.is_zero() {
            warnings.push(
                "Zero lookback window configured; selections will not avoid repeats".to_string(),
            );
        }
        warnings
    }
}
