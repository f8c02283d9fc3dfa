//! Logging initialization

use tracing::info;

use crate::config::LoggingConfig;

/// Initialize the logging system with tracing
///
/// Honors `RUST_LOG` when set, otherwise falls back to the configured
/// filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.clone()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(config.with_target))
        .try_init()?;

    info!("Logging initialized");
    Ok(())
}
