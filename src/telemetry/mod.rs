//! Logging initialization.
//!
//! Sets up tracing-subscriber from the validated logging settings. `RUST_LOG`
//! still wins when set, so operators can raise verbosity without a redeploy.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// Build the filter for `config`, deferring to `RUST_LOG` when present.
pub fn env_filter(config: &LoggingConfig) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be initialized (e.g. if
/// one was already set).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| Error::Logging(format!("failed to init tracing subscriber: {e}")))
}
