use crate::config::LoggingConfig;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// install the global tracing subscriber
///
/// `RUST_LOG` wins over `logging.level` when set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}
