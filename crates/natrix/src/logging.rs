//! Structured logging with tracing
//!
//! Logs go to stderr so that reports on stdout stay machine-readable.

use anyhow::{Result, bail};
use natrix_lint::LoggingConfig;
use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "NATRIX_LOG";

/// Initialize logging
///
/// `NATRIX_LOG` wins over `-v`, which wins over the configured level.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => parse_log_level(&config.level)?,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let registry = Registry::default().with(filter);
    if config.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()?;
    }

    debug!(level, "Logging initialized");
    Ok(())
}

/// Validate a configured log level
pub fn parse_log_level(level: &str) -> Result<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        _ => bail!("Invalid log level: {level}. Use trace, debug, info, warn, error or off"),
    }
}
