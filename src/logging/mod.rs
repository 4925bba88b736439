//! Logging initialization with environment-based formatters
//!
//! - Production: structured JSON lines for log aggregation
//! - Anything else: colorful, human-readable output

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Pick the formatter for an environment name.
pub fn log_format(environment: &str) -> LogFormat {
    match environment {
        "production" | "prod" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match log_format(&get_environment()) {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "logging already initialized");
    }
}
