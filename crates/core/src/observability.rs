//! Structured logging initialization

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging setup errors
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log format: {0} (expected json or pretty)")]
    InvalidFormat(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::InvalidFormat(other.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name attached to the startup line
    pub service_name: String,
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "goodwatch-engine".to_string(),
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `config.level`. Calling this twice returns
/// [`ObservabilityError::AlreadyInitialized`] instead of panicking, so tests
/// may call it freely.
pub fn init_logging(config: &LogConfig) -> Result<(), ObservabilityError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init(),
    }
    .map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service_name = %config.service_name,
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );

    Ok(())
}
