//! Configuration loading for GoodWatch services
//!
//! All settings come from environment variables with the `GOODWATCH_` prefix,
//! optionally seeded from a `.env` file. Every config type implements
//! [`ConfigLoader`]: `from_env` fills in defaults for unset variables and
//! `validate` rejects values the engine cannot work with.
//!
//! # Example
//!
//! ```no_run
//! use goodwatch_core::config::{load_dotenv, ConfigLoader, EngineConfig, ServiceConfig};
//!
//! # fn example() -> Result<(), goodwatch_core::GoodWatchError> {
//! load_dotenv();
//!
//! let service = ServiceConfig::from_env()?;
//! let engine = EngineConfig::from_env()?;
//! service.validate()?;
//! engine.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::GoodWatchError;
use crate::observability::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Configuration loader trait
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a set variable cannot be parsed.
    fn from_env() -> Result<Self, GoodWatchError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` naming the offending key.
    fn validate(&self) -> Result<(), GoodWatchError>;
}

/// Longest accepted recency window (one year)
pub const MAX_RECENCY_WINDOW_HOURS: i64 = 24 * 365;

/// Optional engine subsystems
///
/// The engine produces valid, safe output with every flag off; each flag only
/// enables an extra signal on top of the built-in defaults.
///
/// # Environment Variables
///
/// - `GOODWATCH_FEATURE_REMOTE_MOOD_MAPPING` (default: true)
/// - `GOODWATCH_FEATURE_TASTE_BLENDING` (default: true)
/// - `GOODWATCH_FEATURE_RECENCY_GATING` (default: true)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Honour a profile's remote mood-mapping override
    pub remote_mood_mapping: bool,
    /// Blend the taste profile into the score
    pub taste_blending: bool,
    /// Exclude items shown within the recency window (session layer)
    pub recency_gating: bool,
}

impl FeatureFlags {
    /// Every optional subsystem switched off
    pub fn all_disabled() -> Self {
        Self {
            remote_mood_mapping: false,
            taste_blending: false,
            recency_gating: false,
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            remote_mood_mapping: true,
            taste_blending: true,
            recency_gating: true,
        }
    }
}

impl ConfigLoader for FeatureFlags {
    fn from_env() -> Result<Self, GoodWatchError> {
        let defaults = FeatureFlags::default();
        Ok(Self {
            remote_mood_mapping: parse_env_bool(
                "GOODWATCH_FEATURE_REMOTE_MOOD_MAPPING",
                defaults.remote_mood_mapping,
            )?,
            taste_blending: parse_env_bool(
                "GOODWATCH_FEATURE_TASTE_BLENDING",
                defaults.taste_blending,
            )?,
            recency_gating: parse_env_bool(
                "GOODWATCH_FEATURE_RECENCY_GATING",
                defaults.recency_gating,
            )?,
        })
    }

    fn validate(&self) -> Result<(), GoodWatchError> {
        Ok(())
    }
}

/// Decision engine tuning
///
/// # Environment Variables
///
/// - `GOODWATCH_ENGINE_TOP_K` (default: 10): candidates kept for sampling
/// - `GOODWATCH_ENGINE_SOFTMAX_TEMPERATURE` (default: 0.15)
/// - `GOODWATCH_ENGINE_NOT_TONIGHT_PENALTY` (default: 0.85): score multiplier for
///   near-duplicates of a rejected item
/// - `GOODWATCH_ENGINE_NOT_TONIGHT_MIN_SHARED_TAGS` (default: 2)
/// - `GOODWATCH_ENGINE_RECENCY_WINDOW_HOURS` (default: 24)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub top_k: usize,
    pub softmax_temperature: f64,
    pub not_tonight_penalty: f64,
    pub not_tonight_min_shared_tags: usize,
    pub recency_window_hours: i64,
    pub features: FeatureFlags,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            softmax_temperature: 0.15,
            not_tonight_penalty: 0.85,
            not_tonight_min_shared_tags: 2,
            recency_window_hours: 24,
            features: FeatureFlags::default(),
        }
    }
}

impl ConfigLoader for EngineConfig {
    fn from_env() -> Result<Self, GoodWatchError> {
        let defaults = EngineConfig::default();
        Ok(Self {
            top_k: parse_env_var("GOODWATCH_ENGINE_TOP_K", defaults.top_k)?,
            softmax_temperature: parse_env_var(
                "GOODWATCH_ENGINE_SOFTMAX_TEMPERATURE",
                defaults.softmax_temperature,
            )?,
            not_tonight_penalty: parse_env_var(
                "GOODWATCH_ENGINE_NOT_TONIGHT_PENALTY",
                defaults.not_tonight_penalty,
            )?,
            not_tonight_min_shared_tags: parse_env_var(
                "GOODWATCH_ENGINE_NOT_TONIGHT_MIN_SHARED_TAGS",
                defaults.not_tonight_min_shared_tags,
            )?,
            recency_window_hours: parse_env_var(
                "GOODWATCH_ENGINE_RECENCY_WINDOW_HOURS",
                defaults.recency_window_hours,
            )?,
            features: FeatureFlags::from_env()?,
        })
    }

    fn validate(&self) -> Result<(), GoodWatchError> {
        if self.top_k == 0 {
            return Err(GoodWatchError::configuration(
                "top_k must be greater than 0",
                "GOODWATCH_ENGINE_TOP_K",
            ));
        }

        if !(self.softmax_temperature > 0.0) || !self.softmax_temperature.is_finite() {
            return Err(GoodWatchError::configuration(
                format!(
                    "softmax_temperature must be a positive number, got {}",
                    self.softmax_temperature
                ),
                "GOODWATCH_ENGINE_SOFTMAX_TEMPERATURE",
            ));
        }

        if !(self.not_tonight_penalty > 0.0 && self.not_tonight_penalty <= 1.0) {
            return Err(GoodWatchError::configuration(
                format!(
                    "not_tonight_penalty must be in (0, 1], got {}",
                    self.not_tonight_penalty
                ),
                "GOODWATCH_ENGINE_NOT_TONIGHT_PENALTY",
            ));
        }

        if self.not_tonight_min_shared_tags == 0 {
            return Err(GoodWatchError::configuration(
                "not_tonight_min_shared_tags must be at least 1",
                "GOODWATCH_ENGINE_NOT_TONIGHT_MIN_SHARED_TAGS",
            ));
        }

        if !(0..=MAX_RECENCY_WINDOW_HOURS).contains(&self.recency_window_hours) {
            return Err(GoodWatchError::configuration(
                format!(
                    "recency_window_hours must be in [0, {}], got {}",
                    MAX_RECENCY_WINDOW_HOURS, self.recency_window_hours
                ),
                "GOODWATCH_ENGINE_RECENCY_WINDOW_HOURS",
            ));
        }

        self.features.validate()
    }
}

/// HTTP service configuration
///
/// # Environment Variables
///
/// - `GOODWATCH_SERVICE_HOST` (fallback `HOST`, default "0.0.0.0")
/// - `GOODWATCH_SERVICE_PORT` (fallback `PORT`, default 8082)
/// - `GOODWATCH_SERVICE_WORKERS` (default: available parallelism)
/// - `GOODWATCH_LOG_LEVEL` (fallback `RUST_LOG`, default "info")
/// - `GOODWATCH_LOG_FORMAT` (default "json")
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Logging settings derived from this service config
    pub fn log_config(&self) -> Result<LogConfig, GoodWatchError> {
        let format: LogFormat = self.log_format.parse().map_err(|e| {
            GoodWatchError::configuration(format!("{}", e), "GOODWATCH_LOG_FORMAT")
        })?;
        Ok(LogConfig {
            service_name: "goodwatch-engine".to_string(),
            level: self.log_level.clone(),
            format,
        })
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, GoodWatchError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var("GOODWATCH_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match std::env::var("GOODWATCH_SERVICE_PORT") {
            Ok(_) => parse_env_var("GOODWATCH_SERVICE_PORT", defaults.port)?,
            Err(_) => parse_env_var("PORT", defaults.port)?,
        };

        let workers = parse_env_var("GOODWATCH_SERVICE_WORKERS", defaults.workers)?;

        let log_level = std::env::var("GOODWATCH_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(defaults.log_level);

        let log_format = std::env::var("GOODWATCH_LOG_FORMAT").unwrap_or(defaults.log_format);

        Ok(Self {
            host,
            port,
            workers,
            log_level,
            log_format,
        })
    }

    fn validate(&self) -> Result<(), GoodWatchError> {
        if self.port == 0 {
            return Err(GoodWatchError::configuration(
                "port must be greater than 0",
                "GOODWATCH_SERVICE_PORT",
            ));
        }

        if self.workers == 0 {
            return Err(GoodWatchError::configuration(
                "workers must be greater than 0",
                "GOODWATCH_SERVICE_WORKERS",
            ));
        }

        self.log_config().map(|_| ())
    }
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_var<T>(key: &str, default: T) -> Result<T, GoodWatchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim().parse::<T>().map_err(|e| {
                GoodWatchError::configuration(format!("Failed to parse {}: {}", key, e), key)
            })
        })
        .unwrap_or(Ok(default))
}

/// Parse a boolean flag accepting true/false/1/0/yes/no/on/off
fn parse_env_bool(key: &str, default: bool) -> Result<bool, GoodWatchError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(GoodWatchError::configuration(
                format!("Failed to parse {}: '{}' is not a boolean", key, other),
                key,
            )),
        },
    }
}

/// Load a `.env` file if present
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.top_k, 10);
        assert_eq!(config.softmax_temperature, 0.15);
        assert_eq!(config.not_tonight_penalty, 0.85);
        assert_eq!(config.not_tonight_min_shared_tags, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_engine_config_from_env() {
        env::set_var("GOODWATCH_ENGINE_TOP_K", "5");
        env::set_var("GOODWATCH_ENGINE_SOFTMAX_TEMPERATURE", "0.3");
        env::set_var("GOODWATCH_FEATURE_TASTE_BLENDING", "off");

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.softmax_temperature, 0.3);
        assert!(!config.features.taste_blending);
        assert!(config.features.remote_mood_mapping);

        env::remove_var("GOODWATCH_ENGINE_TOP_K");
        env::remove_var("GOODWATCH_ENGINE_SOFTMAX_TEMPERATURE");
        env::remove_var("GOODWATCH_FEATURE_TASTE_BLENDING");
    }

    #[test]
    #[serial]
    fn test_invalid_flag_value() {
        env::set_var("GOODWATCH_FEATURE_RECENCY_GATING", "maybe");
        let result = FeatureFlags::from_env();
        env::remove_var("GOODWATCH_FEATURE_RECENCY_GATING");

        match result {
            Err(GoodWatchError::ConfigurationError { key, .. }) => {
                assert_eq!(key.as_deref(), Some("GOODWATCH_FEATURE_RECENCY_GATING"));
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_engine_config_validation() {
        let mut config = EngineConfig::default();
        config.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.softmax_temperature = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.not_tonight_penalty = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.not_tonight_min_shared_tags = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.recency_window_hours = MAX_RECENCY_WINDOW_HOURS;
        assert!(config.validate().is_ok());
        config.recency_window_hours = i64::MAX;
        match config.validate() {
            Err(GoodWatchError::ConfigurationError { key, .. }) => {
                assert_eq!(key.as_deref(), Some("GOODWATCH_ENGINE_RECENCY_WINDOW_HOURS"));
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8082);
        assert!(config.workers > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_service_port_fallback() {
        env::set_var("PORT", "9000");
        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.port, 9000);
        env::remove_var("PORT");
    }

    #[test]
    fn test_service_config_invalid_log_format() {
        let mut config = ServiceConfig::default();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_parse_env_var_invalid_value() {
        env::set_var("GOODWATCH_TEST_INVALID_VAR", "not-a-number");
        let result: Result<u32, _> = parse_env_var("GOODWATCH_TEST_INVALID_VAR", 42);
        assert!(result.is_err());
        env::remove_var("GOODWATCH_TEST_INVALID_VAR");

        let result: u32 = parse_env_var("GOODWATCH_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_all_flags_disabled() {
        let flags = FeatureFlags::all_disabled();
        assert!(!flags.remote_mood_mapping);
        assert!(!flags.taste_blending);
        assert!(!flags.recency_gating);
    }
}
