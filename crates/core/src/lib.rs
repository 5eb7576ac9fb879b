//! # GoodWatch Core
//!
//! Shared building blocks for the GoodWatch recommendation engine: domain
//! models, language normalization, configuration loading, the common error
//! type and logging setup.
//!
//! ## Modules
//!
//! - `models`: catalog items, user profiles, taste profiles and feedback
//! - `language`: language synonym normalization
//! - `config`: environment-driven configuration with validation
//! - `error`: the shared error type
//! - `observability`: structured logging initialization

pub mod config;
pub mod error;
pub mod language;
pub mod models;
pub mod observability;

pub use config::{load_dotenv, ConfigLoader, EngineConfig, FeatureFlags, ServiceConfig};
pub use error::GoodWatchError;
pub use language::normalize_language;
pub use models::*;
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for GoodWatch operations
pub type Result<T> = std::result::Result<T, GoodWatchError>;
