//! Revisit: a concurrent repeated-visit generator
//!
//! This crate dispatches a fixed number of independent visits to a target URL
//! across a bounded worker pool, retrying failed attempts with
//! error-class-aware backoff and pausing cooperatively when the host is under
//! CPU pressure.

pub mod config;
pub mod counter;
pub mod dispatch;
pub mod monitor;
pub mod output;
pub mod visit;

use thiserror::Error;

/// Main error type for Revisit operations
#[derive(Debug, Error)]
pub enum RevisitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Revisit operations
pub type Result<T> = std::result::Result<T, RevisitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use counter::VisitCounter;
pub use dispatch::{partition, run_visits, Dispatcher, WorkerQuota};
pub use output::RunSummary;
pub use visit::{ErrorClass, VisitOutcome};
