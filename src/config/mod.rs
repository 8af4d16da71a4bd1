//! Configuration module for Revisit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use revisit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Dispatching {} visits", config.visit.total_visits);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ThrottleConfig, VisitConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
