//! Core utilities for Open Donate
//!
//! This crate provides shared functionality used across the workspace:
//!
//! - **Error handling**: Structured errors with codes, context, recovery suggestions
//!   and the user-facing message taxonomy
//! - **Configuration**: TOML-based configuration with defaults and validation
//! - **Caching**: File-backed key-value cache with integrity checks
//! - **Validation**: Fluent validators used at storage and config boundaries
//!
//! # Example
//!
//! ```rust,no_run
//! use opendonate_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! assert!(config.schema.matching.radius_km > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, ErrorKind, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{Cache, CacheConfig};
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, ErrorKind, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}
