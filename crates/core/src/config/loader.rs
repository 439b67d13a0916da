//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use crate::validation::{ValidationResult, Validator};
use std::env;
use std::path::Path;

/// Environment variable holding the Kakao REST key
pub const ENV_KAKAO_API_KEY: &str = "KAKAO_API_KEY";
/// Environment override for the reverse geocoding endpoint
pub const ENV_NOMINATIM_URL: &str = "OPENDONATE_NOMINATIM_URL";
/// Environment override for the keyword search endpoint
pub const ENV_KAKAO_URL: &str = "OPENDONATE_KAKAO_URL";

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed schema
    pub schema: ConfigSchema,
    /// File the schema was read from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// probed and defaults are used when none is found. Environment
    /// overrides are applied last, then the result is validated.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            tracing::debug!(path = %p, "Loading configuration");
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let mut config = Self {
            schema,
            path: config_path,
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate().to_result()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string (no file, no environment)
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: ConfigSchema = toml::from_str(content)?;
        let config = Self { schema, path: None };
        config.validate().to_result()?;
        Ok(config)
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let geocoding = &mut self.schema.geocoding;
        if let Some(key) = lookup(ENV_KAKAO_API_KEY).filter(|k| !k.trim().is_empty()) {
            geocoding.kakao_api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_NOMINATIM_URL) {
            geocoding.reverse_url = url;
        }
        if let Some(url) = lookup(ENV_KAKAO_URL) {
            geocoding.search_url = url;
        }
    }

    /// Check value ranges and URL shapes
    pub fn validate(&self) -> ValidationResult {
        let matching = &self.schema.matching;
        let geocoding = &self.schema.geocoding;

        Validator::new()
            .custom("matching.radius_km", || {
                (!(matching.radius_km.is_finite() && matching.radius_km > 0.0))
                    .then(|| format!("Must be a positive number, got {}", matching.radius_km))
            })
            .pattern(
                "geocoding.reverse_url",
                &geocoding.reverse_url,
                r"^https?://",
                "http(s) URL",
            )
            .pattern(
                "geocoding.search_url",
                &geocoding.search_url,
                r"^https?://",
                "http(s) URL",
            )
            .range("geocoding.timeout_secs", geocoding.timeout_secs, 1, 300)
            .range("geocoding.search_size", geocoding.search_size, 1, 45)
            .required("geocoding.accept_language", &geocoding.accept_language)
            .validate()
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".opendonate.toml",
        "opendonate.toml",
        ".config/opendonate.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorCode::ConfigError, format!("Failed to read config file {path}"))
            .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(ErrorCode::ConfigParseError, format!("Failed to parse config file {path}"))
            .with_source(e)
    })
}
