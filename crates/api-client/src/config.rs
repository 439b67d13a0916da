//! Configuration for the geocoding clients
//!
//! Built from the `[geocoding]` section of the workspace configuration, with
//! builder methods for tests and one-off overrides.

use crate::error::{ApiError, ApiResult};
use opendonate_core::config::GeocodingConfig;
use std::time::Duration;

/// User agent sent with every request. Nominatim rejects anonymous clients.
pub const USER_AGENT: &str = concat!("opendonate-tools/", env!("CARGO_PKG_VERSION"));

/// Largest page size accepted by the keyword search API
pub const MAX_SEARCH_SIZE: u32 = 45;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Reverse geocoding endpoint
    pub reverse_url: String,
    /// Keyword search endpoint
    pub search_url: String,
    /// `accept-language` for reverse geocoding
    pub accept_language: String,
    /// Keyword search REST key
    pub kakao_api_key: Option<String>,
    /// Candidates requested per search
    pub search_size: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_settings(&GeocodingConfig::default())
    }
}

impl ClientConfig {
    /// Build from the `[geocoding]` configuration section
    pub fn from_settings(settings: &GeocodingConfig) -> Self {
        Self {
            reverse_url: settings.reverse_url.clone(),
            search_url: settings.search_url.clone(),
            accept_language: settings.accept_language.clone(),
            kakao_api_key: settings.kakao_api_key.clone(),
            search_size: settings.search_size,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Builder-style method to set the reverse geocoding URL
    #[must_use]
    pub fn with_reverse_url(mut self, url: impl Into<String>) -> Self {
        self.reverse_url = url.into();
        self
    }

    /// Builder-style method to set the keyword search URL
    #[must_use]
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Builder-style method to set the keyword search key
    #[must_use]
    pub fn with_kakao_api_key(mut self, key: impl Into<String>) -> Self {
        self.kakao_api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [("reverse_url", &self.reverse_url), ("search_url", &self.search_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if !(1..=MAX_SEARCH_SIZE).contains(&self.search_size) {
            return Err(ApiError::config(format!(
                "search_size must be between 1 and {MAX_SEARCH_SIZE}"
            )));
        }

        Ok(())
    }
}
