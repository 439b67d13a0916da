//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[allow(missing_docs)]
pub struct ConfigSchema {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub community: CommunityConfig,

    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// Center matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Radius used by the proximity fallback, in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Optional JSON catalog replacing the built-in centers
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            catalog_path: None,
        }
    }
}

fn default_radius_km() -> f64 {
    5.0
}

/// Reverse geocoding and address search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim reverse endpoint
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,

    /// Kakao keyword search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Language requested from the reverse geocoder
    #[serde(default = "default_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Kakao REST key. Usually supplied through `KAKAO_API_KEY`.
    #[serde(default)]
    pub kakao_api_key: Option<String>,

    /// Maximum number of search candidates requested
    #[serde(default = "default_search_size")]
    pub search_size: u32,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            reverse_url: default_reverse_url(),
            search_url: default_search_url(),
            accept_language: default_language(),
            timeout_secs: default_timeout_secs(),
            kakao_api_key: None,
            search_size: default_search_size(),
        }
    }
}

fn default_reverse_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_search_url() -> String {
    "https://dapi.kakao.com/v2/local/search/keyword.json".to_string()
}

fn default_language() -> String {
    "ko".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_search_size() -> u32 {
    10
}

/// Local persistent cache
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheSettings {
    /// Cache directory; defaults to the platform cache dir
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Entry lifetime in seconds (0 = no expiry)
    #[serde(default)]
    pub ttl_secs: u64,
}

/// Community document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// JSON file holding post documents
    #[serde(default = "default_posts_path")]
    pub posts_path: PathBuf,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            posts_path: default_posts_path(),
        }
    }
}

fn default_posts_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".data"))
        .join("opendonate")
        .join("posts.json")
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
