//! File-backed key-value cache
//!
//! Values are stored as JSON next to a metadata record holding the expiry
//! and a SHA-256 of the payload. Entries that fail the integrity check or
//! have expired are removed on read and reported as absent.
//!
//! # Example
//!
//! ```rust,ignore
//! use opendonate_core::cache::{Cache, CacheConfig};
//!
//! let cache = Cache::new(CacheConfig::default())?;
//! cache.set("userLocation", &location, None)?;
//! let restored: Option<LocationInfo> = cache.get("userLocation")?;
//! ```

use crate::config::CacheSettings;
use crate::error::{Error, ErrorCode, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Default TTL in seconds (0 = no expiry)
    pub default_ttl_secs: u64,
    /// Keep a copy of read/written entries in memory
    pub memory_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            default_ttl_secs: 0,
            memory_cache: true,
        }
    }
}

impl CacheConfig {
    /// Build from the `[cache]` configuration section
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self {
            cache_dir: settings.dir.clone().unwrap_or_else(default_cache_dir),
            default_ttl_secs: settings.ttl_secs,
            memory_cache: true,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("opendonate")
}

/// Cache entry metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    created_at: u64,
    /// 0 = never
    expires_at: u64,
    size_bytes: u64,
    hash: String,
}

/// File-based cache with optional in-memory layer
pub struct Cache {
    config: CacheConfig,
    memory: Option<RwLock<HashMap<String, (CacheEntry, Vec<u8>)>>>,
}

impl Cache {
    /// Create a new cache instance, creating the directory if needed
    pub fn new(config: CacheConfig) -> Result<Self> {
        fs::create_dir_all(&config.cache_dir)?;

        let memory = config.memory_cache.then(|| RwLock::new(HashMap::new()));

        Ok(Self { config, memory })
    }

    /// Directory backing this cache
    pub fn dir(&self) -> &std::path::Path {
        &self.config.cache_dir
    }

    /// Get a cached value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let cache_key = hash_hex(key.as_bytes());

        if let Some(ref memory) = self.memory {
            let guard = memory
                .read()
                .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire cache read lock"))?;

            if let Some((entry, data)) = guard.get(&cache_key) {
                if !is_expired(entry) {
                    return Ok(Some(serde_json::from_slice(data)?));
                }
            }
        }

        let entry_path = self.entry_path(&cache_key);
        let data_path = self.data_path(&cache_key);

        if !entry_path.exists() || !data_path.exists() {
            return Ok(None);
        }

        let entry: CacheEntry = serde_json::from_str(&fs::read_to_string(&entry_path)?)?;

        if is_expired(&entry) {
            tracing::debug!(key, "Cache entry expired");
            self.discard(&cache_key);
            return Ok(None);
        }

        let data = fs::read(&data_path)?;

        if hash_hex(&data) != entry.hash {
            tracing::warn!(key, "Cache entry failed integrity check, discarding");
            self.discard(&cache_key);
            return Ok(None);
        }

        let value: T = serde_json::from_slice(&data)?;

        if let Some(ref memory) = self.memory {
            if let Ok(mut guard) = memory.write() {
                guard.insert(cache_key, (entry, data));
            }
        }

        Ok(Some(value))
    }

    /// Set a cached value, replacing any previous one
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let cache_key = hash_hex(key.as_bytes());
        let data = serde_json::to_vec(value)?;

        let now = now_secs();
        let ttl_secs = ttl.map_or(self.config.default_ttl_secs, |d| d.as_secs());

        let entry = CacheEntry {
            created_at: now,
            expires_at: if ttl_secs > 0 { now + ttl_secs } else { 0 },
            size_bytes: data.len() as u64,
            hash: hash_hex(&data),
        };

        fs::write(self.entry_path(&cache_key), serde_json::to_string(&entry)?)?;
        fs::write(self.data_path(&cache_key), &data)?;

        if let Some(ref memory) = self.memory {
            if let Ok(mut guard) = memory.write() {
                guard.insert(cache_key, (entry, data));
            }
        }

        Ok(())
    }

    /// Remove a cached value. Returns whether an entry existed on disk.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let cache_key = hash_hex(key.as_bytes());
        let existed = self.entry_path(&cache_key).exists();
        self.discard(&cache_key);
        Ok(existed)
    }

    fn discard(&self, cache_key: &str) {
        if let Some(ref memory) = self.memory {
            if let Ok(mut guard) = memory.write() {
                guard.remove(cache_key);
            }
        }
        let _ = fs::remove_file(self.entry_path(cache_key));
        let _ = fs::remove_file(self.data_path(cache_key));
    }

    fn entry_path(&self, cache_key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{cache_key}.meta"))
    }

    fn data_path(&self, cache_key: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{cache_key}.data"))
    }
}

fn hash_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn is_expired(entry: &CacheEntry) -> bool {
    entry.expires_at != 0 && now_secs() > entry.expires_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache(memory_cache: bool) -> (Cache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig {
            cache_dir: temp_dir.path().to_path_buf(),
            default_ttl_secs: 0,
            memory_cache,
        };
        let cache = Cache::new(config).unwrap();
        (cache, temp_dir)
    }

    #[test]
    fn test_set_and_get() {
        let (cache, _temp) = test_cache(true);

        cache.set("userLocation", &"역삼동".to_string(), None).unwrap();
        let value: Option<String> = cache.get("userLocation").unwrap();

        assert_eq!(value.as_deref(), Some("역삼동"));
    }

    #[test]
    fn test_survives_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig {
            cache_dir: temp_dir.path().to_path_buf(),
            default_ttl_secs: 0,
            memory_cache: true,
        };

        Cache::new(config.clone()).unwrap().set("k", &42u32, None).unwrap();
        let reopened = Cache::new(config).unwrap();
        assert_eq!(reopened.get::<u32>("k").unwrap(), Some(42));
    }

    #[test]
    fn test_get_missing() {
        let (cache, _temp) = test_cache(true);
        let value: Option<String> = cache.get("nonexistent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_remove() {
        let (cache, _temp) = test_cache(true);

        cache.set("to_remove", &42i32, None).unwrap();
        assert!(cache.remove("to_remove").unwrap());
        assert!(cache.get::<i32>("to_remove").unwrap().is_none());
        assert!(!cache.remove("to_remove").unwrap());
    }

    #[test]
    fn test_tampered_entry_discarded() {
        let (cache, temp) = test_cache(false);
        cache.set("k", &"value".to_string(), None).unwrap();

        let data_file = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| p.extension().is_some_and(|e| e == "data"))
            .unwrap();
        fs::write(&data_file, b"\"other\"").unwrap();

        assert!(cache.get::<String>("k").unwrap().is_none());
        assert!(!cache.remove("k").unwrap());
    }

    #[test]
    fn test_expiry() {
        let (cache, _temp) = test_cache(false);

        cache.set("expires", &"value".to_string(), Some(Duration::from_secs(1))).unwrap();
        assert!(cache.get::<String>("expires").unwrap().is_some());

        std::thread::sleep(Duration::from_secs(2));
        assert!(cache.get::<String>("expires").unwrap().is_none());
    }
}
