//! Persisted user location.

use crate::model::LocationInfo;
use opendonate_core::cache::{Cache, CacheConfig};
use opendonate_core::Result;
use tracing::{debug, warn};

/// Cache key holding the last resolved location.
pub const LOCATION_KEY: &str = "userLocation";

/// Stores the last [`LocationInfo`] in the local cache.
pub struct LocationStore {
    cache: Cache,
}

impl LocationStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    pub fn open(config: CacheConfig) -> Result<Self> {
        Ok(Self::new(Cache::new(config)?))
    }

    /// Last saved location. Unreadable entries are logged and treated as
    /// absent.
    pub fn load(&self) -> Option<LocationInfo> {
        match self.cache.get::<LocationInfo>(LOCATION_KEY) {
            Ok(found) => {
                debug!(found = found.is_some(), "Loaded saved location");
                found
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved location");
                None
            }
        }
    }

    pub fn save(&self, location: &LocationInfo) -> Result<()> {
        self.cache.set(LOCATION_KEY, location, None)
    }

    /// Forget the saved location. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        self.cache.remove(LOCATION_KEY)
    }
}
