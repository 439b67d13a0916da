//! Location service.
//!
//! Holds the current [`LocationInfo`] and replaces it on every successful
//! resolution. All collaborators are injected at construction.

use crate::model::{LocationInfo, PlaceCandidate, ADDRESS_NOT_FOUND};
use crate::provider::{AddressSearch, GeolocationError, Geolocator, ReverseGeocoder};
use crate::store::LocationStore;
use opendonate_core::error::{Error, ErrorCode};
use opendonate_core::Result;
use opendonate_geo::Coordinate;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Keywords shorter than this (after trimming) are not searched.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Default wait for a device position.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LocationService {
    geolocator: Arc<dyn Geolocator>,
    geocoder: Arc<dyn ReverseGeocoder>,
    search: Arc<dyn AddressSearch>,
    store: Option<LocationStore>,
    position_timeout: Duration,
    current: RwLock<Option<LocationInfo>>,
}

impl LocationService {
    pub fn new(
        geolocator: Arc<dyn Geolocator>,
        geocoder: Arc<dyn ReverseGeocoder>,
        search: Arc<dyn AddressSearch>,
    ) -> Self {
        Self {
            geolocator,
            geocoder,
            search,
            store: None,
            position_timeout: DEFAULT_POSITION_TIMEOUT,
            current: RwLock::new(None),
        }
    }

    /// Persist every resolved location to `store`.
    #[must_use]
    pub fn with_store(mut self, store: LocationStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_position_timeout(mut self, timeout: Duration) -> Self {
        self.position_timeout = timeout;
        self
    }

    /// Location currently in effect
    pub fn current(&self) -> Option<LocationInfo> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restore the saved location, if any. Call once at startup.
    pub fn load_cached(&self) -> Option<LocationInfo> {
        let saved = self.store.as_ref().and_then(LocationStore::load)?;
        debug!(name = %saved.name, "Restored saved location");
        self.replace(saved.clone());
        Some(saved)
    }

    /// Ask the device for its position and resolve it.
    ///
    /// Permission refusal and every other acquisition failure come back as
    /// errors whose `user_message()` is the text to show.
    #[instrument(skip(self))]
    pub async fn request_location(&self) -> Result<LocationInfo> {
        let position =
            match tokio::time::timeout(self.position_timeout, self.geolocator.current_position())
                .await
            {
                Ok(Ok(coord)) => coord,
                Ok(Err(GeolocationError::PermissionDenied)) => {
                    warn!("Location permission denied");
                    return Err(Error::location_denied());
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Failed to acquire location");
                    return Err(Error::from(e));
                }
                Err(_) => {
                    warn!(timeout_ms = self.position_timeout.as_millis(), "Location request timed out");
                    return Err(Error::from(GeolocationError::Timeout));
                }
            };

        self.set_custom_location(position.latitude, position.longitude)
            .await
    }

    /// Resolve an explicit coordinate and make it the current location.
    ///
    /// Reverse geocoding failures do not fail the call: the address becomes
    /// `주소를 찾을 수 없습니다` and district/neighborhood resolve to unknown.
    #[instrument(skip(self))]
    pub async fn set_custom_location(&self, lat: f64, lng: f64) -> Result<LocationInfo> {
        let coord = Coordinate::checked(lat, lng)
            .map_err(|e| Error::new(ErrorCode::InvalidInput, e.to_string()))?;

        let address = match self.geocoder.reverse(coord).await {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                ADDRESS_NOT_FOUND.to_string()
            }
        };

        let location = LocationInfo::from_address(coord, address);
        info!(
            district = %location.district,
            neighborhood = %location.neighborhood,
            "Location resolved"
        );
        self.apply(location.clone());
        Ok(location)
    }

    /// Make a keyword-search result the current location.
    pub fn select_search_result(&self, candidate: &PlaceCandidate) -> Result<LocationInfo> {
        let location = LocationInfo::from_candidate(candidate)?;
        info!(place = %candidate.place_name, district = %location.district, "Search result selected");
        self.apply(location.clone());
        Ok(location)
    }

    /// Candidate places for a keyword. Short keywords and search failures
    /// both yield an empty list.
    #[instrument(skip(self))]
    pub async fn search(&self, keyword: &str) -> Vec<PlaceCandidate> {
        let keyword = keyword.trim();
        if keyword.chars().count() < MIN_SEARCH_CHARS {
            return Vec::new();
        }

        match self.search.search(keyword).await {
            Ok(results) => {
                debug!(results = results.len(), "Address search complete");
                results
            }
            Err(e) => {
                warn!(error = %e, "Address search failed");
                Vec::new()
            }
        }
    }

    /// Header label for the current location, if any.
    pub fn home_label(&self) -> Option<String> {
        self.current().map(|l| l.home_label())
    }

    /// Persist, then publish. A failed write is logged; the new location
    /// still takes effect for this session.
    fn apply(&self, location: LocationInfo) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&location) {
                warn!(error = %e, "Failed to save location");
            }
        }
        self.replace(location);
    }

    fn replace(&self, location: LocationInfo) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FixedGeolocator, NoGeolocator};
    use async_trait::async_trait;
    use opendonate_core::cache::CacheConfig;
    use opendonate_core::error::{MSG_LOCATION_UNAVAILABLE, MSG_PERMISSION_DENIED};
    use opendonate_core::ErrorKind;
    use opendonate_geo::UNKNOWN;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct DeniedGeolocator;

    #[async_trait]
    impl Geolocator for DeniedGeolocator {
        async fn current_position(&self) -> std::result::Result<Coordinate, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct HangingGeolocator;

    #[async_trait]
    impl Geolocator for HangingGeolocator {
        async fn current_position(&self) -> std::result::Result<Coordinate, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Coordinate::new(0.0, 0.0))
        }
    }

    struct StaticGeocoder(Option<&'static str>);

    #[async_trait]
    impl ReverseGeocoder for StaticGeocoder {
        async fn reverse(&self, _coord: Coordinate) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| Error::service(ErrorCode::GeocodingFailed, "connection refused"))
        }
    }

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AddressSearch for CountingSearch {
        async fn search(&self, keyword: &str) -> Result<Vec<PlaceCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::service(ErrorCode::SearchFailed, "HTTP 401"));
            }
            Ok(vec![PlaceCandidate {
                id: "1".to_string(),
                place_name: keyword.to_string(),
                address_name: "서울 강남구 역삼동".to_string(),
                x: "127.0365".to_string(),
                y: "37.5006".to_string(),
                ..Default::default()
            }])
        }
    }

    const GANGNAM: &str = "123-45, 역삼동, 강남구, 서울특별시, 대한민국";

    fn service(
        geolocator: impl Geolocator + 'static,
        address: Option<&'static str>,
        search: Arc<CountingSearch>,
    ) -> LocationService {
        LocationService::new(Arc::new(geolocator), Arc::new(StaticGeocoder(address)), search)
    }

    #[tokio::test]
    async fn test_request_location() {
        let svc = service(
            FixedGeolocator(Coordinate::new(37.5665, 127.0018)),
            Some(GANGNAM),
            Arc::default(),
        );
        let location = svc.request_location().await.unwrap();

        assert_eq!(location.district, "강남구");
        assert_eq!(location.neighborhood, "서울특별시");
        assert_eq!(location.coordinates, (37.5665, 127.0018));
        assert_eq!(svc.current(), Some(location));
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let svc = service(DeniedGeolocator, Some(GANGNAM), Arc::default());
        let err = svc.request_location().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Permission);
        assert_eq!(err.user_message(), MSG_PERMISSION_DENIED);
        assert!(svc.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_timeout() {
        let svc = service(HangingGeolocator, Some(GANGNAM), Arc::default())
            .with_position_timeout(Duration::from_secs(10));
        let err = svc.request_location().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::LocationTimeout);
        assert_eq!(err.user_message(), MSG_LOCATION_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_geocoding_failure_uses_sentinel() {
        let svc = service(NoGeolocator, None, Arc::default());
        let location = svc.set_custom_location(35.1595, 126.8526).await.unwrap();

        assert_eq!(location.address, ADDRESS_NOT_FOUND);
        assert_eq!(location.district, UNKNOWN);
        assert_eq!(location.neighborhood, UNKNOWN);
    }

    #[tokio::test]
    async fn test_invalid_custom_location() {
        let svc = service(NoGeolocator, Some(GANGNAM), Arc::default());
        let err = svc.set_custom_location(95.0, 0.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn test_new_location_supersedes_old() {
        let svc = service(NoGeolocator, Some(GANGNAM), Arc::default());
        let first = svc.set_custom_location(37.5, 127.0).await.unwrap();
        let second = svc.set_custom_location(37.6, 127.1).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.latitude, 37.5);
        assert_eq!(svc.current(), Some(second));
    }

    #[tokio::test]
    async fn test_short_keyword_skips_search() {
        let search = Arc::new(CountingSearch::default());
        let svc = service(NoGeolocator, None, search.clone());

        assert!(svc.search(" 역 ").await.is_empty());
        assert!(svc.search("").await.is_empty());
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);

        assert_eq!(svc.search("역삼").await.len(), 1);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let search = Arc::new(CountingSearch {
            fail: true,
            ..Default::default()
        });
        let svc = service(NoGeolocator, None, search);
        assert!(svc.search("역삼역").await.is_empty());
    }

    #[tokio::test]
    async fn test_select_search_result() {
        let search = Arc::new(CountingSearch::default());
        let svc = service(NoGeolocator, None, search);
        let results = svc.search("역삼역").await;
        let location = svc.select_search_result(&results[0]).unwrap();

        assert_eq!(location.district, "서울 강남구");
        assert_eq!(location.neighborhood, "역삼동");
        assert_eq!(svc.home_label().as_deref(), Some("역삼동(서울 강남구)"));
    }

    #[tokio::test]
    async fn test_persisted_across_instances() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig {
            cache_dir: dir.path().to_path_buf(),
            default_ttl_secs: 0,
            memory_cache: false,
        };

        let svc = service(NoGeolocator, Some(GANGNAM), Arc::default())
            .with_store(LocationStore::open(config.clone()).unwrap());
        assert!(svc.load_cached().is_none());
        let saved = svc.set_custom_location(37.5665, 127.0018).await.unwrap();

        let restarted = service(NoGeolocator, None, Arc::default())
            .with_store(LocationStore::open(config).unwrap());
        assert!(restarted.current().is_none());
        assert_eq!(restarted.load_cached(), Some(saved.clone()));
        assert_eq!(restarted.current(), Some(saved));
    }
}
