//! Per-run context: configuration plus service construction

use anyhow::Result;
use opendonate_api_client::{ClientConfig, GeoClient};
use opendonate_centers::Catalog;
use opendonate_cli::OutputFormat;
use opendonate_community::{CommunityService, JsonFilePostStore, Session};
use opendonate_core::cache::CacheConfig;
use opendonate_core::config::Config;
use opendonate_core::error::ErrorCode;
use opendonate_geo::Coordinate;
use opendonate_location::{Geolocator, LocationInfo, LocationService, LocationStore, NoGeolocator};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub format: OutputFormat,
}

impl App {
    pub fn new(config: Config, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn is_json(&self) -> bool {
        self.format.is_json()
    }

    /// Built-in centers unless `matching.catalog_path` points elsewhere
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.config.schema.matching.catalog_path {
            Some(path) => Ok(Catalog::load_json(path)?),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn radius_km(&self) -> f64 {
        self.config.schema.matching.radius_km
    }

    pub fn location_store(&self) -> Result<LocationStore> {
        Ok(LocationStore::open(CacheConfig::from_settings(&self.config.schema.cache))?)
    }

    /// Saved location, if any
    pub fn saved_location(&self) -> Result<Option<LocationInfo>> {
        Ok(self.location_store()?.load())
    }

    /// Explicit origin, else the saved location's coordinate
    pub fn origin(&self, explicit: Option<(f64, f64)>) -> Result<Option<Coordinate>> {
        if let Some((lat, lng)) = explicit {
            return Ok(Some(Coordinate::new(lat, lng)));
        }
        Ok(self.saved_location()?.map(|l| l.coordinate()))
    }

    /// Location service over the HTTP geocoders, persisting to the cache
    pub fn location_service(&self, geolocator: Arc<dyn Geolocator>) -> Result<LocationService> {
        let client = GeoClient::with_config(ClientConfig::from_settings(&self.config.schema.geocoding))
            .map_err(|e| e.into_service_error(ErrorCode::ConfigError))?;

        let service = LocationService::new(
            geolocator,
            Arc::new(client.reverse_geocoder()),
            Arc::new(client.address_search()),
        )
        .with_store(self.location_store()?);
        service.load_cached();
        Ok(service)
    }

    /// Location service without a device position
    pub fn location_service_without_device(&self) -> Result<LocationService> {
        self.location_service(Arc::new(NoGeolocator))
    }

    /// Community board over the configured posts file
    pub fn community(&self, user: Option<String>, name: Option<String>) -> CommunityService {
        let session = match user {
            Some(uid) => Session::signed_in(uid, name),
            None => Session::Anonymous,
        };
        let store = JsonFilePostStore::new(&self.config.schema.community.posts_path);
        CommunityService::new(Arc::new(store), session)
    }
}
