//! Reverse geocoding through Nominatim

use crate::client::GeoClient;
use crate::error::ApiResult;
use async_trait::async_trait;
use opendonate_core::error::ErrorCode;
use opendonate_core::Result;
use opendonate_geo::Coordinate;
use opendonate_location::{ReverseGeocoder, ADDRESS_NOT_FOUND};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::debug;

/// Street-level detail
const ZOOM: &str = "18";

/// Reverse geocoder backed by a Nominatim `reverse` endpoint
#[derive(Clone)]
pub struct NominatimReverseGeocoder {
    client: GeoClient,
}

/// The part of the reverse response we read
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResponse {
    /// Full address, most specific component first
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimReverseGeocoder {
    pub(crate) fn new(client: GeoClient) -> Self {
        Self { client }
    }

    /// Raw reverse lookup
    pub async fn lookup(&self, coord: Coordinate) -> ApiResult<ReverseResponse> {
        let config = self.client.config();
        let query = [
            ("format", "json".to_string()),
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
            ("zoom", ZOOM.to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", config.accept_language.clone()),
        ];
        self.client
            .get_json(&config.reverse_url, &query, HeaderMap::new())
            .await
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimReverseGeocoder {
    /// Address text for `coord`. A response without `display_name` (open
    /// sea, unmapped area) yields `주소를 찾을 수 없습니다`.
    async fn reverse(&self, coord: Coordinate) -> Result<String> {
        let response = self
            .lookup(coord)
            .await
            .map_err(|e| e.into_service_error(ErrorCode::GeocodingFailed))?;

        match response.display_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => Ok(name),
            None => {
                debug!(lat = coord.latitude, lng = coord.longitude, "No address at coordinate");
                Ok(ADDRESS_NOT_FOUND.to_string())
            }
        }
    }
}
