//! Location values.

use opendonate_core::error::{Error, ErrorCode, Result};
use opendonate_geo::address::{search_district, search_neighborhood};
use opendonate_geo::{resolve, Coordinate};
use serde::{Deserialize, Serialize};

/// Address text used when reverse geocoding fails.
pub const ADDRESS_NOT_FOUND: &str = "주소를 찾을 수 없습니다";

/// The user's resolved location.
///
/// Each resolution produces a new value; an existing `LocationInfo` is never
/// modified. `coordinates` always mirrors `latitude`/`longitude` and is
/// rebuilt from them when a stored value is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredLocation")]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub district: String,
    pub neighborhood: String,
    /// `(latitude, longitude)`
    pub coordinates: (f64, f64),
    /// Display name
    pub name: String,
}

/// Persisted shape; `coordinates` is ignored on read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLocation {
    latitude: f64,
    longitude: f64,
    address: String,
    district: String,
    neighborhood: String,
    #[serde(default)]
    name: Option<String>,
}

impl From<StoredLocation> for LocationInfo {
    fn from(stored: StoredLocation) -> Self {
        let name = stored
            .name
            .unwrap_or_else(|| format!("{} {}", stored.district, stored.neighborhood));
        Self {
            latitude: stored.latitude,
            longitude: stored.longitude,
            coordinates: (stored.latitude, stored.longitude),
            address: stored.address,
            district: stored.district,
            neighborhood: stored.neighborhood,
            name,
        }
    }
}

impl LocationInfo {
    /// Build from a coordinate and its reverse-geocoded address text.
    pub fn from_address(coord: Coordinate, address: impl Into<String>) -> Self {
        let address = address.into();
        let parts = resolve(&address);
        Self {
            latitude: coord.latitude,
            longitude: coord.longitude,
            coordinates: coord.pair(),
            name: format!("{} {}", parts.district, parts.neighborhood),
            district: parts.district,
            neighborhood: parts.neighborhood,
            address,
        }
    }

    /// Build from a keyword-search result chosen by the user.
    ///
    /// The district keeps the first two address tokens when there are at
    /// least three (`서울특별시 강남구 계림동` gives `서울특별시 강남구`),
    /// otherwise the whole address. The neighborhood is the last token.
    pub fn from_candidate(candidate: &PlaceCandidate) -> Result<Self> {
        let coord = Coordinate::parse_xy(&candidate.x, &candidate.y).map_err(|e| {
            Error::new(ErrorCode::InvalidFormat, e.to_string())
                .with_context(format!("search result {}", candidate.id))
        })?;

        let address = candidate.address_name.clone();
        Ok(Self {
            latitude: coord.latitude,
            longitude: coord.longitude,
            coordinates: coord.pair(),
            name: address.clone(),
            district: search_district(&address),
            neighborhood: search_neighborhood(&address),
            address,
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Short label for headers: the last word of the display name followed
    /// by the district, e.g. `역삼동(강남구)`.
    pub fn home_label(&self) -> String {
        format!("{}({})", search_neighborhood(&self.name), self.district)
    }
}

/// A keyword-search hit. Coordinates arrive as strings (`x` = longitude,
/// `y` = latitude).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlaceCandidate {
    pub id: String,
    pub place_name: String,
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub place_url: String,
    pub x: String,
    pub y: String,
}
