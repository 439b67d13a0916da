//! Geospatial utilities for Open Donate.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Radius filtering and nearest-first ranking over anything [`Located`]
//! - District / neighborhood extraction from Korean address text
//!
//! # Example
//!
//! ```
//! use opendonate_geo::{haversine_distance, Coordinate};
//!
//! let gangnam = Coordinate::new(37.5665, 127.0018);
//! let seocho = Coordinate::new(37.4837, 127.0324);
//!
//! let distance_km = haversine_distance(&gangnam, &seocho);
//! assert!((distance_km - 9.5).abs() < 0.5);
//! ```

mod haversine;
pub mod address;
pub mod proximity;
mod error;

pub use address::{resolve, AddressParts, UNKNOWN};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use proximity::{nearest, within_radius, Located, Nearby, DEFAULT_RADIUS_KM};
pub use error::{GeoError, GeoErrorCode, Result};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without range checks.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({latitude}, {longitude})")))
        }
    }

    /// Parses the string `x` (longitude) / `y` (latitude) pair used by
    /// keyword-search APIs.
    pub fn parse_xy(x: &str, y: &str) -> Result<Self> {
        let longitude: f64 = x
            .trim()
            .parse()
            .map_err(|_| GeoError::Unparseable(x.to_string()))?;
        let latitude: f64 = y
            .trim()
            .parse()
            .map_err(|_| GeoError::Unparseable(y.to_string()))?;
        Self::checked(latitude, longitude)
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `(latitude, longitude)` pair, the order map widgets expect.
    #[inline]
    pub fn pair(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
