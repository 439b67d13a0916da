//! Collaborators the location service depends on.
//!
//! Implementations live elsewhere: HTTP clients in `opendonate-api-client`,
//! fixed positions in the CLI, mocks in tests.

use crate::model::PlaceCandidate;
use async_trait::async_trait;
use opendonate_core::error::{Error, ErrorCode};
use opendonate_core::Result;
use opendonate_geo::Coordinate;
use thiserror::Error;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

impl From<GeolocationError> for Error {
    fn from(err: GeolocationError) -> Self {
        let code = match err {
            GeolocationError::PermissionDenied => ErrorCode::LocationPermissionDenied,
            GeolocationError::Timeout => ErrorCode::LocationTimeout,
            GeolocationError::Unavailable(_) => ErrorCode::LocationUnavailable,
        };
        Error::new(code, err.to_string())
    }
}

/// Source of the device position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> std::result::Result<Coordinate, GeolocationError>;
}

/// Coordinates to free-form address text.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coord: Coordinate) -> Result<String>;
}

/// Keyword to candidate places.
#[async_trait]
pub trait AddressSearch: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<PlaceCandidate>>;
}

/// A position fixed up front, e.g. from command-line arguments.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinate);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> std::result::Result<Coordinate, GeolocationError> {
        if self.0.is_valid() {
            Ok(self.0)
        } else {
            Err(GeolocationError::Unavailable(format!(
                "invalid position ({}, {})",
                self.0.latitude, self.0.longitude
            )))
        }
    }
}

/// A device without positioning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn current_position(&self) -> std::result::Result<Coordinate, GeolocationError> {
        Err(GeolocationError::Unavailable("no position source".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendonate_core::ErrorKind;

    #[test]
    fn test_error_mapping() {
        let err: Error = GeolocationError::PermissionDenied.into();
        assert_eq!(err.code, ErrorCode::LocationPermissionDenied);
        assert_eq!(err.kind(), ErrorKind::Permission);

        let err: Error = GeolocationError::Timeout.into();
        assert_eq!(err.code, ErrorCode::LocationTimeout);
    }

    #[tokio::test]
    async fn test_fixed_geolocator() {
        let fixed = FixedGeolocator(Coordinate::new(37.5665, 127.0018));
        assert_eq!(fixed.current_position().await.unwrap().latitude, 37.5665);

        let bad = FixedGeolocator(Coordinate::new(137.0, 0.0));
        assert!(matches!(
            bad.current_position().await,
            Err(GeolocationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_no_geolocator() {
        assert!(NoGeolocator.current_position().await.is_err());
    }
}
