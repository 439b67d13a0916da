//! User location for Open Donate.
//!
//! [`LocationService`] turns a device position, an explicit coordinate or a
//! keyword-search result into a [`LocationInfo`], keeps the one currently in
//! effect and persists it through [`LocationStore`]. The position source,
//! reverse geocoder and address search are injected as trait objects.

pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use model::{LocationInfo, PlaceCandidate, ADDRESS_NOT_FOUND};
pub use provider::{
    AddressSearch, FixedGeolocator, GeolocationError, Geolocator, NoGeolocator, ReverseGeocoder,
};
pub use service::{LocationService, MIN_SEARCH_CHARS};
pub use store::{LocationStore, LOCATION_KEY};
