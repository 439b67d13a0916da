//! HTTP clients for the hosted services Open Donate depends on
//!
//! - **Reverse geocoding**: coordinates to address text (Nominatim)
//! - **Keyword search**: place names to candidate addresses (Kakao Local)
//!
//! Both implement the collaborator traits from `opendonate-location`, so the
//! location service never sees HTTP details. Requests are single attempts
//! with a timeout and a correlation id; there is no retry.
//!
//! # Example
//!
//! ```rust,no_run
//! use opendonate_api_client::{ClientConfig, GeoClient};
//! use opendonate_geo::Coordinate;
//! use opendonate_location::ReverseGeocoder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeoClient::with_config(ClientConfig::default())?;
//! let address = client
//!     .reverse_geocoder()
//!     .reverse(Coordinate::new(37.5665, 127.0018))
//!     .await?;
//! println!("{address}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::GeoClient;
pub use config::ClientConfig;
pub use endpoints::{KakaoAddressSearch, NominatimReverseGeocoder};
pub use error::{ApiError, ApiResult};
