//! Service-specific clients
//!
//! | Module | Service | Implements |
//! |--------|---------|------------|
//! | `nominatim` | OpenStreetMap Nominatim `reverse` | [`ReverseGeocoder`](opendonate_location::ReverseGeocoder) |
//! | `kakao` | Kakao Local keyword search | [`AddressSearch`](opendonate_location::AddressSearch) |

pub mod kakao;
pub mod nominatim;

pub use kakao::KakaoAddressSearch;
pub use nominatim::NominatimReverseGeocoder;
