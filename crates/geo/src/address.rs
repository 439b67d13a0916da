//! District / neighborhood extraction from Korean address text.
//!
//! Two address shapes reach this module:
//! - Reverse-geocoder display names, comma separated
//!   (`"역삼동, 강남구, 서울특별시, 06234, 대한민국"`)
//! - Plain administrative addresses, space separated
//!   (`"서울특별시 강남구 역삼동 123-45"`)
//!
//! Comma-separated text is split on commas only, so a segment such as
//! `"서울특별시 강남구"` stays whole. Everything else is split on whitespace.

use serde::{Deserialize, Serialize};

/// Sentinel for a district or neighborhood that could not be determined.
pub const UNKNOWN: &str = "알 수 없음";

/// Suffix marking a district (구) segment.
const DISTRICT_MARKER: &str = "구";

/// Suffix marking a metropolitan city (특별시). Segments carrying it are never
/// taken as the district even if they contain the district marker.
const SPECIAL_CITY_MARKER: &str = "특별시";

/// Structured result of resolving an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressParts {
    /// 구 unit, or [`UNKNOWN`]
    pub district: String,
    /// 동 unit, or [`UNKNOWN`]
    pub neighborhood: String,
}

impl AddressParts {
    /// Both fields set to the unknown sentinel.
    pub fn unknown() -> Self {
        Self {
            district: UNKNOWN.to_string(),
            neighborhood: UNKNOWN.to_string(),
        }
    }
}

/// Resolves district and neighborhood from free-text address.
///
/// The first segment containing `구` but not `특별시` is the district and
/// the segment right after it is the neighborhood. Missing pieces resolve to
/// [`UNKNOWN`]; this never fails.
///
/// ```
/// use opendonate_geo::address::{resolve, UNKNOWN};
///
/// let parts = resolve("서울특별시 강남구 역삼동 123-45");
/// assert_eq!(parts.district, "강남구");
/// assert_eq!(parts.neighborhood, "역삼동");
///
/// assert_eq!(resolve("").district, UNKNOWN);
/// ```
pub fn resolve(address: &str) -> AddressParts {
    let segments = segments(address);

    segments
        .iter()
        .position(|s| s.contains(DISTRICT_MARKER) && !s.contains(SPECIAL_CITY_MARKER))
        .map_or_else(AddressParts::unknown, |i| AddressParts {
            district: segments[i].to_string(),
            neighborhood: segments
                .get(i + 1)
                .map_or_else(|| UNKNOWN.to_string(), |s| (*s).to_string()),
        })
}

fn segments(address: &str) -> Vec<&str> {
    if address.contains(',') {
        address
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        address.split_whitespace().collect()
    }
}

/// District label for an address picked from keyword search.
///
/// With at least three space-separated tokens the first two are kept
/// (`"서울특별시 강남구 계림동"` → `"서울특별시 강남구"`); shorter input is
/// returned whole.
pub fn search_district(address: &str) -> String {
    let parts: Vec<&str> = address.split(' ').collect();
    if parts.len() >= 3 {
        format!("{} {}", parts[0], parts[1])
    } else {
        address.to_string()
    }
}

/// Neighborhood label for an address picked from keyword search: the last
/// space-separated token, or empty.
pub fn search_neighborhood(address: &str) -> String {
    address.split(' ').next_back().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_separated() {
        let parts = resolve("서울특별시 강남구 역삼동 123-45");
        assert_eq!(parts.district, "강남구");
        assert_eq!(parts.neighborhood, "역삼동");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve(""), AddressParts::unknown());
        assert_eq!(resolve("   "), AddressParts::unknown());
        assert_eq!(resolve(", ,"), AddressParts::unknown());
    }

    #[test]
    fn test_comma_separated_reverse_geocoder_order() {
        // Display names run from smallest to largest unit, so the segment
        // after the district is the city.
        let parts = resolve("역삼1동, 강남구, 서울특별시, 06234, 대한민국");
        assert_eq!(parts.district, "강남구");
        assert_eq!(parts.neighborhood, "서울특별시");
    }

    #[test]
    fn test_comma_segments_are_not_split_on_spaces() {
        let parts = resolve("대한민국, 광주광역시 북구, 용봉동");
        assert_eq!(parts.district, "광주광역시 북구");
        assert_eq!(parts.neighborhood, "용봉동");
    }

    #[test]
    fn test_special_city_segment_skipped() {
        let parts = resolve("서울특별시구, 마포구, 합정동");
        assert_eq!(parts.district, "마포구");
        assert_eq!(parts.neighborhood, "합정동");
    }

    #[test]
    fn test_district_is_last_segment() {
        let parts = resolve("서울특별시 종로구");
        assert_eq!(parts.district, "종로구");
        assert_eq!(parts.neighborhood, UNKNOWN);
    }

    #[test]
    fn test_no_district_marker() {
        let parts = resolve("주소를 찾을 수 없습니다");
        assert_eq!(parts, AddressParts::unknown());
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(resolve("강남구").neighborhood, UNKNOWN);
        assert_eq!(resolve("역삼동"), AddressParts::unknown());
    }

    #[test]
    fn test_marker_matched_anywhere_in_segment() {
        // 구로동 contains 구 and is taken as a district; no normalization is done.
        let parts = resolve("서울특별시 구로동 12");
        assert_eq!(parts.district, "구로동");
        assert_eq!(parts.neighborhood, "12");
    }

    #[test]
    fn test_search_district() {
        assert_eq!(search_district("서울특별시 강남구 계림동"), "서울특별시 강남구");
        assert_eq!(search_district("서울특별시 강남구"), "서울특별시 강남구");
        assert_eq!(search_district(""), "");
    }

    #[test]
    fn test_search_neighborhood() {
        assert_eq!(search_neighborhood("서울특별시 강남구 계림동"), "계림동");
        assert_eq!(search_neighborhood("계림동"), "계림동");
        assert_eq!(search_neighborhood(""), "");
    }
}
