//! Center filters and the selection policy.
//!
//! District and neighborhood comparisons are exact and case sensitive.
//! Catalog values and geocoder output are not normalized, so equivalent
//! places spelled differently do not match.
//!
//! All filters preserve catalog order and never fail; no match is an empty
//! list.

use crate::model::DonationCenter;
use opendonate_geo::{within_radius, Coordinate, Nearby};
use serde::Serialize;
use tracing::debug;

/// Which tier of the selection policy produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// District and neighborhood matched exactly
    Exact,
    /// Only a district was given; every center in it
    District,
    /// No exact match; centers within the radius
    Nearby,
}

/// Result of [`select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub tier: MatchTier,
    pub centers: Vec<&'a DonationCenter>,
}

impl Selection<'_> {
    /// True when neither tier found anything
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Centers in `district`.
pub fn by_district<'a>(centers: &'a [DonationCenter], district: &str) -> Vec<&'a DonationCenter> {
    centers.iter().filter(|c| c.district == district).collect()
}

/// Centers in `district` and `neighborhood`.
pub fn by_district_and_neighborhood<'a>(
    centers: &'a [DonationCenter],
    district: &str,
    neighborhood: &str,
) -> Vec<&'a DonationCenter> {
    centers
        .iter()
        .filter(|c| c.district == district && c.neighborhood == neighborhood)
        .collect()
}

/// Centers within `radius_km` of (`lat`, `lng`), boundary included.
pub fn by_proximity(
    centers: &[DonationCenter],
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> Vec<&DonationCenter> {
    within_radius(centers, &Coordinate::new(lat, lng), radius_km)
}

/// Centers listing the category label.
pub fn by_category<'a>(centers: &'a [DonationCenter], category: &str) -> Vec<&'a DonationCenter> {
    centers.iter().filter(|c| c.has_category(category)).collect()
}

/// Centers in `district` listing the category label.
pub fn by_district_and_category<'a>(
    centers: &'a [DonationCenter],
    district: &str,
    category: &str,
) -> Vec<&'a DonationCenter> {
    centers
        .iter()
        .filter(|c| c.district == district && c.has_category(category))
        .collect()
}

/// Category browsing: narrowed to the district when one is known.
pub fn browse_category<'a>(
    centers: &'a [DonationCenter],
    category: &str,
    district: Option<&str>,
) -> Vec<&'a DonationCenter> {
    match district {
        Some(district) => by_district_and_category(centers, district, category),
        None => by_category(centers, category),
    }
}

/// Centers sorted by distance from `origin`, nearest first.
pub fn nearest<'a>(
    centers: &'a [DonationCenter],
    origin: &Coordinate,
    limit: Option<usize>,
) -> Vec<Nearby<'a, DonationCenter>> {
    opendonate_geo::nearest(centers, origin, limit)
}

/// The local tier on its own: centers in `district` and `neighborhood`, or
/// every center in `district` when no neighborhood is given. `None` when
/// nothing matched.
pub fn local_match<'a>(
    centers: &'a [DonationCenter],
    district: &str,
    neighborhood: Option<&str>,
) -> Option<Selection<'a>> {
    let (tier, matched) = match neighborhood {
        Some(neighborhood) => (
            MatchTier::Exact,
            by_district_and_neighborhood(centers, district, neighborhood),
        ),
        None => (MatchTier::District, by_district(centers, district)),
    };
    if matched.is_empty() {
        return None;
    }
    debug!(district, ?neighborhood, matches = matched.len(), "Local match");
    Some(Selection {
        tier,
        centers: matched,
    })
}

/// The proximity tier on its own.
pub fn proximity_match<'a>(
    centers: &'a [DonationCenter],
    origin: &Coordinate,
    radius_km: f64,
) -> Selection<'a> {
    let nearby = by_proximity(centers, origin.latitude, origin.longitude, radius_km);
    debug!(radius_km, matches = nearby.len(), "Proximity match");
    Selection {
        tier: MatchTier::Nearby,
        centers: nearby,
    }
}

/// Exact district + neighborhood match first; when that is empty, every
/// center within `radius_km` of `origin`. The proximity tier is not
/// evaluated when the exact tier has results.
pub fn select<'a>(
    centers: &'a [DonationCenter],
    district: &str,
    neighborhood: &str,
    origin: &Coordinate,
    radius_km: f64,
) -> Selection<'a> {
    local_match(centers, district, Some(neighborhood))
        .unwrap_or_else(|| proximity_match(centers, origin, radius_km))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;
    use opendonate_geo::haversine_distance;
    use proptest::prelude::*;

    fn ids(centers: &[&DonationCenter]) -> Vec<String> {
        centers.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_by_district_preserves_order() {
        let catalog = Catalog::builtin();
        assert_eq!(ids(&by_district(catalog.centers(), "북구")), vec!["5", "6"]);
        assert!(by_district(catalog.centers(), "중구").is_empty());
    }

    #[test]
    fn test_by_district_is_case_and_space_sensitive() {
        let catalog = Catalog::builtin();
        assert!(by_district(catalog.centers(), "강남구 ").is_empty());
        assert!(by_district(catalog.centers(), "서울특별시 강남구").is_empty());
    }

    #[test]
    fn test_by_district_and_neighborhood() {
        let catalog = Catalog::builtin();
        let hits = by_district_and_neighborhood(catalog.centers(), "북구", "운암동");
        assert_eq!(ids(&hits), vec!["6"]);
        assert!(by_district_and_neighborhood(catalog.centers(), "서초구", "역삼동").is_empty());
    }

    #[test]
    fn test_by_proximity_default_radius() {
        let catalog = Catalog::builtin();
        let hits = by_proximity(catalog.centers(), 37.5665, 127.0018, 5.0);
        assert_eq!(ids(&hits), vec!["1", "4"]);

        for center in catalog.centers() {
            let included = hits.iter().any(|h| h.id == center.id);
            let d = haversine_distance(&Coordinate::new(37.5665, 127.0018), &center.coordinate());
            assert_eq!(included, d <= 5.0, "center {} at {d} km", center.id);
        }
    }

    #[test]
    fn test_center_within_zero_radius_of_itself() {
        let catalog = Catalog::builtin();
        for center in catalog.centers() {
            let hits = by_proximity(catalog.centers(), center.latitude, center.longitude, 0.0);
            assert!(hits.iter().any(|h| h.id == center.id));
        }
    }

    #[test]
    fn test_by_category() {
        let catalog = Catalog::builtin();
        assert_eq!(ids(&by_category(catalog.centers(), "환경")), vec!["2", "6"]);
        assert_eq!(
            ids(&by_district_and_category(catalog.centers(), "북구", "환경")),
            vec!["6"]
        );
    }

    #[test]
    fn test_browse_category() {
        let catalog = Catalog::builtin();
        assert_eq!(
            ids(&browse_category(catalog.centers(), "어르신", Some("북구"))),
            vec!["5"]
        );
        assert_eq!(
            ids(&browse_category(catalog.centers(), "어르신", None)),
            vec!["1", "5"]
        );
    }

    #[test]
    fn test_select_exact_tier() {
        let catalog = Catalog::builtin();
        // Origin far away: proximity would be empty, exact must win.
        let selection = select(
            catalog.centers(),
            "강남구",
            "역삼동",
            &Coordinate::new(35.0, 129.0),
            5.0,
        );
        assert_eq!(selection.tier, MatchTier::Exact);
        assert_eq!(ids(&selection.centers), vec!["1"]);
    }

    #[test]
    fn test_select_falls_back_to_proximity() {
        let catalog = Catalog::builtin();
        let selection = select(
            catalog.centers(),
            "알 수 없음",
            "알 수 없음",
            &Coordinate::new(35.1650, 126.8600),
            5.0,
        );
        assert_eq!(selection.tier, MatchTier::Nearby);
        assert_eq!(ids(&selection.centers), vec!["5", "6"]);
    }

    #[test]
    fn test_select_nothing() {
        let catalog = Catalog::builtin();
        let selection = select(catalog.centers(), "해운대구", "우동", &Coordinate::new(35.16, 129.16), 5.0);
        assert_eq!(selection.tier, MatchTier::Nearby);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_local_match_district_only() {
        let catalog = Catalog::builtin();
        let selection = local_match(catalog.centers(), "북구", None).unwrap();
        assert_eq!(selection.tier, MatchTier::District);
        assert_eq!(ids(&selection.centers), vec!["5", "6"]);
    }

    #[test]
    fn test_local_match_empty_is_none() {
        let catalog = Catalog::builtin();
        assert!(local_match(catalog.centers(), "해운대구", None).is_none());
        assert!(local_match(catalog.centers(), "북구", Some("역삼동")).is_none());
        assert!(local_match(catalog.centers(), "북구", Some("")).is_none());
    }

    #[test]
    fn test_nearest_with_limit() {
        let catalog = Catalog::builtin();
        let ranked = nearest(catalog.centers(), &Coordinate::new(37.5665, 127.0018), Some(3));
        let ranked_ids: Vec<&str> = ranked.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(ranked_ids, vec!["1", "4", "3"]);
        assert_eq!(ranked[0].distance_km, 0.0);
    }

    fn district() -> impl Strategy<Value = String> {
        prop_oneof![Just("강남구"), Just("북구"), Just("중구")].prop_map(String::from)
    }

    fn neighborhood() -> impl Strategy<Value = String> {
        prop_oneof![Just("역삼동"), Just("용봉동"), Just("운암동")].prop_map(String::from)
    }

    fn arb_center() -> impl Strategy<Value = DonationCenter> {
        (district(), neighborhood(), 35.0f64..38.0, 126.0f64..128.0).prop_map(
            |(district, neighborhood, latitude, longitude)| DonationCenter {
                id: String::new(),
                name: String::new(),
                address: String::new(),
                district,
                neighborhood,
                latitude,
                longitude,
                description: String::new(),
                image_url: String::new(),
                categories: Vec::new(),
                latest_post: None,
            },
        )
    }

    fn arb_centers() -> impl Strategy<Value = Vec<DonationCenter>> {
        proptest::collection::vec(arb_center(), 0..12).prop_map(|mut centers| {
            for (i, c) in centers.iter_mut().enumerate() {
                c.id = i.to_string();
            }
            centers
        })
    }

    proptest! {
        #[test]
        fn prop_combined_filter_equals_composition(
            centers in arb_centers(),
            d in district(),
            n in neighborhood(),
        ) {
            let combined = by_district_and_neighborhood(&centers, &d, &n);
            let composed: Vec<&DonationCenter> = by_district(&centers, &d)
                .into_iter()
                .filter(|c| c.neighborhood == n)
                .collect();
            prop_assert_eq!(ids(&combined), ids(&composed));
        }

        #[test]
        fn prop_select_policy(
            centers in arb_centers(),
            d in district(),
            n in neighborhood(),
            lat in 35.0f64..38.0,
            lng in 126.0f64..128.0,
            radius in 0.0f64..100.0,
        ) {
            let origin = Coordinate::new(lat, lng);
            let selection = select(&centers, &d, &n, &origin, radius);
            let exact = by_district_and_neighborhood(&centers, &d, &n);

            if exact.is_empty() {
                prop_assert_eq!(selection.tier, MatchTier::Nearby);
                prop_assert_eq!(ids(&selection.centers), ids(&by_proximity(&centers, lat, lng, radius)));
            } else {
                prop_assert_eq!(selection.tier, MatchTier::Exact);
                prop_assert_eq!(ids(&selection.centers), ids(&exact));
            }
        }
    }
}
