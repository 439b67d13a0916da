//! Radius filtering and nearest-first ranking.
//!
//! Works over any item implementing [`Located`]. Distance calculation runs
//! on rayon when the `parallel` feature is enabled; results keep the input
//! order either way.

use crate::{haversine_distance, Coordinate};

/// Radius applied when a caller does not pick one, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Anything with a fixed position.
pub trait Located {
    /// Position of the item.
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

/// An item paired with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'a, T> {
    /// The matched item
    pub item: &'a T,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

/// Distance from `origin` to every item, in input order.
pub fn distances<T: Located + Sync>(items: &[T], origin: &Coordinate) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| haversine_distance(origin, &item.coordinate()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| haversine_distance(origin, &item.coordinate()))
            .collect()
    }
}

/// Items whose distance from `origin` is at most `radius_km`.
///
/// Inclusion depends only on the item's coordinate, so items at the same
/// position are always kept or dropped together. Input order is preserved.
///
/// ```
/// use opendonate_geo::{within_radius, Coordinate};
///
/// let points = [Coordinate::new(37.5665, 127.0018), Coordinate::new(35.1595, 126.8526)];
/// let hits = within_radius(&points, &Coordinate::new(37.5665, 127.0018), 5.0);
/// assert_eq!(hits.len(), 1);
/// ```
pub fn within_radius<'a, T: Located + Sync>(
    items: &'a [T],
    origin: &Coordinate,
    radius_km: f64,
) -> Vec<&'a T> {
    items
        .iter()
        .zip(distances(items, origin))
        .filter(|(_, d)| *d <= radius_km)
        .map(|(item, _)| item)
        .collect()
}

/// Items sorted closest first, optionally truncated to `limit`.
///
/// Ties keep their input order.
pub fn nearest<'a, T: Located + Sync>(
    items: &'a [T],
    origin: &Coordinate,
    limit: Option<usize>,
) -> Vec<Nearby<'a, T>> {
    let mut ranked: Vec<Nearby<'a, T>> = items
        .iter()
        .zip(distances(items, origin))
        .map(|(item, distance_km)| Nearby { item, distance_km })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if let Some(max) = limit {
        ranked.truncate(max);
    }

    ranked
}
