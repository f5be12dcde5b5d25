#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius filtering by great-circle distance.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Both the distance and the radius are truncated to
//! whole kilometers before comparison, so a record 1.9 km away is inside a
//! 1 km radius. Output keeps the input order; nothing is sorted by
//! distance.

use around_me_amenity_models::{Coordinates, Located};
use geo::Point;
use serde::Serialize;

/// Sphere radius used for distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A record inside the search radius, with its truncated distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nearby<T> {
    /// The matching record.
    #[serde(flatten)]
    pub record: T,
    /// Whole kilometers from the center.
    pub distance_km: u64,
}

/// Converts a position to a `geo` point (`x` = longitude, `y` = latitude).
#[must_use]
pub fn to_point(coordinates: Coordinates) -> Point<f64> {
    Point::new(coordinates.longitude, coordinates.latitude)
}

/// Great-circle distance between two points, in kilometers.
#[must_use]
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let (lat1, lat2) = (a.y().to_radians(), b.y().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `h` just past 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Distance truncated to whole kilometers.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn truncated_km(center: Coordinates, position: Coordinates) -> u64 {
    haversine_km(to_point(center), to_point(position)).trunc() as u64
}

/// Returns the records whose truncated distance from `center` is at most
/// the truncated radius, in input order. Records without coordinates are
/// skipped. A NaN radius matches nothing.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn within_radius<'a, T, I>(records: I, center: Coordinates, radius_km: f64) -> Vec<Nearby<&'a T>>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    if radius_km.is_nan() {
        return Vec::new();
    }
    let limit = radius_km.trunc() as i64;

    let mut considered = 0_usize;
    let found: Vec<Nearby<&T>> = records
        .into_iter()
        .filter_map(|record| {
            let position = record.coordinates()?;
            considered += 1;
            let distance_km = truncated_km(center, position);
            (i64::try_from(distance_km).is_ok_and(|d| d <= limit)).then_some(Nearby {
                record,
                distance_km,
            })
        })
        .collect();

    log::debug!(
        "{} of {considered} located records within {limit} km",
        found.len()
    );
    found
}
