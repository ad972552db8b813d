// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance in statute miles.

use crate::models::Coordinate;

/// Conversion factor from nautical miles to statute miles.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.15077945;

/// Distance between two coordinates using the spherical law of cosines.
///
/// One nautical mile is one minute of arc, so the central angle in degrees
/// times 60 gives nautical miles. Identical points are exactly zero apart.
/// Otherwise the cosine is clamped to [-1, 1]: for nearly coincident points
/// rounding can push it just above 1 and `acos` would return NaN.
#[inline]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    let nautical_miles = 60.0 * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// True if `b` lies within `radius` statute miles of `a`.
#[inline]
pub fn is_near(a: Coordinate, b: Coordinate, radius: f64) -> bool {
    distance(a, b) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_latitude() {
        // 60 nautical miles per degree
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_points_are_zero() {
        let p = Coordinate::new(37.422, -122.084);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_nearly_coincident_points_are_not_nan() {
        let a = Coordinate::new(37.422, -122.084);
        let b = Coordinate::new(37.422, -122.084 + 1e-12);
        let d = distance(a, b);
        assert!(!d.is_nan());
        assert!(d < 1e-3);
    }

    #[test]
    fn test_antipodes() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        let half_circumference = 180.0 * 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_is_near_boundary_is_inclusive() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance(a, b);
        assert!(is_near(a, b, d));
        assert!(!is_near(a, b, d - 1e-6));
    }
}
