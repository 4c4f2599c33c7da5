//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Pure and total: callers validate coordinate ranges beforehand.
///
/// # Example
/// ```
/// use bitzy_geo::{distance_km, Coordinate};
///
/// let akurdi = Coordinate::new(18.6400, 73.8040);
/// let mumbai = Coordinate::new(19.0760, 72.8777);
///
/// let distance = distance_km(&akurdi, &mumbai);
/// assert!((distance - 108.9).abs() < 1.0);
/// ```
#[inline]
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1.0
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AKURDI: Coordinate = Coordinate { latitude: 18.6400, longitude: 73.8040 };
    const MUMBAI: Coordinate = Coordinate { latitude: 19.0760, longitude: 72.8777 };
    const BERLIN: Coordinate = Coordinate { latitude: 52.5200, longitude: 13.4050 };
    const PARIS: Coordinate = Coordinate { latitude: 48.8566, longitude: 2.3522 };

    #[test]
    fn test_berlin_to_paris() {
        let distance = distance_km(&BERLIN, &PARIS);
        // Expected: ~878 km
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {distance}");
    }

    #[test]
    fn test_akurdi_to_mumbai() {
        let distance = distance_km(&AKURDI, &MUMBAI);
        assert!((distance - 108.9).abs() < 1.0, "Akurdi-Mumbai: {distance}");
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(distance_km(&AKURDI, &AKURDI), 0.0);
    }

    #[test]
    fn test_antipodes_half_circumference() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance_km(&a, &b) - half).abs() < 1e-6);
    }

    #[test]
    fn test_near_antipodal_pairs_are_finite() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        for lat in -90..=90 {
            for step in 0..=720 {
                let a = Coordinate::new(f64::from(lat), 0.0);
                let b = Coordinate::new(-f64::from(lat), f64::from(step) * 0.5 - 180.0);
                let there = distance_km(&a, &b);
                let back = distance_km(&b, &a);
                assert!(there.is_finite(), "{a:?} -> {b:?}: {there}");
                assert!(there <= half + 1e-6, "{a:?} -> {b:?}: {there}");
                assert!((there - back).abs() < 1e-6, "{a:?} <-> {b:?}: {there} vs {back}");
            }
        }
    }

    #[test]
    fn test_antipodes_off_the_equator() {
        let a = Coordinate::new(-82.0, 0.0);
        let b = Coordinate::new(82.0, -180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance_km(&a, &b) - half).abs() < 1e-3);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_identity_is_zero(a in coordinate()) {
            prop_assert_eq!(distance_km(&a, &a), 0.0);
        }

        #[test]
        fn prop_symmetric(a in coordinate(), b in coordinate()) {
            prop_assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-6);
        }

        #[test]
        fn prop_bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let d = distance_km(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
