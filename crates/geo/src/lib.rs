//! Geospatial utilities for the Bitzy storefront.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Service-area (depot + radius) membership checks
//!
//! # Example
//!
//! ```
//! use bitzy_geo::{distance_km, is_serviceable, Coordinate, ServiceArea};
//!
//! let akurdi = Coordinate::new(18.6400, 73.8040);
//! let pimpri = Coordinate::new(18.6298, 73.7997);
//!
//! let area = ServiceArea::new(akurdi, 10.0)?;
//! assert!(distance_km(&pimpri, &akurdi) < 2.0);
//! assert!(is_serviceable(&pimpri, &area));
//! # Ok::<(), bitzy_geo::GeoError>(())
//! ```

mod area;
mod error;
mod haversine;

pub use area::{is_serviceable, ServiceArea};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_km, EARTH_RADIUS_KM};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting values outside the geographic range.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({latitude}, {longitude})")))
        }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(18.6400, 73.8040);
        assert_eq!(coord.latitude, 18.6400);
        assert_eq!(coord.longitude, 73.8040);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(Coordinate::checked(18.64, 73.80).is_ok());
        let err = Coordinate::checked(-95.0, 0.0).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (18.6400, 73.8040).into();
        assert_eq!(coord.longitude, 73.8040);
    }

    #[test]
    fn test_coordinate_serde_field_names() {
        let json = serde_json::to_string(&Coordinate::new(1.5, 2.5)).unwrap();
        assert_eq!(json, r#"{"latitude":1.5,"longitude":2.5}"#);
    }
}
