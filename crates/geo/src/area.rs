//! Service area membership.

use crate::{distance_km, Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// A depot coordinate plus the maximum serviceable radius around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    center: Coordinate,
    radius_km: f64,
}

impl ServiceArea {
    /// Creates a service area, validating the center and radius.
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self> {
        if !center.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!("service center {center}")));
        }
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(GeoError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    /// The depot coordinate.
    #[inline]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// The serviceable radius in kilometers.
    #[inline]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Distance from the depot to `point`, in kilometers.
    #[inline]
    pub fn distance_to(&self, point: &Coordinate) -> f64 {
        distance_km(point, &self.center)
    }

    /// See [`is_serviceable`].
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        is_serviceable(point, self)
    }
}

/// True when `point` lies within `area.radius_km` of the depot; the boundary is inclusive.
#[inline]
pub fn is_serviceable(point: &Coordinate, area: &ServiceArea) -> bool {
    distance_km(point, &area.center) <= area.radius_km
}
