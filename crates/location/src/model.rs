//! Location status and the delivery location value.

use bitzy_geo::{Coordinate, ServiceArea};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder name used when geocoding yields nothing usable.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Resolution status of the current delivery location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationStatus {
    /// No attempt has completed yet
    #[default]
    Unresolved,
    /// Resolved automatically and inside the service area
    Granted,
    /// Permission refused or every automatic tier failed
    Denied,
    /// Resolved automatically but outside the service area
    OutOfArea,
    /// Chosen explicitly by the user
    Manual,
}

impl LocationStatus {
    /// Stable lowercase label, also used in the persisted record.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::OutOfArea => "out-of-area",
            Self::Manual => "manual",
        }
    }

    /// Statuses that may legitimately carry no location.
    pub fn allows_missing_location(self) -> bool {
        matches!(self, Self::Unresolved | Self::Denied)
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named place the order would be delivered to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLocation {
    /// Short human-readable name ("Akurdi", "Baner")
    pub display_name: String,
    /// Locality or city the place belongs to
    pub area: String,
    /// Position of the place
    pub coordinate: Coordinate,
}

impl DeliveryLocation {
    /// Creates a delivery location.
    pub fn new(display_name: impl Into<String>, area: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            display_name: display_name.into(),
            area: area.into(),
            coordinate,
        }
    }
}

/// Snapshot of the resolver: status plus the optional location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationState {
    /// Current status
    pub status: LocationStatus,
    /// Current location, if any
    pub location: Option<DeliveryLocation>,
}

impl LocationState {
    /// Creates a state snapshot.
    pub fn new(status: LocationStatus, location: Option<DeliveryLocation>) -> Self {
        Self { status, location }
    }

    /// Whether the current location (if any) lies inside `area`.
    pub fn can_deliver(&self, area: &ServiceArea) -> bool {
        self.location
            .as_ref()
            .is_some_and(|loc| area.contains(&loc.coordinate))
    }

    /// Distance from the depot to the current location.
    pub fn distance_km(&self, area: &ServiceArea) -> Option<f64> {
        self.location.as_ref().map(|loc| area.distance_to(&loc.coordinate))
    }

    /// True while the storefront must be hidden behind the location prompt.
    pub fn is_gated(&self) -> bool {
        self.status == LocationStatus::Unresolved
            || (self.status == LocationStatus::Denied && self.location.is_none())
    }

    /// True when a location is shown but no delivery is possible there.
    pub fn needs_advisory(&self, area: &ServiceArea) -> bool {
        !self.is_gated() && self.location.is_some() && !self.can_deliver(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> ServiceArea {
        ServiceArea::new(Coordinate::new(18.6400, 73.8040), 10.0).unwrap()
    }

    fn baner() -> DeliveryLocation {
        DeliveryLocation::new("Baner", "Pune", Coordinate::new(18.5590, 73.7868))
    }

    fn mumbai() -> DeliveryLocation {
        DeliveryLocation::new("Mumbai", "Mumbai", Coordinate::new(19.0760, 72.8777))
    }

    #[test]
    fn test_status_labels_match_serde() {
        for status in [
            LocationStatus::Unresolved,
            LocationStatus::Granted,
            LocationStatus::Denied,
            LocationStatus::OutOfArea,
            LocationStatus::Manual,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_gate_predicate() {
        assert!(LocationState::default().is_gated());
        assert!(LocationState::new(LocationStatus::Denied, None).is_gated());
        assert!(!LocationState::new(LocationStatus::Denied, Some(baner())).is_gated());
        assert!(!LocationState::new(LocationStatus::Granted, Some(baner())).is_gated());
        assert!(!LocationState::new(LocationStatus::OutOfArea, Some(mumbai())).is_gated());
    }

    #[test]
    fn test_can_deliver_follows_location_not_status() {
        // Manual selections are never forced inside the area.
        let state = LocationState::new(LocationStatus::Manual, Some(mumbai()));
        assert!(!state.can_deliver(&area()));
        assert!(state.needs_advisory(&area()));

        let state = LocationState::new(LocationStatus::Manual, Some(baner()));
        assert!(state.can_deliver(&area()));
        assert!(!state.needs_advisory(&area()));
    }

    #[test]
    fn test_no_location_cannot_deliver() {
        let state = LocationState::new(LocationStatus::Denied, None);
        assert!(!state.can_deliver(&area()));
        assert_eq!(state.distance_km(&area()), None);
        assert!(!state.needs_advisory(&area()));
    }

    #[test]
    fn test_delivery_location_json_shape() {
        let json = serde_json::to_value(baner()).unwrap();
        assert_eq!(json["displayName"], "Baner");
        assert_eq!(json["coordinate"]["latitude"], 18.5590);
    }
}
