//! Collaborator ports used by the resolver and the place search.
//!
//! Network-backed implementations live in `bitzy-api-client`; the fixed and
//! offline implementations here serve the CLI and tests.

use crate::error::{LocationError, Result};
use bitzy_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Source of the device's own position.
pub trait DeviceLocator {
    /// Asks the platform for the current position.
    ///
    /// Fails with [`LocationError::GeolocationDenied`] on refusal and
    /// [`LocationError::GeolocationUnavailable`] when no position can be produced.
    fn current_position(&self) -> impl Future<Output = Result<Coordinate>> + Send;
}

/// Coarse location from the network address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    /// Approximate position
    pub coordinate: Coordinate,
    /// City name, or a placeholder when the lookup had none
    pub city: String,
}

/// IP-based approximate location lookup.
pub trait IpLocator {
    /// `Ok(None)` when the lookup succeeded but carried no coordinates.
    fn locate(&self) -> impl Future<Output = Result<Option<IpLocation>>> + Send;
}

/// Coordinate to short place name.
pub trait ReverseGeocoder {
    /// Resolves a display name for `coordinate`.
    fn reverse_geocode(&self, coordinate: Coordinate) -> impl Future<Output = Result<String>> + Send;
}

/// Address parts of a search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    /// Suburb
    pub suburb: Option<String>,
    /// Neighbourhood
    pub neighbourhood: Option<String>,
    /// City
    pub city: Option<String>,
    /// Town
    pub town: Option<String>,
    /// Village
    pub village: Option<String>,
    /// State
    pub state: Option<String>,
    /// Country
    pub country: Option<String>,
}

impl AddressParts {
    /// City, else town, else `fallback`.
    pub fn locality_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let non_empty = |s: &&str| !s.is_empty();
        self.city
            .as_deref()
            .filter(non_empty)
            .or_else(|| self.town.as_deref().filter(non_empty))
            .unwrap_or(fallback)
    }
}

/// A candidate returned by forward place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Short name (first component of the display name)
    pub name: String,
    /// Full display name
    pub display_name: String,
    /// Position
    pub coordinate: Coordinate,
    /// Address parts
    pub address: AddressParts,
}

/// Free-text place search.
pub trait PlaceSearch {
    /// Searches places matching `query`.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<PlaceCandidate>>> + Send;
}

/// Device locator with a preset outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedDevice {
    /// Always reports this position
    Position(Coordinate),
    /// Always reports a permission refusal
    Denied,
    /// Reports that no location capability exists
    Unsupported,
}

impl DeviceLocator for FixedDevice {
    async fn current_position(&self) -> Result<Coordinate> {
        match *self {
            Self::Position(coordinate) => Ok(coordinate),
            Self::Denied => Err(LocationError::GeolocationDenied),
            Self::Unsupported => Err(LocationError::GeolocationUnavailable(
                "no location capability".into(),
            )),
        }
    }
}

/// Network-free stand-in for every lookup collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl IpLocator for Offline {
    async fn locate(&self) -> Result<Option<IpLocation>> {
        Ok(None)
    }
}

impl ReverseGeocoder for Offline {
    async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<String> {
        Err(LocationError::GeocodingFailure("offline".into()))
    }
}

impl PlaceSearch for Offline {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>> {
        Ok(Vec::new())
    }
}
