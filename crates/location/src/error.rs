//! Error types for location resolution.
//!
//! None of these escape the resolver: each one has a defined degraded
//! continuation (next fallback tier, placeholder name, cache miss).

use std::time::Duration;
use thiserror::Error;

/// Result type alias for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;

/// Failures reported by location collaborators and the cache.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The platform could not produce a position, or has no location capability
    #[error("Device location unavailable: {0}")]
    GeolocationUnavailable(String),

    /// The user refused the location permission
    #[error("Device location permission denied")]
    GeolocationDenied,

    /// No position within the bounded wait
    #[error("Device location timed out after {0:?}")]
    GeolocationTimeout(Duration),

    /// Reverse or forward geocoding failed
    #[error("Geocoding failed: {0}")]
    GeocodingFailure(String),

    /// The stored location record could not be read
    #[error("Cached location unreadable: {0}")]
    CacheCorrupt(String),

    /// A supplied location has an out-of-range coordinate
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

/// Error code for integration with bitzy-core error handling.
/// Range: 11xxx for location errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorCode {
    /// Position unavailable or capability absent
    GeolocationUnavailable = 11001,
    /// Permission refused
    GeolocationDenied = 11002,
    /// Bounded wait elapsed
    GeolocationTimeout = 11003,
    /// Geocoding collaborator failed
    GeocodingFailure = 11004,
    /// Cache record unreadable
    CacheCorrupt = 11005,
    /// Coordinate out of range
    InvalidLocation = 11006,
}

impl LocationError {
    /// Returns the error code for this error.
    pub fn code(&self) -> LocationErrorCode {
        match self {
            Self::GeolocationUnavailable(_) => LocationErrorCode::GeolocationUnavailable,
            Self::GeolocationDenied => LocationErrorCode::GeolocationDenied,
            Self::GeolocationTimeout(_) => LocationErrorCode::GeolocationTimeout,
            Self::GeocodingFailure(_) => LocationErrorCode::GeocodingFailure,
            Self::CacheCorrupt(_) => LocationErrorCode::CacheCorrupt,
            Self::InvalidLocation(_) => LocationErrorCode::InvalidLocation,
        }
    }

    /// Whether the resolution chain may fall through to the IP tier.
    ///
    /// An explicit refusal is respected and never circumvented.
    pub fn allows_ip_fallback(&self) -> bool {
        !matches!(self, Self::GeolocationDenied)
    }
}
