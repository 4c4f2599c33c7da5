//! Delivery-location handling for the Bitzy storefront.
//!
//! This crate provides:
//! - [`LocationResolver`]: cache, device position, IP lookup and manual override
//! - [`LocationCache`]: the persisted record with a 30-minute freshness window
//! - [`PlaceSearchSession`]: debounced place search annotated with deliverability
//! - Collaborator ports ([`DeviceLocator`], [`IpLocator`], [`ReverseGeocoder`], [`PlaceSearch`])
//!
//! # Example
//!
//! ```
//! use bitzy_core::{config::ConfigSchema, store::MemoryStore};
//! use bitzy_geo::Coordinate;
//! use bitzy_location::{
//!     FixedDevice, LocationCache, LocationResolver, LocationStatus, Offline, ResolverSettings,
//! };
//!
//! # tokio_test::block_on(async {
//! let settings = ResolverSettings::from_config(&ConfigSchema::default())?;
//! let device = FixedDevice::Position(Coordinate::new(18.6298, 73.7997));
//! let cache = LocationCache::new(MemoryStore::new());
//! let resolver = LocationResolver::init(settings, device, Offline, Offline, cache);
//!
//! resolver.start().await;
//! assert_eq!(resolver.status(), LocationStatus::Granted);
//! assert!(resolver.can_deliver());
//! # Ok::<(), bitzy_geo::GeoError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod cache;
mod error;
mod model;
mod providers;
mod resolver;
mod search;

pub use cache::{now_millis, CachedLocationRecord, LocationCache, DEFAULT_CACHE_KEY, DEFAULT_TTL};
pub use error::{LocationError, LocationErrorCode, Result};
pub use model::{DeliveryLocation, LocationState, LocationStatus, UNKNOWN_LOCATION};
pub use providers::{
    AddressParts, DeviceLocator, FixedDevice, IpLocation, IpLocator, Offline, PlaceCandidate,
    PlaceSearch, ReverseGeocoder,
};
pub use resolver::{LocationResolver, ResolverSettings, DEFAULT_DEVICE_TIMEOUT};
pub use search::{CandidateView, PlaceSearchSession, SearchOutcome, SearchSettings};
