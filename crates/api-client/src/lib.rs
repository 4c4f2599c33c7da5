//! HTTP collaborators for Bitzy location resolution
//!
//! This crate provides network implementations of the `bitzy-location` ports:
//!
//! - **Reverse geocoding** and **place search** against OpenStreetMap Nominatim
//! - **IP geolocation** against an ipapi-style endpoint
//! - **Environment-based configuration**: override endpoints and timeout
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//!
//! Requests are single attempts with a timeout; there is no retry policy.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitzy_api_client::{ClientConfig, GeoClient};
//! use bitzy_geo::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeoClient::with_config(ClientConfig::from_env())?;
//!
//!     let name = client.nominatim().place_name(Coordinate::new(18.64, 73.804)).await?;
//!     println!("You are in {name}");
//!
//!     for place in client.nominatim().search("Baner").await? {
//!         println!("{} ({})", place.name, place.coordinate);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::GeoClient;
pub use config::ClientConfig;
pub use endpoints::{IpLookupApi, NominatimApi};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::GeoClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{IpLookupApi, NominatimApi};
    pub use crate::error::{ApiError, ApiResult};
}
