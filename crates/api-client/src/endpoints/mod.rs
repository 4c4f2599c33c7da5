//! Endpoint-specific API implementations
//!
//! | Module | Service | Implements |
//! |--------|---------|------------|
//! | `nominatim` | OpenStreetMap Nominatim `reverse`, `search` | `ReverseGeocoder`, `PlaceSearch` |
//! | `ip` | ipapi-style JSON lookup | `IpLocator` |

pub mod ip;
pub mod nominatim;

pub use ip::IpLookupApi;
pub use nominatim::NominatimApi;
