//! Configuration schema definitions
//!
//! Every section and field has a default, so an empty file (or no file)
//! yields the stock storefront configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub service_area: ServiceAreaConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub cart: CartConfig,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl ConfigSchema {
    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.service_area.validate()?;
        self.location.validate()?;
        self.search.validate()?;
        self.cart.validate()?;
        Ok(())
    }
}

/// Depot coordinate and serviceable radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaConfig {
    /// Depot latitude in degrees
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    /// Depot longitude in degrees
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    /// Maximum delivery distance in kilometers (inclusive)
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

impl Default for ServiceAreaConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            radius_km: default_radius_km(),
        }
    }
}

impl ServiceAreaConfig {
    fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.center_latitude) {
            return Err(Error::invalid_config(
                "service_area.center_latitude",
                format!("{} is outside -90..=90", self.center_latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&self.center_longitude) {
            return Err(Error::invalid_config(
                "service_area.center_longitude",
                format!("{} is outside -180..=180", self.center_longitude),
            ));
        }
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(Error::invalid_config(
                "service_area.radius_km",
                "must be a positive number of kilometers",
            ));
        }
        Ok(())
    }
}

// Akurdi, Pimpri-Chinchwad
fn default_center_latitude() -> f64 {
    18.6400
}

fn default_center_longitude() -> f64 {
    73.8040
}

fn default_radius_km() -> f64 {
    10.0
}

/// Location resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Store key holding the cached location record
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Cached records at least this old are ignored
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Bounded wait for the device location capability
    #[serde(default = "default_device_timeout_secs")]
    pub device_timeout_secs: u64,

    /// Name of the fallback location offered after denial
    #[serde(default = "default_location_name")]
    pub default_name: String,

    /// Area label of the fallback location
    #[serde(default = "default_location_area")]
    pub default_area: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            cache_key: default_cache_key(),
            cache_ttl_secs: default_cache_ttl_secs(),
            device_timeout_secs: default_device_timeout_secs(),
            default_name: default_location_name(),
            default_area: default_location_area(),
        }
    }
}

impl LocationConfig {
    fn validate(&self) -> Result<()> {
        if self.cache_key.trim().is_empty() {
            return Err(Error::invalid_config("location.cache_key", "must not be empty"));
        }
        if self.device_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "location.device_timeout_secs",
                "must be at least one second",
            ));
        }
        Ok(())
    }
}

fn default_cache_key() -> String {
    "bitzy:location".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

fn default_device_timeout_secs() -> u64 {
    8
}

fn default_location_name() -> String {
    "Akurdi".to_string()
}

fn default_location_area() -> String {
    "Pimpri-Chinchwad, Pune".to_string()
}

/// Minimum debounce allowed for search-as-you-type
pub const MIN_DEBOUNCE_MS: u64 = 500;

/// Place search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Input quiescence required before a query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shorter trimmed queries return no candidates
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of candidates requested
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// Bounding box as `lon_min,lat_min,lon_max,lat_max`
    #[serde(default = "default_viewbox")]
    pub viewbox: String,

    /// Area label used when a candidate carries no city or town
    #[serde(default = "default_fallback_area")]
    pub fallback_area: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            limit: default_search_limit(),
            viewbox: default_viewbox(),
            fallback_area: default_fallback_area(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if self.debounce_ms < MIN_DEBOUNCE_MS {
            return Err(Error::invalid_config(
                "search.debounce_ms",
                format!("{} is below the {MIN_DEBOUNCE_MS} ms minimum", self.debounce_ms),
            ));
        }
        if self.min_query_chars == 0 {
            return Err(Error::invalid_config("search.min_query_chars", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_debounce_ms() -> u64 {
    MIN_DEBOUNCE_MS
}

fn default_min_query_chars() -> usize {
    2
}

fn default_search_limit() -> usize {
    10
}

// Pune region
fn default_viewbox() -> String {
    "73.6,18.4,74.0,18.8".to_string()
}

fn default_fallback_area() -> String {
    "Pune".to_string()
}

/// Third-party geocoding endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim base URL (reverse and search)
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// IP geolocation endpoint returning JSON
    #[serde(default = "default_ip_geolocation_url")]
    pub ip_geolocation_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            ip_geolocation_url: default_ip_geolocation_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_ip_geolocation_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_user_agent() -> String {
    "BitzyApp/1.0".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

/// Durable key-value store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding stored values
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Keep a read-through copy of values in memory
    #[serde(default = "default_true")]
    pub memory_layer: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            memory_layer: true,
        }
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".bitzy"))
        .join("bitzy")
}

fn default_true() -> bool {
    true
}

/// Cart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// ISO 4217 code every cart line must be priced in
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

impl CartConfig {
    fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(Error::invalid_config("cart.currency", "must not be empty"));
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySection {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Also write logs to this file (rotated daily)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.location.cache_ttl_secs, 1800);
        assert_eq!(schema.location.device_timeout_secs, 8);
        assert_eq!(schema.search.debounce_ms, 500);
        assert_eq!(schema.cart.currency, "INR");
    }

    #[test]
    fn test_rejects_short_debounce() {
        let mut schema = ConfigSchema::default();
        schema.search.debounce_ms = 200;
        let err = schema.validate().unwrap_err();
        assert!(err.message.contains("search.debounce_ms"));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut schema = ConfigSchema::default();
        schema.service_area.radius_km = 0.0;
        assert!(schema.validate().is_err());

        schema.service_area.radius_km = f64::NAN;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_rejects_center_out_of_range() {
        let mut schema = ConfigSchema::default();
        schema.service_area.center_latitude = 91.0;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [service_area]
            radius_km = 5.5

            [cart]
            currency = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(schema.service_area.radius_km, 5.5);
        assert_eq!(schema.service_area.center_latitude, 18.6400);
        assert_eq!(schema.cart.currency, "USD");
        assert_eq!(schema.search.min_query_chars, 2);
    }
}
