//! Configuration for the geocoding client
//!
//! Built from the `[geocoding]` and `[search]` config sections, with
//! environment overrides for the endpoints and timeout.

use crate::error::{ApiError, ApiResult};
use bitzy_core::config::{GeocodingConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Overrides the Nominatim base URL
pub const NOMINATIM_URL_ENV: &str = "BITZY_NOMINATIM_URL";
/// Overrides the IP geolocation URL
pub const IP_GEOLOCATION_URL_ENV: &str = "BITZY_IP_GEOLOCATION_URL";
/// Overrides the request timeout, in seconds
pub const TIMEOUT_SECS_ENV: &str = "BITZY_TIMEOUT_SECS";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Nominatim base URL (reverse and search)
    pub nominatim_url: String,
    /// IP geolocation endpoint
    pub ip_geolocation_url: String,
    /// Sent as `User-Agent` on every request
    pub user_agent: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// `lon_min,lat_min,lon_max,lat_max` bounding forward search
    pub viewbox: String,
    /// Maximum search results
    pub limit: usize,
    /// Shorter queries are answered with no results, without a request
    pub min_query_chars: usize,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_sections(&GeocodingConfig::default(), &SearchConfig::default())
    }
}

impl ClientConfig {
    /// Create configuration from the loaded config sections
    #[must_use]
    pub fn from_sections(geocoding: &GeocodingConfig, search: &SearchConfig) -> Self {
        Self {
            nominatim_url: geocoding.nominatim_url.clone(),
            ip_geolocation_url: geocoding.ip_geolocation_url.clone(),
            user_agent: geocoding.user_agent.clone(),
            timeout: Duration::from_secs(geocoding.timeout_secs),
            viewbox: search.viewbox.clone(),
            limit: search.limit,
            min_query_chars: search.min_query_chars,
        }
    }

    /// Create configuration from defaults plus environment variables
    ///
    /// Reads the following environment variables:
    /// - `BITZY_NOMINATIM_URL`: Nominatim base URL
    /// - `BITZY_IP_GEOLOCATION_URL`: IP geolocation endpoint
    /// - `BITZY_TIMEOUT_SECS`: Request timeout in seconds
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(NOMINATIM_URL_ENV) {
            self.nominatim_url = url;
        }
        if let Ok(url) = env::var(IP_GEOLOCATION_URL_ENV) {
            self.ip_geolocation_url = url;
        }
        if let Some(timeout) = env::var(TIMEOUT_SECS_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
        {
            self.timeout = timeout;
        }
        self
    }

    /// Builder-style method to set the Nominatim URL
    #[must_use]
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    /// Builder-style method to set the IP geolocation URL
    #[must_use]
    pub fn with_ip_geolocation_url(mut self, url: impl Into<String>) -> Self {
        self.ip_geolocation_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [
            ("nominatim_url", &self.nominatim_url),
            ("ip_geolocation_url", &self.ip_geolocation_url),
        ] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{name} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::InvalidUrl(format!(
                    "{name} must start with http:// or https://, got `{url}`"
                )));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.nominatim_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.ip_geolocation_url, "https://ipapi.co/json/");
        assert_eq!(config.user_agent, "BitzyApp/1.0");
        assert_eq!(config.viewbox, "73.6,18.4,74.0,18.8");
        assert_eq!(config.limit, 10);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_nominatim_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.nominatim_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());

        let invalid = ClientConfig::default().with_nominatim_url("");
        assert!(matches!(invalid.validate(), Err(ApiError::Config(_))));

        let invalid = ClientConfig::default().with_ip_geolocation_url("ftp://example.com");
        assert!(matches!(invalid.validate(), Err(ApiError::InvalidUrl(_))));

        let invalid = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(invalid.validate().is_err());
    }
}
