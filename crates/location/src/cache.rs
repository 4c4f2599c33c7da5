//! Persisted location record with a freshness window.
//!
//! The record lives under a single key of a [`KeyValueStore`]. Loading never
//! fails: a missing, unreadable, inconsistent or stale record reads as `None`.
//! Saving is best-effort; storage failures are logged and dropped.

use crate::error::LocationError;
use crate::model::{DeliveryLocation, LocationStatus};
use bitzy_core::config::LocationConfig;
use bitzy_core::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default storage key.
pub const DEFAULT_CACHE_KEY: &str = "bitzy:location";

/// The persisted form of a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLocationRecord {
    /// Status at resolution time
    pub status: LocationStatus,
    /// Location at resolution time
    pub location: Option<DeliveryLocation>,
    /// Wall-clock time of resolution, milliseconds since the Unix epoch
    pub resolved_at_epoch_millis: i64,
}

impl CachedLocationRecord {
    /// Builds a record stamped with the current wall-clock time.
    pub fn now(status: LocationStatus, location: Option<DeliveryLocation>) -> Self {
        Self {
            status,
            location,
            resolved_at_epoch_millis: now_millis(),
        }
    }

    fn check(&self) -> Result<(), LocationError> {
        match &self.location {
            None if !self.status.allows_missing_location() => Err(LocationError::CacheCorrupt(
                format!("status `{}` without a location", self.status),
            )),
            Some(loc) if !loc.coordinate.is_valid() => Err(LocationError::CacheCorrupt(format!(
                "coordinate out of range: {}",
                loc.coordinate
            ))),
            _ => Ok(()),
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Location cache over a key-value store.
#[derive(Debug)]
pub struct LocationCache<S> {
    store: S,
    key: String,
    ttl: Duration,
}

impl<S: KeyValueStore> LocationCache<S> {
    /// Creates a cache with the default key and freshness window.
    pub fn new(store: S) -> Self {
        Self::with_options(store, DEFAULT_CACHE_KEY, DEFAULT_TTL)
    }

    /// Creates a cache with an explicit key and freshness window.
    pub fn with_options(store: S, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    /// Creates a cache from the `[location]` config section.
    pub fn from_config(store: S, config: &LocationConfig) -> Self {
        Self::with_options(
            store,
            config.cache_key.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    /// The freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored record if present, well-formed and fresh.
    pub fn load(&self) -> Option<CachedLocationRecord> {
        self.load_at(now_millis())
    }

    /// Same as [`load`](Self::load), evaluated at `now_millis`.
    pub fn load_at(&self, now_millis: i64) -> Option<CachedLocationRecord> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Location cache unreadable");
                return None;
            }
        };

        let record = match serde_json::from_str::<CachedLocationRecord>(&raw)
            .map_err(|e| LocationError::CacheCorrupt(e.to_string()))
            .and_then(|record| record.check().map(|()| record))
        {
            Ok(record) => record,
            Err(e) => {
                debug!(key = %self.key, error = %e, "Ignoring cached location");
                return None;
            }
        };

        let ttl_millis = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let age = now_millis.saturating_sub(record.resolved_at_epoch_millis);
        if age < 0 {
            debug!(key = %self.key, age_ms = age, "Cached location is dated in the future");
            return None;
        }
        if age >= ttl_millis {
            debug!(key = %self.key, age_ms = age, "Cached location is stale");
            return None;
        }

        Some(record)
    }

    /// Persists `record`. Failures are logged, never surfaced.
    pub fn save(&self, record: &CachedLocationRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize location record");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json) {
            warn!(key = %self.key, error = %e, "Failed to persist location");
        }
    }

    /// Removes the stored record.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear cached location");
        }
    }
}
