//! Persisted shopper preferences.

use bitzy_core::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Store key of the preferences record.
pub const PREFS_KEY: &str = "bitzy:prefs";

/// Version of the persisted record layout.
pub const PREFS_VERSION: u32 = 1;

/// Shopper preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Show only vegetarian items everywhere
    pub veg_only: bool,
}

#[derive(Serialize, Deserialize)]
struct PrefsRecord {
    state: Preferences,
    version: u32,
}

/// Reads and writes [`Preferences`] in a key-value store.
#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current preferences; defaults when absent, unreadable or from another version.
    pub fn load(&self) -> Preferences {
        let raw = match self.store.get(PREFS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Preferences::default(),
            Err(e) => {
                debug!(error = %e, "Preferences unreadable");
                return Preferences::default();
            }
        };
        match serde_json::from_str::<PrefsRecord>(&raw) {
            Ok(record) if record.version == PREFS_VERSION => record.state,
            Ok(record) => {
                debug!(version = record.version, "Ignoring preferences from another version");
                Preferences::default()
            }
            Err(e) => {
                debug!(error = %e, "Ignoring malformed preferences");
                Preferences::default()
            }
        }
    }

    /// Persists `prefs`.
    pub fn save(&self, prefs: Preferences) -> bitzy_core::Result<()> {
        let record = PrefsRecord {
            state: prefs,
            version: PREFS_VERSION,
        };
        self.store.set(PREFS_KEY, &serde_json::to_string(&record)?)
    }

    /// Sets the veg-only switch.
    pub fn set_veg_only(&self, veg_only: bool) -> bitzy_core::Result<Preferences> {
        let mut prefs = self.load();
        prefs.veg_only = veg_only;
        self.save(prefs)?;
        Ok(prefs)
    }

    /// Flips the veg-only switch.
    pub fn toggle_veg_only(&self) -> bitzy_core::Result<Preferences> {
        let current = self.load();
        self.set_veg_only(!current.veg_only)
    }
}
