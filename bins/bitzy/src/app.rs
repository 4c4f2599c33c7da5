//! Shared command context: configuration, storage and collaborators

use anyhow::{Context, Result};
use bitzy_api_client::{ClientConfig, GeoClient};
use bitzy_core::config::Config;
use bitzy_core::store::{FileStore, KeyValueStore, MemoryStore};
use bitzy_location::ResolverSettings;
use clap::ValueEnum;
use serde::Serialize;
use std::sync::Arc;

/// Storage shared by the resolver cache and preferences
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a command needs from the environment
pub struct App {
    pub config: Config,
    pub format: OutputFormat,
    store: SharedStore,
}

impl App {
    /// Open the configured store, or an in-memory one when `ephemeral`
    pub fn new(config: Config, format: OutputFormat, ephemeral: bool) -> Result<Self> {
        let store: SharedStore = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            let storage = &config.schema.storage;
            let store = FileStore::with_options(&storage.dir, storage.memory_layer)
                .with_context(|| format!("Opening store at {}", storage.dir.display()))?;
            Arc::new(store)
        };
        tracing::debug!(ephemeral, config = ?config.path, "Command context ready");

        Ok(Self {
            config,
            format,
            store,
        })
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn resolver_settings(&self) -> Result<ResolverSettings> {
        Ok(ResolverSettings::from_config(&self.config.schema)?)
    }

    /// HTTP client for geocoding, with environment overrides applied
    pub fn geo_client(&self) -> Result<GeoClient> {
        let schema = &self.config.schema;
        let config = ClientConfig::from_sections(&schema.geocoding, &schema.search).with_env_overrides();
        Ok(GeoClient::with_config(config)?)
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
