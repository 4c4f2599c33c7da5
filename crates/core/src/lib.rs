//! Core utilities for the Bitzy storefront
//!
//! This crate provides shared functionality used by every storefront crate:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//! - **Storage**: Durable key-value store used for caches and preferences
//!
//! # Example
//!
//! ```rust,no_run
//! use bitzy_core::{config::Config, store::{FileStore, KeyValueStore}};
//!
//! let config = Config::load(None)?;
//! let store = FileStore::open(&config.schema.storage.dir)?;
//! store.set("greeting", "hello")?;
//! # Ok::<(), bitzy_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod store;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
}
