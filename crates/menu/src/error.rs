//! Error types for the menu crate.

use thiserror::Error;

/// Result type alias for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors raised while loading a catalog or parsing filter input.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog JSON is malformed
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share an id
    #[error("Duplicate {kind} id `{id}`")]
    DuplicateId {
        /// "item" or "category"
        kind: &'static str,
        /// The repeated id
        id: String,
    },

    /// Unrecognised sort key
    #[error("Unknown sort key `{0}` (expected price-asc, price-desc, rating-asc, rating-desc, name-asc or name-desc)")]
    UnknownSortKey(String),
}

/// Error code for integration with bitzy-core error handling.
/// Range: 12xxx for menu errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuErrorCode {
    /// Catalog unreadable
    Io = 12001,
    /// Catalog malformed
    Parse = 12002,
    /// Duplicate id
    DuplicateId = 12003,
    /// Bad sort key
    UnknownSortKey = 12004,
}

impl MenuError {
    /// Returns the error code for this error.
    pub fn code(&self) -> MenuErrorCode {
        match self {
            MenuError::Io(_) => MenuErrorCode::Io,
            MenuError::Parse(_) => MenuErrorCode::Parse,
            MenuError::DuplicateId { .. } => MenuErrorCode::DuplicateId,
            MenuError::UnknownSortKey(_) => MenuErrorCode::UnknownSortKey,
        }
    }
}
