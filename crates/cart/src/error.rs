//! Error types for the cart crate.

use thiserror::Error;

/// Result type alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

/// Rejected cart mutations. A rejected mutation leaves the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Lines are added with at least one unit
    #[error("Invalid quantity {0}: a line needs at least one unit")]
    InvalidQuantity(u32),

    /// Item priced in a different currency than the cart
    #[error("Item `{item}` is priced in {found}, but the cart uses {expected}")]
    CurrencyMismatch {
        /// Offending item id
        item: String,
        /// Item currency
        found: String,
        /// Cart currency
        expected: String,
    },

    /// Totals would not fit in the minor-unit integer
    #[error("Cart total overflows")]
    AmountOverflow,
}

/// Error code for integration with bitzy-core error handling.
/// Range: 13xxx for cart errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartErrorCode {
    /// Quantity below one
    InvalidQuantity = 13001,
    /// Mixed currencies
    CurrencyMismatch = 13002,
    /// Arithmetic overflow
    AmountOverflow = 13003,
}

impl CartError {
    /// Returns the error code for this error.
    pub fn code(&self) -> CartErrorCode {
        match self {
            CartError::InvalidQuantity(_) => CartErrorCode::InvalidQuantity,
            CartError::CurrencyMismatch { .. } => CartErrorCode::CurrencyMismatch,
            CartError::AmountOverflow => CartErrorCode::AmountOverflow,
        }
    }
}
