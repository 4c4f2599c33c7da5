//! Cart ledger for the Bitzy storefront.
//!
//! # Example
//!
//! ```
//! use bitzy_cart::CartLedger;
//! use bitzy_menu::{MenuItemRef, Money};
//!
//! let thali: MenuItemRef = serde_json::from_str(r#"{
//!     "id": "thali", "name": "Thali", "categoryId": "mains",
//!     "basePrice": {"amount": 18900, "currency": "INR"}
//! }"#)?;
//!
//! let mut cart = CartLedger::default();
//! let line = cart.add_item(thali, 2, Vec::new())?;
//! assert_eq!(cart.total(), &Money::inr(37_800));
//!
//! cart.decrement(line)?;
//! assert_eq!(cart.total(), &Money::inr(18_900));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod ledger;

pub use error::{CartError, CartErrorCode, Result};
pub use ledger::{Cart, CartLedger, CartLine, LineId};
