//! Menu model for the Bitzy storefront.
//!
//! - [`Money`] in integer minor units, with [`format_money`]
//! - Item, option, category and combo types
//! - [`Catalog`] loading from JSON
//! - [`CatalogFilter`]: category, veg and availability filters with stable sorting
//! - [`PreferenceStore`]: the persisted veg-only switch
//!
//! # Example
//!
//! ```
//! use bitzy_menu::{Catalog, CatalogFilter, SortKey};
//!
//! let catalog = Catalog::from_json(r#"{"items": [
//!     {"id": "misal", "name": "Misal Pav", "basePrice": {"amount": 12000, "currency": "INR"},
//!      "categoryId": "snacks", "tags": ["veg"]},
//!     {"id": "vada", "name": "Vada Pav", "basePrice": {"amount": 3000, "currency": "INR"},
//!      "categoryId": "snacks", "tags": ["veg"]}
//! ]}"#)?;
//!
//! let filter = CatalogFilter { sort: SortKey::PriceAsc, ..CatalogFilter::default() };
//! let listed = filter.apply(&catalog.items);
//! assert_eq!(listed[0].name, "Vada Pav");
//! assert_eq!(listed[0].base_price.to_string(), "₹30");
//! # Ok::<(), bitzy_menu::MenuError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod catalog;
mod error;
mod filter;
mod item;
mod money;
mod prefs;

pub use catalog::Catalog;
pub use error::{MenuError, MenuErrorCode, Result};
pub use filter::{apply, CatalogFilter, SortKey};
pub use item::{
    CategoryId, Combo, ItemId, MenuCategory, MenuItemOption, MenuItemRef, OptionId, COMBO_CATEGORY,
    VEG_TAG,
};
pub use money::{format_money, Money, DEFAULT_CURRENCY};
pub use prefs::{PreferenceStore, Preferences, PREFS_KEY, PREFS_VERSION};
