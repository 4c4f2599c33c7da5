//! Menu item, option, category and combo types.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag marking vegetarian items.
pub const VEG_TAG: &str = "veg";

/// Category assigned to combos converted into cart items.
pub const COMBO_CATEGORY: &str = "combo";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Menu item identifier.
    ItemId
);
string_id!(
    /// Menu category identifier.
    CategoryId
);
string_id!(
    /// Menu item option identifier.
    OptionId
);

/// A menu category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    /// Id
    pub id: CategoryId,
    /// Display name
    pub name: String,
    /// Optional blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ordering on the menu page
    #[serde(default)]
    pub position: u32,
}

/// A selectable add-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemOption {
    /// Id
    pub id: OptionId,
    /// Display name
    pub name: String,
    /// Extra cost; shown but not part of cart totals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_delta: Option<Money>,
}

/// Snapshot of a sellable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    /// Id
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Optional blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional stock-keeping code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Price of one unit
    pub base_price: Money,
    /// Owning category
    pub category_id: CategoryId,
    /// Optional image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Orderable right now
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Selectable add-ons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<MenuItemOption>,
    /// Free-form tags (`veg`, `spicy`, `combo`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Rating, nominally 0 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

fn default_available() -> bool {
    true
}

impl MenuItemRef {
    /// Whether the item carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tagged vegetarian.
    pub fn is_veg(&self) -> bool {
        self.has_tag(VEG_TAG)
    }

    /// Rating used for sorting; missing counts as zero.
    pub fn sort_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Rating clamped to `0..=5` for display.
    pub fn display_rating(&self) -> Option<f64> {
        self.rating.filter(|r| r.is_finite()).map(|r| r.clamp(0.0, 5.0))
    }
}

/// A meal deal sold as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    /// Id
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Short labels of the included items
    pub includes: Vec<String>,
    /// Price of the whole combo
    pub total_price: Money,
    /// Vegetarian combo
    #[serde(default)]
    pub is_veg: bool,
    /// Rating, nominally 0 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Combo {
    /// Id of the menu item this combo becomes.
    pub fn item_id(&self) -> ItemId {
        ItemId::new(format!("combo_{}", self.id))
    }

    /// Converts the combo into an item that can go into the cart.
    pub fn to_menu_item(&self) -> MenuItemRef {
        let mut tags = vec![COMBO_CATEGORY.to_string()];
        if self.is_veg {
            tags.push(VEG_TAG.to_string());
        }
        for tag in &self.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }

        MenuItemRef {
            id: self.item_id(),
            name: self.name.clone(),
            description: self
                .description
                .clone()
                .or_else(|| Some(format!("Includes: {}", self.includes.join(", ")))),
            sku: None,
            base_price: self.total_price.clone(),
            category_id: CategoryId::new(COMBO_CATEGORY),
            image_url: self.image_url.clone(),
            is_available: true,
            options: Vec::new(),
            tags,
            rating: self.rating,
        }
    }
}
