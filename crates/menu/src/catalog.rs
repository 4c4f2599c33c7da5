//! JSON catalog of categories, items and combos.

use crate::error::{MenuError, Result};
use crate::item::{Combo, ItemId, MenuCategory, MenuItemRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// The full menu as shipped in a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Categories
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
    /// Individual items
    #[serde(default)]
    pub items: Vec<MenuItemRef>,
    /// Meal deals
    #[serde(default)]
    pub combos: Vec<Combo>,
}

impl Catalog {
    /// Parses and validates catalog JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads and validates a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            items = catalog.items.len(),
            combos = catalog.combos.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Rejects duplicate category ids and duplicate item ids (combos included).
    pub fn validate(&self) -> Result<()> {
        let mut categories = HashSet::new();
        for category in &self.categories {
            if !categories.insert(category.id.as_str()) {
                return Err(MenuError::DuplicateId {
                    kind: "category",
                    id: category.id.to_string(),
                });
            }
        }

        let mut items = HashSet::new();
        let combo_ids: Vec<ItemId> = self.combos.iter().map(Combo::item_id).collect();
        for id in self.items.iter().map(|i| &i.id).chain(&combo_ids) {
            if !items.insert(id.as_str()) {
                return Err(MenuError::DuplicateId {
                    kind: "item",
                    id: id.to_string(),
                });
            }
        }

        for item in &self.items {
            if !categories.contains(item.category_id.as_str()) {
                warn!(item = %item.id, category = %item.category_id, "Item references an unknown category");
            }
        }
        Ok(())
    }

    /// Categories in menu order.
    pub fn sorted_categories(&self) -> Vec<&MenuCategory> {
        let mut categories: Vec<&MenuCategory> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.position);
        categories
    }

    /// Items followed by combos converted to items.
    pub fn all_items(&self) -> Vec<MenuItemRef> {
        self.items
            .iter()
            .cloned()
            .chain(self.combos.iter().map(Combo::to_menu_item))
            .collect()
    }

    /// Looks up an item or a combo (`combo_<id>`) by id.
    pub fn find(&self, id: &str) -> Option<MenuItemRef> {
        self.items
            .iter()
            .find(|i| i.id.as_str() == id)
            .cloned()
            .or_else(|| {
                self.combos
                    .iter()
                    .find(|c| c.item_id().as_str() == id)
                    .map(Combo::to_menu_item)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MenuErrorCode;
    use crate::money::Money;

    const CATALOG: &str = r#"{
        "categories": [
            {"id": "mains", "name": "Mains", "position": 2},
            {"id": "snacks", "name": "Snacks", "position": 1}
        ],
        "items": [
            {"id": "misal", "name": "Misal Pav", "basePrice": {"amount": 12000, "currency": "INR"},
             "categoryId": "snacks", "tags": ["veg", "spicy"], "rating": 4.7},
            {"id": "biryani", "name": "Chicken Biryani", "basePrice": {"amount": 28000, "currency": "INR"},
             "categoryId": "mains", "rating": 4.4}
        ],
        "combos": [
            {"id": "snack-box", "name": "Snack Box", "includes": ["Misal", "Chai"],
             "totalPrice": {"amount": 15000, "currency": "INR"}, "isVeg": true}
        ]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.items.len(), 2);
        assert_eq!(catalog.all_items().len(), 3);
        assert_eq!(catalog.sorted_categories()[0].name, "Snacks");
    }

    #[test]
    fn test_find_item_and_combo() {
        let catalog = Catalog::from_json(CATALOG).unwrap();

        assert_eq!(catalog.find("misal").unwrap().base_price, Money::inr(12_000));
        let combo = catalog.find("combo_snack-box").unwrap();
        assert_eq!(combo.category_id.as_str(), "combo");
        assert!(catalog.find("snack-box").is_none());
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let json = r#"{"items": [
            {"id": "a", "name": "A", "basePrice": {"amount": 1, "currency": "INR"}, "categoryId": "x"},
            {"id": "a", "name": "B", "basePrice": {"amount": 2, "currency": "INR"}, "categoryId": "x"}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert_eq!(err.code(), MenuErrorCode::DuplicateId);
    }

    #[test]
    fn test_combo_id_clash_rejected() {
        let json = r#"{
            "items": [{"id": "combo_a", "name": "A", "basePrice": {"amount": 1, "currency": "INR"}, "categoryId": "x"}],
            "combos": [{"id": "a", "name": "A", "includes": [], "totalPrice": {"amount": 1, "currency": "INR"}}]
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(MenuError::DuplicateId { kind: "item", .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(&path, CATALOG).unwrap();

        assert_eq!(Catalog::load(&path).unwrap().combos.len(), 1);
        assert_eq!(
            Catalog::load(dir.path().join("missing.json")).unwrap_err().code(),
            MenuErrorCode::Io
        );
    }

    #[test]
    fn test_malformed_json() {
        assert_eq!(Catalog::from_json("{").unwrap_err().code(), MenuErrorCode::Parse);
    }
}
