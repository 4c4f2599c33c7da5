//! Catalog filtering and sorting.

use crate::error::MenuError;
use crate::item::{CategoryId, MenuItemRef};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order for the menu listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Cheapest first
    #[default]
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Lowest rated first
    RatingAsc,
    /// Highest rated first
    RatingDesc,
    /// A to Z
    NameAsc,
    /// Z to A
    NameDesc,
}

impl SortKey {
    /// Every key, in menu order.
    pub const ALL: [SortKey; 6] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingAsc,
        SortKey::RatingDesc,
        SortKey::NameAsc,
        SortKey::NameDesc,
    ];

    /// Stable label (`price-asc`).
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }

    fn compare(self, a: &MenuItemRef, b: &MenuItemRef) -> Ordering {
        match self {
            SortKey::PriceAsc => price(a).cmp(&price(b)),
            SortKey::PriceDesc => price(b).cmp(&price(a)),
            SortKey::RatingAsc => a.sort_rating().total_cmp(&b.sort_rating()),
            SortKey::RatingDesc => b.sort_rating().total_cmp(&a.sort_rating()),
            SortKey::NameAsc => name(a).cmp(&name(b)),
            SortKey::NameDesc => name(b).cmp(&name(a)),
        }
    }
}

fn price(item: &MenuItemRef) -> u64 {
    item.base_price.amount_minor_units
}

fn name(item: &MenuItemRef) -> String {
    item.name.to_lowercase()
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MenuError::UnknownSortKey(s.to_string()))
    }
}

/// Filter and sort inputs of the menu page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Keep only this category
    pub category: Option<CategoryId>,
    /// Keep only items tagged `veg`
    pub veg_only: bool,
    /// Keep only orderable items
    pub available_only: bool,
    /// Ordering of the result
    pub sort: SortKey,
}

impl CatalogFilter {
    /// Folds in the global veg-only preference; either switch enables the filter.
    #[must_use]
    pub fn with_global_veg(mut self, veg_only: bool) -> Self {
        self.veg_only |= veg_only;
        self
    }

    /// Filters then sorts `items` into a new list. `items` is left untouched.
    ///
    /// Equal sort keys keep their input order.
    pub fn apply<'a>(&self, items: &'a [MenuItemRef]) -> Vec<&'a MenuItemRef> {
        let mut result: Vec<&MenuItemRef> = items
            .iter()
            .filter(|item| {
                self.category
                    .as_ref()
                    .is_none_or(|category| item.category_id == *category)
            })
            .filter(|item| !self.veg_only || item.is_veg())
            .filter(|item| !self.available_only || item.is_available)
            .collect();

        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

/// Owned-result convenience over [`CatalogFilter::apply`].
pub fn apply(
    items: &[MenuItemRef],
    category: Option<&CategoryId>,
    veg_only: bool,
    available_only: bool,
    sort: SortKey,
) -> Vec<MenuItemRef> {
    let filter = CatalogFilter {
        category: category.cloned(),
        veg_only,
        available_only,
        sort,
    };
    filter.apply(items).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use proptest::prelude::*;

    fn item(id: &str, name: &str, paise: u64, category: &str, veg: bool, rating: Option<f64>) -> MenuItemRef {
        MenuItemRef {
            id: id.into(),
            name: name.to_string(),
            description: None,
            sku: None,
            base_price: Money::inr(paise),
            category_id: category.into(),
            image_url: None,
            is_available: true,
            options: Vec::new(),
            tags: if veg { vec!["veg".to_string()] } else { Vec::new() },
            rating,
        }
    }

    fn menu() -> Vec<MenuItemRef> {
        let mut sold_out = item("kheer", "Kheer", 9_000, "desserts", true, Some(4.1));
        sold_out.is_available = false;
        vec![
            item("misal", "Misal Pav", 12_000, "snacks", true, Some(4.7)),
            item("biryani", "Chicken Biryani", 28_000, "mains", false, Some(4.4)),
            item("paneer", "Paneer Tikka", 22_000, "mains", true, None),
            sold_out,
            item("vada", "vada pav", 3_000, "snacks", true, Some(4.7)),
        ]
    }

    fn ids(items: &[&MenuItemRef]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn test_default_sort_is_price_ascending() {
        let items = menu();
        let out = CatalogFilter::default().apply(&items);
        assert_eq!(ids(&out), ["vada", "kheer", "misal", "paneer", "biryani"]);
    }

    #[test]
    fn test_category_filter() {
        let items = menu();
        let filter = CatalogFilter {
            category: Some("mains".into()),
            sort: SortKey::PriceDesc,
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), ["biryani", "paneer"]);
    }

    #[test]
    fn test_veg_and_available_filters() {
        let items = menu();
        let filter = CatalogFilter {
            veg_only: true,
            available_only: true,
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&items)), ["vada", "misal", "paneer"]);
    }

    #[test]
    fn test_global_veg_preference_enables_filter() {
        let items = menu();
        let filter = CatalogFilter::default().with_global_veg(true);
        assert!(filter.apply(&items).iter().all(|i| i.is_veg()));

        let filter = CatalogFilter { veg_only: true, ..CatalogFilter::default() }.with_global_veg(false);
        assert!(filter.veg_only);
    }

    #[test]
    fn test_rating_missing_counts_as_zero() {
        let items = menu();
        let filter = CatalogFilter { sort: SortKey::RatingAsc, ..CatalogFilter::default() };
        assert_eq!(filter.apply(&items)[0].id.as_str(), "paneer");

        let filter = CatalogFilter { sort: SortKey::RatingDesc, ..CatalogFilter::default() };
        // misal and vada tie at 4.7 and keep input order.
        assert_eq!(ids(&filter.apply(&items))[..2], ["misal", "vada"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let items = menu();
        let filter = CatalogFilter { sort: SortKey::NameAsc, ..CatalogFilter::default() };
        assert_eq!(ids(&filter.apply(&items)), ["biryani", "kheer", "misal", "paneer", "vada"]);

        let filter = CatalogFilter { sort: SortKey::NameDesc, ..CatalogFilter::default() };
        assert_eq!(ids(&filter.apply(&items))[0], "vada");
    }

    #[test]
    fn test_name_ties_are_stable() {
        let items = vec![
            item("second", "Samosa", 2_000, "snacks", true, None),
            item("first", "Samosa", 1_000, "snacks", true, None),
        ];
        let filter = CatalogFilter { sort: SortKey::NameAsc, ..CatalogFilter::default() };
        assert_eq!(ids(&filter.apply(&items)), ["second", "first"]);
    }

    #[test]
    fn test_result_borrows_source_items() {
        let items = menu();
        let out = CatalogFilter::default().apply(&items);
        let source = &items[4];
        assert!(out.iter().any(|i| std::ptr::eq(*i, source)));
    }

    #[test]
    fn test_sort_key_parse_and_display() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
        assert!(matches!("cheapest".parse::<SortKey>(), Err(MenuError::UnknownSortKey(_))));
    }

    #[test]
    fn test_owned_apply() {
        let items = menu();
        let out = apply(&items, Some(&"snacks".into()), false, false, SortKey::PriceDesc);
        assert_eq!(out.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), ["misal", "vada"]);
    }

    fn arb_items() -> impl Strategy<Value = Vec<MenuItemRef>> {
        prop::collection::vec((0u64..5, any::<bool>(), 0u8..3), 0..20).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (price, veg, cat))| {
                    item(&format!("i{i}"), "Same", price * 1_000, &format!("c{cat}"), veg, None)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_source_unchanged(items in arb_items(), veg in any::<bool>(), k in 0usize..6) {
            let before = items.clone();
            let filter = CatalogFilter { veg_only: veg, sort: SortKey::ALL[k], ..CatalogFilter::default() };
            let _ = filter.apply(&items);
            prop_assert_eq!(items, before);
        }

        #[test]
        fn prop_equal_keys_keep_input_order(items in arb_items()) {
            let filter = CatalogFilter { sort: SortKey::PriceAsc, ..CatalogFilter::default() };
            let out = filter.apply(&items);
            let position = |id: &str| items.iter().position(|i| i.id.as_str() == id).unwrap();
            for pair in out.windows(2) {
                if pair[0].base_price == pair[1].base_price {
                    prop_assert!(position(pair[0].id.as_str()) < position(pair[1].id.as_str()));
                }
            }
        }
    }
}
