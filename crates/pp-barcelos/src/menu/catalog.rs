use serde::{Deserialize, Serialize};

use super::{HeatLevel, MenuCategory, MenuItem};

/// The full menu: categories in source order, each owning its items.
///
/// Lookups that do not match return empty results rather than errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu(Vec<MenuCategory>);

impl Menu {
    pub fn new(categories: Vec<MenuCategory>) -> Self {
        Self(categories)
    }

    /// Categories by ascending `order`. Equal orders keep source order.
    pub fn categories(&self) -> Vec<&MenuCategory> {
        let mut categories: Vec<&MenuCategory> = self.0.iter().collect();
        categories.sort_by_key(|category| category.order);
        categories
    }

    pub fn category(&self, id: &str) -> Option<&MenuCategory> {
        self.0.iter().find(|category| category.id == id)
    }

    pub fn items_in(&self, category_id: &str) -> Vec<&MenuItem> {
        self.category(category_id)
            .map(|category| category.items.iter().collect())
            .unwrap_or_default()
    }

    /// Every item, category source order first, then item order.
    pub fn items(&self) -> Vec<&MenuItem> {
        self.iter_items().collect()
    }

    pub fn popular(&self) -> Vec<&MenuItem> {
        self.iter_items().filter(|item| item.is_popular).collect()
    }

    pub fn new_items(&self) -> Vec<&MenuItem> {
        self.iter_items().filter(|item| item.is_new).collect()
    }

    pub fn vegetarian(&self) -> Vec<&MenuItem> {
        self.iter_items().filter(|item| item.is_veg).collect()
    }

    pub fn by_heat_level(&self, level: HeatLevel) -> Vec<&MenuItem> {
        self.iter_items()
            .filter(|item| item.heat_level == Some(level))
            .collect()
    }

    /// An empty or blank query matches every item.
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items();
        }
        self.iter_items().filter(|item| item.matches(&needle)).collect()
    }

    /// Inclusive on both ends.
    pub fn by_price_range(&self, min: u32, max: u32) -> Vec<&MenuItem> {
        self.iter_items()
            .filter(|item| (min..=max).contains(&item.price))
            .collect()
    }

    fn iter_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.0.iter().flat_map(|category| category.items.iter())
    }
}
