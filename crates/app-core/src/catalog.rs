//! Line catalog
//!
//! The catalog is the static, read-only collection of categorised lines
//! shipped with the app. It is loaded once at start-up, validated, indexed
//! for lookup by identifier and never mutated afterwards.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use app_platform::{Clock, RandomSource};

use crate::search::{self, SearchParams};

/// Embedded catalog document
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Display name used for lines whose category is not in the catalog
pub const CUSTOM_CATEGORY_NAME: &str = "Custom";

/// Errors that can occur while loading a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Document is not valid JSON or has the wrong shape
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Two items share an identifier
    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),

    /// Two categories share an identifier
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    /// An item has blank text
    #[error("Item {0} has empty text")]
    EmptyText(String),

    /// An item references a category that does not exist
    #[error("Item {item} references unknown category {category}")]
    UnknownCategory {
        /// Item identifier
        item: String,
        /// Missing category identifier
        category: String,
    },
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A line category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier (e.g., "nerdy")
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon tag understood by the presentation layer
    pub icon: String,
    /// Short description
    pub description: String,
}

/// A line in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Item identifier
    pub id: String,
    /// Line text
    pub text: String,
    /// Category identifier
    pub category_id: String,
    /// Popularity rating (0.0 - 5.0)
    pub rating: f64,
    /// Whether the line is featured on the home screen
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
}

/// Static, read-only catalog of lines
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating identifiers and references
    pub fn new(categories: Vec<Category>, items: Vec<CatalogItem>) -> Result<Self> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if item.text.trim().is_empty() {
                return Err(CatalogError::EmptyText(item.id.clone()));
            }
            if !category_ids.contains(item.category_id.as_str()) {
                return Err(CatalogError::UnknownCategory {
                    item: item.id.clone(),
                    category: item.category_id.clone(),
                });
            }
            if index.insert(item.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self { categories, items, index })
    }

    /// Parse a catalog document (`{"categories": [...], "items": [...]}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.categories, document.items)
    }

    /// Load the catalog shipped with the app
    pub fn builtin() -> Result<Self> {
        let catalog = Self::from_json(BUILTIN_CATALOG)?;
        tracing::debug!(
            items = catalog.len(),
            categories = catalog.categories.len(),
            "Loaded built-in catalog"
        );
        Ok(catalog)
    }

    /// All categories in display order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Display name of a category, if it exists
    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.category(id).map(|category| category.name.as_str())
    }

    /// Display name of a category, or "Custom" for unknown ids
    pub fn display_category_name(&self, id: &str) -> &str {
        self.category_name(id).unwrap_or(CUSTOM_CATEGORY_NAME)
    }

    /// All items in catalog order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by identifier
    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    /// Check if an identifier belongs to the catalog
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Items in one category, in catalog order
    pub fn by_category(&self, category_id: &str) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.category_id == category_id).collect()
    }

    /// Featured items, in catalog order
    pub fn featured(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.is_featured).collect()
    }

    /// Deterministic item for a calendar date
    ///
    /// The date is folded into `year * 10000 + month * 100 + day` and reduced
    /// modulo the catalog size, so the pick is stable for the whole day.
    pub fn item_of_the_day(&self, date: NaiveDate) -> Option<&CatalogItem> {
        if self.items.is_empty() {
            return None;
        }
        let index = day_seed(date).rem_euclid(self.items.len() as i64) as usize;
        self.items.get(index)
    }

    /// Item of the day for the clock's local date
    pub fn item_of_the_day_now(&self, clock: &dyn Clock) -> Option<&CatalogItem> {
        self.item_of_the_day(clock.local_date())
    }

    /// Uniformly random item
    pub fn random_item(&self, rng: &mut dyn RandomSource) -> Option<&CatalogItem> {
        let upper = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        self.items.get(rng.next_below(upper) as usize)
    }

    /// Case-insensitive text search
    pub fn search(&self, params: &SearchParams) -> Vec<&CatalogItem> {
        search::search_items(&self.items, params)
    }
}

/// Seed for the item of the day
pub fn day_seed(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_platform::{ManualClock, SequenceRandom};
    use chrono::{TimeZone, Utc};

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            icon: "heart".to_string(),
            description: String::new(),
        }
    }

    fn item(id: &str, category_id: &str, featured: bool) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            text: format!("line {id}"),
            category_id: category_id.to_string(),
            rating: 4.0,
            is_featured: featured,
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::new(
            vec![category("funny"), category("sweet")],
            vec![
                item("1", "funny", true),
                item("2", "sweet", false),
                item("3", "funny", false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.len(), 80);
        assert!(!catalog.featured().is_empty());
        for category in catalog.categories() {
            assert!(!catalog.by_category(&category.id).is_empty(), "{} is empty", category.id);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = small_catalog();
        assert_eq!(catalog.item("2").unwrap().category_id, "sweet");
        assert!(catalog.item("99").is_none());
        assert!(catalog.contains("3"));
    }

    #[test]
    fn test_filter_by_category_and_featured() {
        let catalog = small_catalog();
        let funny: Vec<&str> = catalog.by_category("funny").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(funny, vec!["1", "3"]);
        assert!(catalog.by_category("nerdy").is_empty());

        let featured: Vec<&str> = catalog.featured().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(featured, vec!["1"]);
    }

    #[test]
    fn test_category_names() {
        let catalog = small_catalog();
        assert_eq!(catalog.category_name("funny"), Some("FUNNY"));
        assert_eq!(catalog.category_name("nope"), None);
        assert_eq!(catalog.display_category_name("nope"), CUSTOM_CATEGORY_NAME);
    }

    #[test]
    fn test_rejects_duplicate_item() {
        let err = Catalog::new(
            vec![category("funny")],
            vec![item("1", "funny", false), item("1", "funny", false)],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateItem(id) if id == "1"));
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let err = Catalog::new(vec![category("funny"), category("funny")], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory(_)));
    }

    #[test]
    fn test_rejects_unknown_category_and_blank_text() {
        let err = Catalog::new(vec![category("funny")], vec![item("1", "sweet", false)]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { .. }));

        let mut blank = item("2", "funny", false);
        blank.text = "   ".to_string();
        let err = Catalog::new(vec![category("funny")], vec![blank]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyText(_)));
    }

    #[test]
    fn test_from_json_defaults_featured() {
        let json = r#"{
            "categories": [{"id": "nerdy", "name": "Nerdy", "icon": "glasses", "description": "d"}],
            "items": [{"id": "7", "text": "You are acute one.", "categoryId": "nerdy", "rating": 4.4}]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert!(!catalog.item("7").unwrap().is_featured);
    }

    #[test]
    fn test_day_seed() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        assert_eq!(day_seed(date), 20_240_214);
    }

    #[test]
    fn test_item_of_the_day_is_stable() {
        let catalog = Catalog::builtin().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();

        let first = catalog.item_of_the_day(date).unwrap();
        let second = catalog.item_of_the_day(date).unwrap();
        assert_eq!(first.id, second.id);

        let expected = (20_240_214 % catalog.len() as i64) as usize;
        assert_eq!(first.id, catalog.items()[expected].id);
    }

    #[test]
    fn test_item_of_the_day_changes_with_date() {
        let catalog = Catalog::builtin().unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 2, 12).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 2, 13).unwrap();

        assert_ne!(
            catalog.item_of_the_day(monday).unwrap().id,
            catalog.item_of_the_day(tuesday).unwrap().id
        );
    }

    #[test]
    fn test_item_of_the_day_now_uses_clock() {
        let catalog = small_catalog();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert_eq!(
            catalog.item_of_the_day_now(&clock).unwrap().id,
            catalog.item_of_the_day(date).unwrap().id
        );
    }

    #[test]
    fn test_empty_catalog_has_no_item_of_the_day() {
        let catalog = Catalog::new(vec![category("funny")], vec![]).unwrap();
        assert!(catalog.item_of_the_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).is_none());
        assert!(catalog.random_item(&mut SequenceRandom::new(vec![3])).is_none());
    }

    #[test]
    fn test_random_item_uses_source() {
        let catalog = small_catalog();
        let mut rng = SequenceRandom::new(vec![2, 0]);
        assert_eq!(catalog.random_item(&mut rng).unwrap().id, "3");
        assert_eq!(catalog.random_item(&mut rng).unwrap().id, "1");
    }
}
