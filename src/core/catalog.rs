//! Catalog of predefined item categories.
//!
//! Categories come from configuration and are read-only at runtime. They help
//! users discover item names (`suggest`) and bulk-track a whole group of items
//! at once (`import_category`).

use crate::{
    config::CategoryConfig,
    core::inventory::{self, BatchOutcome},
    entities::item,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 15;

/// A named group of item names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Lower-case category name
    pub name: String,
    /// Marker shown next to the name
    pub emoji: String,
    /// Normalized item names
    pub items: Vec<String>,
}

/// How a catalog item relates to the live inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Tracked with at least one unit
    InStock(i64),
    /// Tracked with zero units
    Empty,
    /// Not tracked at all
    NotTracked,
}

impl CatalogStatus {
    /// List marker for the status.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::InStock(_) => "✅",
            Self::Empty => "⚪",
            Self::NotTracked => "➕",
        }
    }
}

/// A catalog item matching a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Item name
    pub item: String,
    /// Category it belongs to
    pub category: String,
}

/// All configured categories, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds the catalog from configuration, normalizing names and dropping
    /// blank or repeated items.
    #[must_use]
    pub fn from_config(categories: &[CategoryConfig]) -> Self {
        let categories = categories
            .iter()
            .filter_map(|c| {
                let name = inventory::normalize_item_name(&c.name).ok()?;
                let mut items: Vec<String> = Vec::with_capacity(c.items.len());
                for item in c
                    .items
                    .iter()
                    .filter_map(|raw| inventory::normalize_item_name(raw).ok())
                {
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                Some(Category {
                    name,
                    emoji: c.emoji.clone().unwrap_or_else(|| "📋".to_string()),
                    items,
                })
            })
            .collect();
        Self { categories }
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Finds a category by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Category> {
        let wanted = inventory::normalize_item_name(name).ok()?;
        self.categories.iter().find(|c| c.name == wanted)
    }

    /// Catalog items containing `term`, at most `limit`, in catalog order.
    ///
    /// Returns the matches plus the total number found before truncation.
    #[must_use]
    pub fn suggest(&self, term: &str, limit: usize) -> (Vec<Suggestion>, usize) {
        let Ok(term) = inventory::normalize_item_name(term) else {
            return (Vec::new(), 0);
        };
        let term = term.as_str();
        let all: Vec<Suggestion> = self
            .categories
            .iter()
            .flat_map(|c| {
                c.items
                    .iter()
                    .filter(move |item| item.contains(term))
                    .map(move |item| Suggestion {
                        item: item.clone(),
                        category: c.name.clone(),
                    })
            })
            .collect();
        let total = all.len();
        (all.into_iter().take(limit).collect(), total)
    }

    /// Looks up `name`, failing with `CategoryNotFound`.
    ///
    /// # Errors
    /// Returns `CategoryNotFound` if no category has that name.
    pub fn require(&self, name: &str) -> Result<&Category> {
        self.find(name).ok_or_else(|| Error::CategoryNotFound {
            name: name.trim().to_lowercase(),
        })
    }
}

impl Category {
    /// Status of each item of this category against `items`.
    #[must_use]
    pub fn statuses(&self, items: &[item::Model]) -> Vec<(String, CatalogStatus)> {
        let stock: HashMap<&str, i64> = items
            .iter()
            .map(|i| (i.name.as_str(), i.quantity))
            .collect();
        self.items
            .iter()
            .map(|name| {
                let status = match stock.get(name.as_str()) {
                    Some(&q) if q > 0 => CatalogStatus::InStock(q),
                    Some(_) => CatalogStatus::Empty,
                    None => CatalogStatus::NotTracked,
                };
                (name.clone(), status)
            })
            .collect()
    }
}

/// Starts tracking every item of category `name`.
///
/// # Errors
/// Returns `CategoryNotFound` for an unknown category, or a database error.
pub async fn import_category(
    db: &DatabaseConnection,
    catalog: &Catalog,
    name: &str,
) -> Result<(Category, BatchOutcome)> {
    let category = catalog.require(name)?.clone();
    let outcome = inventory::create_items(db, &category.items).await?;
    Ok((category, outcome))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::AppConfig;
    use crate::test_utils::*;

    fn default_catalog() -> Catalog {
        Catalog::from_config(&AppConfig::default().categories)
    }

    #[test]
    fn test_from_config_normalizes_and_dedupes() {
        let catalog = Catalog::from_config(&[
            CategoryConfig {
                name: " Tools ".to_string(),
                emoji: None,
                items: vec![
                    "Lockpick".to_string(),
                    "lockpick".to_string(),
                    " ".to_string(),
                ],
            },
            CategoryConfig {
                name: "   ".to_string(),
                emoji: None,
                items: vec!["ghost".to_string()],
            },
        ]);

        assert_eq!(catalog.categories().len(), 1);
        let tools = catalog.find("TOOLS").unwrap();
        assert_eq!(tools.items, vec!["lockpick"]);
        assert_eq!(tools.emoji, "📋");
    }

    #[test]
    fn test_suggest_limits_and_counts() {
        let catalog = default_catalog();

        let (found, total) = catalog.suggest("cargador", DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(total, 2);
        assert!(found.iter().all(|s| s.category == "magazines"));

        let (found, total) = catalog.suggest("a", 3);
        assert_eq!(found.len(), 3);
        assert!(total > 3);

        let (found, total) = catalog.suggest("  ", 3);
        assert!(found.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_require_unknown_category() {
        let catalog = default_catalog();
        assert!(matches!(
            catalog.require("Vehicles"),
            Err(Error::CategoryNotFound { name }) if name == "vehicles"
        ));
    }

    #[tokio::test]
    async fn test_import_category_and_statuses() -> Result<()> {
        let db = setup_with_stock(&[("glock", 4), ("uzi", 0)]).await?;
        let catalog = default_catalog();

        let (category, outcome) = import_category(&db, &catalog, "Weapons").await?;
        assert_eq!(category.name, "weapons");
        assert_eq!(outcome.created, vec!["vintage", "beretta", "ak47"]);
        assert_eq!(outcome.existing, vec!["glock", "uzi"]);

        inventory::add_stock(&db, "cargador pistolas", 7).await?;
        let items = inventory::get_all_items(&db).await?;
        let statuses = catalog.find("magazines").unwrap().statuses(&items);
        assert_eq!(
            statuses,
            vec![
                ("cargador pistolas".to_string(), CatalogStatus::InStock(7)),
                ("cargador subfusil".to_string(), CatalogStatus::NotTracked),
            ]
        );

        let statuses = category.statuses(&items);
        assert_eq!(statuses[1], ("glock".to_string(), CatalogStatus::InStock(4)));
        assert_eq!(statuses[4], ("uzi".to_string(), CatalogStatus::Empty));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_unknown_category_touches_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let result = import_category(&db, &default_catalog(), "vehicles").await;
        assert!(matches!(result, Err(Error::CategoryNotFound { .. })));
        assert!(inventory::get_all_items(&db).await?.is_empty());
        Ok(())
    }
}
