//! Inventory business logic - Handles all stock-keeping operations.
//!
//! The inventory is a flat map of item name to quantity, shared by everyone in
//! the guild. Every mutation runs inside a database transaction and returns the
//! item as stored afterwards, so the bot layer can report the new total without
//! a second query.

use crate::{
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info};

/// Quantities below this (but above zero) count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Coarse stock classification used for status markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// Nothing left
    Depleted,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units
    Low,
    /// Comfortable stock
    Normal,
}

impl StockLevel {
    /// Classifies a quantity.
    #[must_use]
    pub const fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            Self::Depleted
        } else if quantity < LOW_STOCK_THRESHOLD {
            Self::Low
        } else {
            Self::Normal
        }
    }

    /// Traffic-light marker for lists.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Depleted => "🔴",
            Self::Low => "🟡",
            Self::Normal => "🟢",
        }
    }

    /// Human label for single-item views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Depleted => "Out of stock",
            Self::Low => "Low stock",
            Self::Normal => "In stock",
        }
    }

    /// Embed colour matching the level.
    #[must_use]
    pub const fn color(self) -> u32 {
        match self {
            Self::Depleted => 0x00DC_3545,
            Self::Low => 0x00FF_C107,
            Self::Normal => 0x0028_A745,
        }
    }
}

/// Result of creating several items at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Names that were not tracked before and now are, in input order
    pub created: Vec<String>,
    /// Names that were already tracked, in input order
    pub existing: Vec<String>,
}

/// Totals over a list of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Number of distinct items
    pub item_count: usize,
    /// Sum of all quantities
    pub total_units: i64,
}

impl InventorySummary {
    /// Summarizes `items`.
    #[must_use]
    pub fn of(items: &[item::Model]) -> Self {
        Self {
            item_count: items.len(),
            total_units: items.iter().map(|i| i.quantity).sum(),
        }
    }
}

/// Normalizes a user-supplied item name: trimmed, lower-case, single spaces.
///
/// # Errors
/// Returns `InvalidItemName` if nothing is left after trimming.
pub fn normalize_item_name(raw: &str) -> Result<String> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        return Err(Error::InvalidItemName {
            name: raw.to_string(),
        });
    }
    Ok(normalized)
}

fn validate_quantity(quantity: i64) -> Result<()> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> Result<Option<item::Model>> {
    Item::find()
        .filter(item::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(Into::into)
}

async fn insert_empty<C: ConnectionTrait>(conn: &C, name: String) -> Result<item::Model> {
    let now = chrono::Utc::now().naive_utc();
    item::ActiveModel {
        name: Set(name),
        quantity: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Looks up one item by (un-normalized) name.
///
/// # Errors
/// Returns an error if the name is blank or the query fails.
pub async fn get_item(db: &DatabaseConnection, name: &str) -> Result<Option<item::Model>> {
    let name = normalize_item_name(name)?;
    find_by_name(db, &name).await
}

/// Retrieves every tracked item, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds items whose name contains `term`, ordered by name.
///
/// # Errors
/// Returns an error if the term is blank or the query fails.
pub async fn search_items(db: &DatabaseConnection, term: &str) -> Result<Vec<item::Model>> {
    let term = normalize_item_name(term)?;
    let items = get_all_items(db).await?;
    Ok(items
        .into_iter()
        .filter(|i| i.name.contains(&term))
        .collect())
}

/// Adds `quantity` units of `name`, tracking the item first if needed.
///
/// # Errors
/// Returns an error if:
/// - The name is blank
/// - The quantity is not positive or the total would overflow
/// - The database transaction fails
pub async fn add_stock(db: &DatabaseConnection, name: &str, quantity: i64) -> Result<item::Model> {
    let name = normalize_item_name(name)?;
    validate_quantity(quantity)?;

    let txn = db.begin().await?;
    let current = match find_by_name(&txn, &name).await? {
        Some(existing) => existing,
        None => insert_empty(&txn, name.clone()).await?,
    };

    let new_quantity = current
        .quantity
        .checked_add(quantity)
        .ok_or(Error::InvalidQuantity { quantity })?;

    let mut active: item::ActiveModel = current.into();
    active.quantity = Set(new_quantity);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(item = %updated.name, added = quantity, total = updated.quantity, "Stock added");
    Ok(updated)
}

/// Removes `quantity` units of `name`.
///
/// # Errors
/// Returns an error if:
/// - The name is blank or the quantity is not positive
/// - The item is not tracked (`ItemNotFound`)
/// - Fewer than `quantity` units are in stock (`InsufficientStock`)
/// - The database transaction fails
pub async fn remove_stock(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
) -> Result<item::Model> {
    let name = normalize_item_name(name)?;
    validate_quantity(quantity)?;

    let txn = db.begin().await?;
    let current = find_by_name(&txn, &name)
        .await?
        .ok_or_else(|| Error::ItemNotFound { name: name.clone() })?;

    if current.quantity < quantity {
        return Err(Error::InsufficientStock {
            current: current.quantity,
            required: quantity,
        });
    }

    let new_quantity = current.quantity - quantity;
    let mut active: item::ActiveModel = current.into();
    active.quantity = Set(new_quantity);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(item = %updated.name, removed = quantity, total = updated.quantity, "Stock removed");
    Ok(updated)
}

/// Starts tracking each of `names` at zero units.
///
/// Blank names and repeats are skipped; names already tracked are reported in
/// [`BatchOutcome::existing`].
///
/// # Errors
/// Returns an error if the database transaction fails.
pub async fn create_items<I, S>(db: &DatabaseConnection, names: I) -> Result<BatchOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let wanted: Vec<String> = names
        .into_iter()
        .filter_map(|raw| normalize_item_name(raw.as_ref()).ok())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    let mut outcome = BatchOutcome::default();
    if wanted.is_empty() {
        return Ok(outcome);
    }

    let txn = db.begin().await?;
    for name in wanted {
        if find_by_name(&txn, &name).await?.is_some() {
            outcome.existing.push(name);
        } else {
            insert_empty(&txn, name.clone()).await?;
            outcome.created.push(name);
        }
    }
    txn.commit().await?;

    info!(
        created = outcome.created.len(),
        existing = outcome.existing.len(),
        "Batch item creation finished"
    );
    Ok(outcome)
}

/// Deletes every item. Returns how many were removed.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn clear_inventory(db: &DatabaseConnection) -> Result<u64> {
    let removed = Item::delete_many().exec(db).await?.rows_affected;
    info!(removed, "Inventory cleared");
    Ok(removed)
}

/// Tracks `names` at zero units, but only when the inventory is empty.
///
/// Returns the number of items created.
///
/// # Errors
/// Returns an error if a database operation fails.
pub async fn seed_items(db: &DatabaseConnection, names: &[String]) -> Result<usize> {
    let existing = Item::find().count(db).await?;
    if existing > 0 {
        debug!(existing, "Inventory already populated, skipping seed");
        return Ok(0);
    }
    let outcome = create_items(db, names).await?;
    Ok(outcome.created.len())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Glock ").unwrap(), "glock");
        assert_eq!(
            normalize_item_name("Cargador   PISTOLAS").unwrap(),
            "cargador pistolas"
        );
        assert!(matches!(
            normalize_item_name("   "),
            Err(Error::InvalidItemName { .. })
        ));
    }

    #[test]
    fn test_stock_level_thresholds() {
        assert_eq!(StockLevel::from_quantity(0), StockLevel::Depleted);
        assert_eq!(StockLevel::from_quantity(1), StockLevel::Low);
        assert_eq!(StockLevel::from_quantity(9), StockLevel::Low);
        assert_eq!(StockLevel::from_quantity(10), StockLevel::Normal);
    }

    #[tokio::test]
    async fn test_stock_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = add_stock(&db, "glock", 0).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: 0 })));

        let result = remove_stock(&db, "glock", -3).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: -3 })));

        let result = add_stock(&db, "  ", 5).await;
        assert!(matches!(result, Err(Error::InvalidItemName { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_stock_creates_and_accumulates() -> Result<()> {
        let db = setup_test_db().await?;

        let first = add_stock(&db, "Glock", 5).await?;
        assert_eq!(first.name, "glock");
        assert_eq!(first.quantity, 5);

        let second = add_stock(&db, "GLOCK ", 3).await?;
        assert_eq!(second.id, first.id);
        assert_eq!(second.quantity, 8);

        assert_eq!(get_all_items(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_stock_integration() -> Result<()> {
        let db = setup_with_stock(&[("beretta", 4)]).await?;

        let item = remove_stock(&db, "beretta", 3).await?;
        assert_eq!(item.quantity, 1);

        let result = remove_stock(&db, "beretta", 2).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                current: 1,
                required: 2
            })
        ));

        // Removing down to zero keeps the item tracked
        let item = remove_stock(&db, "beretta", 1).await?;
        assert_eq!(item.quantity, 0);
        assert!(get_item(&db, "beretta").await?.is_some());

        let result = remove_stock(&db, "uzi", 1).await;
        assert!(matches!(result, Err(Error::ItemNotFound { name }) if name == "uzi"));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_items_matches_substring() -> Result<()> {
        let db = setup_with_stock(&[
            ("cargador pistolas", 2),
            ("cargador subfusil", 0),
            ("glock", 12),
        ])
        .await?;

        let found = search_items(&db, "Cargador").await?;
        let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["cargador pistolas", "cargador subfusil"]);

        assert!(search_items(&db, "ak47").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_items_reports_created_and_existing() -> Result<()> {
        let db = setup_with_stock(&[("uzi", 3)]).await?;

        let outcome = create_items(&db, ["AK47", "uzi", " ", "vintage", "ak47"]).await?;
        assert_eq!(outcome.created, vec!["ak47", "vintage"]);
        assert_eq!(outcome.existing, vec!["uzi"]);

        // Existing quantities are untouched
        assert_eq!(get_item(&db, "uzi").await?.unwrap().quantity, 3);
        assert_eq!(get_item(&db, "ak47").await?.unwrap().quantity, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_inventory_removes_everything() -> Result<()> {
        let db = setup_with_stock(&[("pcp", 1), ("bongs", 2)]).await?;
        assert_eq!(clear_inventory(&db).await?, 2);
        assert!(get_all_items(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_items_only_when_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = vec!["glock".to_string(), "beretta".to_string()];

        assert_eq!(seed_items(&db, &seed).await?, 2);
        add_stock(&db, "glock", 1).await?;
        assert_eq!(seed_items(&db, &seed).await?, 0);
        assert_eq!(get_item(&db, "glock").await?.unwrap().quantity, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_inventory_summary() -> Result<()> {
        let db = setup_with_stock(&[("glock", 12), ("uzi", 3), ("pcp", 0)]).await?;
        let summary = InventorySummary::of(&get_all_items(&db).await?);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_units, 15);
        Ok(())
    }
}
