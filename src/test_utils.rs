//! Shared test utilities for Stash Keeper.
//!
//! This module provides common helper functions for setting up test databases
//! and stocking them with known items.

use crate::{core::inventory, errors::Result};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up a test database holding the given `(name, quantity)` pairs.
///
/// Items listed with quantity 0 are tracked but empty.
pub async fn setup_with_stock(stock: &[(&str, i64)]) -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    inventory::create_items(&db, stock.iter().map(|(name, _)| *name)).await?;
    for (name, quantity) in stock.iter().filter(|(_, q)| *q > 0) {
        inventory::add_stock(&db, name, *quantity).await?;
    }
    Ok(db)
}
