//! Core business logic - framework-agnostic inventory, catalog, formatting
//! and the single-flight command dispatcher.

/// Predefined item categories and suggestions
pub mod catalog;
/// Single-flight guard that every bot command passes through
pub mod dispatcher;
/// Stock-keeping operations on the items table
pub mod inventory;
/// Text builders for inventory listings
pub mod report;
