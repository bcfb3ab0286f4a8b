//! `StashKeeper` - A Discord bot for shared inventory tracking
//!
//! This crate keeps a persistent stock count for a group's items, organised in
//! predefined categories, and guards every command behind a single-flight
//! dispatcher so duplicated events, rapid repeats and overlapping runs never
//! apply a stock change twice.

#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    future_incompatible,
    rust_2018_idioms,
)]
// poise-generated command builders have no `# Errors` sections
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic inventory, catalog, and command dispatch
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
