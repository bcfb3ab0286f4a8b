//! Discord interaction handlers.
//!
//! This module contains handlers for Discord interactions that sit around the
//! commands themselves: the single-flight guard, autocomplete, and
//! confirmation prompts.

/// Autocomplete handlers for command parameters
pub mod autocomplete;
/// Confirmation prompts for destructive commands
pub mod confirm;
/// Single-flight guard applied before a command does any work
pub mod guard;
