//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Catalog browsing and import commands
pub mod catalog;

/// General utility commands
pub mod general;

/// Stock management commands
pub mod inventory;

/// Every command the bot registers, in help order.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        inventory::add(),
        inventory::remove(),
        inventory::stock(),
        inventory::inventory(),
        inventory::search(),
        inventory::create(),
        inventory::clear(),
        catalog::categories(),
        catalog::category(),
        catalog::suggest(),
        catalog::import(),
        general::ping(),
        general::help(),
    ]
}
