//! Unified error types and result handling.
//!
//! Dispatcher rejections are not errors; they are reported as
//! [`Decision`](crate::core::dispatcher::Decision) values. Everything in here is
//! something a command either tells the user about or logs as a failure.

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value could not be used
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Discord client or framework error
    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Quantity was zero or negative
    #[error("Invalid quantity: {quantity} (must be a positive number)")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// Item name was empty after normalization
    #[error("Invalid item name: '{name}'")]
    InvalidItemName {
        /// The rejected raw name
        name: String,
    },

    /// Item is not tracked in the inventory
    #[error("Item not found: {name}")]
    ItemNotFound {
        /// Normalized item name
        name: String,
    },

    /// Removing more units than are in stock
    #[error("Insufficient stock: have {current}, need {required}")]
    InsufficientStock {
        /// Units currently in stock
        current: i64,
        /// Units requested
        required: i64,
    },

    /// Category is not part of the configured catalog
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Requested category name
        name: String,
    },
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
