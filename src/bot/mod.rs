//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the core inventory logic and the command dispatcher into
//! a poise framework: shared bot data, error reporting, and client start-up.

/// Discord command implementations (inventory, catalog, general)
pub mod commands;
/// Discord interaction handlers (command guard, autocomplete, confirmations)
pub mod handlers;

use crate::{
    config::AppConfig,
    core::{
        catalog::Catalog,
        dispatcher::{Dispatcher, spawn_sweeper},
        inventory,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the command dispatcher and
/// the item catalog that commands need to access.
pub struct BotData {
    /// Database connection for all inventory operations
    pub database: DatabaseConnection,
    /// Single-flight guard shared by every command invocation
    pub dispatcher: Arc<Dispatcher>,
    /// Predefined categories from configuration
    pub catalog: Catalog,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        dispatcher: Arc<Dispatcher>,
        catalog: Catalog,
    ) -> Self {
        Self {
            database,
            dispatcher,
            catalog,
        }
    }
}

/// Text shown to the user when a command fails.
///
/// Mistakes in the user's input are echoed back; anything else gets a
/// generic message and is logged in full.
#[must_use]
pub fn user_facing_message(error: &Error) -> String {
    match error {
        Error::InvalidQuantity { .. } => "❌ The quantity must be a positive number.".to_string(),
        Error::InvalidItemName { .. } => "❌ Please give an item name.".to_string(),
        Error::ItemNotFound { name } => {
            format!("❌ \"{name}\" is not in the inventory.")
        }
        Error::InsufficientStock { current, .. } => {
            format!("❌ Not enough stock. Current stock: {current}")
        }
        Error::CategoryNotFound { name } => format!(
            "❌ The category \"{name}\" does not exist. Use `categories` to list them."
        ),
        _ => "❌ Something went wrong while running that command.".to_string(),
    }
}

const fn is_user_mistake(error: &Error) -> bool {
    matches!(
        error,
        Error::InvalidQuantity { .. }
            | Error::InvalidItemName { .. }
            | Error::ItemNotFound { .. }
            | Error::InsufficientStock { .. }
            | Error::CategoryNotFound { .. }
    )
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            if is_user_mistake(&error) {
                warn!("Command `{}` rejected input: {}", ctx.command().name, error);
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
            }
            let reply = poise::CreateReply::default()
                .content(user_facing_message(&error))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework and runs the Discord client until it stops.
///
/// The token is passed in separately so it never sits in [`AppConfig`].
#[instrument(skip_all)]
pub async fn run_bot(token: String, config: AppConfig, database: DatabaseConnection) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::new(config.dispatcher_config()));
    let catalog = Catalog::from_config(&config.categories);
    let seed_items = config.seed_items.clone();

    info!(
        prefix = %config.prefix,
        guard = ?dispatcher.config(),
        categories = catalog.categories().len(),
        "Configuring bot"
    );

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    debug!(
                        "Command `{}` invoked by {} ({})",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.id()
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                ctx.set_activity(Some(serenity::ActivityData::watching("the stash 🔫")));

                let seeded = inventory::seed_items(&database, &seed_items).await?;
                if seeded > 0 {
                    info!("Seeded inventory with {} items", seeded);
                }

                spawn_sweeper(Arc::clone(&dispatcher));
                Ok(BotData::new(database, dispatcher, catalog))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_message_echoes_input_mistakes() {
        let message = user_facing_message(&Error::InsufficientStock {
            current: 2,
            required: 5,
        });
        assert_eq!(message, "❌ Not enough stock. Current stock: 2");

        let message = user_facing_message(&Error::ItemNotFound {
            name: "uzi".to_string(),
        });
        assert!(message.contains("\"uzi\""));
    }

    #[test]
    fn test_user_facing_message_hides_internal_errors() {
        let error = Error::Config {
            message: "secret path".to_string(),
        };
        assert!(!user_facing_message(&error).contains("secret"));
        assert!(!is_user_mistake(&error));
    }
}
