//! General Discord commands - ping and help.
//! These commands don't touch the inventory and are not guarded.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command, aliases("ayuda"))]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let p = ctx.prefix();
        let help_text = format!(
            "**Stash Keeper Help**\n\
            Every command works as a slash command or with the `{p}` prefix. \
            Item names with spaces need quotes in prefix form: `{p}add \"cargador pistolas\" 5`.\n\n\
            **Stock**\n\
            • `add <item> <quantity>` - Adds units, tracking the item if it is new.\n\
            • `remove <item> <quantity>` - Removes units from a tracked item.\n\
            • `stock <item>` - Shows the stock of one item.\n\
            • `inventory` - Lists every tracked item.\n\
            • `search <text>` - Finds tracked items by name.\n\
            • `create <item, item, ...>` - Starts tracking several items at zero.\n\
            • `clear` - Deletes the whole inventory (asks for confirmation).\n\n\
            **Catalog**\n\
            • `categories` - Lists the predefined categories.\n\
            • `category <name>` - Shows a category and the stock of its items.\n\
            • `suggest <text>` - Suggests item names from the catalog.\n\
            • `import <category>` - Starts tracking every item of a category.\n\n\
            **Utility**\n\
            • `ping` - Checks if the bot is responsive.\n\
            • `help` - Shows this help message.\n\n\
            Repeating a command too quickly triggers a short cooldown."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
