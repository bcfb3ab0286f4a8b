//! Inventory Discord commands - `add`, `remove`, `stock`, `inventory`,
//! `search`, `create` and `clear`.
//!
//! Each command first passes through the command guard, then calls into
//! `core::inventory` and renders the result as an embed. Input mistakes are
//! returned as errors and reported by the framework's error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{
                autocomplete,
                confirm::{self, Confirmation},
                guard,
            },
        },
        core::{
            inventory::{self, InventorySummary, StockLevel},
            report::{self, EMBED_DESCRIPTION_LIMIT},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::{info, instrument};

    const ADD_COLOR: u32 = 0x0028_A745;
    const LIST_COLOR: u32 = 0x0034_98DB;
    const DANGER_COLOR: u32 = 0x00DC_3545;

    /// Adds units of an item, tracking it if it is new.
    #[poise::command(slash_command, prefix_command, aliases("agregar"))]
    #[instrument(skip(ctx))]
    pub async fn add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to add"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        item: String,
        #[description = "Units to add"] quantity: u32,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "add", Some(&item)).await? else {
            return Ok(());
        };

        let updated =
            inventory::add_stock(&ctx.data().database, &item, i64::from(quantity)).await?;
        info!(
            user = %ctx.author().id,
            item = %updated.name,
            quantity,
            total = updated.quantity,
            "Stock added"
        );

        let embed = serenity::CreateEmbed::default()
            .title("✅ Stock added")
            .color(ADD_COLOR)
            .field("Item", report::title_case(&updated.name), true)
            .field("Added", quantity.to_string(), true)
            .field("Total", updated.quantity.to_string(), true)
            .timestamp(serenity::Timestamp::now());
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Removes units of a tracked item.
    #[poise::command(slash_command, prefix_command, aliases("quitar"))]
    #[instrument(skip(ctx))]
    pub async fn remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to remove from"]
        #[autocomplete = "autocomplete::autocomplete_tracked_item"]
        item: String,
        #[description = "Units to remove"] quantity: u32,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "remove", Some(&item)).await? else {
            return Ok(());
        };

        let updated =
            inventory::remove_stock(&ctx.data().database, &item, i64::from(quantity)).await?;
        info!(
            user = %ctx.author().id,
            item = %updated.name,
            quantity,
            remaining = updated.quantity,
            "Stock removed"
        );

        let level = StockLevel::from_quantity(updated.quantity);
        let mut embed = serenity::CreateEmbed::default()
            .title("➖ Stock removed")
            .color(level.color())
            .field("Item", report::title_case(&updated.name), true)
            .field("Removed", quantity.to_string(), true)
            .field("Remaining", updated.quantity.to_string(), true)
            .timestamp(serenity::Timestamp::now());
        if level != StockLevel::Normal {
            embed = embed.field("Status", format!("{} {}", level.emoji(), level.label()), false);
        }
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the stock of one item.
    #[poise::command(slash_command, prefix_command)]
    #[instrument(skip(ctx))]
    pub async fn stock(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to look up"]
        #[autocomplete = "autocomplete::autocomplete_tracked_item"]
        #[rest]
        item: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "stock", Some(&item)).await? else {
            return Ok(());
        };

        let Some(found) = inventory::get_item(&ctx.data().database, &item).await? else {
            return Err(Error::ItemNotFound {
                name: inventory::normalize_item_name(&item)?,
            });
        };

        let level = StockLevel::from_quantity(found.quantity);
        let embed = serenity::CreateEmbed::default()
            .title(format!("📦 {}", report::title_case(&found.name)))
            .color(level.color())
            .field("Quantity", found.quantity.to_string(), true)
            .field("Status", format!("{} {}", level.emoji(), level.label()), true)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Last updated {}",
                found.updated_at.format("%Y-%m-%d %H:%M")
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists every tracked item.
    #[poise::command(slash_command, prefix_command, aliases("inventario", "lista"))]
    #[instrument(skip(ctx))]
    pub async fn inventory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "inventory", None).await? else {
            return Ok(());
        };

        let items = inventory::get_all_items(&ctx.data().database).await?;
        if items.is_empty() {
            ctx.say("📦 The inventory is empty. Use `add` to start tracking items.")
                .await?;
            return Ok(());
        }

        let summary = InventorySummary::of(&items);
        let text = report::format_item_lines(&items);
        send_paged(
            ctx,
            "📦 Inventory",
            &text,
            &format!(
                "{} items • {} units in total",
                summary.item_count, summary.total_units
            ),
        )
        .await
    }

    /// Finds tracked items whose name contains the given text.
    #[poise::command(slash_command, prefix_command, aliases("buscar"))]
    #[instrument(skip(ctx))]
    pub async fn search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to search for"]
        #[rest]
        term: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "search", None).await? else {
            return Ok(());
        };

        let items = inventory::search_items(&ctx.data().database, &term).await?;
        if items.is_empty() {
            ctx.say(format!("🔍 No tracked items match \"{}\".", term.trim()))
                .await?;
            return Ok(());
        }

        let text = report::format_item_lines(&items);
        send_paged(
            ctx,
            &format!("🔍 Results for \"{}\"", term.trim()),
            &text,
            &format!("{} matching items", items.len()),
        )
        .await
    }

    /// Starts tracking several comma-separated items at zero units.
    #[poise::command(slash_command, prefix_command, aliases("crear"))]
    #[instrument(skip(ctx))]
    pub async fn create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Comma-separated item names"]
        #[rest]
        items: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "create", None).await? else {
            return Ok(());
        };

        let names: Vec<&str> = items
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return Err(Error::InvalidItemName { name: items });
        }

        let outcome = inventory::create_items(&ctx.data().database, &names).await?;
        info!(
            user = %ctx.author().id,
            created = outcome.created.len(),
            existing = outcome.existing.len(),
            "Items created"
        );

        let embed = serenity::CreateEmbed::default()
            .title("🆕 Create items")
            .color(ADD_COLOR)
            .description(report::format_batch_outcome(&outcome));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Deletes the whole inventory after a typed confirmation.
    #[poise::command(slash_command, prefix_command, aliases("limpiar"))]
    #[instrument(skip(ctx))]
    pub async fn clear(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "clear", None).await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let window = confirm::confirmation_window(ctx.data().dispatcher.config().busy_timeout);
        let count = inventory::get_all_items(db).await?.len();
        if count == 0 {
            ctx.say("📦 The inventory is already empty.").await?;
            return Ok(());
        }

        let prompt = serenity::CreateEmbed::default()
            .title("⚠️ Clear inventory")
            .color(DANGER_COLOR)
            .description(format!(
                "This deletes all **{count}** tracked items.\n\
                Type `confirm` within {} seconds to proceed, or `cancel`.",
                window.as_secs()
            ));
        ctx.send(poise::CreateReply::default().embed(prompt)).await?;

        match confirm::await_confirmation(ctx, window).await {
            Confirmation::Confirmed => {
                let removed = inventory::clear_inventory(db).await?;
                info!(user = %ctx.author().id, removed, "Inventory cleared by command");
                ctx.say(format!("🗑️ Inventory cleared. {removed} items removed."))
                    .await?;
            }
            Confirmation::Cancelled => {
                ctx.say("❎ Cancelled. Nothing was deleted.").await?;
            }
            Confirmation::TimedOut => {
                ctx.say("⌛ No confirmation received. Nothing was deleted.")
                    .await?;
            }
        }
        Ok(())
    }

    /// Sends `text` as one or more embeds that fit Discord's description limit.
    async fn send_paged(
        ctx: poise::Context<'_, BotData, Error>,
        title: &str,
        text: &str,
        footer: &str,
    ) -> Result<()> {
        let chunks = report::split_chunks(text, EMBED_DESCRIPTION_LIMIT);
        let pages = chunks.len();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let page_title = if pages > 1 {
                format!("{title} ({}/{pages})", index + 1)
            } else {
                title.to_string()
            };
            let mut embed = serenity::CreateEmbed::default()
                .title(page_title)
                .color(LIST_COLOR)
                .description(chunk);
            if index + 1 == pages {
                embed = embed
                    .footer(serenity::CreateEmbedFooter::new(footer))
                    .timestamp(serenity::Timestamp::now());
            }
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
