//! Catalog Discord commands - `categories`, `category`, `suggest` and `import`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, guard},
        },
        core::{
            catalog::{self, DEFAULT_SUGGESTION_LIMIT},
            inventory, report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::{info, instrument};

    const CATALOG_COLOR: u32 = 0x009B_59B6;

    /// Lists the predefined item categories.
    #[poise::command(slash_command, prefix_command, aliases("categorias"))]
    #[instrument(skip(ctx))]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "categories", None).await? else {
            return Ok(());
        };

        let catalog = &ctx.data().catalog;
        if catalog.categories().is_empty() {
            ctx.say("No categories are configured.").await?;
            return Ok(());
        }

        let description: String = catalog
            .categories()
            .iter()
            .map(|category| {
                format!(
                    "{} **{}** ({} items)\n",
                    category.emoji,
                    report::title_case(&category.name),
                    category.items.len()
                )
            })
            .collect();
        let embed = serenity::CreateEmbed::default()
            .title("📋 Categories")
            .color(CATALOG_COLOR)
            .description(description)
            .footer(serenity::CreateEmbedFooter::new(
                "Use `category <name>` to see the items of a category",
            ));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows a category and the stock of each of its items.
    #[poise::command(slash_command, prefix_command, aliases("categoria"))]
    #[instrument(skip(ctx))]
    pub async fn category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        #[rest]
        name: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "category", Some(&name)).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let category = data.catalog.require(&name)?;
        let items = inventory::get_all_items(&data.database).await?;
        let lines = report::format_catalog_lines(&category.statuses(&items));

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "{} {}",
                category.emoji,
                report::title_case(&category.name)
            ))
            .color(CATALOG_COLOR)
            .description(lines)
            .footer(serenity::CreateEmbedFooter::new(
                "✅ in stock  ⚪ empty  ➕ not tracked",
            ));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Suggests catalog item names containing the given text.
    #[poise::command(slash_command, prefix_command, aliases("sugerir"))]
    #[instrument(skip(ctx))]
    pub async fn suggest(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Part of an item name"]
        #[rest]
        term: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "suggest", None).await? else {
            return Ok(());
        };

        let (found, total) = ctx
            .data()
            .catalog
            .suggest(&term, DEFAULT_SUGGESTION_LIMIT);
        if found.is_empty() {
            ctx.say(format!("💡 No catalog items match \"{}\".", term.trim()))
                .await?;
            return Ok(());
        }

        let description: String = found
            .iter()
            .map(|suggestion| {
                format!(
                    "• {} ({})\n",
                    report::title_case(&suggestion.item),
                    suggestion.category
                )
            })
            .collect();
        let mut embed = serenity::CreateEmbed::default()
            .title(format!("💡 Suggestions for \"{}\"", term.trim()))
            .color(CATALOG_COLOR)
            .description(description);
        if total > found.len() {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {} of {total} matches",
                found.len()
            )));
        }
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Starts tracking every item of a category at zero units.
    #[poise::command(slash_command, prefix_command, aliases("importar"))]
    #[instrument(skip(ctx))]
    pub async fn import(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to import"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        #[rest]
        name: String,
    ) -> Result<()> {
        let Some(_permit) = guard::admit(ctx, "import", Some(&name)).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let (category, outcome) =
            catalog::import_category(&data.database, &data.catalog, &name).await?;
        info!(
            user = %ctx.author().id,
            category = %category.name,
            created = outcome.created.len(),
            "Category imported"
        );

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "📥 Imported {} {}",
                category.emoji,
                report::title_case(&category.name)
            ))
            .color(CATALOG_COLOR)
            .description(report::format_batch_outcome(&outcome));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
