//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests tracked item names and configured category names as the user
//! types.

use crate::{bot::BotData, core::inventory, errors::Error};

/// Discord accepts at most this many autocomplete choices.
const AUTOCOMPLETE_LIMIT: usize = 25;

/// Keeps the names containing `partial` (case-insensitive), sorted, capped
/// at Discord's limit.
#[must_use]
pub fn matching_names<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.trim().to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(AUTOCOMPLETE_LIMIT);
    matching
}

/// Suggests tracked item names.
///
/// Catalog items that are not tracked yet are offered too, so `add` can start
/// tracking them.
pub async fn autocomplete_item_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let Ok(items) = inventory::get_all_items(&data.database).await else {
        return Vec::new();
    };

    let mut names: Vec<String> = items.into_iter().map(|i| i.name).collect();
    for category in data.catalog.categories() {
        for item in &category.items {
            if !names.contains(item) {
                names.push(item.clone());
            }
        }
    }
    matching_names(names, partial)
}

/// Suggests tracked item names only, for commands that need an existing item.
pub async fn autocomplete_tracked_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(items) = inventory::get_all_items(&ctx.data().database).await else {
        return Vec::new();
    };
    matching_names(items.into_iter().map(|i| i.name), partial)
}

/// Suggests configured category names.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let names = ctx
        .data()
        .catalog
        .categories()
        .iter()
        .map(|c| c.name.clone());
    matching_names(names, partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_filters_and_sorts() {
        let names = ["uzi", "glock", "cargador pistolas", "Gasolinera"].map(String::from);
        assert_eq!(
            matching_names(names, "G"),
            vec!["Gasolinera", "cargador pistolas", "glock"]
        );
    }

    #[test]
    fn test_matching_names_caps_at_discord_limit() {
        let names = (0..40).map(|n| format!("item {n:02}"));
        let matching = matching_names(names, "");
        assert_eq!(matching.len(), AUTOCOMPLETE_LIMIT);
        assert_eq!(matching[0], "item 00");
    }
}
