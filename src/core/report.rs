//! Report formatting business logic.
//!
//! Framework-agnostic builders that turn inventory rows into the text the bot
//! layer puts in embeds, plus chunking for Discord's size limits.

use crate::{
    core::catalog::CatalogStatus,
    core::inventory::{BatchOutcome, StockLevel},
    entities::item,
};

/// Discord's limit for an embed description, in bytes.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Upper-cases the first character: `glock` → `Glock`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// One line per item: `🟢 **Glock**: 12 units`.
#[must_use]
pub fn format_item_lines(items: &[item::Model]) -> String {
    items
        .iter()
        .map(|i| {
            format!(
                "{} **{}**: {} units\n",
                StockLevel::from_quantity(i.quantity).emoji(),
                title_case(&i.name),
                i.quantity
            )
        })
        .collect()
}

/// One line per catalog item: `✅ Glock (4)`, `➕ Uzi`.
#[must_use]
pub fn format_catalog_lines(statuses: &[(String, CatalogStatus)]) -> String {
    statuses
        .iter()
        .map(|(name, status)| match status {
            CatalogStatus::InStock(q) => format!("{} {} ({q})\n", status.emoji(), title_case(name)),
            CatalogStatus::Empty => format!("{} {} (0)\n", status.emoji(), title_case(name)),
            CatalogStatus::NotTracked => format!("{} {}\n", status.emoji(), title_case(name)),
        })
        .collect()
}

/// Bullet list summary of a batch creation.
#[must_use]
pub fn format_batch_outcome(outcome: &BatchOutcome) -> String {
    let bullets = |names: &[String]| {
        names
            .iter()
            .map(|n| format!("• {}", title_case(n)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut sections = Vec::new();
    if !outcome.created.is_empty() {
        sections.push(format!(
            "✅ **Created ({}):**\n{}",
            outcome.created.len(),
            bullets(&outcome.created)
        ));
    }
    if !outcome.existing.is_empty() {
        sections.push(format!(
            "⚠️ **Already tracked ({}):**\n{}",
            outcome.existing.len(),
            bullets(&outcome.existing)
        ));
    }
    if sections.is_empty() {
        return "Nothing to create.".to_string();
    }
    sections.join("\n\n")
}

/// Splits `content` into pieces of at most `limit` bytes.
///
/// Splits happen after a newline when possible; a single line longer than
/// `limit` is cut at the last char boundary that fits. Joining the pieces
/// yields `content` again.
#[must_use]
pub fn split_chunks(content: &str, limit: usize) -> Vec<&str> {
    if limit == 0 || content.len() <= limit {
        return vec![content];
    }

    let mut chunks = Vec::new();
    let mut rest = content;
    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let window = &rest[..cut];
        let at = match window.rfind('\n') {
            Some(newline) if newline > 0 => newline + 1,
            _ if cut > 0 => cut,
            // First char alone is wider than the limit
            _ => rest.chars().next().map_or(rest.len(), char::len_utf8),
        };
        let (head, tail) = rest.split_at(at);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i64) -> item::Model {
        let now = chrono::Utc::now().naive_utc();
        item::Model {
            id: 0,
            name: name.to_string(),
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("glock"), "Glock");
        assert_eq!(title_case("cargador pistolas"), "Cargador pistolas");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("éxtasis"), "Éxtasis");
    }

    #[test]
    fn test_format_item_lines() {
        let text = format_item_lines(&[item("glock", 12), item("pcp", 3), item("uzi", 0)]);
        assert_eq!(
            text,
            "🟢 **Glock**: 12 units\n🟡 **Pcp**: 3 units\n🔴 **Uzi**: 0 units\n"
        );
    }

    #[test]
    fn test_format_catalog_lines() {
        let text = format_catalog_lines(&[
            ("glock".to_string(), CatalogStatus::InStock(4)),
            ("uzi".to_string(), CatalogStatus::Empty),
            ("ak47".to_string(), CatalogStatus::NotTracked),
        ]);
        assert_eq!(text, "✅ Glock (4)\n⚪ Uzi (0)\n➕ Ak47\n");
    }

    #[test]
    fn test_line_builders_on_empty_input() {
        assert_eq!(format_item_lines(&[]), "");
        assert_eq!(format_catalog_lines(&[]), "");
    }

    #[test]
    fn test_format_batch_outcome() {
        let outcome = BatchOutcome {
            created: vec!["ak47".to_string()],
            existing: vec!["uzi".to_string(), "glock".to_string()],
        };
        assert_eq!(
            format_batch_outcome(&outcome),
            "✅ **Created (1):**\n• Ak47\n\n⚠️ **Already tracked (2):**\n• Uzi\n• Glock"
        );
        assert_eq!(
            format_batch_outcome(&BatchOutcome::default()),
            "Nothing to create."
        );
    }

    #[test]
    fn test_split_chunks_short_content_is_single_chunk() {
        assert_eq!(split_chunks("abc\n", 10), vec!["abc\n"]);
        assert_eq!(split_chunks("", 10), vec![""]);
    }

    #[test]
    fn test_split_chunks_prefers_line_boundaries() {
        let content = "aaaa\nbbbb\ncccc\n";
        let chunks = split_chunks(content, 11);
        assert_eq!(chunks, vec!["aaaa\nbbbb\n", "cccc\n"]);
        assert!(chunks.iter().all(|c| c.len() <= 11));
        assert_eq!(chunks.concat(), content);
    }

    #[test]
    fn test_split_chunks_hard_splits_long_lines_on_char_boundary() {
        let content = "ééééé"; // 10 bytes
        let chunks = split_chunks(content, 3);
        assert!(chunks.iter().all(|c| c.len() <= 3));
        assert_eq!(chunks.concat(), content);
        assert_eq!(chunks.len(), 5);
    }

    #[test]
    fn test_split_chunks_large_inventory_fits_embed_limit() {
        let items: Vec<_> = (0..400).map(|n| item(&format!("item {n}"), n)).collect();
        let text = format_item_lines(&items);
        let chunks = split_chunks(&text, EMBED_DESCRIPTION_LIMIT);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= EMBED_DESCRIPTION_LIMIT));
        assert!(chunks.iter().all(|c| c.ends_with('\n')));
        assert_eq!(chunks.concat(), text);
    }
}
