//! Typed confirmation for destructive commands.
//!
//! After the prompt is sent, the invoking user has a short window to type
//! `confirm` (or `cancel`) in the same channel. Any other message from them is
//! ignored; silence counts as a cancel.

use crate::{bot::BotData, errors::Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// How long the user has to answer a confirmation prompt.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Answer window for a command guarded with `busy_timeout`.
///
/// Always shorter than `busy_timeout`, so the in-flight entry outlives the
/// prompt and a second invocation stays BUSY until it closes.
#[must_use]
pub fn confirmation_window(busy_timeout: Duration) -> Duration {
    CONFIRMATION_TIMEOUT.min(busy_timeout * 2 / 3)
}

/// How a confirmation prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user typed a confirming word
    Confirmed,
    /// The user typed a cancelling word
    Cancelled,
    /// No answer within the timeout
    TimedOut,
}

/// Interprets a reply: `Some(true)` confirms, `Some(false)` cancels, `None`
/// is not an answer.
#[must_use]
pub fn parse_reply(content: &str) -> Option<bool> {
    match content.trim().to_lowercase().as_str() {
        "confirm" | "confirmar" | "yes" | "si" | "sí" => Some(true),
        "cancel" | "cancelar" | "no" => Some(false),
        _ => None,
    }
}

/// Waits for the command author to answer in the current channel.
pub async fn await_confirmation(
    ctx: poise::Context<'_, BotData, Error>,
    timeout: Duration,
) -> Confirmation {
    let answer = serenity::MessageCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(timeout)
        .filter(|message| parse_reply(&message.content).is_some())
        .next()
        .await;

    match answer.and_then(|message| parse_reply(&message.content)) {
        Some(true) => Confirmation::Confirmed,
        Some(false) => Confirmation::Cancelled,
        None => Confirmation::TimedOut,
    }
}
