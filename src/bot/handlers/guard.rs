//! Command guard.
//!
//! Every command that touches the inventory asks the dispatcher for a permit
//! before doing anything else. The raw event id is the id poise assigns to the
//! invocation (the message id for prefix commands, the interaction id for
//! slash commands), so a redelivered gateway event is recognised as a
//! duplicate.

use crate::{
    bot::BotData,
    core::{
        dispatcher::{ActionKey, ActionPermit, Decision, EventId},
        inventory,
    },
    errors::{Error, Result},
};
use std::time::Duration;
use tracing::debug;

/// Builds the key a command invocation is guarded under.
///
/// The target, when present, is normalized the same way item names are so
/// `add Glock` and `add glock` share a key.
#[must_use]
pub fn action_key(actor: impl Into<String>, command: &str, target: Option<&str>) -> ActionKey {
    match target.map(|t| inventory::normalize_item_name(t).unwrap_or_default()) {
        Some(target) if !target.is_empty() => ActionKey::with_target(actor, command, &target),
        _ => ActionKey::new(actor, command),
    }
}

/// Text of the cooldown notice.
#[must_use]
pub fn cooldown_message(command: &str, remaining: Duration) -> String {
    format!(
        "⏳ Slow down! You can use `{command}` again in {:.1}s.",
        remaining.as_secs_f64()
    )
}

/// Asks the dispatcher whether this invocation may run.
///
/// Returns the permit to hold for the rest of the command, or `None` when the
/// command must stop. A cooldown gets a short ephemeral notice; duplicates and
/// busy keys are dropped silently.
///
/// # Errors
/// Returns an error if the cooldown notice cannot be sent.
pub async fn admit(
    ctx: poise::Context<'_, BotData, Error>,
    command: &str,
    target: Option<&str>,
) -> Result<Option<ActionPermit>> {
    let key = action_key(ctx.author().id.to_string(), command, target);
    let event = EventId::from(ctx.id());

    match ctx.data().dispatcher.acquire(&event, &key) {
        Ok(permit) => Ok(Some(permit)),
        Err(Decision::Cooldown { remaining }) => {
            debug!(%key, %event, ?remaining, "Command on cooldown");
            ctx.send(
                poise::CreateReply::default()
                    .content(cooldown_message(command, remaining))
                    .ephemeral(true),
            )
            .await?;
            Ok(None)
        }
        Err(decision) => {
            debug!(%key, %event, ?decision, "Command dropped by guard");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_key_normalizes_target() {
        let key = action_key("42", "add", Some("  GLOCK "));
        assert_eq!(key.actor(), "42");
        assert_eq!(key.action(), "add:glock");
        assert_eq!(key, action_key("42", "add", Some("glock")));
    }

    #[test]
    fn test_action_key_without_usable_target() {
        assert_eq!(action_key("42", "inventory", None).action(), "inventory");
        assert_eq!(action_key("42", "add", Some("   ")).action(), "add");
    }

    #[test]
    fn test_cooldown_message_rounds_to_tenths() {
        assert_eq!(
            cooldown_message("add", Duration::from_millis(1250)),
            "⏳ Slow down! You can use `add` again in 1.2s."
        );
    }
}
