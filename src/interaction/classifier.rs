//! Decides whether an inbound event is addressed to the bot.

use crate::base::types::{EventKind, EventSubtype, InboundEvent};

/// The text Slack embeds when a user @-mentions the bot.
pub fn mention_token(bot_id: &str) -> String {
    format!("<@{bot_id}>")
}

/// Whether the bot should act on this event.
///
/// Edited and bot-authored messages are never relevant, which keeps the bot
/// from replying to its own posts. Every direct message is relevant; channel
/// messages are relevant only when they mention the bot.
pub fn is_relevant(event: &InboundEvent, bot_id: &str) -> bool {
    if event.kind != EventKind::Message {
        return false;
    }

    if matches!(event.subtype, EventSubtype::Edited | EventSubtype::BotAuthored) {
        return false;
    }

    if event.is_direct_message() {
        return true;
    }

    event.text.contains(&mention_token(bot_id))
}

// Tests.
