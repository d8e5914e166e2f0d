//! Turns a relevant event into a `ParsedCommand`.
//!
//! Interpretation happens in two steps: `parse` is a pure reading of the event
//! text, and `resolve` looks up channel history for commands that point at a
//! channel rather than a link.

use tracing::{debug, info, instrument};

use crate::{
    base::types::{Action, InboundEvent, ParsedCommand, Res},
    interaction::links,
    service::chat::ChatClient,
};

/// Marker Slack places in front of a channel reference (`<#C123|general>`).
const CHANNEL_REFERENCE_MARKER: &str = "<#";

/// Interpret an event fully, fetching channel history where needed.
#[instrument(skip_all)]
pub async fn interpret(event: &InboundEvent, chat: &ChatClient, history_count: u16) -> Res<ParsedCommand> {
    let command = parse(event);
    resolve(command, chat, history_count).await
}

/// Read the command out of the event text without touching the network.
pub fn parse(event: &InboundEvent) -> ParsedCommand {
    let action = parse_action(event);
    ParsedCommand::new(action, event.channel_id.clone())
}

fn parse_action(event: &InboundEvent) -> Action {
    let text = event.text.trim();

    if text.split_whitespace().any(|token| token == "help") {
        return Action::Help;
    }

    if !event.is_direct_message() {
        return Action::SummarizeChannel {
            channel_id: event.channel_id.clone(),
        };
    }

    if text.starts_with(CHANNEL_REFERENCE_MARKER) {
        return match referenced_channel(text) {
            Some(channel_id) => Action::SummarizeChannel { channel_id },
            None => Action::Indecipherable,
        };
    }

    if links::is_url_like(text) {
        return Action::SummarizeUrl {
            url: links::debracket(text).to_string(),
        };
    }

    Action::Indecipherable
}

/// Pull the channel ID out of a `<#C123|name>` reference.
fn referenced_channel(text: &str) -> Option<String> {
    let reference = text.split_whitespace().next()?.strip_prefix(CHANNEL_REFERENCE_MARKER)?;
    let reference = reference.split('|').next().unwrap_or_default();
    let channel_id = reference.strip_suffix('>').unwrap_or(reference);

    (!channel_id.is_empty()).then(|| channel_id.to_string())
}

/// Replace a channel reference with the most recent link posted there.
///
/// Any other command passes through untouched. History fetch failures are
/// returned to the caller as-is.
#[instrument(skip_all)]
pub async fn resolve(command: ParsedCommand, chat: &ChatClient, history_count: u16) -> Res<ParsedCommand> {
    let ParsedCommand { action, reply_channel_id } = command;

    let channel_id = match action {
        Action::SummarizeChannel { channel_id } => channel_id,
        action => return Ok(ParsedCommand { action, reply_channel_id }),
    };

    let history = chat
        .fetch_history(&channel_id, history_count)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot reach chat service: {}", e))?;

    debug!("Scanning {} messages in `{}` for a link ...", history.len(), channel_id);

    let action = match links::most_recent_url(&history) {
        Some(url) => {
            info!("Found link `{}` in `{}`.", url, channel_id);
            Action::SummarizeUrl { url }
        }
        None => {
            info!("No link found in `{}`.", channel_id);
            Action::Indecipherable
        }
    };

    Ok(ParsedCommand::new(action, reply_channel_id))
}

// Tests.
