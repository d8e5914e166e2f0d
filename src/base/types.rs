use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The broad kind of an inbound chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Message,
    Other,
}

/// The flavor of a message event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSubtype {
    Normal,
    Edited,
    BotAuthored,
}

/// One event delivered by the chat transport.
///
/// Built by the transport adapter, consumed by exactly one pass through the
/// classifier, interpreter, and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub subtype: EventSubtype,
    pub channel_id: String,
    pub text: String,
}

impl InboundEvent {
    /// Plain user message on a channel.
    pub fn message(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Message,
            subtype: EventSubtype::Normal,
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }

    /// Whether the event arrived on a direct message channel.
    ///
    /// Slack direct message channel IDs start with `D`.
    pub fn is_direct_message(&self) -> bool {
        self.channel_id.starts_with('D')
    }
}

/// What the bot has decided to do about an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    Help,
    Indecipherable,
    SummarizeUrl { url: String },
    SummarizeChannel { channel_id: String },
}

/// An interpreted command, along with where the response should go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub action: Action,
    /// Always the channel the triggering event came from.
    pub reply_channel_id: String,
}

impl ParsedCommand {
    pub fn new(action: Action, reply_channel_id: impl Into<String>) -> Self {
        Self {
            action,
            reply_channel_id: reply_channel_id.into(),
        }
    }
}

/// A single message from a channel's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub text: String,
    pub author_is_bot: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryMessage {
    pub fn new(text: impl Into<String>, author_is_bot: bool) -> Self {
        Self {
            text: text.into(),
            author_is_bot,
            timestamp: None,
        }
    }
}
