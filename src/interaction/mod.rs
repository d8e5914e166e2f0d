//! Event handling and user interactions for tldr-bot.
//!
//! This module provides functionality for handling chat events:
//! - Classifying which events are addressed to the bot
//! - Interpreting commands and finding links to summarize
//! - Dispatching summaries and replies back to chat
//!
//! Events are handled strictly one after another, in delivery order.

pub mod classifier;
pub mod dispatcher;
pub mod interpreter;
pub mod links;

use tracing::{debug, error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, Void},
    },
    service::{chat::ChatClient, summary::SummaryClient},
};

/// Handles a batch of events, in order, to completion.
///
/// Failures are logged per event and never stop the rest of the batch.
#[instrument(skip_all, fields(events = events.len()))]
pub async fn handle_batch(events: Vec<InboundEvent>, config: &Config, chat: &ChatClient, summary: &SummaryClient) {
    for event in events.iter() {
        if let Err(err) = handle_event(event, config, chat, summary).await {
            error!("Error while handling: {}", err);
        }
    }
}

/// Classifies, interprets, and dispatches a single event.
#[instrument(skip_all, fields(channel_id = %event.channel_id))]
pub async fn handle_event(event: &InboundEvent, config: &Config, chat: &ChatClient, summary: &SummaryClient) -> Void {
    if !classifier::is_relevant(event, &config.bot_id) {
        debug!("Ignoring irrelevant event.");
        return Ok(());
    }

    info!("Handling command ...");

    match interpreter::interpret(event, chat, config.history_count).await {
        Ok(command) => dispatcher::dispatch(command, config, chat, summary).await,
        Err(err) => chat.post_message(&event.channel_id, dispatcher::history_failure_text(&err), &config.bot_username).await,
    }
}
