//! Chat service integration for tldr-bot.
//!
//! This module provides functionality for interacting with chat platforms like Slack:
//! - Receiving message events in delivery order
//! - Reading channel history
//! - Posting replies
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Slack.

pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{HistoryMessage, InboundEvent, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with the tldr-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// Connects to the platform's real-time feed and begins queueing events
    /// for `poll`. Returns once the connection is established.
    async fn start(&self) -> Void;

    /// Wait for the next batch of events.
    ///
    /// Blocks until at least one event is available, then returns everything
    /// queued so far in delivery order. Fails once the feed has closed.
    async fn poll(&self) -> Res<Vec<InboundEvent>>;

    /// Get up to `count` recent messages from a channel, newest first.
    async fn fetch_history(&self, channel_id: &str, count: u16) -> Res<Vec<HistoryMessage>>;

    /// Post a message to a channel under the given display name.
    async fn post_message(&self, channel_id: &str, text: &str, username: &str) -> Void;

    /// Stop listening for events.
    async fn shutdown(&self);
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
