//! Slack implementation of the chat service.
//!
//! Events arrive over socket mode on the listener's own tasks. The push
//! callback only translates them into `InboundEvent`s and queues them; the
//! runtime drains the queue through `poll`, one batch at a time.

use crate::base::{
    config::Config,
    types::{EventKind, EventSubtype, HistoryMessage, InboundEvent, Res, Void},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use slack_morphism::{SlackBotId, SlackHistoryMessage, events::SlackMessageEventType};
use tokio::sync::{
    Mutex,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;
type Listener = SlackClientSocketModeListener<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    sender: UnboundedSender<InboundEvent>,
}

/// Slack client implementation.
struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    client: Arc<FullClient>,
    sender: Mutex<Option<UnboundedSender<InboundEvent>>>,
    receiver: Mutex<UnboundedReceiver<InboundEvent>>,
    listener: Mutex<Option<Arc<Listener>>>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Make sure the bot token works before going any further.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;

        info!("Slack bot user ID: {}", bot_user.user_id.0);

        if bot_user.user_id.0 != config.bot_id {
            warn!("Configured bot ID `{}` does not match the token's user `{}`; mentions will be matched against the configured ID.", config.bot_id, bot_user.user_id.0);
        }

        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(Self {
            app_token,
            bot_token,
            client,
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
            listener: Mutex::new(None),
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        let sender = self.sender.lock().await.take().ok_or(anyhow::anyhow!("Slack listener already started."))?;

        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState { sender }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token and open the websocket connections.

        socket_mode_listener.listen_for(&self.app_token).await?;
        socket_mode_listener.start().await;

        info!("Slack socket mode listener started.");

        *self.listener.lock().await = Some(socket_mode_listener);

        Ok(())
    }

    async fn poll(&self) -> Res<Vec<InboundEvent>> {
        let mut receiver = self.receiver.lock().await;

        let first = receiver.recv().await.ok_or(anyhow::anyhow!("Slack event stream closed."))?;

        let mut batch = vec![first];
        while let Ok(event) = receiver.try_recv() {
            batch.push(event);
        }

        Ok(batch)
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, channel_id: &str, count: u16) -> Res<Vec<HistoryMessage>> {
        let request = SlackApiConversationsHistoryRequest::new()
            .with_channel(SlackChannelId(channel_id.to_string()))
            .with_limit(count);

        let session = self.client.open_session(&self.bot_token);

        let response = session
            .conversations_history(&request)
            .await
            .map_err(|e| anyhow::anyhow!("Issue pulling data from Slack API: {}", e))?;

        let mut messages: Vec<HistoryMessage> = response.messages.iter().map(history_message).collect();

        // Slack already answers newest first; sorting keeps that true regardless.
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(messages)
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, text: &str, username: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message)
            .with_as_user(false)
            .with_username(username.to_string());

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    async fn shutdown(&self) {
        if let Some(listener) = self.listener.lock().await.take() {
            info!("Shutting down Slack socket mode listener ...");
            listener.shutdown().await;
        }
    }
}

// Slack type mapping.

/// Translate a push event into the bot's event model.
///
/// Returns `None` for message events that carry no channel.
fn inbound_event(body: &SlackEventCallbackBody) -> Option<InboundEvent> {
    match body {
        SlackEventCallbackBody::Message(message) => {
            let channel_id = message.origin.channel.as_ref()?.0.to_owned();
            let text = message.content.as_ref().and_then(|c| c.text.clone()).unwrap_or_default();

            Some(InboundEvent {
                kind: EventKind::Message,
                subtype: message_subtype(message.subtype.as_ref(), message.sender.bot_id.as_ref()),
                channel_id,
                text,
            })
        }
        // App mentions are also delivered as plain message events; only those are acted on.
        _ => Some(InboundEvent {
            kind: EventKind::Other,
            subtype: EventSubtype::Normal,
            channel_id: String::new(),
            text: String::new(),
        }),
    }
}

/// Collapse Slack's message subtypes into the ones the bot cares about.
fn message_subtype(subtype: Option<&SlackMessageEventType>, bot_id: Option<&SlackBotId>) -> EventSubtype {
    match subtype {
        Some(SlackMessageEventType::MessageChanged) | Some(SlackMessageEventType::MessageDeleted) => EventSubtype::Edited,
        Some(SlackMessageEventType::BotMessage) => EventSubtype::BotAuthored,
        _ if bot_id.is_some() => EventSubtype::BotAuthored,
        _ => EventSubtype::Normal,
    }
}

fn history_message(message: &SlackHistoryMessage) -> HistoryMessage {
    HistoryMessage {
        text: message.content.text.clone().unwrap_or_default(),
        author_is_bot: message.sender.bot_id.is_some() || matches!(message.subtype, Some(SlackMessageEventType::BotMessage)),
        timestamp: parse_ts(&message.origin.ts.0),
    }
}

/// Parse a Slack `ts` (`"1700000000.123456"`) into a UTC time.
///
/// The fraction is read as microseconds, padded or truncated to six digits.
fn parse_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, fraction) = ts.split_once('.').unwrap_or((ts, ""));
    let secs = secs.parse::<i64>().ok()?;

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let micros: String = fraction.chars().chain(std::iter::repeat('0')).take(6).collect();
    let micros = micros.parse::<u32>().ok()?;

    DateTime::from_timestamp(secs, micros * 1_000)
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let Some(event) = inbound_event(&event_callback.event) else {
        warn!("Skipping message event without a channel.");
        return Ok(());
    };

    debug!("Queueing {:?} event from channel `{}` ...", event.kind, event.channel_id);

    user_state.sender.send(event).map_err(|_| anyhow::anyhow!("Event queue closed"))?;

    Ok(())
}

// Tests.
