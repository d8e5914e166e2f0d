//! Runtime services and shared state for the tldr-bot.

use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction,
    service::{chat::ChatClient, summary::SummaryClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client, summary client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The summary client instance.
    pub summary: SummaryClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the summary client.
        let summary = SummaryClient::smmry(&config);

        // Initialize the slack client.
        let chat = ChatClient::slack(&config).await?;

        Ok(Self { config, chat, summary })
    }

    /// Connect to chat and process event batches until shutdown.
    ///
    /// Each batch is handled to completion before the next poll. Returns on
    /// Ctrl-C, or with an error if the event stream closes.
    pub async fn start(&self) -> Void {
        self.chat.start().await?;

        info!("Listening for events ...");

        let result = loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl-C, shutting down ...");
                    break Ok(());
                }
                batch = self.chat.poll() => match batch {
                    Ok(events) => interaction::handle_batch(events, &self.config, &self.chat, &self.summary).await,
                    Err(err) => {
                        error!("Event stream failed: {}", err);
                        break Err(err);
                    }
                },
            }
        };

        self.chat.shutdown().await;

        result
    }
}
