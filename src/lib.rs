//! Library root for `tldr-bot`.
//!
//! Tldr-bot watches Slack for messages addressed to it and summarizes links:
//! - Direct messages with a link summarize that link
//! - Direct messages with a `#channel` summarize the newest link posted there
//! - @-mentions in a channel summarize the newest link in that channel
//!
//! Summaries come from SMMRY and are posted back where the bot was called.
//! Chat and summarization both sit behind traits so that each can be swapped
//! or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the tldr-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with chat and summary clients
/// - Starts the main event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting tldr-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
