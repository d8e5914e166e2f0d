//! Carries out a `ParsedCommand` and posts the single reply it produces.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        messages::{CONFUSED_MESSAGE, HELP_MESSAGE, UNREACHABLE_MESSAGE},
        types::{Action, ParsedCommand, Void},
    },
    interaction::interpreter,
    service::{
        chat::ChatClient,
        summary::{Summary, SummaryClient},
    },
};

/// Execute the command, posting exactly one message to its reply channel.
///
/// Summarization and history failures become the reply text. The only error
/// returned is a failure to post that reply.
#[instrument(skip_all, fields(reply_channel_id = %command.reply_channel_id))]
pub async fn dispatch(command: ParsedCommand, config: &Config, chat: &ChatClient, summary: &SummaryClient) -> Void {
    let ParsedCommand { action, reply_channel_id } = command;

    let text = match action {
        Action::Help => HELP_MESSAGE.to_string(),
        Action::Indecipherable => CONFUSED_MESSAGE.to_string(),
        Action::SummarizeUrl { url } => summarize(&url, summary).await,
        Action::SummarizeChannel { channel_id } => {
            let command = ParsedCommand::new(Action::SummarizeChannel { channel_id }, reply_channel_id.clone());

            match interpreter::resolve(command, chat, config.history_count).await {
                Ok(ParsedCommand {
                    action: Action::SummarizeUrl { url },
                    ..
                }) => summarize(&url, summary).await,
                Ok(_) => CONFUSED_MESSAGE.to_string(),
                Err(err) => history_failure_text(&err).to_string(),
            }
        }
    };

    chat.post_message(&reply_channel_id, &text, &config.bot_username).await
}

/// Reply text for a channel history lookup that failed.
pub(crate) fn history_failure_text(err: &anyhow::Error) -> &'static str {
    warn!("{}", err);
    UNREACHABLE_MESSAGE
}

/// Summarize the link, falling back to the failure text.
async fn summarize(url: &str, summary: &SummaryClient) -> String {
    info!("Attempting to summarize page at {}", url);

    match summary.summarize(url).await {
        Ok(result) => format_summary(&result),
        Err(err) => {
            info!("Failed to summarize page at {} with message: {}", url, err);
            err.to_string()
        }
    }
}

/// Render a summary as the three-line chat reply.
pub fn format_summary(summary: &Summary) -> String {
    format!("Summary title: {}\nSummary: {}\nKeywords: [{}]", summary.title, summary.body, summary.keywords.join(", "))
}

// Tests.
