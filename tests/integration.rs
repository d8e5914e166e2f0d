#![cfg(test)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use tldr_bot::{
    base::{
        config::{Config, ConfigInner},
        messages::{CONFUSED_MESSAGE, HELP_MESSAGE, UNREACHABLE_MESSAGE},
        types::{Action, EventKind, EventSubtype, HistoryMessage, InboundEvent, ParsedCommand, Res, Void},
    },
    interaction::{self, dispatcher, interpreter},
    runtime::Runtime,
    service::{
        chat::{ChatClient, GenericChatClient},
        summary::{GenericSummaryClient, Summary, SummaryClient, SummaryError, SummaryResult},
    },
};

// Mocks.

// Mock chat client for testing.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        async fn start(&self) -> Void;
        async fn poll(&self) -> Res<Vec<InboundEvent>>;
        async fn fetch_history(&self, channel_id: &str, count: u16) -> Res<Vec<HistoryMessage>>;
        async fn post_message(&self, channel_id: &str, text: &str, username: &str) -> Void;
        async fn shutdown(&self);
    }
}

// Mock summary client for testing.

mock! {
    pub Summarizer {}

    #[async_trait]
    impl GenericSummaryClient for Summarizer {
        async fn summarize(&self, url: &str) -> SummaryResult;
    }
}

type Posts = Arc<Mutex<Vec<(String, String)>>>;

const BOT_ID: &str = "U12345";

fn test_config() -> Config {
    Config::from(ConfigInner {
        slack_app_token: "xapp-test".to_string(),
        slack_bot_token: "xoxb-test".to_string(),
        bot_id: BOT_ID.to_string(),
        smmry_api_key: "smmry-test".to_string(),
        ..Default::default()
    })
}

fn test_summary() -> Summary {
    Summary {
        title: "Example Domain".to_string(),
        body: "This domain is for use in illustrative examples.".to_string(),
        keywords: vec!["domain".to_string(), "example".to_string(), "illustrative".to_string()],
    }
}

fn linked_history() -> Vec<HistoryMessage> {
    vec![
        HistoryMessage::new("no link here", false),
        HistoryMessage::new("check http://x.com/a", false),
        HistoryMessage::new("http://old.com", false),
    ]
}

/// A chat mock that records every post.
fn recording_chat(posts: &Posts) -> MockChat {
    let mut mock = MockChat::new();
    let posts = posts.clone();

    mock.expect_post_message().returning(move |channel_id, text, username| {
        assert_eq!(username, "tldr_bot");
        posts.lock().unwrap().push((channel_id.to_string(), text.to_string()));
        Ok(())
    });

    mock
}

fn clients(chat: MockChat, summarizer: MockSummarizer) -> (ChatClient, SummaryClient) {
    (ChatClient::new(Arc::new(chat)), SummaryClient::new(Arc::new(summarizer)))
}

fn posted(posts: &Posts) -> Vec<(String, String)> {
    posts.lock().unwrap().clone()
}

fn post(channel_id: &str, text: &str) -> (String, String) {
    (channel_id.to_string(), text.to_string())
}

// Pipeline tests.

#[tokio::test]
async fn test_direct_message_link_gets_one_summary() {
    let posts = Posts::default();
    let chat = recording_chat(&posts);

    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().withf(|url| url == "http://x.com/a").times(1).returning(|_| Ok(test_summary()));

    let (chat, summary) = clients(chat, summarizer);
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("D01", "<http://x.com/a>")], &config, &chat, &summary).await;

    assert_eq!(
        posted(&posts),
        vec![post(
            "D01",
            "Summary title: Example Domain\nSummary: This domain is for use in illustrative examples.\nKeywords: [domain, example, illustrative]"
        )]
    );
}

#[tokio::test]
async fn test_help_posts_help_text_once() {
    let posts = Posts::default();
    let (chat, summary) = clients(recording_chat(&posts), MockSummarizer::new());
    let config = test_config();

    let event = InboundEvent::message("C01", "<@U12345> help http://x.com");
    interaction::handle_event(&event, &config, &chat, &summary).await.unwrap();

    assert_eq!(posted(&posts), vec![post("C01", HELP_MESSAGE)]);
}

#[tokio::test]
async fn test_irrelevant_events_are_ignored() {
    // Neither mock has expectations, so any call would panic.
    let (chat, summary) = clients(MockChat::new(), MockSummarizer::new());
    let config = test_config();

    let events = vec![
        InboundEvent {
            kind: EventKind::Message,
            subtype: EventSubtype::BotAuthored,
            channel_id: "D01".to_string(),
            text: "Summary title: http://x.com".to_string(),
        },
        InboundEvent {
            kind: EventKind::Message,
            subtype: EventSubtype::Edited,
            channel_id: "C01".to_string(),
            text: "<@U12345>".to_string(),
        },
        InboundEvent {
            kind: EventKind::Other,
            subtype: EventSubtype::Normal,
            channel_id: String::new(),
            text: String::new(),
        },
        InboundEvent::message("C01", "no mention http://x.com"),
    ];

    interaction::handle_batch(events, &config, &chat, &summary).await;
}

#[tokio::test]
async fn test_channel_mention_scans_current_channel() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);
    chat.expect_fetch_history().withf(|channel_id, count| channel_id == "C01" && *count == 100).times(1).returning(|_, _| Ok(linked_history()));

    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().withf(|url| url == "http://x.com/a").times(1).returning(|_| Ok(test_summary()));

    let (chat, summary) = clients(chat, summarizer);
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("C01", "<@U12345> tldr please")], &config, &chat, &summary).await;

    let posts = posted(&posts);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "C01");
    assert!(posts[0].1.starts_with("Summary title: Example Domain"));
}

#[tokio::test]
async fn test_direct_message_channel_reference_replies_in_dm() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);
    chat.expect_fetch_history()
        .withf(|channel_id, _| channel_id == "C02")
        .times(1)
        .returning(|_, _| Ok(vec![HistoryMessage::new("http://bot.com/summary", true), HistoryMessage::new("see <https://news.org/story|news.org/story>", false)]));

    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().withf(|url| url == "https://news.org/story").times(1).returning(|_| Ok(test_summary()));

    let (chat, summary) = clients(chat, summarizer);
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("D01", "<#C02|general>")], &config, &chat, &summary).await;

    let posts = posted(&posts);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "D01");
}

#[tokio::test]
async fn test_history_failure_replies_unreachable() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);
    chat.expect_fetch_history().times(1).returning(|_, _| Err(anyhow::anyhow!("channel_not_found")));

    let (chat, summary) = clients(chat, MockSummarizer::new());
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("D01", "<#C99|gone>")], &config, &chat, &summary).await;

    assert_eq!(posted(&posts), vec![post("D01", UNREACHABLE_MESSAGE)]);
}

#[tokio::test]
async fn test_no_link_in_history_replies_confused() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);
    chat.expect_fetch_history().times(1).returning(|_, _| Ok(vec![HistoryMessage::new("<@U12345>", false), HistoryMessage::new("lunch?", false)]));

    let (chat, summary) = clients(chat, MockSummarizer::new());
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("C01", "<@U12345>")], &config, &chat, &summary).await;

    assert_eq!(posted(&posts), vec![post("C01", CONFUSED_MESSAGE)]);
}

#[tokio::test]
async fn test_provider_error_is_posted_verbatim() {
    let error = SummaryError::Provider {
        url: "http://x.com/a".to_string(),
        message: "SOURCE IS TOO SHORT".to_string(),
    };
    let expected = error.to_string();

    let posts = Posts::default();
    let chat = recording_chat(&posts);

    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().times(1).returning(move |_| Err(error.clone()));

    let (chat, summary) = clients(chat, summarizer);
    let config = test_config();

    interaction::handle_batch(vec![InboundEvent::message("D01", "http://x.com/a")], &config, &chat, &summary).await;

    assert_eq!(posted(&posts), vec![post("D01", &expected)]);
}

#[tokio::test]
async fn test_batch_order_is_preserved() {
    let posts = Posts::default();
    let (chat, summary) = clients(recording_chat(&posts), MockSummarizer::new());
    let config = test_config();

    let events = vec![
        InboundEvent::message("C01", "<@U12345> help"),
        InboundEvent::message("D01", "what?"),
        InboundEvent::message("C02", "just talking"),
        InboundEvent::message("D02", "help"),
    ];

    interaction::handle_batch(events, &config, &chat, &summary).await;

    assert_eq!(posted(&posts), vec![post("C01", HELP_MESSAGE), post("D01", CONFUSED_MESSAGE), post("D02", HELP_MESSAGE)]);
}

#[tokio::test]
async fn test_failed_post_does_not_stop_batch() {
    let posts = Posts::default();
    let recorded = posts.clone();

    let mut chat = MockChat::new();
    chat.expect_post_message().times(2).returning(move |channel_id, text, _| {
        if channel_id == "D01" {
            return Err(anyhow::anyhow!("channel_not_found"));
        }
        recorded.lock().unwrap().push((channel_id.to_string(), text.to_string()));
        Ok(())
    });

    let (chat, summary) = clients(chat, MockSummarizer::new());
    let config = test_config();

    let events = vec![InboundEvent::message("D01", "help"), InboundEvent::message("D02", "help")];
    interaction::handle_batch(events, &config, &chat, &summary).await;

    assert_eq!(posted(&posts), vec![post("D02", HELP_MESSAGE)]);
}

// Component tests.

#[tokio::test]
async fn test_interpret_resolves_channel_to_url() {
    let mut chat = MockChat::new();
    chat.expect_fetch_history().times(1).returning(|_, _| Ok(linked_history()));
    let chat = ChatClient::new(Arc::new(chat));

    let command = interpreter::interpret(&InboundEvent::message("C01", "<@U12345>"), &chat, 100).await.unwrap();

    assert_eq!(
        command,
        ParsedCommand::new(
            Action::SummarizeUrl {
                url: "http://x.com/a".to_string()
            },
            "C01"
        )
    );
}

#[tokio::test]
async fn test_interpret_skips_bot_authored_history() {
    let mut chat = MockChat::new();
    chat.expect_fetch_history()
        .times(1)
        .returning(|_, _| Ok(vec![HistoryMessage::new("http://newest-bot.com", true), HistoryMessage::new("http://human.com/page", false)]));
    let chat = ChatClient::new(Arc::new(chat));

    let command = interpreter::interpret(&InboundEvent::message("C01", "<@U12345>"), &chat, 100).await.unwrap();

    assert_eq!(
        command.action,
        Action::SummarizeUrl {
            url: "http://human.com/page".to_string()
        }
    );
}

#[tokio::test]
async fn test_interpret_propagates_history_failure() {
    let mut chat = MockChat::new();
    chat.expect_fetch_history().times(1).returning(|_, _| Err(anyhow::anyhow!("ratelimited")));
    let chat = ChatClient::new(Arc::new(chat));

    let result = interpreter::interpret(&InboundEvent::message("C01", "<@U12345>"), &chat, 100).await;

    assert!(result.unwrap_err().to_string().contains("Cannot reach chat service"));
}

#[tokio::test]
async fn test_interpret_does_not_fetch_for_direct_links() {
    // No history expectation; fetching would panic.
    let chat = ChatClient::new(Arc::new(MockChat::new()));

    let command = interpreter::interpret(&InboundEvent::message("D01", "<http://x.com/a|x.com/a>"), &chat, 100).await.unwrap();

    assert_eq!(
        command.action,
        Action::SummarizeUrl {
            url: "http://x.com/a".to_string()
        }
    );
}

#[tokio::test]
async fn test_dispatch_resolves_unresolved_channel_command() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);
    chat.expect_fetch_history().withf(|channel_id, _| channel_id == "C02").times(1).returning(|_, _| Ok(linked_history()));

    let mut summarizer = MockSummarizer::new();
    summarizer.expect_summarize().withf(|url| url == "http://x.com/a").times(1).returning(|_| Err(SummaryError::Status(500)));

    let (chat, summary) = clients(chat, summarizer);
    let config = test_config();

    let command = ParsedCommand::new(
        Action::SummarizeChannel {
            channel_id: "C02".to_string(),
        },
        "D01",
    );
    dispatcher::dispatch(command, &config, &chat, &summary).await.unwrap();

    assert_eq!(posted(&posts), vec![post("D01", "Request to SMMRY API failed with code 500")]);
}

#[tokio::test]
async fn test_dispatch_indecipherable() {
    let posts = Posts::default();
    let (chat, summary) = clients(recording_chat(&posts), MockSummarizer::new());
    let config = test_config();

    dispatcher::dispatch(ParsedCommand::new(Action::Indecipherable, "C01"), &config, &chat, &summary).await.unwrap();

    assert_eq!(posted(&posts), vec![post("C01", CONFUSED_MESSAGE)]);
}

// Runtime tests.

#[tokio::test]
async fn test_runtime_processes_batches_until_stream_closes() {
    let posts = Posts::default();
    let mut chat = recording_chat(&posts);

    chat.expect_start().times(1).returning(|| Ok(()));

    let mut polls = 0;
    chat.expect_poll().times(3).returning(move || {
        polls += 1;
        match polls {
            1 => Ok(vec![InboundEvent::message("D01", "help")]),
            2 => Ok(vec![InboundEvent::message("C01", "chatter"), InboundEvent::message("D02", "?")]),
            _ => Err(anyhow::anyhow!("Slack event stream closed.")),
        }
    });

    chat.expect_shutdown().times(1).returning(|| ());

    let (chat, summary) = clients(chat, MockSummarizer::new());
    let runtime = Runtime {
        config: test_config(),
        chat,
        summary,
    };

    let result = runtime.start().await;

    assert!(result.is_err());
    assert_eq!(posted(&posts), vec![post("D01", HELP_MESSAGE), post("D02", CONFUSED_MESSAGE)]);
}

#[tokio::test]
async fn test_runtime_fails_fast_when_transport_cannot_start() {
    let mut chat = MockChat::new();
    chat.expect_start().times(1).returning(|| Err(anyhow::anyhow!("invalid_auth")));

    let (chat, summary) = clients(chat, MockSummarizer::new());
    let runtime = Runtime {
        config: test_config(),
        chat,
        summary,
    };

    assert!(runtime.start().await.is_err());
}
