//! Link detection over raw message text.
//!
//! The URL test is a deliberately loose substring heuristic. It has known
//! false positives (`abc.community` matches `.co`) that are kept as-is.

use crate::base::types::HistoryMessage;

/// Substrings that mark a token as URL-like.
const URL_IDENTIFIERS: [&str; 6] = [".com", ".org", ".edu", ".co", "www.", "http"];

/// Whether the string contains any of the URL identifiers.
pub fn is_url_like(text: &str) -> bool {
    URL_IDENTIFIERS.iter().any(|identifier| text.contains(identifier))
}

/// All whitespace-delimited URL-like tokens, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<&str> {
    text.split_whitespace().filter(|token| is_url_like(token)).collect()
}

/// Strip Slack's link formatting.
///
/// Slack sends links as `<http://x.com>` or `<http://x.com|x.com>`; plain
/// tokens pass through untouched.
pub fn debracket(token: &str) -> &str {
    let token = token.strip_prefix('<').unwrap_or(token);
    let token = token.strip_suffix('>').unwrap_or(token);

    match token.split_once('|') {
        Some((url, _)) => url,
        None => token,
    }
}

/// Find the link to summarize in a newest-first history.
///
/// Picks the newest message not authored by a bot that holds a URL-like token,
/// then the last such token within that message.
pub fn most_recent_url(history: &[HistoryMessage]) -> Option<String> {
    history
        .iter()
        .filter(|message| !message.author_is_bot)
        .find_map(|message| extract_urls(&message.text).last().map(|token| debracket(token).to_string()))
}

// Tests.
