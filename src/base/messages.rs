//! Canned replies posted by the bot.

/// Posted in response to `help`.
pub const HELP_MESSAGE: &str = "What's up! I'm a bot for summarizing external links sent over Slack. \
Here's how to use me: @tldr_bot [#channel|help], or DM me a link or a #channel. \
Call me and I'll automatically summarize the most recent external link posted to the specified channel, \
outputting the summary to where you called me from. \
If you don't specify a place to look, I'll just look in the channel where you called me.";

/// Posted when no link could be found to summarize.
pub const CONFUSED_MESSAGE: &str = "I'm sorry I don't understand that! \
Please provide a link to an external web-page so I can try to summarize it!";

/// Posted when a channel's history could not be read.
pub const UNREACHABLE_MESSAGE: &str = "Issue connecting to Slack API! I couldn't read the history of that conversation.";
