//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default display name used when posting replies.
fn default_bot_username() -> String {
    "tldr_bot".to_string()
}

/// Default SMMRY API endpoint.
fn default_smmry_base_url() -> String {
    "http://api.smmry.com/".to_string()
}

/// Default number of sentences in a summary.
fn default_summary_length() -> u32 {
    5
}

/// Default number of keywords returned with a summary.
fn default_summary_keyword_count() -> u32 {
    3
}

/// Default number of messages pulled when scanning a channel for a link.
fn default_history_count() -> u16 {
    100
}

/// Configuration for the tldr-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Slack app token used for socket mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// The bot's Slack user ID, used to recognize `<@BOT_ID>` mentions (`BOT_ID`).
    pub bot_id: String,
    /// SMMRY API key (`SMMRY_API_KEY`).
    pub smmry_api_key: String,
    /// Display name attached to every reply (`BOT_USERNAME`).
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
    /// SMMRY endpoint (`SMMRY_BASE_URL`).
    #[serde(default = "default_smmry_base_url")]
    pub smmry_base_url: String,
    /// Sentences per summary (`SUMMARY_LENGTH`).
    #[serde(default = "default_summary_length")]
    pub summary_length: u32,
    /// Keywords per summary (`SUMMARY_KEYWORD_COUNT`).
    #[serde(default = "default_summary_keyword_count")]
    pub summary_keyword_count: u32,
    /// Messages fetched when looking for a link in a channel (`HISTORY_COUNT`).
    #[serde(default = "default_history_count")]
    pub history_count: u16,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            slack_app_token: String::new(),
            slack_bot_token: String::new(),
            bot_id: String::new(),
            smmry_api_key: String::new(),
            bot_username: default_bot_username(),
            smmry_base_url: default_smmry_base_url(),
            summary_length: default_summary_length(),
            summary_keyword_count: default_summary_keyword_count(),
            history_count: default_history_count(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TLDR_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check that credentials are present and tunables are in range.
    pub fn validate(&self) -> Void {
        let required = [
            ("slack_app_token", &self.slack_app_token),
            ("slack_bot_token", &self.slack_bot_token),
            ("bot_id", &self.bot_id),
            ("smmry_api_key", &self.smmry_api_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("Missing required configuration value `{name}`."));
            }
        }

        if self.summary_length < 1 || self.summary_length > 40 {
            return Err(anyhow::anyhow!("Summary length must be between 1 and 40."));
        }

        if self.summary_keyword_count > 20 {
            return Err(anyhow::anyhow!("Summary keyword count must be between 0 and 20."));
        }

        if self.history_count < 1 || self.history_count > 1000 {
            return Err(anyhow::anyhow!("History count must be between 1 and 1000."));
        }

        Ok(())
    }
}

// Tests.
