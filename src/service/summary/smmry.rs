//! Thin wrapper around the SMMRY HTTP API.
//!
//! SMMRY takes its arguments in the query string. `SM_URL` must come last and
//! is passed through without percent-encoding so that the target link's own
//! query string survives intact.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{base::config::Config, interaction::links};

use super::{GenericSummaryClient, Summary, SummaryClient, SummaryError, SummaryResult};

// Extra methods on `SummaryClient` applied by the smmry implementation.

impl SummaryClient {
    pub fn smmry(config: &Config) -> Self {
        let client = SmmryClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// SMMRY summary client implementation.
#[derive(Clone)]
pub struct SmmryClient {
    client: reqwest::Client,
    config: Config,
}

impl SmmryClient {
    /// Create a new SMMRY client.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl GenericSummaryClient for SmmryClient {
    #[instrument(name = "SmmryClient::summarize", skip(self))]
    async fn summarize(&self, url: &str) -> SummaryResult {
        if !links::is_url_like(url) {
            info!("Not attempting to summarize `{}`, invalid URL.", url);
            return Err(SummaryError::InvalidUrl);
        }

        let request_url = request_url(
            &self.config.smmry_base_url,
            &self.config.smmry_api_key,
            self.config.summary_length,
            self.config.summary_keyword_count,
            url,
        );

        let response = self
            .client
            .post(request_url)
            .header("Expect", "")
            .send()
            .await
            .map_err(|e| SummaryError::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| SummaryError::Unreachable(e.to_string()))?;

        let result = parse_response(status, &body, url);

        if let Err(err) = &result {
            warn!("SMMRY failure: {}", err);
        }

        result
    }
}

// Wire format.

#[derive(Debug, Deserialize)]
struct SmmryResponse {
    sm_api_title: Option<String>,
    sm_api_content: Option<String>,
    #[serde(default)]
    sm_api_keyword_array: Vec<String>,
    sm_api_error: Option<serde_json::Value>,
    sm_api_message: Option<String>,
}

/// Build the SMMRY request URL.
fn request_url(base_url: &str, api_key: &str, length: u32, keyword_count: u32, url: &str) -> String {
    format!("{base_url}?SM_LENGTH={length}&SM_API_KEY={api_key}&SM_KEYWORD_COUNT={keyword_count}&SM_URL={url}")
}

/// Turn a raw SMMRY response into a summary or a user-facing failure.
fn parse_response(status: u16, body: &str, url: &str) -> SummaryResult {
    if status != 200 {
        return Err(SummaryError::Status(status));
    }

    let parsed: SmmryResponse = serde_json::from_str(body).map_err(|e| SummaryError::Decode(e.to_string()))?;

    if parsed.sm_api_error.is_some() {
        return Err(SummaryError::Provider {
            url: url.to_string(),
            message: parsed.sm_api_message.unwrap_or_default(),
        });
    }

    let (Some(title), Some(body)) = (parsed.sm_api_title, parsed.sm_api_content) else {
        return Err(SummaryError::Decode("missing title or content".to_string()));
    };

    Ok(Summary {
        title,
        body,
        keywords: parsed.sm_api_keyword_array,
    })
}

// Tests.
