//! Integration with text summarization services.
//!
//! The module defines the `GenericSummaryClient` trait that can be implemented
//! for different summarization providers, with a default implementation for SMMRY.

pub mod smmry;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Types.

/// A successful summary of a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub body: String,
    /// Keywords in the order the provider reported them.
    pub keywords: Vec<String>,
}

/// Why a page could not be summarized.
///
/// The `Display` text is shown to users as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Link provided not a valid URL")]
    InvalidUrl,

    #[error("Unable to reach the summarization service: {0}")]
    Unreachable(String),

    #[error("Request to SMMRY API failed with code {0}")]
    Status(u16),

    #[error("SMMRY failed to summarize {url} with message: {message}")]
    Provider { url: String, message: String },

    #[error("Unable to read the SMMRY API response: {0}")]
    Decode(String),
}

pub type SummaryResult = Result<Summary, SummaryError>;

// Traits.

/// Generic summarization client trait that clients must implement.
#[async_trait]
pub trait GenericSummaryClient: Send + Sync + 'static {
    /// Summarize the page at `url`.
    ///
    /// A single attempt is made; failures are returned, never retried.
    async fn summarize(&self, url: &str) -> SummaryResult;
}

// Structs.

/// Summarization client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct SummaryClient {
    inner: Arc<dyn GenericSummaryClient>,
}

impl Deref for SummaryClient {
    type Target = dyn GenericSummaryClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl SummaryClient {
    pub fn new(inner: Arc<dyn GenericSummaryClient>) -> Self {
        Self { inner }
    }
}
