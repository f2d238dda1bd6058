use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A single hit as returned by a search provider, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Provider name, e.g. "brave".
    pub source: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("search api error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("search timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("no api key configured for {provider}")]
    NoApiKey { provider: String },

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("http client error: {0}")]
    Client(String),
}

impl SearchError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout { .. })
    }
}
