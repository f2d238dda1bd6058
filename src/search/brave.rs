//! Brave Search web-search API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::search::{
    provider::SearchProvider,
    types::{SearchError, SearchResult},
};

pub const BRAVE_API_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const PROVIDER_NAME: &str = "brave";
const MAX_COUNT: usize = 20;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BraveSearchProvider {
    api_key: String,
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl BraveSearchProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, BRAVE_API_URL, DEFAULT_TIMEOUT)
    }

    /// Client against a custom endpoint (self-hosted proxy, test server).
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Client(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            timeout,
            client,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            SearchError::ApiError {
                status: 0,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl SearchProvider for BraveSearchProvider {
    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "query is empty".into(),
            });
        }
        if !self.is_available() {
            return Err(SearchError::NoApiKey {
                provider: PROVIDER_NAME.into(),
            });
        }

        let count = num_results.clamp(1, MAX_COUNT).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(retry_after_secs, "search provider rate limited");
            return Err(SearchError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SearchError::NoApiKey {
                provider: PROVIDER_NAME.into(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: BraveResponse = response.json().await.map_err(|e| SearchError::ApiError {
            status: status.as_u16(),
            message: format!("json parse error: {e}"),
        })?;

        let results: Vec<SearchResult> = data
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(num_results)
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                snippet: r.description.unwrap_or_default(),
                published_date: r.age,
                source: PROVIDER_NAME.into(),
            })
            .collect();

        debug!(count = results.len(), "search results received");
        Ok(results)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    title: String,
    url: String,
    description: Option<String>,
    age: Option<String>,
}
