use async_trait::async_trait;

use crate::search::types::{SearchError, SearchResult};

/// A web search backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run `query`, returning at most `num_results` hits in provider order.
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Provider name used in logs and responses.
    fn name(&self) -> &'static str;

    /// False when the provider cannot serve requests (e.g. no API key).
    fn is_available(&self) -> bool;
}
