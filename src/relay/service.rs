use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::relay::types::{RelayedResult, SearchRelayResponse};
use crate::resolver::{ResolutionOutcome, Resolver, Sentinel};
use crate::search::{SearchError, SearchProvider};

/// Upper bound on results per query, and so on concurrent resolutions.
pub const MAX_RESULTS_CAP: usize = 10;
pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    pub max_results: usize,
    /// Overall limit per top-level resolution; `None` disables it.
    pub deadline: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            deadline: None,
        }
    }
}

#[derive(Clone)]
pub struct RelayService {
    provider: Arc<dyn SearchProvider>,
    resolver: Resolver,
    config: RelayConfig,
}

impl RelayService {
    pub fn new(provider: Arc<dyn SearchProvider>, resolver: Resolver, config: RelayConfig) -> Self {
        Self {
            provider,
            resolver,
            config,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn provider_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Query the provider and resolve each hit concurrently.
    ///
    /// `limit` is clamped to `1..=MAX_RESULTS_CAP`. Results come back in
    /// provider order no matter which resolution finishes first.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        max_content_length: Option<usize>,
    ) -> Result<SearchRelayResponse, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "query is empty".into(),
            });
        }

        let limit = limit
            .unwrap_or(self.config.max_results)
            .clamp(1, MAX_RESULTS_CAP);
        let mut hits = self.provider.search(query, limit).await?;
        hits.truncate(limit);

        let urls: Vec<String> = hits.iter().map(|hit| hit.url.clone()).collect();
        let outcomes = self.resolve_all(&urls, max_content_length).await;

        let results: Vec<RelayedResult> = hits
            .into_iter()
            .zip(outcomes)
            .map(|(hit, outcome)| RelayedResult::new(hit, outcome))
            .collect();

        info!(
            provider = self.provider.name(),
            results = results.len(),
            with_content = results.iter().filter(|r| r.outcome.is_content()).count(),
            "search relayed"
        );

        Ok(SearchRelayResponse {
            query: query.to_string(),
            provider: self.provider.name().to_string(),
            results,
        })
    }

    /// Resolve every URL; the i-th outcome belongs to the i-th URL.
    pub async fn resolve_all(
        &self,
        urls: &[String],
        max_content_length: Option<usize>,
    ) -> Vec<ResolutionOutcome> {
        let concurrency = urls.len().clamp(1, MAX_RESULTS_CAP);
        stream::iter(urls.iter().cloned())
            .map(|url| async move { self.resolve_one(&url, max_content_length).await })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Resolve one URL under the configured deadline, if any.
    pub async fn resolve_one(
        &self,
        url: &str,
        max_content_length: Option<usize>,
    ) -> ResolutionOutcome {
        let resolve_config = self.resolver.config();
        let max_content_length = max_content_length.unwrap_or(resolve_config.max_content_length);
        let resolution = self
            .resolver
            .resolve_with(url, resolve_config.hop_budget, max_content_length);

        let Some(deadline) = self.config.deadline else {
            return resolution.await;
        };

        match tokio::time::timeout(deadline, resolution).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(url, deadline_ms = deadline.as_millis() as u64, "resolution deadline exceeded");
                ResolutionOutcome::sentinel(Sentinel::ContentNotFetched, url, vec![url.to_string()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchAttempt, FetchError, Transport};
    use crate::resolver::{OutcomeKind, ResolveConfig};
    use crate::search::{MockSearchProvider, SearchResult};
    use async_trait::async_trait;
    use url::Url;

    /// Serves `<article>` pages whose body is the path; `/slow/<ms>` sleeps first.
    struct DelayedSite;

    #[async_trait]
    impl Transport for DelayedSite {
        async fn fetch(&self, url: &Url) -> Result<FetchAttempt, FetchError> {
            let path = url.path().trim_start_matches('/');
            if let Some(ms) = path.strip_prefix("slow/") {
                let ms: u64 = ms.parse().unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            if path == "broken" {
                return Err(FetchError::ConnectTimeout);
            }
            let markup = format!("<html><body><article><p>Page {path}</p></article></body></html>");
            Ok(FetchAttempt::from_markup(url.clone(), url.clone(), markup))
        }
    }

    fn hit(url: &str) -> SearchResult {
        SearchResult {
            title: format!("Title {url}"),
            url: url.to_string(),
            snippet: "snippet".into(),
            published_date: None,
            source: "mock".into(),
        }
    }

    fn relay(provider: MockSearchProvider, config: RelayConfig) -> RelayService {
        let resolver = Resolver::new(Arc::new(DelayedSite), ResolveConfig::default());
        RelayService::new(Arc::new(provider), resolver, config)
    }

    #[tokio::test]
    async fn test_results_keep_provider_order() {
        let mut provider = MockSearchProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_search()
            .withf(|query, limit| query.to_string() == "rust" && *limit == 3)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    hit("http://site.test/slow/80"),
                    hit("http://site.test/broken"),
                    hit("http://site.test/fast"),
                ])
            });
        let relay = relay(provider, RelayConfig::default());

        let response = relay.search("  rust ", Some(3), None).await.unwrap();

        assert_eq!(response.query, "rust");
        assert_eq!(response.provider, "mock");
        let urls: Vec<_> = response.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://site.test/slow/80",
                "http://site.test/broken",
                "http://site.test/fast"
            ]
        );
        assert_eq!(response.results[0].outcome.content, "Page slow/80");
        assert_eq!(response.results[1].outcome.kind, OutcomeKind::ContentNotFetched);
        assert_eq!(response.results[2].outcome.content, "Page fast");
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let mut provider = MockSearchProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_search()
            .withf(|_, limit| *limit == MAX_RESULTS_CAP)
            .times(1)
            .returning(|_, _| {
                Ok((0..15).map(|i| hit(&format!("http://site.test/{i}"))).collect())
            });
        let relay = relay(provider, RelayConfig::default());

        let response = relay.search("many", Some(50), None).await.unwrap();

        assert_eq!(response.results.len(), MAX_RESULTS_CAP);
    }

    #[tokio::test]
    async fn test_empty_query_skips_provider() {
        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(0);
        let relay = relay(provider, RelayConfig::default());

        let err = relay.search("   ", None, None).await.unwrap_err();

        assert!(matches!(err, SearchError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_, _| Err(SearchError::RateLimited { retry_after_secs: 30 }));
        let relay = relay(provider, RelayConfig::default());

        let err = relay.search("rust", None, None).await.unwrap_err();

        assert!(matches!(err, SearchError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn test_deadline_yields_sentinel() {
        let relay = relay(
            MockSearchProvider::new(),
            RelayConfig {
                deadline: Some(Duration::from_millis(20)),
                ..RelayConfig::default()
            },
        );

        let outcome = relay.resolve_one("http://site.test/slow/500", None).await;

        assert_eq!(outcome.content, "[Content could not be fetched]");
        assert_eq!(outcome.final_url, "http://site.test/slow/500");
    }

    #[tokio::test]
    async fn test_resolve_all_applies_content_budget() {
        let relay = relay(MockSearchProvider::new(), RelayConfig::default());
        let urls = vec!["http://site.test/a".to_string(), "http://site.test/b".to_string()];

        let outcomes = relay.resolve_all(&urls, Some(4)).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.truncated));
        assert_eq!(outcomes[0].final_url, "http://site.test/a");
        assert_eq!(outcomes[1].final_url, "http://site.test/b");
    }

    #[tokio::test]
    async fn test_search_runs_on_spawned_task() {
        let mut provider = MockSearchProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_search()
            .returning(|_, _| Ok(vec![hit("http://site.test/a"), hit("http://site.test/b")]));
        let relay = relay(provider, RelayConfig::default());

        let response = tokio::spawn(async move { relay.search("rust", None, None).await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].outcome.content, "Page b");
    }

    #[tokio::test]
    async fn test_resolve_all_empty() {
        let relay = relay(MockSearchProvider::new(), RelayConfig::default());
        assert!(relay.resolve_all(&[], None).await.is_empty());
    }
}
