use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::extractor::{self, DEFAULT_MAX_CONTENT_LENGTH};
use crate::fetcher::Transport;
use crate::resolver::{
    detect::is_redirect_page,
    extract::extract_real_url,
    outcome::{ResolutionOutcome, Sentinel},
    url::{canonical, same_url},
};

pub const DEFAULT_HOP_BUDGET: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Soft-redirect follows allowed per chain.
    pub hop_budget: u32,
    pub max_content_length: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            hop_budget: DEFAULT_HOP_BUDGET,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

/// State of one resolution chain. Never shared between chains.
///
/// `visited` only grows, and a URL enters it before it is fetched.
#[derive(Debug, Clone)]
pub struct RedirectResolutionContext {
    visited: Vec<String>,
    seen: HashSet<String>,
    remaining_hops: u32,
}

impl RedirectResolutionContext {
    pub fn new(hop_budget: u32) -> Self {
        Self {
            visited: Vec::new(),
            seen: HashSet::new(),
            remaining_hops: hop_budget,
        }
    }

    pub fn remaining_hops(&self) -> u32 {
        self.remaining_hops
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_hops == 0
    }

    pub fn has_visited(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Record `key`; returns `false` when it was already present.
    pub fn visit(&mut self, key: String) -> bool {
        if !self.seen.insert(key.clone()) {
            return false;
        }
        self.visited.push(key);
        true
    }

    pub fn spend_hop(&mut self) {
        self.remaining_hops = self.remaining_hops.saturating_sub(1);
    }

    /// Visited URLs in insertion order.
    pub fn chain(&self) -> &[String] {
        &self.visited
    }
}

fn visit_key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |parsed| canonical(&parsed))
}

enum Step {
    Follow(String),
    Done(ResolutionOutcome),
}

/// Fetch-and-follow orchestrator: resolves soft redirects, then extracts content.
#[derive(Clone)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
    config: ResolveConfig,
}

impl Resolver {
    pub fn new(transport: Arc<dyn Transport>, config: ResolveConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub async fn resolve(&self, url: &str) -> ResolutionOutcome {
        self.resolve_with(url, self.config.hop_budget, self.config.max_content_length)
            .await
    }

    /// Resolve `url` with an explicit hop budget and content budget.
    ///
    /// Always returns an outcome; transport failures, cycles and hop
    /// exhaustion are reported through sentinel content.
    #[instrument(skip_all, fields(url = %url, hop_budget = hop_budget))]
    pub async fn resolve_with(
        &self,
        url: &str,
        hop_budget: u32,
        max_content_length: usize,
    ) -> ResolutionOutcome {
        let mut context = RedirectResolutionContext::new(hop_budget);
        let mut current = url.to_string();

        loop {
            match self.step(&mut context, &current, max_content_length).await {
                Step::Follow(next) => current = next,
                Step::Done(outcome) => {
                    info!(
                        final_url = %outcome.final_url,
                        kind = ?outcome.kind,
                        hops = hop_budget - context.remaining_hops(),
                        "resolution finished"
                    );
                    return outcome;
                }
            }
        }
    }

    async fn step(
        &self,
        context: &mut RedirectResolutionContext,
        url: &str,
        max_content_length: usize,
    ) -> Step {
        if context.is_exhausted() {
            return Step::Done(ResolutionOutcome::sentinel(
                Sentinel::RedirectionLimitExceeded,
                url,
                context.chain().to_vec(),
            ));
        }

        let key = visit_key(url);
        if context.has_visited(&key) {
            return Step::Done(ResolutionOutcome::sentinel(
                Sentinel::CircularRedirection,
                url,
                context.chain().to_vec(),
            ));
        }
        context.visit(key);

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url, error = %e, "unparseable url");
                return Step::Done(ResolutionOutcome::sentinel(
                    Sentinel::ContentNotFetched,
                    url,
                    context.chain().to_vec(),
                ));
            }
        };

        let attempt = match self.transport.fetch(&parsed).await {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!(url, error = %e, "fetch failed");
                return Step::Done(ResolutionOutcome::sentinel(
                    Sentinel::ContentNotFetched,
                    url,
                    context.chain().to_vec(),
                ));
            }
        };

        let landed = attempt.landed_url.to_string();
        if attempt.was_protocol_redirected() {
            context.visit(canonical(&attempt.landed_url));
        }
        let markup = attempt.body_utf8.as_str();

        if !is_redirect_page(markup, &landed) {
            return Step::Done(self.finish(markup, landed, context, max_content_length));
        }

        match extract_real_url(markup, &landed) {
            Some(candidate) if same_url(&candidate, &landed) => {
                debug!(url = %landed, "redirect page points at itself; keeping it");
                Step::Done(self.finish(markup, landed, context, max_content_length))
            }
            Some(candidate) if context.has_visited(&visit_key(&candidate)) => {
                info!(from = %landed, to = %candidate, "redirect cycle");
                Step::Done(ResolutionOutcome::sentinel(
                    Sentinel::CircularRedirection,
                    landed,
                    context.chain().to_vec(),
                ))
            }
            Some(candidate) => {
                context.spend_hop();
                debug!(
                    from = %landed,
                    to = %candidate,
                    remaining_hops = context.remaining_hops(),
                    "following soft redirect"
                );
                Step::Follow(candidate)
            }
            None => {
                debug!(url = %landed, "no usable redirect target; keeping page");
                Step::Done(self.finish(markup, landed, context, max_content_length))
            }
        }
    }

    fn finish(
        &self,
        markup: &str,
        landed: String,
        context: &RedirectResolutionContext,
        max_content_length: usize,
    ) -> ResolutionOutcome {
        let content = extractor::extract(markup, max_content_length);
        ResolutionOutcome::extracted(landed, content, context.chain().to_vec())
    }
}
