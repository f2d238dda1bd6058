use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::resolver::ResolutionOutcome;
use crate::search::SearchResult;

/// A provider hit together with the outcome of resolving its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayedResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    pub source: String,
    pub outcome: ResolutionOutcome,
}

impl RelayedResult {
    pub fn new(result: SearchResult, outcome: ResolutionOutcome) -> Self {
        Self {
            title: result.title,
            url: result.url,
            snippet: result.snippet,
            published_date: result.published_date,
            source: result.source,
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRelayResponse {
    pub query: String,
    pub provider: String,
    pub results: Vec<RelayedResult>,
}
