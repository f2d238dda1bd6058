use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::extractor::ExtractedContent;

pub const REDIRECTION_LIMIT_EXCEEDED: &str = "[Redirection limit exceeded]";
pub const CIRCULAR_REDIRECTION: &str = "[Circular redirection detected]";
pub const CONTENT_NOT_FETCHED: &str = "[Content could not be fetched]";

/// Terminal failure classes, each reported through a fixed content string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    RedirectionLimitExceeded,
    CircularRedirection,
    ContentNotFetched,
}

impl Sentinel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RedirectionLimitExceeded => REDIRECTION_LIMIT_EXCEEDED,
            Self::CircularRedirection => CIRCULAR_REDIRECTION,
            Self::ContentNotFetched => CONTENT_NOT_FETCHED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Content,
    RedirectionLimitExceeded,
    CircularRedirection,
    ContentNotFetched,
}

impl From<Sentinel> for OutcomeKind {
    fn from(sentinel: Sentinel) -> Self {
        match sentinel {
            Sentinel::RedirectionLimitExceeded => Self::RedirectionLimitExceeded,
            Sentinel::CircularRedirection => Self::CircularRedirection,
            Sentinel::ContentNotFetched => Self::ContentNotFetched,
        }
    }
}

/// Terminal result of one top-level resolution. `content` is always present and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub content: String,
    pub final_url: String,
    pub kind: OutcomeKind,
    pub title: Option<String>,
    pub truncated: bool,
    /// URLs visited by the chain, in order.
    pub chain: Vec<String>,
}

impl ResolutionOutcome {
    pub fn extracted(final_url: impl Into<String>, content: ExtractedContent, chain: Vec<String>) -> Self {
        Self {
            content: content.text,
            final_url: final_url.into(),
            kind: OutcomeKind::Content,
            title: content.title,
            truncated: content.truncated,
            chain,
        }
    }

    pub fn sentinel(sentinel: Sentinel, final_url: impl Into<String>, chain: Vec<String>) -> Self {
        Self {
            content: sentinel.as_str().to_string(),
            final_url: final_url.into(),
            kind: sentinel.into(),
            title: None,
            truncated: false,
            chain,
        }
    }

    pub fn is_content(&self) -> bool {
        self.kind == OutcomeKind::Content
    }
}
