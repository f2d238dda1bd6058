use bytes::Bytes;
use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::{StatusCode, header::HeaderMap};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024; // 1MB
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Transport settings for a single retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_body_bytes: usize,
    /// Protocol-level (3xx) hops the client follows on its own.
    pub max_redirects: usize,
    /// Permit loopback/private/link-local targets. Off outside of tests.
    pub allow_private_hosts: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(5),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            allow_private_hosts: false,
        }
    }
}

/// One network retrieval. Built once by the transport and never mutated.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// URL that was requested.
    pub url: Url,
    /// URL after the client's own 3xx following.
    pub landed_url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_raw: Bytes,
    pub body_utf8: String,
    pub encoding: &'static Encoding,
    pub fetched_at: DateTime<Utc>,
}

impl FetchAttempt {
    /// Convenience constructor for already-decoded markup.
    pub fn from_markup(url: Url, landed_url: Url, markup: impl Into<String>) -> Self {
        let body_utf8 = markup.into();
        Self {
            url,
            landed_url,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body_raw: Bytes::from(body_utf8.clone()),
            body_utf8,
            encoding: encoding_rs::UTF_8,
            fetched_at: Utc::now(),
        }
    }

    pub fn was_protocol_redirected(&self) -> bool {
        self.url != self.landed_url
    }
}
