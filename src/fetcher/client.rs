use crate::fetcher::{
    errors::FetchError,
    pipeline::{is_textual_content_type, process_response},
    types::{FetchAttempt, FetchConfig},
};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use once_cell::sync::Lazy;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue},
    redirect::Policy,
};
use tracing::{debug, instrument};
use url::{Host, Url};

// Accept-Encoding is added by reqwest itself for the gzip/brotli/deflate features.
static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
});

/// Retrieval seam used by the resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, following protocol-level redirects, and return the landed page.
    async fn fetch(&self, url: &Url) -> Result<FetchAttempt, FetchError>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: FetchConfig,
}

impl HttpTransport {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(BROWSER_HEADERS.clone())
            .redirect(redirect_policy(&config))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn redirect_policy(config: &FetchConfig) -> Policy {
    let max_redirects = config.max_redirects;
    let allow_private_hosts = config.allow_private_hosts;
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= max_redirects {
            attempt.error("too many redirects")
        } else if !allow_private_hosts && !is_public_url(attempt.url()) {
            let message = format!("blocked host: {}", attempt.url());
            attempt.error(message)
        } else {
            attempt.follow()
        }
    })
}

/// `false` for loopback, private, link-local and unspecified targets.
pub fn is_public_url(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain != "localhost" && !domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => {
            !(ip.is_loopback()
                || ip.is_private()
                || ip.is_link_local()
                || ip.is_unspecified()
                || ip.is_broadcast())
        }
        Some(Host::Ipv6(ip)) => {
            if let Some(mapped) = ip.to_ipv4_mapped() {
                return !(mapped.is_loopback() || mapped.is_private() || mapped.is_unspecified());
            }
            !(ip.is_loopback()
                || ip.is_unspecified()
                || ip.is_unique_local()
                || ip.is_unicast_link_local())
        }
        None => false,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<FetchAttempt, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }
        if !self.config.allow_private_hosts && !is_public_url(url) {
            return Err(FetchError::BlockedHost(url.to_string()));
        }

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > self.config.max_body_bytes as u64
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let landed_url = response.url().clone();
        let status = response.status();

        // A terminal 3xx (no usable Location) still carries a readable body.
        if !status.is_success() && !status.is_redirection() {
            return Err(FetchError::Http { status });
        }

        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !is_textual_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body = read_capped(&mut response, self.config.max_body_bytes).await?;
        debug!(landed = %landed_url, %status, bytes = body.len(), "retrieved page");

        Ok(process_response(
            url.clone(),
            landed_url,
            status,
            headers,
            body,
            &content_type,
        ))
    }
}

async fn read_capped(response: &mut Response, cap: usize) -> Result<Bytes, FetchError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(FetchError::from_reqwest_error)?
    {
        let total = body.len() + chunk.len();
        if total > cap {
            return Err(FetchError::BodyTooLarge(total as u64));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
