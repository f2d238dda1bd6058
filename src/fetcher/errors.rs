use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("blocked host: {0}")]
    BlockedHost(String),

    #[error("connect failure: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("body read error: {0}")]
    Body(String),

    #[error("client setup failed: {0}")]
    Client(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectTimeout | Self::RequestTimeout)
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            // The redirect policy refuses private hops with a message of its own.
            match std::error::Error::source(&err) {
                Some(source) if source.to_string().starts_with("blocked host") => {
                    Self::BlockedHost(source.to_string())
                }
                _ => Self::TooManyRedirects,
            }
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(FetchError::ConnectTimeout.is_timeout());
        assert!(FetchError::RequestTimeout.is_timeout());
        assert!(!FetchError::TooManyRedirects.is_timeout());
        assert!(!FetchError::BodyTooLarge(10).is_timeout());
    }

    #[test]
    fn test_display_messages() {
        let err = FetchError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "http error 404 Not Found");
        assert_eq!(
            FetchError::BodyTooLarge(2048).to_string(),
            "body too large (2048 bytes)"
        );
    }
}
