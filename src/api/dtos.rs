use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const MAX_URL_LENGTH: usize = 2048;
const MAX_QUERY_LENGTH: usize = 400;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search query.
    #[serde(default)]
    pub q: String,
    /// Results to return, clamped to 1..=10.
    pub limit: Option<usize>,
    /// Content budget per result, in characters.
    pub max_content_length: Option<usize>,
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.q.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        if self.q.len() > MAX_QUERY_LENGTH {
            return Err("Query too long".to_string());
        }
        validate_content_length(self.max_content_length)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub url: String,
    pub max_content_length: Option<usize>,
}

impl ResolveRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("URL cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LENGTH {
            return Err("URL too long".to_string());
        }
        validate_content_length(self.max_content_length)
    }
}

fn validate_content_length(max_content_length: Option<usize>) -> Result<(), String> {
    match max_content_length {
        Some(0) => Err("maxContentLength must be positive".to_string()),
        _ => Ok(()),
    }
}
