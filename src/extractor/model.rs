use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub text: String,
    pub truncated: bool,
    /// Selector the text came from; `None` for the whole-document fallback.
    pub region: Option<String>,
}
