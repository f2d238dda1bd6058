//! Reduces page markup to a bounded, readable text payload.
//!
//! Noise subtrees (scripts, navigation, page chrome, ad and sidebar
//! containers) are skipped, the first matching content container is read,
//! whitespace is normalised and the result is cut to the content budget.

pub mod cleaner;
pub mod model;
pub mod reader;
pub mod truncate;

#[cfg(test)]
mod tests;

pub use model::ExtractedContent;
pub use truncate::TRUNCATION_MARKER;

use scraper::Html;
use tracing::debug;

use crate::extractor::reader::ContentRegion;

pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 50_000;

pub fn extract(markup: &str, max_content_length: usize) -> ExtractedContent {
    let document = Html::parse_document(markup);

    // 1-2. Pick the content region, skipping noise subtrees
    let (region, raw_text) = reader::region_text(&document);

    // 3. Normalize whitespace
    let text = cleaner::normalize_whitespace(&raw_text);

    // 4. Bound the payload
    let (text, truncated) = truncate::truncate(&text, max_content_length);

    debug!(?region, chars = text.chars().count(), truncated, "extracted content");

    ExtractedContent {
        title: reader::extract_title(&document),
        text,
        truncated,
        region: match region {
            ContentRegion::Selector(selector) => Some(selector.to_string()),
            ContentRegion::WholeDocument => None,
        },
    }
}
