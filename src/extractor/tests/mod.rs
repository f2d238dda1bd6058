use std::fs;

use crate::extractor::{DEFAULT_MAX_CONTENT_LENGTH, TRUNCATION_MARKER, extract};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article() {
    let content = extract(&fixture("article.html"), DEFAULT_MAX_CONTENT_LENGTH);

    assert_eq!(content.title.as_deref(), Some("Sample Article"));
    assert_eq!(content.region.as_deref(), Some("article"));
    assert!(!content.truncated);
    assert_eq!(
        content.text,
        "Sample Article\n\n\
         This is the first paragraph of the article. It introduces the topic and spans several source lines.\n\n\
         This is the second paragraph, with a related link and some emphasis.\n\n\
         The closing paragraph wraps up the story."
    );
}

#[test]
fn test_extract_blog_post() {
    let content = extract(&fixture("blog.html"), DEFAULT_MAX_CONTENT_LENGTH);

    assert_eq!(
        content.title.as_deref(),
        Some("How to Build Better Software | Tech Blog")
    );
    assert_eq!(content.region.as_deref(), Some(".entry-content"));
    assert!(content.text.contains("Building better software"));
    assert!(content.text.contains("Key Principles"));
    assert!(content.text.contains("Name things by what they do."));
    assert!(!content.text.contains("Categories"));
    assert!(!content.text.contains("Comments are closed"));
    assert!(!content.text.contains("enable JavaScript"));
}

#[test]
fn test_whole_document_fallback() {
    let content = extract(&fixture("bare.html"), DEFAULT_MAX_CONTENT_LENGTH);

    assert_eq!(content.region, None);
    assert_eq!(
        content.text,
        "Plain heading\n\nText that lives directly in the body."
    );
}

#[test]
fn test_long_article_is_truncated_at_hard_boundary() {
    let markup = format!(
        "<html><body><article><p>{}</p></article></body></html>",
        "x".repeat(60_000)
    );
    let content = extract(&markup, 50_000);

    assert!(content.truncated);
    assert_eq!(content.text.len(), 50_000 + TRUNCATION_MARKER.len());
    assert!(content.text.ends_with(TRUNCATION_MARKER));
}

#[test]
fn test_truncation_prefers_sentence_boundary() {
    let sentence = "The quick brown fox jumps over the dog. ";
    let markup = format!(
        "<html><body><main><p>{}</p></main></body></html>",
        sentence.repeat(10)
    );
    let content = extract(&markup, 95);

    assert!(content.truncated);
    assert_eq!(
        content.text,
        format!("{}{}", sentence.repeat(2).trim_end(), TRUNCATION_MARKER)
    );
}

#[test]
fn test_malformed_html() {
    let markup = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let content = extract(markup, DEFAULT_MAX_CONTENT_LENGTH);

    assert_eq!(content.title.as_deref(), Some("Broken"));
    assert!(content.text.contains("Unclosed tags"));
    assert!(content.text.contains("More content"));
}

#[test]
fn test_empty_markup() {
    let content = extract("", DEFAULT_MAX_CONTENT_LENGTH);
    assert_eq!(content.text, "");
    assert_eq!(content.title, None);
    assert!(!content.truncated);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(markup in ".*", max in 0usize..2000) {
            let content = extract(&markup, max);
            prop_assert!(
                content.text.chars().count() <= max + TRUNCATION_MARKER.chars().count()
            );
        }
    }
}
