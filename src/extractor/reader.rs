use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractor::cleaner::{is_within_noise, readable_text};

/// Content containers in priority order; the first one present wins.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role='main']",
    "article",
    "[role='article']",
    ".content",
    ".article-content",
    ".article-body",
    ".story-body",
    "#main-content",
    "#content",
    ".post-content",
    ".entry-content",
    ".post",
    ".entry",
];

static COMPILED_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok().map(|selector| (*s, selector)))
        .collect()
});

static TITLE_SELECTOR: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("title").ok());
static OG_TITLE_SELECTOR: Lazy<Option<Selector>> =
    Lazy::new(|| Selector::parse("meta[property='og:title']").ok());

/// The region the readable text is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRegion {
    Selector(&'static str),
    WholeDocument,
}

/// First content container that exists outside of noise, falling back to the whole document.
pub fn select_region(document: &Html) -> (ContentRegion, ElementRef<'_>) {
    for (name, selector) in COMPILED_SELECTORS.iter() {
        if let Some(element) = document.select(selector).find(|el| !is_within_noise(el)) {
            return (ContentRegion::Selector(*name), element);
        }
    }
    (ContentRegion::WholeDocument, document.root_element())
}

pub fn region_text(document: &Html) -> (ContentRegion, String) {
    let (region, element) = select_region(document);
    (region, readable_text(element))
}

pub fn extract_title(document: &Html) -> Option<String> {
    if let Some(selector) = OG_TITLE_SELECTOR.as_ref()
        && let Some(content) = document
            .select(selector)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
    {
        return Some(content.to_string());
    }

    let selector = TITLE_SELECTOR.as_ref()?;
    document
        .select(selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|t| !t.is_empty())
}
