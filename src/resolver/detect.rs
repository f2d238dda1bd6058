use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::extractor::cleaner::visible_text;

/// Visible-text length under which a redirect phrase counts as a structural signal.
pub const SHORT_PAGE_THRESHOLD: usize = 500;

static META_REFRESH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*\bhttp-equiv\s*=\s*["']?\s*refresh\b"#).expect("meta refresh regex")
});

/// Assignment-style navigations with a quoted literal target, in extraction order.
static SCRIPT_NAVIGATIONS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "location_assign",
            r#"\b(?:window|document|top|self|parent)\.location\s*=\s*(?:"([^"]+)"|'([^']+)')"#,
        ),
        (
            "location_href",
            r#"\blocation\.href\s*=\s*(?:"([^"]+)"|'([^']+)')"#,
        ),
        (
            "location_replace",
            r#"\blocation\.replace\(\s*(?:"([^"]+)"|'([^']+)')\s*\)"#,
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("script navigation regex")))
    .collect()
});

static REDIRECT_PHRASES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("being_redirected", r"(?i)you are being redirected"),
        ("will_be_redirected", r"(?i)you will be redirected"),
        ("automatic_redirect", r"(?i)automatic(?:ally)? redirect"),
        ("not_redirected_click", r"(?i)if you are not redirected.{0,120}?click"),
        (
            "click_if_no_redirect",
            r"(?i)please click here if the page does not redirect automatically",
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("redirect phrase regex")))
    .collect()
});

/// Why a page was classified as a soft redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectSignal {
    MetaRefresh,
    ScriptNavigation(&'static str),
    InterstitialPhrase(&'static str),
}

pub fn has_meta_refresh(markup: &str) -> bool {
    META_REFRESH.is_match(markup)
}

/// Every script navigation literal in the markup, grouped by pattern in table order.
pub fn script_navigation_targets(markup: &str) -> impl Iterator<Item = (&'static str, &str)> {
    SCRIPT_NAVIGATIONS.iter().flat_map(move |(name, pattern)| {
        pattern.captures_iter(markup).filter_map(move |caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| (*name, m.as_str()))
        })
    })
}

/// Redirect phrase found on a short page, if any.
pub fn interstitial_phrase(markup: &str) -> Option<&'static str> {
    let text = visible_text(markup);
    if text.chars().count() >= SHORT_PAGE_THRESHOLD {
        return None;
    }
    REDIRECT_PHRASES
        .iter()
        .find(|(_, phrase)| phrase.is_match(&text))
        .map(|(name, _)| *name)
}

/// Ordered classification; the first signal that fires wins.
pub fn detect_redirect(markup: &str) -> Option<RedirectSignal> {
    if has_meta_refresh(markup) {
        return Some(RedirectSignal::MetaRefresh);
    }
    if let Some((name, _)) = script_navigation_targets(markup).next() {
        return Some(RedirectSignal::ScriptNavigation(name));
    }
    interstitial_phrase(markup).map(RedirectSignal::InterstitialPhrase)
}

pub fn is_redirect_page(markup: &str, source_url: &str) -> bool {
    match detect_redirect(markup) {
        Some(signal) => {
            debug!(url = source_url, ?signal, "soft redirect page detected");
            true
        }
        None => false,
    }
}
