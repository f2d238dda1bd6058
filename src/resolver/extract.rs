//! Heuristics that recover the destination of a soft-redirect page.
//!
//! Each strategy is a plain function returning a resolved, absolute
//! candidate that differs from the page's own URL. [`extract_real_url`]
//! runs them in a fixed order and keeps the first hit.

use base64::{
    Engine as _,
    engine::{
        GeneralPurpose,
        general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
    },
};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::resolver::{
    detect::script_navigation_targets,
    url::{has_explicit_scheme, resolve_reference, same_url},
};

type Strategy = fn(&str, &str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("meta_refresh", meta_refresh_target),
    ("script_navigation", script_navigation_target),
    ("interstitial_link", interstitial_link_target),
    ("click_tracking", click_tracking_target),
];

const LINK_PHRASES: &[&str] = &["click here", "continue", "proceed"];

const BASE64_ENGINES: [&GeneralPurpose; 4] = [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD];

static META_SELECTOR: Lazy<Option<Selector>> =
    Lazy::new(|| Selector::parse("meta[http-equiv][content]").ok());
static ANCHOR_SELECTOR: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("a[href]").ok());

// `5; url=/next`, `0;URL='http://x/2'`, `0, http://x/2`
static REFRESH_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*[\d.]*\s*[;,]\s*(?:url\s*=\s*)?(.+)$"#).expect("refresh content regex")
});

/// First candidate destination for a soft-redirect page, if any strategy finds one.
pub fn extract_real_url(markup: &str, source_url: &str) -> Option<String> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let candidate = strategy(markup, source_url)?;
        debug!(strategy = name, from = source_url, to = %candidate, "extracted real url");
        Some(candidate)
    })
}

fn accept(candidate: String, source_url: &str) -> Option<String> {
    (!candidate.is_empty() && !same_url(&candidate, source_url)).then_some(candidate)
}

pub fn meta_refresh_target(markup: &str, source_url: &str) -> Option<String> {
    let selector = META_SELECTOR.as_ref()?;
    let document = Html::parse_document(markup);

    document
        .select(selector)
        .filter(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .filter_map(|meta| meta.value().attr("content"))
        .filter_map(refresh_url)
        .find_map(|target| accept(resolve_reference(&target, source_url), source_url))
}

fn refresh_url(content: &str) -> Option<String> {
    let caps = REFRESH_CONTENT.captures(content)?;
    let target = caps
        .get(1)?
        .as_str()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!target.is_empty()).then(|| target.to_string())
}

pub fn script_navigation_target(markup: &str, source_url: &str) -> Option<String> {
    script_navigation_targets(markup)
        .find_map(|(_, literal)| accept(resolve_reference(literal, source_url), source_url))
}

pub fn interstitial_link_target(markup: &str, source_url: &str) -> Option<String> {
    let selector = ANCHOR_SELECTOR.as_ref()?;
    let document = Html::parse_document(markup);

    document
        .select(selector)
        .filter(|anchor| {
            let text = anchor.text().collect::<String>().to_lowercase();
            LINK_PHRASES.iter().any(|phrase| text.contains(phrase))
        })
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| resolve_reference(href, source_url))
        .filter(|candidate| has_explicit_scheme(candidate))
        .find_map(|candidate| accept(candidate, source_url))
}

/// Search-engine click-tracking links carrying the destination in a `u` parameter.
///
/// Provider specific: the value is tried as base64 first (optionally behind an
/// `a1` marker), then used percent-decoded. Either way it must parse as an
/// absolute http(s) URL.
pub fn click_tracking_target(_markup: &str, source_url: &str) -> Option<String> {
    let source = Url::parse(source_url).ok()?;
    let raw = source
        .query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("u="))?;
    let value = percent_decode_str(raw).decode_utf8_lossy();

    let decoded = decode_base64_url(&value).or_else(|| is_absolute_url(&value).then(|| value.to_string()))?;
    accept(decoded, source_url)
}

fn decode_base64_url(value: &str) -> Option<String> {
    let unmarked = value.strip_prefix("a1").unwrap_or(value);
    [value, unmarked].into_iter().find_map(|candidate| {
        BASE64_ENGINES.iter().find_map(|engine| {
            let bytes = engine.decode(candidate).ok()?;
            let text = String::from_utf8(bytes).ok()?;
            is_absolute_url(&text).then_some(text)
        })
    })
}

fn is_absolute_url(value: &str) -> bool {
    has_explicit_scheme(value) && Url::parse(value).is_ok()
}
