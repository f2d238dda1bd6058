use crate::fetcher::types::FetchAttempt;
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("charset regex")
});

static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).expect("meta charset regex")
});

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#)
        .expect("meta http-equiv regex")
});

const SNIFF_WINDOW: usize = 4096;

/// Decode a fetched body and package it as a [`FetchAttempt`].
pub fn process_response(
    url: Url,
    landed_url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> FetchAttempt {
    let encoding = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_lossy(&body_bytes, encoding);

    FetchAttempt {
        url,
        landed_url,
        status,
        headers,
        body_raw: body_bytes,
        body_utf8,
        encoding,
        fetched_at: Utc::now(),
    }
}

/// Content-type textual bodies only; markup is what the resolver reads.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty()
        || essence.starts_with("text/")
        || essence == "application/xhtml+xml"
        || essence == "application/xml"
}

fn label_to_encoding(captures: Option<regex::Captures<'_>>) -> Option<&'static Encoding> {
    let label = captures?.get(1)?.as_str().to_ascii_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    // 1. Content-Type header
    if let Some(encoding) = label_to_encoding(CHARSET_REGEX.captures(content_type)) {
        return encoding;
    }

    // 2. <meta charset> / http-equiv within the sniff window
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(encoding) = label_to_encoding(META_CHARSET_REGEX.captures(&search_str)) {
        return encoding;
    }
    if let Some(encoding) = label_to_encoding(META_HTTP_EQUIV_REGEX.captures(&search_str)) {
        return encoding;
    }

    // 3. Heuristic guess
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, body_bytes.len() <= SNIFF_WINDOW);
    detector.guess(None, true)
}

fn decode_lossy(body_bytes: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, used, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        debug!(encoding = used.name(), "body contained undecodable sequences");
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let body = b"<html><head><title>Test</title></head></html>";
        let encoding = detect_charset("text/html; charset=utf-8", body);
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";
        // encoding_rs maps ISO-8859-1 onto its windows-1252 superset
        assert_eq!(detect_charset("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=shift_jis\"></head></html>";
        assert_eq!(detect_charset("text/html", body), encoding_rs::SHIFT_JIS);
    }

    #[test]
    fn test_decode_windows_1252_body() {
        let body = b"caf\xe9";
        assert_eq!(decode_lossy(body, encoding_rs::WINDOWS_1252), "café");
    }

    #[test]
    fn test_invalid_utf8_decodes_lossily() {
        let body = b"ok \xff\xfe end";
        let decoded = decode_lossy(body, encoding_rs::UTF_8);
        assert!(decoded.starts_with("ok "));
        assert!(decoded.ends_with(" end"));
    }

    #[test]
    fn test_textual_content_types() {
        assert!(is_textual_content_type("text/html; charset=utf-8"));
        assert!(is_textual_content_type("application/xhtml+xml"));
        assert!(is_textual_content_type("text/plain"));
        assert!(is_textual_content_type(""));
        assert!(!is_textual_content_type("image/jpeg"));
        assert!(!is_textual_content_type("application/pdf"));
    }
}
