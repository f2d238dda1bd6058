#![no_main]

use libfuzzer_sys::fuzz_target;

use searchrelay::extractor::extract;
use searchrelay::resolver::{detect_redirect, extract_real_url};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // None of these may panic, whatever the markup.
    let content = extract(&html, 2_000);
    assert!(content.text.chars().count() <= 2_000 + searchrelay::extractor::TRUNCATION_MARKER.len());

    let _ = detect_redirect(&html);
    let _ = extract_real_url(&html, "https://example.com/page?u=a1aHR0cHM6Ly9leGFtcGxlLm9yZw");
});
