use tracing::debug;
use url::Url;

/// True for references carrying an explicit `http://` or `https://` scheme.
pub fn has_explicit_scheme(reference: &str) -> bool {
    let bytes = reference.as_bytes();
    let starts_with = |prefix: &[u8]| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
    };
    starts_with(b"http://") || starts_with(b"https://")
}

/// Comparison key for a URL: normalised serialisation without the fragment.
pub fn canonical(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Whether two URL strings name the same page.
pub fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => canonical(&a) == canonical(&b),
        _ => a == b,
    }
}

/// Resolve a reference found inside a page against the page's URL.
///
/// Absolute references are returned unchanged, protocol-relative ones take
/// the base's scheme, everything else goes through RFC 3986 resolution.
/// Any parse failure yields the reference as-is.
pub fn resolve_reference(reference: &str, base: &str) -> String {
    let reference = reference.trim();
    if has_explicit_scheme(reference) {
        return reference.to_string();
    }

    let base_url = match Url::parse(base) {
        Ok(url) => url,
        Err(e) => {
            debug!(base, error = %e, "unparseable base url, using reference literally");
            return reference.to_string();
        }
    };

    if reference.starts_with("//") {
        return format!("{}:{}", base_url.scheme(), reference);
    }

    match base_url.join(reference) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!(reference, error = %e, "unresolvable reference, using it literally");
            reference.to_string()
        }
    }
}
