use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, node::Element};

/// Elements whose whole subtree never contributes readable text.
const NOISE_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "iframe", "svg", "nav", "header",
    "footer", "aside",
];

/// Elements a browser never renders as text.
const INVISIBLE_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

const NOISE_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "complementary"];

/// Elements that start a new line of text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

// Class/id tokens of ad and sidebar containers, e.g. `ad`, `ad-slot`, `top-ads`, `sidebar-left`.
static NOISE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:ads?|adsbygoogle|advert[\w-]*|sponsor[\w-]*|promo[\w-]*|sidebar[\w-]*|widget-area|(?:ad|ads)[-_][\w-]+|[\w-]+[-_](?:ad|ads|sidebar))$",
    )
    .expect("noise token regex")
});

pub fn is_noise_element(element: &Element) -> bool {
    if NOISE_TAGS.contains(&element.name()) {
        return true;
    }
    if let Some(role) = element.attr("role")
        && NOISE_ROLES.contains(&role.trim().to_ascii_lowercase().as_str())
    {
        return true;
    }
    if element.id().is_some_and(|id| NOISE_TOKEN.is_match(id)) {
        return true;
    }
    element.classes().any(|class| NOISE_TOKEN.is_match(class))
}

/// True when `element` or one of its ancestors is a noise container.
pub fn is_within_noise(element: &ElementRef<'_>) -> bool {
    is_noise_element(element.value())
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_noise_element(ancestor.value()))
}

fn is_invisible_element(element: &Element) -> bool {
    INVISIBLE_TAGS.contains(&element.name())
}

/// Text of `root` with noise subtrees skipped and block boundaries kept as newlines.
pub fn readable_text(root: ElementRef<'_>) -> String {
    collect_text(root, is_noise_element)
}

fn collect_text(root: ElementRef<'_>, skip: fn(&Element) -> bool) -> String {
    let mut out = String::new();
    // Explicit stack; nesting depth of hostile markup is unbounded.
    let mut stack = vec![(*root, false)];

    while let Some((node, closing)) = stack.pop() {
        if closing {
            out.push('\n');
            continue;
        }
        match node.value() {
            Node::Text(text) => push_collapsed(&mut out, text),
            Node::Element(element) => {
                if skip(element) {
                    continue;
                }
                if BLOCK_TAGS.contains(&element.name()) {
                    out.push('\n');
                    stack.push((node, true));
                }
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            _ => stack.extend(node.children().rev().map(|child| (child, false))),
        }
    }

    out
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        if !text.is_empty() {
            out.push(' ');
        }
        return;
    }
    if text.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    while let Some(word) = words.next() {
        out.push_str(word);
        if words.peek().is_some() {
            out.push(' ');
        }
    }
    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Rendered document text, whitespace collapsed to single spaces.
pub fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    collect_text(document.root_element(), is_invisible_element)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse space runs within lines and blank-line runs into one blank line.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;

    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_break = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        pending_break = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_text(markup: &str) -> String {
        let document = Html::parse_document(markup);
        normalize_whitespace(&readable_text(document.root_element()))
    }

    #[test]
    fn test_noise_elements_are_skipped() {
        let text = body_text(
            r#"<body><nav>Menu</nav><header>Brand</header><p>Body text</p>
            <script>var x = 1;</script><style>p{}</style><aside>Related</aside><footer>(c)</footer></body>"#,
        );
        assert_eq!(text, "Body text");
    }

    #[test]
    fn test_ad_and_sidebar_containers_are_skipped() {
        let text = body_text(
            r#"<body><div class="ad-slot">Buy now</div><div id="sidebar">Links</div>
            <div class="promo-banner">Sale</div><div class="headline">Kept</div>
            <div class="shadow">Also kept</div></body>"#,
        );
        assert!(text.contains("Kept"));
        assert!(text.contains("Also kept"));
        assert!(!text.contains("Buy now"));
        assert!(!text.contains("Links"));
        assert!(!text.contains("Sale"));
    }

    #[test]
    fn test_role_landmarks_are_noise() {
        let text = body_text(r#"<body><div role="navigation">Nav</div><p>Story</p></body>"#);
        assert_eq!(text, "Story");
    }

    #[test]
    fn test_blocks_become_paragraphs() {
        let text = body_text("<body><p>First   para\n  continues</p><p>Second <b>bold</b> para</p></body>");
        assert_eq!(text, "First para continues\n\nSecond bold para");
    }

    #[test]
    fn test_visible_text_is_single_spaced() {
        let text = visible_text("<html><body><h1>Title</h1>\n\n<p>One\ttwo</p></body></html>");
        assert_eq!(text, "Title One two");
    }

    #[test]
    fn test_visible_text_keeps_landmarks_but_not_scripts() {
        let text = visible_text(
            "<html><head><title>Wait</title></head><body><header>Redirecting</header><script>go()</script></body></html>",
        );
        assert_eq!(text, "Redirecting");
    }

    #[test]
    fn test_normalize_whitespace() {
        let normalized = normalize_whitespace("  Hello    world  \n\n\n  Test \n line ");
        assert_eq!(normalized, "Hello world\n\nTest\nline");
    }

    #[test]
    fn test_deeply_nested_markup_does_not_overflow() {
        let markup = format!("{}deep{}", "<div>".repeat(5000), "</div>".repeat(5000));
        let text = body_text(&markup);
        assert_eq!(text, "deep");
    }
}
