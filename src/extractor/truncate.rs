pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated]";

/// Fraction of the budget a soft cut has to keep, as numerator/denominator.
const MIN_SOFT_CUT: (usize, usize) = (4, 5);

/// Cut `text` to at most `max_chars` characters plus [`TRUNCATION_MARKER`].
///
/// Text that reaches the budget is cut. The last sentence (`". "`) or
/// paragraph (`"\n\n"`) boundary inside the budget is preferred when it keeps
/// at least 80% of it; otherwise the cut lands exactly on the budget.
/// Returns the text and whether it was cut.
pub fn truncate(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() < max_chars {
        return (text.to_string(), false);
    }
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    let window = &text[..end];

    let mut truncated = match soft_cut(text, window)
        .filter(|&cut| keeps_enough(&window[..cut], max_chars))
    {
        Some(cut) => window[..cut].trim_end().to_string(),
        None => window.to_string(),
    };
    truncated.push_str(TRUNCATION_MARKER);
    (truncated, true)
}

fn soft_cut(text: &str, window: &str) -> Option<usize> {
    let sentence = window.rfind(". ").map(|i| i + 1);
    let paragraph = window.rfind("\n\n");
    // A sentence ending exactly on the budget edge.
    let edge = (window.ends_with('.') && text[window.len()..].starts_with(char::is_whitespace))
        .then_some(window.len());

    [sentence, paragraph, edge].into_iter().flatten().max()
}

fn keeps_enough(kept: &str, max_chars: usize) -> bool {
    let (num, den) = MIN_SOFT_CUT;
    kept.chars().count() * den >= max_chars * num
}
