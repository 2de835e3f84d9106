//! Removal of model reasoning blocks from raw completions

/// Opening delimiter of a reasoning block
pub const THINK_OPEN: &str = "<think>";

/// Closing delimiter of a reasoning block
pub const THINK_CLOSE: &str = "</think>";

/// Strip every `<think>…</think>` block and trim the result
///
/// The trim applies to every input, including one with no delimiter at all.
///
/// Unbalanced delimiters are handled as well: an opening tag with no closing
/// tag drops everything from the tag onward, and a stray closing tag drops
/// everything up to and including it. Stripping repeats until no delimiter is
/// left, so applying this twice gives the same result as applying it once.
pub fn strip_reasoning(raw: &str) -> String {
    let mut text = raw.to_string();

    loop {
        let open = text.find(THINK_OPEN);
        let close = text.find(THINK_CLOSE);

        text = match (open, close) {
            (None, None) => break,
            (Some(start), Some(end)) if start < end => {
                let mut stripped = String::with_capacity(text.len());
                stripped.push_str(&text[..start]);
                stripped.push_str(&text[end + THINK_CLOSE.len()..]);
                stripped
            }
            // Closing tag first, or closing tag only
            (_, Some(end)) => text[end + THINK_CLOSE.len()..].to_string(),
            (Some(start), None) => text[..start].to_string(),
        };
    }

    text.trim().to_string()
}
