//! Response normalization.
//!
//! Models wrap their output in markdown code fences or quotes often enough that
//! every task normalizes raw text before decoding it. Normalization never decides
//! between payload shapes; that is left to the task's decoder.

/// Fence marker opening and closing a markdown code block.
const FENCE: &str = "```";

/// Quote pairs stripped from single-string outputs.
const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Closing quotes that double as apostrophes.
const APOSTROPHES: [char; 2] = ['\'', '’'];

/// Extract the candidate payload from raw model text.
///
/// If the text contains a fenced block with a closing marker, the block's interior
/// is the payload (a language tag such as `json` after the opening marker is
/// dropped). Otherwise the whole text is. The result is trimmed.
pub fn extract_payload(raw: &str) -> String {
    let trimmed = raw.trim();
    match fenced_block(trimmed) {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Normalize a single-string output: surrounding quotes, fences, then quotes
/// inside the fence.
pub fn extract_text(raw: &str) -> String {
    let unquoted = strip_quotes(raw.trim());
    let payload = extract_payload(unquoted);
    strip_quotes(&payload).trim().to_string()
}

/// Remove one layer of matching surrounding quotes.
///
/// Text such as `"A" and "B"` keeps its quotes: for double quotes, stripping only
/// applies when the closing character does not also occur inside. Single quotes
/// only look at the outermost pair, since the same character is an apostrophe.
pub fn strip_quotes(text: &str) -> &str {
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            if APOSTROPHES.contains(&close) || !inner.contains(close) {
                return inner;
            }
        }
    }
    text
}

/// Interior of the first fenced block, if one opens and closes.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    let close = after_open.find(FENCE)?;
    let inner = &after_open[..close];

    // The remainder of the opening line is either empty or a language tag.
    match inner.find('\n') {
        Some(newline) if is_language_tag(&inner[..newline]) => Some(&inner[newline + 1..]),
        _ => Some(inner),
    }
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}
