/*!
 * Cleanup of provider responses.
 *
 * LLM providers often wrap YAML in a markdown code fence even when told not
 * to. The fence lines are response formatting, not part of the document.
 */

use regex::Regex;
use once_cell::sync::Lazy;

/// Opening fence on the first line: ```yaml, ```yml or a bare ```
static LEADING_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[ \t]*```(?:ya?ml)?[ \t]*\r?\n").unwrap()
});

/// Closing fence on the last line; the line break before it belongs to the document
static TRAILING_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\A|\n)([ \t]*```[ \t]*\s*)\z").unwrap()
});

/// Strip code fence lines from a provider response.
///
/// An opening fence on the first line and a closing fence on the last line are
/// removed independently of each other. Fences in the middle of the text are
/// left alone, as are the document's own line breaks.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed_start = text.trim_start_matches(['\r', '\n']);
    let without_leading = match LEADING_FENCE_REGEX.find(trimmed_start) {
        Some(m) => &trimmed_start[m.end()..],
        None => text,
    };

    match TRAILING_FENCE_REGEX.captures(without_leading).and_then(|caps| caps.get(1)) {
        Some(fence) => without_leading[..fence.start()].to_string(),
        None => without_leading.to_string(),
    }
}

/// Count lines the way the pipeline does: each line ends with `\n`, a
/// trailing fragment without one still counts.
pub fn line_count(text: &str) -> usize {
    text.split_inclusive('\n').count()
}
