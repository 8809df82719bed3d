/*!
 * Line-local repair patterns for token errors in translated YAML.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `<key>: [&anchor ]%{...}` with an unquoted placeholder at the start of the value
static INTERPOLATED_VALUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*[^:]+:\s*)(?:(&[\w-]+)\s+)?(%\{.+)$").expect("Invalid interpolated value regex")
});

/// A placeholder with whitespace between `%` and `{`
static SPACED_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"% +\{").expect("Invalid spaced placeholder regex")
});

/// Known substitutions, tried in the order of [`RepairPattern::ALL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairPattern {
    /// Wrap a value starting with `%{` in double quotes, keeping an anchor in front
    QuoteInterpolatedValue,
    /// Rewrite `% {` to `%{`
    CollapsePlaceholderSpacing,
}

impl RepairPattern {
    /// All patterns in precedence order
    pub const ALL: [RepairPattern; 2] = [
        RepairPattern::QuoteInterpolatedValue,
        RepairPattern::CollapsePlaceholderSpacing,
    ];

    /// Short name used in reports and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuoteInterpolatedValue => "quote-interpolated-value",
            Self::CollapsePlaceholderSpacing => "collapse-placeholder-spacing",
        }
    }

    /// Apply the pattern to one line, keeping its terminator.
    ///
    /// Returns `None` when the pattern does not match or would not change the line.
    pub fn apply(&self, line: &str) -> Option<String> {
        let (body, terminator) = split_terminator(line);

        let patched = match self {
            Self::QuoteInterpolatedValue => {
                let caps = INTERPOLATED_VALUE_REGEX.captures(body)?;
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let value = caps.get(3).map_or("", |m| m.as_str()).trim_end();
                match caps.get(2) {
                    Some(anchor) => format!("{}{} \"{}\"", prefix, anchor.as_str(), escape_double_quoted(value)),
                    None => format!("{}\"{}\"", prefix, escape_double_quoted(value)),
                }
            }
            Self::CollapsePlaceholderSpacing => {
                SPACED_PLACEHOLDER_REGEX.replace_all(body, "%{").into_owned()
            }
        };

        if patched == body {
            None
        } else {
            Some(format!("{}{}", patched, terminator))
        }
    }
}

/// Split a line into its content and its `\n` / `\r\n` terminator
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

fn escape_double_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
