/*!
 * YAML syntax validation and classification of parser errors.
 *
 * Parser messages are sorted into three categories: token-local faults that a
 * line substitution can fix, structural corruption that only a new
 * translation can fix, and everything else.
 */

use serde::de::IgnoredAny;
use std::fmt;

/// Fragments of parser messages that mark a broken mapping structure
const STRUCTURAL_SIGNATURE: [&str; 2] = ["did not find expected key", "while parsing a block mapping"];

/// Fragment of parser messages for a character that cannot start a token
const TOKEN_SIGNATURE: &str = "cannot start any token";

/// Kind of syntax problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    /// A single-line fault a known substitution may correct
    FixableToken,
    /// Keys or mapping shape are broken
    StructuralCorruption,
    /// No known signature
    Unknown,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FixableToken => "fixable token",
            Self::StructuralCorruption => "structural corruption",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A parser failure located in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line number, 0 when the parser gave no location
    pub line_number: usize,

    /// Parser message
    pub message: String,

    /// Classification of the message
    pub category: IssueCategory,
}

impl SyntaxIssue {
    /// Build an issue from a parser message, classifying it
    pub fn new(line_number: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        let category = classify(&message);
        Self { line_number, message, category }
    }

    /// Whether the parser reported a usable location
    pub fn has_location(&self) -> bool {
        self.line_number > 0
    }
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_location() {
            write!(f, "line {}: {} ({})", self.line_number, self.message, self.category)
        } else {
            write!(f, "{} ({})", self.message, self.category)
        }
    }
}

/// Classify a parser message by its known fragments
pub fn classify(message: &str) -> IssueCategory {
    if STRUCTURAL_SIGNATURE.iter().all(|fragment| message.contains(fragment)) {
        IssueCategory::StructuralCorruption
    } else if message.contains(TOKEN_SIGNATURE) {
        IssueCategory::FixableToken
    } else {
        IssueCategory::Unknown
    }
}

/// Parse a document and report the first syntax problem.
///
/// Documents holding only comments, blank lines and document markers are
/// valid. Values are not materialised, so duplicate keys are not an error.
pub fn validate(text: &str) -> Result<(), SyntaxIssue> {
    if is_effectively_empty(text) {
        return Ok(());
    }

    match serde_yaml_ng::from_str::<IgnoredAny>(text) {
        Ok(_) => Ok(()),
        Err(err) => Err(SyntaxIssue::new(error_line(&err), err.to_string())),
    }
}

fn is_effectively_empty(text: &str) -> bool {
    text.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" || trimmed == "..."
    })
}

fn error_line(err: &serde_yaml_ng::Error) -> usize {
    err.location()
        .map(|location| location.line())
        .or_else(|| line_from_message(&err.to_string()))
        .unwrap_or(0)
}

fn line_from_message(message: &str) -> Option<usize> {
    let marker = "at line ";
    let start = message.find(marker)? + marker.len();
    let digits: String = message[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
