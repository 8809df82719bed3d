/*!
 * Validate-and-patch loop for translated YAML.
 *
 * The engine parses the document, and on a token-local error tries the
 * [`RepairPattern`]s on the reported line, then parses again. Structural
 * corruption is returned as [`RepairError::NeedsRetranslation`]; anything it
 * cannot patch ends as [`RepairOutcome::Unfixable`] with the content patched
 * so far.
 */

use log::{debug, warn};

use crate::errors::RepairError;

use super::patterns::RepairPattern;
use super::syntax::{self, IssueCategory, SyntaxIssue};

/// Default upper bound on patches in one run
pub const DEFAULT_MAX_PASSES: usize = 1000;

/// A patch applied to one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFix {
    /// 1-based line number
    pub line_number: usize,
    /// Pattern that produced the patch
    pub pattern: RepairPattern,
    /// Line before the patch, with terminator
    pub before: String,
    /// Line after the patch, with terminator
    pub after: String,
}

/// Final state of a repair run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The document parses
    Clean,
    /// The document still fails to parse
    Unfixable(SyntaxIssue),
}

/// Result of a repair run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Document after all patches
    pub content: String,
    /// Patches in the order they were applied
    pub fixes: Vec<AppliedFix>,
    /// Whether the document ended up valid
    pub outcome: RepairOutcome,
}

impl RepairReport {
    /// Whether the document parses
    pub fn is_clean(&self) -> bool {
        self.outcome == RepairOutcome::Clean
    }

    /// The issue left unresolved, if any
    pub fn unresolved(&self) -> Option<&SyntaxIssue> {
        match &self.outcome {
            RepairOutcome::Clean => None,
            RepairOutcome::Unfixable(issue) => Some(issue),
        }
    }
}

/// States of the repair loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairState {
    /// Parse the current content
    Validating,
    /// Try the patterns on the line of a token error
    Patching(SyntaxIssue),
    /// The content parses
    Clean,
    /// No further patch is possible
    Unfixable(SyntaxIssue),
}

/// Syntax repair engine
#[derive(Debug, Clone)]
pub struct SyntaxRepairEngine {
    max_passes: usize,
}

impl Default for SyntaxRepairEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

impl SyntaxRepairEngine {
    /// Create an engine applying at most `max_passes` patches per run
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Validate `text` and patch token errors until it parses or no pattern applies.
    ///
    /// Valid input comes back unchanged. Every patch replaces exactly one line,
    /// so the line count never changes.
    pub fn repair(&self, text: &str) -> Result<RepairReport, RepairError> {
        let mut lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();
        let mut content = text.to_string();
        let mut fixes: Vec<AppliedFix> = Vec::new();
        let mut state = RepairState::Validating;

        loop {
            state = match state {
                RepairState::Validating => match syntax::validate(&content) {
                    Ok(()) => RepairState::Clean,
                    Err(issue) => match issue.category {
                        IssueCategory::StructuralCorruption => {
                            return Err(RepairError::NeedsRetranslation {
                                line: issue.line_number,
                                message: issue.message,
                            });
                        }
                        IssueCategory::FixableToken => RepairState::Patching(issue),
                        IssueCategory::Unknown => RepairState::Unfixable(issue),
                    },
                },

                RepairState::Patching(issue) => {
                    if fixes.len() >= self.max_passes {
                        warn!("Giving up after {} patches", fixes.len());
                        RepairState::Unfixable(issue)
                    } else if !issue.has_location() || issue.line_number > lines.len() {
                        RepairState::Unfixable(issue)
                    } else {
                        let index = issue.line_number - 1;
                        match patch_line(&lines[index]) {
                            Some((pattern, after)) => {
                                debug!(
                                    "Line {}: applied {} ({:?} -> {:?})",
                                    issue.line_number,
                                    pattern.name(),
                                    lines[index].trim_end(),
                                    after.trim_end()
                                );
                                let before = std::mem::replace(&mut lines[index], after.clone());
                                fixes.push(AppliedFix {
                                    line_number: issue.line_number,
                                    pattern,
                                    before,
                                    after,
                                });
                                content = lines.concat();
                                RepairState::Validating
                            }
                            None => RepairState::Unfixable(issue),
                        }
                    }
                }

                RepairState::Clean => {
                    return Ok(RepairReport { content, fixes, outcome: RepairOutcome::Clean });
                }

                RepairState::Unfixable(issue) => {
                    return Ok(RepairReport {
                        content,
                        fixes,
                        outcome: RepairOutcome::Unfixable(issue),
                    });
                }
            };
        }
    }
}

/// First pattern that changes the line
fn patch_line(line: &str) -> Option<(RepairPattern, String)> {
    RepairPattern::ALL
        .iter()
        .find_map(|pattern| pattern.apply(line).map(|after| (*pattern, after)))
}
