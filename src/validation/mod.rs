/*!
 * Validation and repair of translated YAML.
 *
 * # Architecture
 *
 * - `syntax`: Parses documents and classifies parser errors
 * - `patterns`: Line-local substitutions for token errors
 * - `repair`: The validate-and-patch loop
 */

pub mod patterns;
pub mod repair;
pub mod syntax;

// Re-export main types
pub use patterns::RepairPattern;
pub use repair::{AppliedFix, RepairOutcome, RepairReport, RepairState, SyntaxRepairEngine};
pub use syntax::{IssueCategory, SyntaxIssue};
