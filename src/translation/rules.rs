/*!
 * Translation rules supplied to the model as extra instructions.
 *
 * Rules live in `.yaltwairules` (all locales) and `.yaltwairules.<locale>`
 * (one target locale) files. The pipeline only consumes an already ordered
 * [`RuleSet`]; [`RuleSet::discover`] is the filesystem lookup used by the CLI.
 */

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of rules that apply to every target locale
pub const RULES_FILE_NAME: &str = ".yaltwairules";

/// A single block of instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRule {
    /// Rule text, trimmed
    pub content: String,

    /// Whether the rule only applies to one target locale
    pub locale_specific: bool,

    /// File the rule was read from, if any
    pub source: Option<PathBuf>,
}

impl TranslationRule {
    /// A rule for every locale
    pub fn general(content: impl Into<String>) -> Self {
        Self { content: content.into(), locale_specific: false, source: None }
    }

    /// A rule for the current target locale only
    pub fn locale_specific(content: impl Into<String>) -> Self {
        Self { content: content.into(), locale_specific: true, source: None }
    }

    /// Attach the file the rule came from
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Ordered rules: general rules first, then locale-specific ones, each group
/// ordered from the most general directory to the most local one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<TranslationRule>,
}

impl RuleSet {
    /// Build a set from rules given root-most first.
    ///
    /// The relative order inside each group is kept; general rules are moved
    /// ahead of locale-specific ones.
    pub fn from_rules(rules: Vec<TranslationRule>) -> Self {
        let (general, locale_specific): (Vec<_>, Vec<_>) =
            rules.into_iter().partition(|r| !r.locale_specific);

        Self {
            rules: general.into_iter().chain(locale_specific).collect(),
        }
    }

    /// Rules in instruction order
    pub fn iter(&self) -> impl Iterator<Item = &TranslationRule> {
        self.rules.iter()
    }

    /// Rules that apply to every locale
    pub fn general(&self) -> impl Iterator<Item = &TranslationRule> {
        self.rules.iter().filter(|r| !r.locale_specific)
    }

    /// Rules for the target locale only
    pub fn locale_specific(&self) -> impl Iterator<Item = &TranslationRule> {
        self.rules.iter().filter(|r| r.locale_specific)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Discover rule files for `start_path` and `target_locale`.
    ///
    /// Directories are visited from `working_dir` (when it is an ancestor of
    /// `start_path`) or the filesystem root down to the directory holding
    /// `start_path`. When `start_path` lies outside `working_dir`, the rules in
    /// `working_dir` are still read first.
    pub fn discover(start_path: &Path, target_locale: &str, working_dir: &Path) -> Result<Self> {
        let start_dir = if start_path.is_dir() {
            start_path.to_path_buf()
        } else {
            start_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
        };
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let start_dir = absolutize(&start_dir, &current_dir);
        let working_dir = absolutize(working_dir, &current_dir);

        // Walk up until the working directory or the root, then flip to root-most first
        let mut directories = Vec::new();
        let mut reached_working_dir = false;
        for ancestor in start_dir.ancestors() {
            directories.push(ancestor.to_path_buf());
            if ancestor == working_dir {
                reached_working_dir = true;
                break;
            }
        }
        if !reached_working_dir {
            directories.push(working_dir);
        }
        directories.reverse();

        let locale_file_name = format!("{}.{}", RULES_FILE_NAME, target_locale);
        let mut rules = Vec::new();
        for directory in &directories {
            if let Some(rule) = read_rule(&directory.join(RULES_FILE_NAME), false)? {
                rules.push(rule);
            }
            if let Some(rule) = read_rule(&directory.join(&locale_file_name), true)? {
                rules.push(rule);
            }
        }

        Ok(Self::from_rules(rules))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a TranslationRule;
    type IntoIter = std::slice::Iter<'a, TranslationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    joined.canonicalize().unwrap_or(joined)
}

fn read_rule(path: &Path, locale_specific: bool) -> Result<Option<TranslationRule>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {:?}", path))?;
    let content = content.trim();
    if content.is_empty() {
        debug!("Ignoring empty rules file {:?}", path);
        return Ok(None);
    }

    let rule = TranslationRule {
        content: content.to_string(),
        locale_specific,
        source: None,
    };
    Ok(Some(rule.with_source(path)))
}
