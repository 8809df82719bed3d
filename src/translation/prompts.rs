/*!
 * Prompt construction for YAML locale translation.
 *
 * The system instructions are built once per document from the base prompt
 * and the rule set; the user message carries the chunk to translate.
 */

use crate::language_utils;

use super::rules::RuleSet;

/// Base instructions sent with every request
pub const BASE_INSTRUCTIONS: &str = r#"You are a professional translator. You will be translating YAML locale files.
- Translate only the text values. Never translate or change keys.
- Preserve interpolation variables (like %{name}) exactly as they appear.
- Preserve YAML anchors (&name), aliases (*name) and merge keys (<<) exactly as they appear.
- Preserve comments and blank lines exactly as they appear.
- Preserve all indentation and keep exactly the same number of lines.
- Never add, remove, reorder or restructure entries.
- Respond with the translated YAML only, without explanations or code fences."#;

/// Header introducing rules that apply to every locale
pub const GENERAL_RULES_HEADER: &str = "Additional translation rules:";

/// Separator between the user message header and the document
const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Build the system instructions for a document.
///
/// General rules come first, locale-specific rules after; a section is only
/// emitted when it has at least one rule.
pub fn build_instructions(rules: &RuleSet, target_language: &str) -> String {
    let mut instructions = BASE_INSTRUCTIONS.to_string();

    let general: Vec<&str> = rules.general().map(|r| r.content.as_str()).collect();
    if !general.is_empty() {
        instructions.push_str("\n\n");
        instructions.push_str(GENERAL_RULES_HEADER);
        instructions.push('\n');
        instructions.push_str(&general.join("\n\n"));
    }

    let locale_specific: Vec<&str> = rules.locale_specific().map(|r| r.content.as_str()).collect();
    if !locale_specific.is_empty() {
        instructions.push_str("\n\n");
        instructions.push_str(&format!(
            "Rules specific to {}:",
            language_utils::describe_locale(target_language)
        ));
        instructions.push('\n');
        instructions.push_str(&locale_specific.join("\n\n"));
    }

    instructions
}

/// Build the user message carrying one chunk of YAML
pub fn build_user_message(content: &str, source_language: &str, target_language: &str) -> String {
    format!(
        "Translate this YAML content from {} to {}. Keep all structure and special characters exactly the same:{}{}",
        language_utils::describe_locale(source_language),
        language_utils::describe_locale(target_language),
        DOCUMENT_SEPARATOR,
        content
    )
}

/// Recover the document from a message built by [`build_user_message`]
pub fn document_from_user_message(message: &str) -> &str {
    match message.split_once(DOCUMENT_SEPARATOR) {
        Some((_, document)) => document,
        None => message,
    }
}
