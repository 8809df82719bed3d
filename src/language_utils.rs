use anyhow::{anyhow, Result};
use isolang::Language;

/// Locale utilities
///
/// Locale codes as used in YAML locale trees: an ISO 639-1 or 639-2 language
/// code, optionally followed by a region or script subtag ("pt-BR", "zh_TW").
///
/// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Language part of a locale code, lowercased
pub fn primary_subtag(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup_language(locale: &str) -> Option<Language> {
    let code = primary_subtag(locale);
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == code)
                .map(|(_, t)| *t)
                .unwrap_or(code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Check that a locale code names a known language
pub fn validate_locale(locale: &str) -> Result<()> {
    if locale.trim().is_empty() {
        return Err(anyhow!("Locale code cannot be empty"));
    }
    lookup_language(locale)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid locale code: {}", locale))
}

/// Get the English language name for a locale code
pub fn get_language_name(locale: &str) -> Result<String> {
    let lang = lookup_language(locale)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", locale))?;

    Ok(lang.to_name().to_string())
}

/// Human readable locale for prompts: "Japanese (ja)", "Portuguese (pt-BR)".
///
/// Unknown codes are returned as given.
pub fn describe_locale(locale: &str) -> String {
    match get_language_name(locale) {
        Ok(name) => format!("{} ({})", name, locale.trim()),
        Err(_) => locale.trim().to_string(),
    }
}
