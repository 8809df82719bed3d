/*!
 * Tests for translation rule discovery
 */

use anyhow::Result;
use yaltwai::translation::rules::{RuleSet, RULES_FILE_NAME};

use crate::common;

#[test]
fn test_discover_shouldOrderFromWorkingDirDownToFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, RULES_FILE_NAME, "Root rule\n")?;
    common::create_test_file(root, ".yaltwairules.ja", "Root Japanese rule")?;
    common::create_test_file(root, "config/locales/.yaltwairules", "  Locale dir rule  \n")?;
    common::create_test_file(root, "config/locales/.yaltwairules.ja", "Locale dir Japanese rule")?;
    common::create_test_file(root, "config/locales/.yaltwairules.fr", "French only")?;
    let source = common::create_test_file(root, "config/locales/en.yml", "en: {}\n")?;

    let rules = RuleSet::discover(&source, "ja", root)?;

    let contents: Vec<&str> = rules.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["Root rule", "Locale dir rule", "Root Japanese rule", "Locale dir Japanese rule"]
    );
    assert!(rules.iter().all(|r| r.source.is_some()));
    Ok(())
}

#[test]
fn test_discover_shouldIgnoreEmptyFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, RULES_FILE_NAME, "  \n\n")?;
    let source = common::create_test_file(root, "en.yml", "en: {}\n")?;

    let rules = RuleSet::discover(&source, "de", root)?;

    assert!(rules.is_empty());
    Ok(())
}

#[test]
fn test_discover_withDirectoryPath_shouldIncludeThatDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "locales/.yaltwairules.de", "Use Sie")?;
    let locales = root.join("locales");

    let rules = RuleSet::discover(&locales, "de", root)?;

    assert_eq!(rules.len(), 1);
    assert_eq!(rules.locale_specific().count(), 1);
    Ok(())
}

#[test]
fn test_discover_withPathOutsideWorkingDir_shouldStillReadWorkingDir() -> Result<()> {
    let working = common::create_temp_dir()?;
    let elsewhere = common::create_temp_dir()?;
    common::create_test_file(working.path(), RULES_FILE_NAME, "Working dir rule")?;
    let source = common::create_test_file(elsewhere.path(), "en.yml", "en: {}\n")?;

    let rules = RuleSet::discover(&source, "fr", working.path())?;

    assert!(rules.iter().any(|r| r.content == "Working dir rule"));
    Ok(())
}
