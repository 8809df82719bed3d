/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::str::FromStr;
use yaltwai::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};

use crate::common;

#[test]
fn test_loadOrDefault_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(&temp_dir.path().join("missing.json"))?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

#[test]
fn test_loadOrDefault_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "ja",
            "translation": {
                "provider": "anthropic",
                "available_providers": [
                    { "type": "anthropic", "model": "claude-3-5-sonnet-20241022", "api_key": "sk-test" }
                ]
            },
            "pipeline": { "lines_per_chunk": 100, "backup": true },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.get_model(), "claude-3-5-sonnet-20241022");
    assert_eq!(config.translation.get_api_key(), "sk-test");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.pipeline.lines_per_chunk, 100);
    assert_eq!(config.pipeline.max_file_attempts, 3);
    assert!(config.pipeline.backup);
    assert_eq!(config.log_level, LogLevel::Debug);
    config.validate()?;
    Ok(())
}

#[test]
fn test_loadOrDefault_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let error = Config::load_or_default(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_save_shouldRoundTripThroughFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.pipeline.max_file_attempts = 5;
    config.save(&path)?;

    let loaded = Config::load_or_default(&path)?;
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.pipeline, config.pipeline);
    Ok(())
}

#[test]
fn test_validate_withInvalidLocale_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.target_language = "zz".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withSameSourceAndTarget_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.target_language = "EN".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroChunkSize_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.pipeline.lines_per_chunk = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withLocalProvider_shouldNotNeedApiKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    config.target_language = "pt-BR".to_string();

    assert!(config.validate().is_ok());
}

#[test]
fn test_setModel_shouldUpdateActiveProviderOnly() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.set_model("mistral");

    assert_eq!(config.translation.get_model(), "mistral");
    let openai = config.translation.get_provider_config(&TranslationProvider::OpenAI).unwrap();
    assert_eq!(openai.model, "gpt-4");
}

#[test]
fn test_setModel_withMissingProviderEntry_shouldAddOne() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.set_model("gpt-4o");

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "gpt-4o");
}

#[test]
fn test_providerFromStr_shouldAcceptKnownNames() {
    assert_eq!(TranslationProvider::from_str("OpenAI").unwrap(), TranslationProvider::OpenAI);
    assert_eq!(TranslationProvider::from_str("lmstudio").unwrap(), TranslationProvider::LMStudio);
    assert!(TranslationProvider::from_str("deepl").is_err());
}

#[test]
fn test_providerConfigNew_shouldUseProviderDefaults() {
    let ollama = ProviderConfig::new(TranslationProvider::Ollama);
    assert_eq!(ollama.provider_type, "ollama");
    assert_eq!(ollama.endpoint, "http://localhost:11434");
    assert_eq!(ollama.timeout_secs, 300);
}
