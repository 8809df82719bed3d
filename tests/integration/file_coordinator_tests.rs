/*!
 * Tests for the file-level translate, validate and retry workflow
 */

use anyhow::Result;
use std::fs;
use std::time::{Duration, SystemTime};
use yaltwai::errors::{AppError, ProviderError};
use yaltwai::providers::mock::MockProvider;
use yaltwai::translation::formatting::line_count;
use yaltwai::translation::RuleSet;

use crate::common;

const BROKEN_TRANSLATION: &str = "fr:\n  hello: \"Bonjour\" monde\n  bye: Au revoir\n";

#[tokio::test]
async fn test_translateFile_withEchoProvider_shouldWriteTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", common::sample_locale_yaml())?;
    let target = temp_dir.path().join("fr.yml");
    let controller = common::mock_controller(MockProvider::echo(), common::test_config(), temp_dir.path());

    let outcome = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await?;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.fixes_applied, 0);
    assert!(outcome.unresolved.is_none());
    assert_eq!(fs::read_to_string(&target)?, common::sample_locale_yaml());
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withAlwaysBrokenOutput_shouldGiveUpAndLeaveNoTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello world\n")?;
    let target = temp_dir.path().join("fr.yml");
    let provider = MockProvider::echo().with_custom_response(|_| BROKEN_TRANSLATION.to_string());
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let error = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await
        .unwrap_err();

    assert!(error.needs_retranslation());
    assert!(!target.exists());
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withBrokenThenValidOutput_shouldSucceedOnSecondAttempt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello world\n")?;
    let target = temp_dir.path().join("fr.yml");
    let provider = MockProvider::scripted(vec![
        Ok(BROKEN_TRANSLATION.to_string()),
        Ok("fr:\n  hello: Bonjour le monde\n".to_string()),
    ]);
    let controller = common::mock_controller(provider, common::test_config(), temp_dir.path());

    let outcome = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await?;

    assert_eq!(outcome.attempts, 2);
    assert_eq!(fs::read_to_string(&target)?, "fr:\n  hello: Bonjour le monde\n");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withUnquotedPlaceholder_shouldRepairTargetOnDisk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  greeting: \"%{name}\"\n")?;
    let target = temp_dir.path().join("fr.yml");
    let provider = MockProvider::echo().with_custom_response(|_| "fr:\n  greeting: %{name}\n".to_string());
    let controller = common::mock_controller(provider, common::test_config(), temp_dir.path());

    let outcome = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await?;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.fixes_applied, 1);
    assert_eq!(fs::read_to_string(&target)?, "fr:\n  greeting: \"%{name}\"\n");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withBackupEnabled_shouldKeepPreviousTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello\n")?;
    let target = common::create_test_file(temp_dir.path(), "fr.yml", "fr:\n  hello: Salut\n")?;
    let mut config = common::test_config();
    config.pipeline.backup = true;
    let controller = common::mock_controller(MockProvider::echo(), config, temp_dir.path());

    controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await?;

    assert_eq!(fs::read_to_string(temp_dir.path().join("fr.yml.bak"))?, "fr:\n  hello: Salut\n");
    assert_eq!(fs::read_to_string(&target)?, "en:\n  hello: Hello\n");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withFatalError_shouldKeepExistingTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello\n")?;
    let target = common::create_test_file(temp_dir.path(), "fr.yml", "fr:\n  hello: Salut\n")?;
    let provider = MockProvider::failing(ProviderError::QuotaExceeded("no credits left".into()));
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let error = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::Translation(_)));
    assert_eq!(provider.request_count(), 1);
    assert_eq!(fs::read_to_string(&target)?, "fr:\n  hello: Salut\n");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withFatalError_shouldNotCreateTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello\n")?;
    let target = temp_dir.path().join("fr.yml");
    let provider = MockProvider::failing(ProviderError::BillingError("payment required".into()));
    let controller = common::mock_controller(provider, common::test_config(), temp_dir.path());

    let result = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await;

    assert!(result.is_err());
    assert!(!target.exists());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_shouldSkipUpToDateTargetsUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let locales = temp_dir.path().join("locales");
    common::create_test_file(&locales, "en.yml", "en:\n  hello: Hello\n")?;
    let target = common::create_test_file(&locales, "fr.yml", "fr:\n  hello: Bonjour\n")?;
    let newer = SystemTime::now() + Duration::from_secs(3600);
    fs::File::options().write(true).open(&target)?.set_modified(newer)?;

    let provider = MockProvider::echo();
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let summary = controller.run_folder(locales.clone(), false).await?;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.translated, 0);
    assert_eq!(provider.request_count(), 0);

    let summary = controller.run_folder(locales, true).await?;
    assert_eq!(summary.translated, 1);
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_shouldMapEveryLayoutAndIgnoreOtherLocales() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let locales = temp_dir.path().join("locales");
    common::create_test_file(&locales, "en.yml", "en:\n  a: A\n")?;
    common::create_test_file(&locales, "devise.en.yml", "en:\n  b: B\n")?;
    common::create_test_file(&locales, "en/models.yml", "en:\n  c: C\n")?;
    common::create_test_file(&locales, "de.yml", "de:\n  a: A\n")?;

    let provider = MockProvider::echo();
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let summary = controller.run_folder(locales.clone(), false).await?;

    assert_eq!(summary.translated, 3);
    assert_eq!(summary.failed, 0);
    assert!(locales.join("fr.yml").is_file());
    assert!(locales.join("devise.fr.yml").is_file());
    assert!(locales.join("fr/models.yml").is_file());
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withFailingProvider_shouldCountFailuresAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let locales = temp_dir.path().join("locales");
    common::create_test_file(&locales, "en.yml", "en:\n  a: A\n")?;
    common::create_test_file(&locales, "users.en.yml", "en:\n  b: B\n")?;

    let provider = MockProvider::failing(ProviderError::QuotaExceeded("quota".into()));
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let summary = controller.run_folder(locales.clone(), false).await?;

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.translated, 0);
    assert_eq!(provider.request_count(), 2);
    assert!(!locales.join("fr.yml").exists());
    Ok(())
}

#[tokio::test]
async fn test_runFolder_shouldSendDiscoveredRules() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), ".yaltwairules", "Keep the tone informal")?;
    common::create_test_file(temp_dir.path(), "locales/.yaltwairules.fr", "Use tu, never vous")?;
    common::create_test_file(temp_dir.path(), "locales/en.yml", "en:\n  a: A\n")?;

    let provider = MockProvider::echo();
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    controller.run_folder(temp_dir.path().join("locales"), false).await?;

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].instructions.contains("Keep the tone informal"));
    assert!(requests[0].instructions.contains("Use tu, never vous"));
    Ok(())
}

#[tokio::test]
async fn test_run_withNonLocaleFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "database.yml", "adapter: sqlite\n")?;
    let controller = common::mock_controller(MockProvider::echo(), common::test_config(), temp_dir.path());

    assert!(controller.run(file, false).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withUnwritableTarget_shouldFailWithoutRetryOrLeftovers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.yml", "en:\n  hello: Hello\n")?;
    // The parent of the target is a regular file, so the write fails
    let target = source.join("fr.yml");
    let provider = MockProvider::echo();
    let controller = common::mock_controller(provider.clone(), common::test_config(), temp_dir.path());

    let error = controller
        .translate_file(&source, &target, "en", "fr", &RuleSet::default())
        .await
        .unwrap_err();

    assert!(matches!(error, AppError::File(_)));
    assert!(!error.needs_retranslation());
    assert_eq!(provider.request_count(), 1);
    assert!(!target.exists());
    assert_eq!(fs::read_to_string(&source)?, "en:\n  hello: Hello\n");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withBlankLinesAcrossChunks_shouldKeepLineCountOnDisk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let document = "en:\n  a: A\n\n  b: B\n\n  # Section\n  c: C\n\n";
    let source = common::create_test_file(temp_dir.path(), "en.yml", document)?;
    let target = temp_dir.path().join("fr.yml");

    for lines_per_chunk in [1, 2, 3, 250] {
        let mut config = common::test_config();
        config.pipeline.lines_per_chunk = lines_per_chunk;
        let controller = common::mock_controller(MockProvider::echo(), config, temp_dir.path());

        controller
            .translate_file(&source, &target, "en", "fr", &RuleSet::default())
            .await?;

        let written = fs::read_to_string(&target)?;
        assert_eq!(line_count(&written), line_count(document), "with {} lines per chunk", lines_per_chunk);
        assert_eq!(written, document);
    }
    Ok(())
}
