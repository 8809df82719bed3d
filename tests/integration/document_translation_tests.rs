/*!
 * Tests for chunked document translation against a mock provider
 */

use std::sync::Mutex;
use yaltwai::errors::{ProviderError, TranslationError};
use yaltwai::providers::mock::MockProvider;
use yaltwai::translation::formatting::line_count;
use yaltwai::translation::prompts;
use yaltwai::translation::{DocumentTranslator, RuleSet, TranslationRule};

use crate::common;

fn translator(provider: MockProvider, lines_per_chunk: usize) -> DocumentTranslator {
    let config = common::test_config();
    DocumentTranslator::new(common::mock_service(provider, &config), lines_per_chunk)
}

#[tokio::test]
async fn test_translateDocument_withLargeDocument_shouldSendChunksInOrder() {
    let provider = MockProvider::echo();
    let translator = translator(provider.clone(), 250);
    let document = common::flat_locale_yaml(300);

    let translated = translator
        .translate_document(&document, "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, document);
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let first = prompts::document_from_user_message(&requests[0].user_text);
    let second = prompts::document_from_user_message(&requests[1].user_text);
    assert!(first.starts_with("en:\n  key_1: Value 1\n"));
    assert!(first.ends_with("  key_249: Value 249\n"));
    assert!(second.starts_with("  key_250: Value 250\n"));
}

#[tokio::test]
async fn test_translateDocument_withFailingSecondChunk_shouldReturnNoOutput() {
    let provider = MockProvider::scripted(vec![
        Ok("fr:\n  key_1: Valeur 1\n".to_string()),
        Err(ProviderError::QuotaExceeded("monthly quota reached".into())),
    ]);
    let translator = translator(provider.clone(), 250);
    let document = common::flat_locale_yaml(300);

    let error = translator
        .translate_document(&document, "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap_err();

    match error {
        TranslationError::ChunkFailed { chunk_index, total_chunks, source } => {
            assert_eq!(chunk_index, 1);
            assert_eq!(total_chunks, 2);
            assert!(source.is_fatal());
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_translateDocument_withTransientErrors_shouldRetryChunk() {
    let provider = MockProvider::fail_first(2, ProviderError::ConnectionError("reset".into()));
    let translator = translator(provider.clone(), 250);

    let translated = translator
        .translate_document("en:\n  a: b\n", "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, "en:\n  a: b\n");
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_translateDocument_withPersistentTransientError_shouldStopAfterRetryCount() {
    let provider = MockProvider::failing(ProviderError::RateLimitExceeded("slow down".into()));
    let translator = translator(provider.clone(), 250);

    let result = translator
        .translate_document("en:\n  a: b\n", "en", "fr", &RuleSet::default(), |_, _| {})
        .await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_translateDocument_withBillingError_shouldNotRetry() {
    let provider = MockProvider::failing(ProviderError::BillingError("card declined".into()));
    let translator = translator(provider.clone(), 250);

    let error = translator
        .translate_document("en:\n  a: b\n", "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap_err();

    assert!(error.is_fatal());
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_translateDocument_shouldReportProgressPerChunk() {
    let translator = translator(MockProvider::echo(), 100);
    let document = common::flat_locale_yaml(250);
    let calls = Mutex::new(Vec::new());

    translator
        .translate_document(&document, "en", "fr", &RuleSet::default(), |done, total| {
            calls.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    assert_eq!(calls.into_inner().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_translateDocument_shouldSendRulesWithEveryChunk() {
    let provider = MockProvider::echo();
    let translator = translator(provider.clone(), 100);
    let rules = RuleSet::from_rules(vec![
        TranslationRule::locale_specific("Address the user with vous"),
        TranslationRule::general("Never translate the brand name Acme"),
    ]);

    translator
        .translate_document(&common::flat_locale_yaml(150), "en", "fr", &rules, |_, _| {})
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let general = request.instructions.find("Acme").unwrap();
        let specific = request.instructions.find("vous").unwrap();
        assert!(general < specific);
        assert!(request.user_text.contains("English (en)"));
        assert!(request.user_text.contains("French (fr)"));
    }
}

#[tokio::test]
async fn test_translateDocument_withFencedResponses_shouldStripFences() {
    let translator = translator(MockProvider::fenced_echo(), 250);

    let translated = translator
        .translate_document(common::sample_locale_yaml(), "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, common::sample_locale_yaml());
}

#[tokio::test]
async fn test_translateDocument_withEmptyDocument_shouldNotCallProvider() {
    let provider = MockProvider::echo();
    let translator = translator(provider.clone(), 250);

    let translated = translator
        .translate_document("", "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, "");
    assert_eq!(provider.request_count(), 0);
}

/// Locale text with comments, blank lines inside blocks and a trailing blank line
const SPACED_DOCUMENT: &str = "en:
  # Greetings
  hello: Hello

  bye: Goodbye

  account:
    title: \"Your account\"

    # Shown after sign in
    welcome: \"Welcome back, %{name}\"


  footer: Thanks

";

#[tokio::test]
async fn test_translateDocument_withBlankLineAtChunkBoundary_shouldKeepIt() {
    let translator = translator(MockProvider::echo(), 2);
    let document = "a: 1\nb: 2\n\nc: 3\n";

    let translated = translator
        .translate_document(document, "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, document);
}

#[tokio::test]
async fn test_translateDocument_withTrailingBlankLine_shouldKeepIt() {
    let translator = translator(MockProvider::echo(), 250);
    let document = "a: 1\nb: 2\n\n";

    let translated = translator
        .translate_document(document, "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, document);
    assert_eq!(line_count(&translated), 3);
}

#[tokio::test]
async fn test_translateDocument_withAnyChunkSize_shouldPreserveLineCount() {
    for lines_per_chunk in [1, 2, 3, 4, 5, 7, 250] {
        let translator = translator(MockProvider::echo(), lines_per_chunk);

        let translated = translator
            .translate_document(SPACED_DOCUMENT, "en", "fr", &RuleSet::default(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(
            line_count(&translated),
            line_count(SPACED_DOCUMENT),
            "line count changed with {} lines per chunk",
            lines_per_chunk
        );
        assert_eq!(translated, SPACED_DOCUMENT, "with {} lines per chunk", lines_per_chunk);
    }
}

#[tokio::test]
async fn test_translateDocument_withFencedResponsesAndBlankLines_shouldPreserveLineCount() {
    for lines_per_chunk in [2, 3, 250] {
        let translator = translator(MockProvider::fenced_echo(), lines_per_chunk);

        let translated = translator
            .translate_document(SPACED_DOCUMENT, "en", "fr", &RuleSet::default(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(translated, SPACED_DOCUMENT, "with {} lines per chunk", lines_per_chunk);
    }
}

#[tokio::test]
async fn test_translateDocument_withUnterminatedLastLine_shouldNotAddLineBreak() {
    let translator = translator(MockProvider::fenced_echo(), 1);
    let document = "a: 1\nb: 2";

    let translated = translator
        .translate_document(document, "en", "fr", &RuleSet::default(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(translated, document);
}
