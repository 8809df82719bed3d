/*!
 * Whole-document translation.
 *
 * A document is split into chunks that are translated strictly in order and
 * joined back together. The first chunk that fails aborts the document; no
 * partial translation is ever returned.
 */

use log::{debug, info};

use crate::errors::TranslationError;

use super::chunking::{split_document, Chunk};
use super::core::TranslationService;
use super::formatting::line_count;
use super::prompts;
use super::rules::RuleSet;

/// Translates complete YAML documents chunk by chunk
#[derive(Debug, Clone)]
pub struct DocumentTranslator {
    service: TranslationService,
    lines_per_chunk: usize,
}

impl DocumentTranslator {
    /// Create a translator over a configured service
    pub fn new(service: TranslationService, lines_per_chunk: usize) -> Self {
        Self {
            service,
            lines_per_chunk: lines_per_chunk.max(1),
        }
    }

    /// The underlying chunk translation service
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate a document.
    ///
    /// `progress(done, total)` is called after every translated chunk.
    pub async fn translate_document<F>(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        rules: &RuleSet,
        progress: F,
    ) -> Result<String, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let instructions = prompts::build_instructions(rules, target_language);
        let chunks = split_document(text, self.lines_per_chunk);
        let total_chunks = chunks.len();

        if total_chunks > 1 {
            info!(
                "Splitting {} lines into {} chunks for translation",
                line_count(text),
                total_chunks
            );
        }

        let mut translated = String::with_capacity(text.len());
        for chunk in &chunks {
            let result = self
                .translate_one(chunk, source_language, target_language, &instructions)
                .await
                .map_err(|source| TranslationError::ChunkFailed {
                    chunk_index: chunk.index,
                    total_chunks,
                    source,
                })?;

            debug!(
                "Chunk {}/{} translated ({} lines in, {} lines out)",
                chunk.index + 1,
                total_chunks,
                chunk.len(),
                line_count(&result)
            );
            translated.push_str(&match_line_ending(&result, &chunk.text()));
            progress(chunk.index + 1, total_chunks);
        }

        Ok(translated)
    }

    async fn translate_one(
        &self,
        chunk: &Chunk,
        source_language: &str,
        target_language: &str,
        instructions: &str,
    ) -> Result<String, crate::errors::ProviderError> {
        self.service
            .translate_chunk(&chunk.text(), source_language, target_language, instructions)
            .await
    }
}

/// Give a translated chunk the final line terminator of its source chunk.
///
/// Chunks are concatenated as they are, so only the last terminator is
/// adjusted: added when the provider dropped it, removed when the source had
/// none. Blank lines inside or at the end of the chunk are kept.
pub fn match_line_ending(translated: &str, source: &str) -> String {
    let terminator = if source.ends_with("\r\n") {
        "\r\n"
    } else if source.ends_with('\n') {
        "\n"
    } else {
        ""
    };

    if terminator.is_empty() {
        let body = translated
            .strip_suffix("\r\n")
            .or_else(|| translated.strip_suffix('\n'))
            .unwrap_or(translated);
        return body.to_string();
    }

    if translated.ends_with('\n') {
        translated.to_string()
    } else {
        format!("{}{}", translated, terminator)
    }
}
