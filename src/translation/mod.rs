/*!
 * Translation of YAML locale documents using AI providers.
 *
 * This module contains the core functionality for translating locale files.
 * It is split into several submodules:
 *
 * - `core`: Chunk translation service with retries
 * - `chunking`: Indentation-aware splitting of large documents
 * - `document`: Ordered, all-or-nothing document translation
 * - `formatting`: Cleanup of provider responses
 * - `prompts`: Instruction and message builders
 * - `rules`: User supplied translation rules
 */

// Re-export main types for easier usage
pub use self::chunking::{split_document, split_into_chunks, Chunk};
pub use self::core::TranslationService;
pub use self::document::DocumentTranslator;
pub use self::rules::{RuleSet, TranslationRule};

// Submodules
pub mod chunking;
pub mod core;
pub mod document;
pub mod formatting;
pub mod prompts;
pub mod rules;
