//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion backend error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A completion attempt exceeded its time budget
    #[error("Completion attempt timed out")]
    Timeout,

    /// Nothing to extract from
    #[error("Empty text extracted")]
    EmptyText,

    /// Every extraction path came back empty
    #[error("No concepts extracted from file")]
    NoConcepts,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
