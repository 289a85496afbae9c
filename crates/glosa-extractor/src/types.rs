//! Result types for extraction

use glosa_domain::{Concept, ExtractionId};

/// Result of an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Deduplicated concepts in first-seen order
    pub concepts: Vec<Concept>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Identifier attached to every log line of this extraction
    pub extraction_id: ExtractionId,

    /// Unix timestamp (milliseconds) when extraction started
    pub timestamp_ms: u64,

    /// Backend model, if a backend was configured
    pub model_name: Option<String>,

    /// Non-blank chunks sent to the backend
    pub chunks_processed: usize,

    /// Completion calls made across all chunks
    pub completion_attempts: usize,

    /// Whether the document-level fallback produced the concepts
    pub used_fallback: bool,

    /// Whether the input was cut to the configured maximum length
    pub truncated: bool,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ExtractionMetadata {
    pub(crate) fn new(extraction_id: ExtractionId, model_name: Option<String>) -> Self {
        Self {
            timestamp_ms: extraction_id.timestamp(),
            extraction_id,
            model_name,
            chunks_processed: 0,
            completion_attempts: 0,
            used_fallback: false,
            truncated: false,
            processing_time_ms: 0,
        }
    }
}
