//! Core Extractor implementation

use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::dedupe::dedupe;
use crate::error::ExtractorError;
use crate::heuristic::HeuristicExtractor;
use crate::parser::parse_structured;
use crate::prompt::{PromptBuilder, PromptStrategy};
use crate::types::{ExtractionMetadata, ExtractionResult};
use glosa_domain::traits::CompletionBackend;
use glosa_domain::{ChatMessage, Chunk, Concept, ExtractionId};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};

/// The Extractor turns document text into a deduplicated list of concepts
///
/// Without a backend every extraction goes straight to the document-level
/// fallback (structured parse of the raw text, then line heuristics).
pub struct Extractor<B> {
    backend: Option<Arc<B>>,
    config: ExtractorConfig,
    chunker: TextChunker,
    heuristic: HeuristicExtractor,
}

/// Concepts from one chunk and the calls it took to get them
struct ChunkOutcome {
    concepts: Vec<Concept>,
    attempts: usize,
}

impl<B> Extractor<B>
where
    B: CompletionBackend + Send + Sync + 'static,
    B::Error: Display,
{
    /// Create an Extractor backed by a completion backend
    pub fn new(backend: B, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::build(Some(Arc::new(backend)), config)
    }

    /// Create an Extractor that only uses the fallback path
    pub fn without_backend(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::build(None, config)
    }

    fn build(backend: Option<Arc<B>>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            backend,
            chunker: TextChunker::from_config(&config),
            heuristic: HeuristicExtractor::from_config(&config),
            config,
        })
    }

    /// Whether completions are available
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Model behind the backend, if any
    pub fn model_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|backend| backend.model_name())
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract concepts from document text
    ///
    /// Returns [`ExtractorError::EmptyText`] for blank input and
    /// [`ExtractorError::NoConcepts`] when neither the backend nor the
    /// fallback found anything. A successful result is never empty.
    pub async fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractorError> {
        let extraction_id = ExtractionId::new();
        let span = info_span!("extraction", id = %extraction_id);

        self.run_extraction(text, extraction_id).instrument(span).await
    }

    async fn run_extraction(
        &self,
        text: &str,
        extraction_id: ExtractionId,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start_time = Instant::now();
        let mut metadata =
            ExtractionMetadata::new(extraction_id, self.model_name().map(str::to_string));

        if text.trim().is_empty() {
            warn!("Empty text, nothing to extract");
            return Err(ExtractorError::EmptyText);
        }

        let (text, truncated) = truncate_chars(text, self.config.max_text_length);
        metadata.truncated = truncated;
        if truncated {
            info!("Text truncated to {} characters", self.config.max_text_length);
        }

        let mut concepts = Vec::new();

        if self.backend.is_some() {
            let chunks: Vec<Chunk> = self
                .chunker
                .chunk(text)
                .into_iter()
                .filter(|chunk| !chunk.is_blank())
                .collect();

            info!("Split text into {} chunks", chunks.len());

            for chunk in &chunks {
                debug!("Processing chunk {}/{}", chunk.sequence_index + 1, chunks.len());
                let outcome = self.run_chunk(chunk).await;
                metadata.completion_attempts += outcome.attempts;
                concepts.extend(outcome.concepts);
            }
            metadata.chunks_processed = chunks.len();
        } else {
            info!("No completion backend configured");
        }

        if concepts.is_empty() {
            info!("No concepts from the backend, using fallback extraction");
            concepts = self.extract_fallback(text);
            metadata.used_fallback = true;
        }

        let concepts = dedupe(concepts, self.config.dedupe_policy);
        metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

        if concepts.is_empty() {
            warn!("No concepts extracted");
            return Err(ExtractorError::NoConcepts);
        }

        info!(
            "Extraction complete: {} concepts, {} attempts, fallback: {}",
            concepts.len(),
            metadata.completion_attempts,
            metadata.used_fallback
        );

        Ok(ExtractionResult { concepts, metadata })
    }

    /// Ask the backend for concepts in one chunk
    ///
    /// Each attempt uses the next prompt strategy. The first attempt whose
    /// response parses to at least one concept wins; backend errors and
    /// timeouts count as failed attempts. Exhaustion gives an empty list.
    pub async fn extract_from_chunk(&self, chunk: &Chunk) -> Vec<Concept> {
        self.run_chunk(chunk).await.concepts
    }

    async fn run_chunk(&self, chunk: &Chunk) -> ChunkOutcome {
        let Some(backend) = &self.backend else {
            return ChunkOutcome {
                concepts: Vec::new(),
                attempts: 0,
            };
        };

        for attempt in 0..self.config.max_retries {
            let strategy = PromptStrategy::for_attempt(attempt);
            let messages = PromptBuilder::new(&chunk.text)
                .with_strategy(strategy)
                .build();

            match self.call_backend(backend, messages).await {
                Ok(response) => {
                    debug!(
                        "Attempt {} ({}) response length: {} chars",
                        attempt + 1,
                        strategy.as_str(),
                        response.len()
                    );

                    let concepts = parse_structured(&response);
                    if !concepts.is_empty() {
                        return ChunkOutcome {
                            concepts,
                            attempts: attempt + 1,
                        };
                    }
                    warn!("Attempt {} ({}) parsed no concepts", attempt + 1, strategy.as_str());
                }
                Err(e) => {
                    warn!("Attempt {} ({}) failed: {}", attempt + 1, strategy.as_str(), e);
                }
            }
        }

        warn!(
            "Chunk {} gave no concepts after {} attempts",
            chunk.sequence_index, self.config.max_retries
        );

        ChunkOutcome {
            concepts: Vec::new(),
            attempts: self.config.max_retries,
        }
    }

    /// Call the backend on a blocking thread, bounded by the attempt timeout
    ///
    /// A timed-out call is still joined before returning, so at most one
    /// completion call per request is ever in flight.
    async fn call_backend(
        &self,
        backend: &Arc<B>,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ExtractorError> {
        let backend = Arc::clone(backend);
        let params = self.config.generation_params();

        let mut call = tokio::task::spawn_blocking(move || {
            backend
                .complete(&messages, &params)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        });

        match timeout(self.config.attempt_timeout(), &mut call).await {
            Ok(joined) => {
                joined.map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
            }
            Err(_) => {
                warn!("Attempt timed out, waiting for the backend call to return");
                let _ = call.await;
                Err(ExtractorError::Timeout)
            }
        }
    }

    /// Document-level fallback: structured parse first, then line heuristics
    pub fn extract_fallback(&self, text: &str) -> Vec<Concept> {
        let structured = parse_structured(text);
        if !structured.is_empty() {
            debug!("Fallback found {} structured concepts", structured.len());
            return structured;
        }

        self.heuristic.extract(text)
    }
}

/// Cut text to at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}
