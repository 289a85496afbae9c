//! Glosa Extractor
//!
//! Turns document text into study concepts using a completion backend, with a
//! deterministic fallback when the backend is missing or unhelpful.
//!
//! # Architecture
//!
//! ```text
//! Text → truncate → Chunker → (per chunk) retry controller → backend → parser
//!                                  │
//!                 all chunks empty ┴→ parser / heuristics over the whole text
//!                                  → dedupe → concepts
//! ```
//!
//! # Key Features
//!
//! - **Overlap-aware chunking**: character-counted chunks that prefer to end on
//!   whitespace or sentence boundaries
//! - **Strategy rotation**: each retry asks with a different prompt phrasing
//! - **Tolerant parsing**: `concept:`/`definition:` blocks or tagged blocks
//! - **Sanitized definitions**: symbols are spelled out as words
//!
//! # Example Usage
//!
//! ```no_run
//! use glosa_extractor::{Extractor, ExtractorConfig};
//! use glosa_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = OllamaProvider::default_endpoint("llama3");
//! let extractor = Extractor::new(backend, ExtractorConfig::default())?;
//!
//! let result = extractor.extract("Photosynthesis converts light to energy.").await?;
//! for concept in &result.concepts {
//!     println!("{}: {}", concept.title, concept.definition);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod dedupe;
mod error;
mod extractor;
mod heuristic;
mod parser;
mod prompt;
mod sanitizer;
mod types;


pub use chunking::TextChunker;
pub use config::{BoundaryMode, DedupePolicy, ExtractorConfig};
pub use dedupe::dedupe;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use heuristic::{extract_heuristic, ConceptAccumulator, HeuristicExtractor, LineKind};
pub use parser::parse_structured;
pub use prompt::{PromptBuilder, PromptStrategy};
pub use sanitizer::{is_allowed, replaced_symbols, sanitize};
pub use types::{ExtractionMetadata, ExtractionResult};
