//! Glosa Domain Layer
//!
//! This crate contains the core domain model for Glosa. It has a single external
//! dependency (`uuid`) and defines the value objects and trait interfaces that
//! all other crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Concept**: A `{title, definition}` pair extracted from a document
//! - **Chunk**: A bounded, possibly overlapping slice of the source document
//! - **ExtractionId**: UUIDv7 identifying a single extraction request
//! - **CompletionBackend**: The language model boundary (messages in, text out)
//!
//! ## Architecture
//!
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod concept;
pub mod extraction_id;
pub mod message;
pub mod traits;

// Re-exports for convenience
pub use chunk::Chunk;
pub use concept::{collapse_whitespace, Concept};
pub use extraction_id::ExtractionId;
pub use message::{ChatMessage, GenerationParams, MessageRole};
