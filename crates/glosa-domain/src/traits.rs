//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ChatMessage, GenerationParams};

/// Trait for language model completion backends
///
/// Implemented by the infrastructure layer (glosa-llm). Calls are blocking
/// and may take seconds; callers decide how to schedule them.
pub trait CompletionBackend {
    /// Error type for completion operations
    type Error;

    /// Turn an ordered list of messages into generated text
    fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, Self::Error>;

    /// Name of the model behind this backend
    fn model_name(&self) -> &str;
}
