//! Chunk module - bounded slices of a source document

/// An ordered, possibly overlapping substring of the source document
///
/// Chunks exist only for the duration of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk text
    pub text: String,

    /// Position of this chunk in the document (0-based)
    pub sequence_index: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            text: text.into(),
            sequence_index,
        }
    }

    /// Length of the chunk in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the chunk holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
