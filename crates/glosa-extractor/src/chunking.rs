//! Overlap-aware text chunking
//!
//! Sizes are counted in characters so multi-byte text is never split inside a
//! codepoint.

use crate::config::{BoundaryMode, ExtractorConfig};
use glosa_domain::Chunk;

/// Splits text into overlapping chunks bounded by a target size
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    threshold: f64,
    mode: BoundaryMode,
}

impl TextChunker {
    /// Create a chunker that snaps to whitespace past 80% of the chunk
    ///
    /// `chunk_size` must be greater than `overlap`; a zero `chunk_size` is
    /// raised to one.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
            threshold: 0.8,
            mode: BoundaryMode::Whitespace,
        }
    }

    /// Change the preferred boundary and how far into the chunk it must lie
    pub fn with_boundary(mut self, mode: BoundaryMode, threshold: f64) -> Self {
        self.mode = mode;
        self.threshold = threshold;
        self
    }

    /// Build a chunker from extractor settings
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
            .with_boundary(config.boundary_mode, config.boundary_threshold)
    }

    /// Chunk the given text
    ///
    /// Empty text gives no chunks; any other text gives at least one.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total = chars.len();
        let byte_at = |pos: usize| offsets.get(pos).copied().unwrap_or(text.len());

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let mut end = (start + self.chunk_size).min(total);
            if end < total {
                if let Some(cut) = self.find_boundary(&chars, start, end) {
                    end = cut;
                }
            }

            chunks.push(Chunk::new(&text[byte_at(start)..byte_at(end)], chunks.len()));

            if end == total {
                break;
            }

            // The start must strictly progress or the loop never ends
            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Find the nearest boundary before `end`, ignoring anything in the first
    /// `threshold` share of the chunk. Returns the exclusive end of the chunk.
    fn find_boundary(&self, chars: &[char], start: usize, end: usize) -> Option<usize> {
        let floor = start + (self.chunk_size as f64 * self.threshold) as usize;

        (floor + 1..end).rev().find_map(|i| match self.mode {
            BoundaryMode::Whitespace if chars[i].is_whitespace() => Some(i),
            BoundaryMode::Sentence if chars[i] == '.' || chars[i] == '\n' => Some(i + 1),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_short_text_is_single_untrimmed_chunk() {
        let chunker = TextChunker::new(100, 10);
        let text = "  Short text here.  ";
        let chunks = chunker.chunk(text);
        assert_eq!(texts(&chunks), vec![text]);
        assert_eq!(chunks[0].sequence_index, 0);
    }

    #[test]
    fn test_text_exactly_chunk_size() {
        let chunker = TextChunker::new(10, 3);
        let chunks = chunker.chunk("abcdefghij");
        assert_eq!(texts(&chunks), vec!["abcdefghij"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(TextChunker::new(10, 3).chunk("").is_empty());
    }

    #[test]
    fn test_hard_cut_without_boundary() {
        let chunker = TextChunker::new(10, 2);
        let chunks = chunker.chunk(&"a".repeat(25));
        // starts at 0, 8, 16
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_len(), 10);
        assert_eq!(chunks[1].char_len(), 10);
        assert_eq!(chunks[2].char_len(), 9);
    }

    #[test]
    fn test_snaps_to_whitespace_near_end() {
        let chunker = TextChunker::new(10, 0);
        // space at index 9 lies past 80% of the chunk
        let chunks = chunker.chunk("aaaaaaaaa bbbbbbbbb");
        assert_eq!(texts(&chunks), vec!["aaaaaaaaa", " bbbbbbbbb"]);
    }

    #[test]
    fn test_ignores_whitespace_too_early() {
        let chunker = TextChunker::new(10, 0);
        // space at index 3 is before 80% of the chunk
        let chunks = chunker.chunk("aaa bbbbbbbbbbbbbbb");
        assert_eq!(chunks[0].text, "aaa bbbbbb");
    }

    #[test]
    fn test_sentence_mode_keeps_period() {
        let chunker = TextChunker::new(10, 0).with_boundary(BoundaryMode::Sentence, 0.7);
        let chunks = chunker.chunk("Abcdefgh. Ijklmnop.");
        assert_eq!(chunks[0].text, "Abcdefgh.");
        assert_eq!(chunks[1].text, " Ijklmnop.");
    }

    #[test]
    fn test_overlap_repeats_tail() {
        let chunker = TextChunker::new(10, 4);
        let chunks = chunker.chunk("0123456789abcdefghij");
        assert_eq!(chunks[0].text, "0123456789");
        assert_eq!(chunks[1].text, "6789abcdef");
        assert_eq!(chunks[2].text, "cdefghij");
    }

    #[test]
    fn test_overlap_close_to_chunk_size_terminates() {
        let chunker = TextChunker::new(10, 9);
        let chunks = chunker.chunk(&"x".repeat(50));
        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 50);
        assert!(chunks.last().unwrap().text.len() <= 10);
    }

    #[test]
    fn test_overlap_larger_than_snapped_chunk_still_progresses() {
        // Snapping shrinks the chunk below the overlap; the clamp must kick in
        let chunker = TextChunker::new(10, 9).with_boundary(BoundaryMode::Whitespace, 0.1);
        let chunks = chunker.chunk("a b c d e f g h i j k l m n o p");
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.char_len() <= 10));
    }

    #[test]
    fn test_multibyte_text() {
        let chunker = TextChunker::new(4, 1);
        let chunks = chunker.chunk("ñññññññ");
        assert!(chunks.iter().all(|c| c.char_len() <= 4));
        assert_eq!(chunks[0].text, "ññññ");
    }

    #[test]
    fn test_sequence_indices_are_ordered() {
        let chunker = TextChunker::new(5, 1);
        let chunks = chunker.chunk(&"z".repeat(30));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
        }
    }

    #[test]
    fn test_from_config() {
        let config = ExtractorConfig::default();
        let chunker = TextChunker::from_config(&config);
        assert_eq!(chunker.chunk_size, 6_000);
        assert_eq!(chunker.overlap, 500);
    }
}
