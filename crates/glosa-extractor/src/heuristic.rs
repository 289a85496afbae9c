//! Heuristic fallback for text that follows no known format
//!
//! Lines are classified by shape. A title-like line opens a concept and the
//! body lines after it become its definition.

use crate::config::ExtractorConfig;
use crate::parser::{build_concept, MIN_DEFINITION_CHARS};
use glosa_domain::Concept;
use tracing::debug;

/// Lines containing any of these (case-insensitive) are document furniture
const HEADER_KEYWORDS: &[&str] = &[
    "version",
    "abstract",
    "introduction",
    "conclusion",
    "references",
    "acknowledg",
];

/// Whole words that mark a line as a schedule or instruction, not a title
const FILLER_WORDS: &[&str] = &["pass", "minute", "minutes", "hour", "hours"];

/// Shape of a single trimmed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming
    Blank,
    /// Section header or metadata; ignored
    Header,
    /// Starts a new concept
    Title,
    /// Bullet or link line; never part of a definition
    Bullet,
    /// Definition text
    Body,
}

/// Line-shape extractor
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    min_title_chars: usize,
    max_title_chars: usize,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self {
            min_title_chars: 2,
            max_title_chars: 150,
        }
    }
}

impl HeuristicExtractor {
    /// Titles must be strictly longer than `min_title_chars` and strictly
    /// shorter than `max_title_chars`
    pub fn new(min_title_chars: usize, max_title_chars: usize) -> Self {
        Self {
            min_title_chars,
            max_title_chars,
        }
    }

    /// Build an extractor from extractor settings
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.min_title_chars, config.max_title_chars)
    }

    /// Classify one line (trimmed internally)
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Blank;
        }

        let lower = line.to_lowercase();
        if HEADER_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
            return LineKind::Header;
        }

        if self.is_candidate_title(line) {
            LineKind::Title
        } else if line.starts_with(['*', '-', '[']) {
            LineKind::Bullet
        } else {
            LineKind::Body
        }
    }

    /// Whether a trimmed line looks like a concept title
    pub fn is_candidate_title(&self, line: &str) -> bool {
        let len = line.chars().count();

        len > self.min_title_chars
            && len < self.max_title_chars
            && !line.starts_with(['*', '-'])
            && !line.ends_with("**")
            && !is_all_uppercase(line)
            && !line.contains(':')
            && !line.ends_with(['.', '!', '?', ';'])
            && !contains_filler_word(line)
    }

    /// Extract concepts from free text
    pub fn extract(&self, text: &str) -> Vec<Concept> {
        let mut accumulator = ConceptAccumulator::default();

        for line in text.lines() {
            match self.classify(line) {
                LineKind::Title => accumulator.push_title(line.trim()),
                LineKind::Body => accumulator.push_body(line.trim()),
                LineKind::Blank | LineKind::Header | LineKind::Bullet => {}
            }
        }

        let concepts = accumulator.finish();
        debug!("Heuristic extraction found {} concepts", concepts.len());
        concepts
    }
}

/// Extract concepts from free text with default title bounds
pub fn extract_heuristic(text: &str) -> Vec<Concept> {
    HeuristicExtractor::default().extract(text)
}

/// Buffers body lines under the pending title and emits finished concepts
#[derive(Debug, Default)]
pub struct ConceptAccumulator {
    pending: Option<String>,
    body: Vec<String>,
    concepts: Vec<Concept>,
}

impl ConceptAccumulator {
    /// Close the pending concept and open a new one
    pub fn push_title(&mut self, title: &str) {
        self.flush();
        self.pending = Some(title.to_string());
    }

    /// Append a definition line; ignored while no title is pending
    pub fn push_body(&mut self, line: &str) {
        if self.pending.is_some() {
            self.body.push(line.to_string());
        }
    }

    /// Close the pending concept and return everything emitted so far
    pub fn finish(mut self) -> Vec<Concept> {
        self.flush();
        self.concepts
    }

    fn flush(&mut self) {
        let Some(title) = self.pending.take() else {
            return;
        };

        let definition = self.body.join(" ");
        self.body.clear();

        if definition.chars().count() < MIN_DEFINITION_CHARS {
            debug!("Discarding title '{}': definition too short", title);
            return;
        }

        if let Some(concept) = build_concept(&title, &definition, 1) {
            self.concepts.push(concept);
        }
    }
}

/// At least one cased character and no lowercase ones
fn is_all_uppercase(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn contains_filler_word(line: &str) -> bool {
    line.split(|c: char| !c.is_alphanumeric())
        .any(|word| FILLER_WORDS.iter().any(|filler| word.eq_ignore_ascii_case(filler)))
}
