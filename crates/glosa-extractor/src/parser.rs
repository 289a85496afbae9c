//! Parse model output into concepts
//!
//! Two delimiter conventions are understood:
//!
//! ```text
//! concept: Photosynthesis                <concept>Photosynthesis</concept>
//! definition: Process converting ...     <definition>Process converting ...</definition>
//! ---
//! ```
//!
//! Labeled blocks are tried first; tagged blocks only when no labeled block
//! survives.

use crate::sanitizer::sanitize;
use glosa_domain::{collapse_whitespace, Concept};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Minimum title length (characters) for a structured candidate
pub const MIN_TITLE_CHARS: usize = 2;

/// Minimum definition length (characters) for any candidate
pub const MIN_DEFINITION_CHARS: usize = 10;

/// Block separator emitted between labeled blocks
const SEPARATOR: &str = "---";

static CONCEPT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)concept\s*:\**").expect("concept label pattern"));

static LABELED_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\A\s*(.+?)\s*\n[\s*]*definition\s*:\**\s*(.+?)\s*\z")
        .expect("labeled body pattern")
});

static TAGGED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<concept>\s*(.*?)\s*</concept>\s*<definition>\s*(.*?)\s*</definition>")
        .expect("tagged block pattern")
});

/// Parse a model response into concepts
///
/// Candidates with a title under 2 characters or a definition under 10
/// characters are dropped silently. An empty result means the response did
/// not follow either format.
pub fn parse_structured(response: &str) -> Vec<Concept> {
    let response = response.trim();
    if response.is_empty() {
        debug!("Empty response");
        return Vec::new();
    }

    let labeled = parse_labeled(response);
    if !labeled.is_empty() {
        debug!("Parsed {} labeled concepts", labeled.len());
        return labeled;
    }

    let tagged = parse_tagged(response);
    debug!("Parsed {} tagged concepts", tagged.len());
    tagged
}

/// Parse `concept:` / `definition:` blocks
fn parse_labeled(text: &str) -> Vec<Concept> {
    let labels: Vec<_> = CONCEPT_LABEL.find_iter(text).collect();

    labels
        .iter()
        .enumerate()
        .filter_map(|(idx, label)| {
            let block_end = labels.get(idx + 1).map_or(text.len(), |next| next.start());
            let block = &text[label.end()..block_end];
            let block = block.find(SEPARATOR).map_or(block, |cut| &block[..cut]);

            let captures = LABELED_BODY.captures(block)?;
            build_concept(&captures[1], &captures[2], MIN_TITLE_CHARS)
        })
        .collect()
}

/// Parse `<concept>` / `<definition>` blocks
fn parse_tagged(text: &str) -> Vec<Concept> {
    TAGGED_BLOCK
        .captures_iter(text)
        .filter_map(|captures| build_concept(&captures[1], &captures[2], MIN_TITLE_CHARS))
        .collect()
}

/// Turn a raw title/definition pair into a concept
///
/// Both fields are whitespace-collapsed and stripped of markdown emphasis
/// before the length checks; only the definition is sanitized.
pub(crate) fn build_concept(
    raw_title: &str,
    raw_definition: &str,
    min_title_chars: usize,
) -> Option<Concept> {
    let title = strip_emphasis(&collapse_whitespace(raw_title));
    let definition = strip_emphasis(&collapse_whitespace(raw_definition));

    if title.chars().count() < min_title_chars
        || definition.chars().count() < MIN_DEFINITION_CHARS
    {
        debug!("Dropping candidate '{}': too short", title);
        return None;
    }

    Concept::new(&title, sanitize(&definition)).ok()
}

fn strip_emphasis(field: &str) -> String {
    field
        .trim_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_block() {
        let response = "concept: Photosynthesis\ndefinition: Process converting light to energy\n---";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Photosynthesis");
        assert_eq!(concepts[0].definition, "Process converting light to energy");
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let response = "\
concept: Gravity
definition: Force that attracts two bodies with mass.
---
concept: Inertia
definition: Resistance of an object to a change in its state of motion.
---";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].title, "Gravity");
        assert_eq!(concepts[1].title, "Inertia");
    }

    #[test]
    fn test_blocks_without_separator() {
        let response = "concept: Mass\ndefinition: Amount of matter in a body\nconcept: Weight\ndefinition: Force of gravity on a mass";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].definition, "Amount of matter in a body");
        assert_eq!(concepts[1].definition, "Force of gravity on a mass");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let response = "CONCEPT: Entropy\nDefinition: Measure of disorder in a system";
        let concepts = parse_structured(response);
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Entropy");
    }

    #[test]
    fn test_multiline_definition_is_collapsed() {
        let response = "concept:   Osmosis  \n\n  definition:\n  Movement of water\n   across a\tmembrane\n---";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Osmosis");
        assert_eq!(concepts[0].definition, "Movement of water across a membrane");
    }

    #[test]
    fn test_markdown_emphasis_tolerated() {
        let response = "**concept:** Catalyst\n**definition:** Substance that speeds up a reaction\n---";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Catalyst");
        assert_eq!(concepts[0].definition, "Substance that speeds up a reaction");
    }

    #[test]
    fn test_preamble_is_ignored() {
        let response = "Sure! Here are the concepts:\n\nconcept: Atom\ndefinition: Smallest unit of a chemical element\n---";
        let concepts = parse_structured(response);
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Atom");
    }

    #[test]
    fn test_short_title_dropped() {
        let response = "concept: X\ndefinition: A perfectly long definition\n---";
        assert!(parse_structured(response).is_empty());
    }

    #[test]
    fn test_short_definition_dropped() {
        let response = "concept: Gravity\ndefinition: Pull\n---\nconcept: Inertia\ndefinition: Resistance to motion change\n---";
        let concepts = parse_structured(response);
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Inertia");
    }

    #[test]
    fn test_missing_definition_label_dropped() {
        let response = "concept: Gravity\nForce that attracts two bodies\n---";
        assert!(parse_structured(response).is_empty());
    }

    #[test]
    fn test_no_pattern_returns_empty() {
        assert!(parse_structured("I cannot help with that.").is_empty());
        assert!(parse_structured("").is_empty());
        assert!(parse_structured("   \n ").is_empty());
    }

    #[test]
    fn test_definition_is_sanitized_title_is_not() {
        let response = "concept: Area π\ndefinition: Equals π times r²\n---";
        let concepts = parse_structured(response);

        assert_eq!(concepts[0].title, "Area π");
        assert_eq!(concepts[0].definition, "Equals  pi  times r squared ");
    }

    #[test]
    fn test_tagged_format() {
        let response = "<concept>Photosynthesis</concept>\n<definition>\n  Process converting light\n  to energy\n</definition>\n<CONCEPT>Respiration</CONCEPT><Definition>Process releasing energy from glucose</Definition>";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].definition, "Process converting light to energy");
        assert_eq!(concepts[1].title, "Respiration");
    }

    #[test]
    fn test_labeled_format_wins_over_tagged() {
        let response = "concept: Vector\ndefinition: Quantity with magnitude and direction\n---\n<concept>Scalar</concept><definition>Quantity with magnitude only</definition>";
        let concepts = parse_structured(response);

        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].title, "Vector");
    }
}
