//! Concept module - the unit of output of an extraction

/// Minimum definition length (characters) for a concept to be kept
pub const MIN_DEFINITION_CHARS: usize = 10;

/// A concept extracted from a document
///
/// Concepts are immutable once created. The definition is expected to be
/// sanitized by the caller before construction; the title never is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    /// Concept name, whitespace-collapsed
    pub title: String,

    /// Sanitized definition text
    pub definition: String,
}

impl Concept {
    /// Create a concept, enforcing its invariants
    ///
    /// The title is trimmed and whitespace-collapsed and must not be empty.
    /// The definition must be at least [`MIN_DEFINITION_CHARS`] characters long.
    ///
    /// # Examples
    ///
    /// ```
    /// use glosa_domain::Concept;
    ///
    /// let concept = Concept::new("  Inertia\n", "Resistance to a change in motion").unwrap();
    /// assert_eq!(concept.title, "Inertia");
    /// assert!(Concept::new("", "Resistance to a change in motion").is_err());
    /// ```
    pub fn new(title: &str, definition: impl Into<String>) -> Result<Self, String> {
        let title = collapse_whitespace(title);
        if title.is_empty() {
            return Err("title is empty".to_string());
        }

        let definition = definition.into();
        let definition_chars = definition.chars().count();
        if definition_chars < MIN_DEFINITION_CHARS {
            return Err(format!(
                "definition has {} chars (min: {})",
                definition_chars, MIN_DEFINITION_CHARS
            ));
        }

        Ok(Self { title, definition })
    }
}

/// Collapse every run of whitespace (newlines included) into a single space
/// and trim both ends
///
/// # Examples
///
/// ```
/// use glosa_domain::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  light\n\n to\tenergy "), "light to energy");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_collapses_title() {
        let concept = Concept::new("Photo\n  synthesis ", "Process converting light").unwrap();
        assert_eq!(concept.title, "Photo synthesis");
    }

    #[test]
    fn test_concept_keeps_definition_verbatim() {
        let concept = Concept::new("Limit", " value  approached ").unwrap();
        assert_eq!(concept.definition, " value  approached ");
    }

    #[test]
    fn test_concept_rejects_blank_title() {
        assert!(Concept::new(" \n\t", "A long enough definition").is_err());
    }

    #[test]
    fn test_concept_rejects_short_definition() {
        assert!(Concept::new("Gravity", "Too short").is_err());
        assert!(Concept::new("Gravity", "Ten chars!").is_ok());
    }

    #[test]
    fn test_definition_length_counts_chars_not_bytes() {
        // 9 chars, 18 bytes
        assert!(Concept::new("Greek", "ααααααααα").is_err());
    }

    #[test]
    fn test_collapse_whitespace_empty() {
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace(" \n "), "");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: collapsed text has no runs of whitespace and no padding
        #[test]
        fn test_collapse_whitespace_normalizes(text in "[a-z \t\n]{0,64}") {
            let collapsed = collapse_whitespace(&text);

            prop_assert!(!collapsed.contains("  "));
            prop_assert!(!collapsed.contains('\t') && !collapsed.contains('\n'));
            prop_assert_eq!(collapsed.trim(), collapsed.as_str());
            prop_assert_eq!(collapse_whitespace(&collapsed), collapsed.clone());
        }
    }
}
