//! Definition sanitizer
//!
//! Rewrites symbols that plain-text consumers cannot render (mathematical
//! operators, set and logic notation, Greek letters, sub/superscripts,
//! currency and typographic marks) as padded words, then drops every
//! character outside a fixed allow-list.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Symbol to spoken-word replacements
///
/// Keys are single codepoints and no phrase contains a key, so the table can
/// be applied in a single pass in any order.
const REPLACEMENTS: &[(char, &str)] = &[
    // Comparison and arithmetic
    ('∞', " infinity "),
    ('±', " plus minus "),
    ('≈', " approximately equal "),
    ('~', " similar "),
    ('≠', " not equal "),
    ('≤', " less or equal "),
    ('≥', " greater or equal "),
    ('<', " less than "),
    ('>', " greater than "),
    ('×', " times "),
    ('÷', " divided by "),
    ('−', " minus "),
    ('•', " bullet "),
    ('√', " square root "),
    ('∛', " cube root "),
    ('∜', " fourth root "),
    ('°', " degrees "),
    ('%', " percent "),
    ('‰', " per thousand "),
    // Superscripts
    ('¹', " superscript one "),
    ('²', " squared "),
    ('³', " cubed "),
    ('⁰', " superscript zero "),
    ('⁴', " fourth power "),
    ('⁵', " fifth power "),
    ('⁶', " sixth power "),
    ('⁷', " seventh power "),
    ('⁸', " eighth power "),
    ('⁹', " ninth power "),
    ('⁻', " superscript minus "),
    ('⁺', " superscript plus "),
    // Subscripts
    ('ₙ', " subscript n "),
    ('ᵢ', " subscript i "),
    ('ⱼ', " subscript j "),
    ('₀', " subscript zero "),
    ('₁', " subscript one "),
    ('₂', " subscript two "),
    ('₃', " subscript three "),
    // Sets and logic
    ('∈', " belongs to "),
    ('∉', " not belongs to "),
    ('⊂', " subset of "),
    ('⊃', " superset of "),
    ('⊆', " subset or equal "),
    ('⊇', " superset or equal "),
    ('∪', " union "),
    ('∩', " intersection "),
    ('∅', " empty set "),
    ('∀', " for all "),
    ('∃', " exists "),
    ('∄', " not exists "),
    ('∴', " therefore "),
    ('∵', " because "),
    ('∧', " and "),
    ('∨', " or "),
    ('¬', " not "),
    ('⇔', " if and only if "),
    ('⇒', " implies "),
    ('⇐', " implied by "),
    // Calculus
    ('∫', " integral "),
    ('∬', " double integral "),
    ('∮', " contour integral "),
    ('∂', " partial derivative "),
    ('∆', " delta "),
    ('∇', " nabla "),
    ('∑', " sum "),
    ('∏', " product "),
    // Arrows
    ('→', " right arrow "),
    ('←', " left arrow "),
    ('↑', " up arrow "),
    ('↓', " down arrow "),
    ('↔', " left right arrow "),
    ('↕', " up down arrow "),
    ('↦', " maps to "),
    // Greek, lowercase
    ('α', " alpha "),
    ('β', " beta "),
    ('γ', " gamma "),
    ('δ', " delta "),
    ('ε', " epsilon "),
    ('ζ', " zeta "),
    ('η', " eta "),
    ('θ', " theta "),
    ('ι', " iota "),
    ('κ', " kappa "),
    ('λ', " lambda "),
    ('μ', " mu "),
    ('ν', " nu "),
    ('ξ', " xi "),
    ('ο', " omicron "),
    ('π', " pi "),
    ('ρ', " rho "),
    ('σ', " sigma "),
    ('τ', " tau "),
    ('υ', " upsilon "),
    ('φ', " phi "),
    ('χ', " chi "),
    ('ψ', " psi "),
    ('ω', " omega "),
    // Greek, uppercase
    ('Γ', " Gamma "),
    ('Δ', " Delta "),
    ('Θ', " Theta "),
    ('Λ', " Lambda "),
    ('Ξ', " Xi "),
    ('Π', " Pi "),
    ('Σ', " Sigma "),
    ('Φ', " Phi "),
    ('Ψ', " Psi "),
    ('Ω', " Omega "),
    // Currency and typography
    ('€', " euro "),
    ('£', " pound "),
    ('¥', " yen "),
    ('$', " dollar "),
    ('¢', " cent "),
    ('©', " copyright "),
    ('®', " registered "),
    ('™', " trademark "),
    ('…', " ellipsis "),
    ('†', " dagger "),
    ('‡', " double dagger "),
    ('§', " section "),
    ('¶', " paragraph "),
];

/// Non-alphanumeric characters that survive sanitization
const ALLOWED_EXTRA: &str = concat!(
    "áéíóúüñÁÉÍÓÚÜÑ",
    "àèìòùâêîôûäëïöçãõ",
    "ÀÈÌÒÙÂÊÎÔÛÄËÏÖÇÃÕ",
    " \t\n",
    "()[]{}<>+-*/=.,;:?!_'¡¿",
    "@#$%&€£",
    "\\|`~^ºª·",
);

static REPLACEMENT_TABLE: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| REPLACEMENTS.iter().copied().collect());

/// Sanitize definition text
///
/// Total function: expands table symbols into words, then drops anything
/// not allow-listed. Dropping may join adjacent words.
///
/// # Examples
///
/// ```
/// use glosa_extractor::sanitize;
///
/// assert_eq!(sanitize("x² → ∞"), "x squared   right arrow   infinity ");
/// assert_eq!(sanitize("naïve 日本"), "naïve ");
/// ```
pub fn sanitize(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    for c in text.chars() {
        match REPLACEMENT_TABLE.get(&c) {
            Some(phrase) => expanded.push_str(phrase),
            None => expanded.push(c),
        }
    }

    expanded.retain(is_allowed);
    expanded
}

/// Whether a character is part of the sanitized alphabet
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ALLOWED_EXTRA.contains(c)
}

/// Symbols the sanitizer rewrites into words
pub fn replaced_symbols() -> impl Iterator<Item = char> {
    REPLACEMENTS.iter().map(|(symbol, _)| *symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Process converting light to energy (in plants).";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_spanish_text_unchanged() {
        let text = "¿Qué es la fotosíntesis? Año, niño, pingüino.";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_symbols_become_words() {
        assert_eq!(sanitize("a≠b"), "a not equal b");
        assert_eq!(sanitize("E = mc²"), "E = mc squared ");
        assert_eq!(sanitize("∀x∈A"), " for all x belongs to A");
    }

    #[test]
    fn test_allowed_symbols_in_table_are_still_replaced() {
        assert_eq!(sanitize("50%"), "50 percent ");
        assert_eq!(sanitize("$5"), " dollar 5");
        assert_eq!(sanitize("a<b"), "a less than b");
    }

    #[test]
    fn test_disallowed_characters_dropped() {
        assert_eq!(sanitize("smart “quotes”"), "smart quotes");
        assert_eq!(sanitize("emoji 🎉 here"), "emoji  here");
        assert_eq!(sanitize("carriage\r\nreturn"), "carriage\nreturn");
    }

    #[test]
    fn test_dropping_can_join_words() {
        assert_eq!(sanitize("word\u{00A0}word"), "wordword");
    }

    #[test]
    fn test_retained_symbols() {
        let text = "@#&\\|`^ºª·";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_table_size_and_unique_keys() {
        assert!(REPLACEMENTS.len() >= 90);
        assert_eq!(REPLACEMENT_TABLE.len(), REPLACEMENTS.len());
    }

    #[test]
    fn test_phrases_are_ascii_words() {
        for (_, phrase) in REPLACEMENTS {
            assert!(phrase.chars().all(|c| c.is_ascii_alphabetic() || c == ' '));
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }
}
