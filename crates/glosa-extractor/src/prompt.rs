//! Prompt phrasings for concept extraction
//!
//! Retry attempt `n` uses [`PromptStrategy::for_attempt`]`(n)`, cycling
//! through the phrasings in order.

use glosa_domain::ChatMessage;

/// One way of asking for concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStrategy {
    /// Spell out the exact output and forbid anything else
    UltraStrict,
    /// Short imperative with a target count
    SimpleCommand,
    /// Ask for a list in the block format
    DirectCommand,
}

impl PromptStrategy {
    /// Every strategy, in rotation order
    pub const ALL: [PromptStrategy; 3] = [
        PromptStrategy::UltraStrict,
        PromptStrategy::SimpleCommand,
        PromptStrategy::DirectCommand,
    ];

    /// Strategy for a zero-based attempt number
    pub fn for_attempt(attempt: usize) -> Self {
        Self::ALL[attempt % Self::ALL.len()]
    }

    /// Format rules appended to the instruction
    pub fn rules(&self) -> &'static str {
        match self {
            PromptStrategy::UltraStrict => ULTRA_STRICT_RULES,
            PromptStrategy::SimpleCommand => SIMPLE_COMMAND_RULES,
            PromptStrategy::DirectCommand => DIRECT_COMMAND_RULES,
        }
    }

    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStrategy::UltraStrict => "ultra_strict",
            PromptStrategy::SimpleCommand => "simple_command",
            PromptStrategy::DirectCommand => "direct_command",
        }
    }
}

/// Builds the message list for one completion attempt
pub struct PromptBuilder<'a> {
    text: &'a str,
    strategy: PromptStrategy,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for a chunk of text
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            strategy: PromptStrategy::UltraStrict,
        }
    }

    /// Choose the phrasing
    pub fn with_strategy(mut self, strategy: PromptStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build the system and user messages
    pub fn build(&self) -> Vec<ChatMessage> {
        let user = format!(
            "EXTRACT KEY CONCEPTS FROM THIS TEXT. {}\n\nTEXT:\n{}",
            self.strategy.rules(),
            self.text
        );

        vec![ChatMessage::system(SYSTEM_PREAMBLE), ChatMessage::user(user)]
    }
}

const SYSTEM_PREAMBLE: &str = "You extract study concepts from documents. \
Answer only with concept/definition blocks separated by ---. \
Write each definition in plain words without formulas or special symbols.";

const ULTRA_STRICT_RULES: &str = "OUTPUT MUST BE:
concept: [Name]
definition: [Description]
---
concept: [Name]
definition: [Description]
---
NO OTHER TEXT. START NOW:";

const SIMPLE_COMMAND_RULES: &str = "Extract 10 key concepts in this format:
concept: name
definition: description
---";

const DIRECT_COMMAND_RULES: &str = "List main concepts as:
concept: Concept Name
definition: Explanation here
---";

#[cfg(test)]
mod tests {
    use super::*;
    use glosa_domain::MessageRole;

    #[test]
    fn test_rotation_is_cyclic() {
        assert_eq!(PromptStrategy::for_attempt(0), PromptStrategy::UltraStrict);
        assert_eq!(PromptStrategy::for_attempt(1), PromptStrategy::SimpleCommand);
        assert_eq!(PromptStrategy::for_attempt(2), PromptStrategy::DirectCommand);
        assert_eq!(PromptStrategy::for_attempt(3), PromptStrategy::UltraStrict);
        assert_eq!(PromptStrategy::for_attempt(7), PromptStrategy::SimpleCommand);
    }

    #[test]
    fn test_rules_are_distinct() {
        let [a, b, c] = PromptStrategy::ALL.map(|s| s.rules());
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_every_strategy_shows_the_block_format() {
        for strategy in PromptStrategy::ALL {
            let rules = strategy.rules();
            assert!(rules.contains("concept:"));
            assert!(rules.contains("definition:"));
            assert!(rules.contains("---"));
        }
    }

    #[test]
    fn test_build_messages() {
        let messages = PromptBuilder::new("Plants convert light into energy.")
            .with_strategy(PromptStrategy::SimpleCommand)
            .build();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages[1]
            .content
            .starts_with("EXTRACT KEY CONCEPTS FROM THIS TEXT. Extract 10 key concepts"));
        assert!(messages[1]
            .content
            .ends_with("\n\nTEXT:\nPlants convert light into energy."));
    }

    #[test]
    fn test_default_strategy_is_strict() {
        let messages = PromptBuilder::new("text").build();
        assert!(messages[1].content.contains("NO OTHER TEXT"));
    }
}
