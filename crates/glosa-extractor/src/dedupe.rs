//! Merge concepts from all chunks by title

use crate::config::DedupePolicy;
use glosa_domain::Concept;
use std::collections::HashMap;

/// Remove concepts whose title was already seen
///
/// Titles are compared exactly (case-sensitive). Output keeps the order in
/// which each title first appeared; the policy decides whose definition wins.
pub fn dedupe(concepts: Vec<Concept>, policy: DedupePolicy) -> Vec<Concept> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(concepts.len());
    let mut unique: Vec<Concept> = Vec::with_capacity(concepts.len());

    for concept in concepts {
        match positions.get(&concept.title) {
            Some(&idx) => {
                if policy == DedupePolicy::LastSeen {
                    unique[idx] = concept;
                }
            }
            None => {
                positions.insert(concept.title.clone(), unique.len());
                unique.push(concept);
            }
        }
    }

    unique
}
