//! Configuration for the Extractor

use glosa_domain::GenerationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the chunker prefers to cut a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Cut on the nearest whitespace (the whitespace is left out of the chunk)
    #[default]
    Whitespace,
    /// Cut after the nearest `.` or newline
    Sentence,
}

/// Which occurrence wins when two concepts share a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupePolicy {
    /// Keep the first concept seen for each title
    #[default]
    FirstSeen,
    /// Keep first-seen ordering but the definition of the last occurrence
    LastSeen,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Input text is truncated to this many characters before chunking
    pub max_text_length: usize,

    /// Target chunk size (characters)
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// A boundary is only used if it lies past this fraction of the chunk
    pub boundary_threshold: f64,

    /// Preferred chunk boundary
    pub boundary_mode: BoundaryMode,

    /// Completion attempts per chunk
    pub max_retries: usize,

    /// Sampling temperature sent to the backend
    pub temperature: f32,

    /// Generation budget sent to the backend
    pub max_tokens: u32,

    /// Maximum time for a single completion attempt (seconds)
    pub attempt_timeout_secs: u64,

    /// Duplicate-title policy
    pub dedupe_policy: DedupePolicy,

    /// Heuristic titles must be longer than this (characters)
    pub min_title_chars: usize,

    /// Heuristic titles must be shorter than this (characters)
    pub max_title_chars: usize,
}

impl ExtractorConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Sampling parameters for one completion call
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be smaller than chunk_size".to_string());
        }
        if !(self.boundary_threshold > 0.0 && self.boundary_threshold <= 1.0) {
            return Err("boundary_threshold must be in (0.0, 1.0]".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.attempt_timeout_secs == 0 {
            return Err("attempt_timeout_secs must be greater than 0".to_string());
        }
        if self.min_title_chars + 1 >= self.max_title_chars {
            return Err("min_title_chars must leave room below max_title_chars".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 5_000,
            chunk_size: 6_000,
            chunk_overlap: 500,
            boundary_threshold: 0.8,
            boundary_mode: BoundaryMode::Whitespace,
            max_retries: 3,
            temperature: 0.1,
            max_tokens: 3_000,
            attempt_timeout_secs: 120,
            dedupe_policy: DedupePolicy::FirstSeen,
            min_title_chars: 2,
            max_title_chars: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_defaults() {
        assert_eq!(BoundaryMode::default(), BoundaryMode::Whitespace);
        assert_eq!(DedupePolicy::default(), DedupePolicy::FirstSeen);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let mut config = ExtractorConfig::default();
        config.chunk_overlap = config.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = ExtractorConfig::default();
        config.boundary_threshold = 0.0;
        assert!(config.validate().is_err());
        config.boundary_threshold = 1.5;
        assert!(config.validate().is_err());
        config.boundary_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = ExtractorConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_title_bounds_must_leave_room() {
        let mut config = ExtractorConfig::default();
        config.min_title_chars = 10;
        config.max_title_chars = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            chunk_size = 800
            chunk_overlap = 100
            boundary_mode = "sentence"
            dedupe_policy = "last_seen"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunk_size, 800);
        assert_eq!(config.boundary_mode, BoundaryMode::Sentence);
        assert_eq!(config.dedupe_policy, DedupePolicy::LastSeen);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let parsed = ExtractorConfig::from_toml(&config.to_toml().unwrap()).unwrap();

        assert_eq!(config.chunk_size, parsed.chunk_size);
        assert_eq!(config.chunk_overlap, parsed.chunk_overlap);
        assert_eq!(config.attempt_timeout_secs, parsed.attempt_timeout_secs);
        assert_eq!(config.dedupe_policy, parsed.dedupe_policy);
    }

    #[test]
    fn test_generation_params() {
        let params = ExtractorConfig::default().generation_params();
        assert_eq!(params.max_tokens, 3_000);
        assert!((params.temperature - 0.1).abs() < f32::EPSILON);
    }
}
