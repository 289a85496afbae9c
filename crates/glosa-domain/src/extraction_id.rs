//! Identifier for a single extraction request

use std::fmt;

/// Unique identifier for an extraction request based on UUIDv7
///
/// Identifiers sort by creation time; log lines from consecutive uploads
/// carry increasing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtractionId(u128);

impl ExtractionId {
    /// Generate a new UUIDv7-based ExtractionId
    ///
    /// # Examples
    ///
    /// ```
    /// use glosa_domain::ExtractionId;
    ///
    /// let id = ExtractionId::new();
    /// assert!(id.timestamp() > 0);
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Milliseconds since the Unix epoch at which the id was generated
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits
        (self.0 >> 80) as u64
    }
}

impl Default for ExtractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExtractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}
