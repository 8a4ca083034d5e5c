//! Memory record model used by ledgers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted memory record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Free-text content of the memory.
    pub content: String,
    /// Creation instant; also serves as the deletion key.
    pub timestamp: DateTime<Utc>,
}

impl MemoryRecord {
    /// Create a record stamped with the current instant.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether any of the given terms appears in the content, ignoring case.
    pub fn matches_any(&self, terms: &[String]) -> bool {
        let haystack = self.content.to_lowercase();
        terms
            .iter()
            .any(|term| !term.is_empty() && haystack.contains(&term.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRecord;

    #[test]
    fn matching_ignores_case_and_requires_one_term() {
        let record = MemoryRecord::new("Likes espresso in the morning");
        assert!(record.matches_any(&["ESPRESSO".to_string()]));
        assert!(record.matches_any(&["tea".to_string(), "morning".to_string()]));
        assert!(!record.matches_any(&["tea".to_string()]));
        assert!(!record.matches_any(&[String::new()]));
    }
}
