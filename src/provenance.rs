//! Provenance ledger: source-tagged information records with duplicate
//! suppression.
//!
//! Every asserted fact in the ontology carries a list of provenance
//! records explaining where it came from. A record is appended only if no
//! existing record on the same target has an identical (content, source)
//! pair, which is what makes repeated merges of the same payload no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single source-tagged information snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// The information content, typically a sentence from the source text.
    pub content: String,
    /// The source tag of the extraction pass that produced the content.
    pub source: String,
    /// When the record was attached.
    pub recorded_at: DateTime<Utc>,
}

impl ProvenanceRecord {
    /// Create a new record stamped with the current time.
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            recorded_at: Utc::now(),
        }
    }

    /// Duplicate check: records are equal when content and source match.
    /// The timestamp is deliberately excluded.
    pub fn same_fact(&self, content: &str, source: &str) -> bool {
        self.content == content && self.source == source
    }
}

/// Append a record unless an identical (content, source) pair is already
/// present. Returns whether a new record was actually added.
pub fn attach(records: &mut Vec<ProvenanceRecord>, content: &str, source: &str) -> bool {
    if records.iter().any(|r| r.same_fact(content, source)) {
        return false;
    }
    records.push(ProvenanceRecord::new(content, source));
    true
}

/// Anything that carries a provenance record list.
pub trait Provenanced {
    fn provenance(&self) -> &[ProvenanceRecord];

    fn provenance_mut(&mut self) -> &mut Vec<ProvenanceRecord>;

    /// Attach a record with duplicate suppression.
    fn attach_provenance(&mut self, content: &str, source: &str) -> bool {
        attach(self.provenance_mut(), content, source)
    }

    /// All information content attached by a specific source.
    fn information_by_source(&self, source: &str) -> Vec<&str> {
        self.provenance()
            .iter()
            .filter(|r| r.source == source)
            .map(|r| r.content.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_appends_new_record() {
        let mut records = Vec::new();
        assert!(attach(&mut records, "benzene is aromatic", "doc-1"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_attach_suppresses_duplicates() {
        let mut records = Vec::new();
        assert!(attach(&mut records, "benzene is aromatic", "doc-1"));
        assert!(!attach(&mut records, "benzene is aromatic", "doc-1"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_attach_distinguishes_sources() {
        let mut records = Vec::new();
        attach(&mut records, "benzene is aromatic", "doc-1");
        assert!(attach(&mut records, "benzene is aromatic", "doc-2"));
        assert!(attach(&mut records, "benzene has six carbons", "doc-1"));
        assert_eq!(records.len(), 3);
    }
}
