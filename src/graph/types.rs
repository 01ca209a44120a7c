//! Class node type.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provenance::{Provenanced, ProvenanceRecord};

/// A named class node in the ontology.
///
/// Classes are append-only: once created they are never deleted, and are
/// mutated only by provenance appends and hierarchy-edge additions. A
/// class with an empty parent set sits directly under the implicit root;
/// adding the first real superclass removes that default parent
/// structurally, since rootness is derived from the set being empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    /// Canonical name, unique within the namespace.
    pub name: String,
    /// Direct superclasses. Accumulate over merges, never removed.
    #[serde(default)]
    pub parents: BTreeSet<String>,
    /// Provenance for the class itself.
    #[serde(default)]
    pub provenance: Vec<ProvenanceRecord>,
    /// Provenance for hierarchy edges asserted with this class as the
    /// subclass.
    #[serde(default)]
    pub hierarchy_provenance: Vec<ProvenanceRecord>,
    /// When the class was first registered.
    pub created_at: DateTime<Utc>,
    /// When the class last gained provenance or an edge.
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            parents: BTreeSet::new(),
            provenance: Vec::new(),
            hierarchy_provenance: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the class sits directly under the implicit root.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Provenanced for Class {
    fn provenance(&self) -> &[ProvenanceRecord] {
        &self.provenance
    }

    fn provenance_mut(&mut self) -> &mut Vec<ProvenanceRecord> {
        &mut self.provenance
    }
}
