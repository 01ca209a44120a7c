//! Property, restriction and axiom types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expr::Expression;
use crate::provenance::{Provenanced, ProvenanceRecord};

/// Separator used to join multi-class owner keys into path strings.
///
/// Owner-key ordering is part of key identity: `a&b` and `b&a` are
/// distinct keys. This preserves the reference merge behavior; keys are
/// deliberately not canonicalized.
pub const OWNER_KEY_SEPARATOR: char = '&';

// ============================================================================
// Owner Keys
// ============================================================================

/// The owner of a data-property value set: one class, or an ordered
/// combination of classes denoting their intersection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Build a key from canonical class names, preserving order.
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = classes
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&OWNER_KEY_SEPARATOR.to_string());
        Self(joined)
    }

    /// The class names making up the key, in key order.
    pub fn classes(&self) -> Vec<&str> {
        self.0.split(OWNER_KEY_SEPARATOR).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Data Properties
// ============================================================================

/// A named value-bearing attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProperty {
    /// Canonical property name.
    pub name: String,
    /// Provenance for the property itself.
    #[serde(default)]
    pub provenance: Vec<ProvenanceRecord>,
    /// Literal values per owner key. Values act as a set: duplicates are
    /// suppressed on insert.
    #[serde(default)]
    pub values: BTreeMap<OwnerKey, Vec<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DataProperty {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            provenance: Vec::new(),
            values: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert a value for an owner key, suppressing duplicates.
    /// Returns whether the value was newly added.
    pub fn insert_value(&mut self, key: OwnerKey, value: serde_json::Value) -> bool {
        let set = self.values.entry(key).or_default();
        if set.contains(&value) {
            return false;
        }
        set.push(value);
        self.updated_at = Utc::now();
        true
    }

    pub fn values_for(&self, key: &OwnerKey) -> &[serde_json::Value] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Provenanced for DataProperty {
    fn provenance(&self) -> &[ProvenanceRecord] {
        &self.provenance
    }

    fn provenance_mut(&mut self) -> &mut Vec<ProvenanceRecord> {
        &mut self.provenance
    }
}

// ============================================================================
// Object Properties
// ============================================================================

/// The restriction quantifier on an object-property instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantifier {
    /// Existential restriction: at least one value lies in the range.
    #[default]
    Some,
    /// Universal restriction: all values lie in the range.
    Only,
}

impl std::fmt::Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantifier::Some => write!(f, "some"),
            Quantifier::Only => write!(f, "only"),
        }
    }
}

/// One domain/range restriction assertion for an object property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInstance {
    pub domain: Expression,
    pub range: Expression,
    pub restriction: Quantifier,
}

/// Where an accepted instance's restriction was attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstancePlacement {
    /// Attached to a single named class's definition.
    Class(String),
    /// Attached as a general axiom keyed to a composite domain.
    GeneralAxiom,
    /// Already present; nothing changed.
    Duplicate,
}

/// A named relation between classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectProperty {
    /// Canonical property name.
    pub name: String,
    #[serde(default)]
    pub provenance: Vec<ProvenanceRecord>,
    /// Accepted instances, duplicates suppressed.
    #[serde(default)]
    pub instances: Vec<PropertyInstance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ObjectProperty {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            provenance: Vec::new(),
            instances: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Provenanced for ObjectProperty {
    fn provenance(&self) -> &[ProvenanceRecord] {
        &self.provenance
    }

    fn provenance_mut(&mut self) -> &mut Vec<ProvenanceRecord> {
        &mut self.provenance
    }
}

// ============================================================================
// Restrictions and Axioms
// ============================================================================

/// A range restriction attached to a single named class.
///
/// Logically an is-a restriction: the class is asserted to be a subclass
/// of `property some/only range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRestriction {
    /// The object property being restricted.
    pub property: String,
    pub quantifier: Quantifier,
    pub range: Expression,
}

/// A restriction attached to a composite (non-single-class) domain
/// expression rather than to one named class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralAxiom {
    pub domain: Expression,
    pub restriction: ClassRestriction,
}
