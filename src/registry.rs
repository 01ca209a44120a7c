//! Identifier registry: canonicalizes and resolves symbolic class names.
//!
//! The registry is the leaf dependency shared by the class graph and the
//! property store. All merges rely on exact string equality of canonical
//! names for idempotence, so the normalization rule is fixed here and
//! nowhere else: surrounding whitespace is trimmed and every internal
//! whitespace run becomes a single underscore. Comparison is
//! case-sensitive after normalization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A resolved reference to a registered class name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRef(String);

impl ClassRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw symbolic name to its canonical form.
///
/// Returns `None` when the name normalizes to the empty string.
pub fn normalize_name(raw: &str) -> Option<String> {
    let normalized = raw
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// The set of class names registered within one namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameRegistry {
    names: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw name to a registered class reference.
    pub fn resolve(&self, raw: &str) -> Option<ClassRef> {
        let canonical = normalize_name(raw)?;
        if self.names.contains(&canonical) {
            Some(ClassRef(canonical))
        } else {
            None
        }
    }

    /// Whether a raw name resolves to a registered class.
    pub fn exists(&self, raw: &str) -> bool {
        self.resolve(raw).is_some()
    }

    /// Register a name, returning the existing reference if it is already
    /// registered. Returns `None` only for names that normalize to empty.
    pub fn register(&mut self, raw: &str) -> Option<ClassRef> {
        let canonical = normalize_name(raw)?;
        self.names.insert(canonical.clone());
        Some(ClassRef(canonical))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate registered canonical names in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
