//! Class graph store: ownership of classes, hierarchy edges and
//! disjointness pairs.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{DisjointnessError, HierarchyError};
use crate::provenance::{attach, Provenanced};
use crate::registry::{ClassRef, NameRegistry};

use super::types::Class;

/// Result of a best-effort multi-superclass hierarchy call.
///
/// Each listed superclass is applied independently: valid edges land,
/// invalid ones are collected with their reason, duplicates are counted
/// but are not errors. The outcome is consumed in-process by the merge
/// coordinator, which flattens it into the serializable phase report.
#[derive(Debug, Clone, Default)]
pub struct HierarchyOutcome {
    /// Superclasses whose edges were newly applied.
    pub applied: Vec<String>,
    /// Superclasses rejected, with the reason.
    pub skipped: Vec<(String, HierarchyError)>,
    /// Edges that were already present.
    pub duplicates: usize,
}

/// Owns the set of classes, their is-a edges and disjointness pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassGraph {
    /// Classes keyed by canonical name.
    classes: BTreeMap<String, Class>,
    /// Disjointness pairs stored lexicographically ordered, so (a, b)
    /// and (b, a) collapse to one entry.
    disjointness: BTreeSet<(String, String)>,
}

impl ClassGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Class Operations
    // ========================================================================

    /// Register or fetch a class, attaching provenance when info is given.
    ///
    /// Idempotent: re-asserting an existing class only appends new
    /// provenance. Returns `None` only for names that normalize to empty.
    pub fn upsert_class(
        &mut self,
        registry: &mut NameRegistry,
        name: &str,
        info: Option<&str>,
        source: &str,
    ) -> Option<ClassRef> {
        let class_ref = registry.register(name)?;
        let class = self
            .classes
            .entry(class_ref.as_str().to_string())
            .or_insert_with(|| Class::new(class_ref.as_str()));
        if let Some(info) = info {
            if class.attach_provenance(info, source) {
                class.touch();
            }
        }
        Some(class_ref)
    }

    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate classes in deterministic name order.
    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    /// Classes sitting directly under the implicit root.
    pub fn roots(&self) -> Vec<&Class> {
        self.classes.values().filter(|c| c.is_root()).collect()
    }

    pub(crate) fn insert_loaded(&mut self, class: Class) {
        self.classes.insert(class.name.clone(), class);
    }

    pub(crate) fn insert_disjointness_loaded(&mut self, pair: (String, String)) {
        self.disjointness.insert(ordered_pair(pair.0, pair.1));
    }

    pub(crate) fn disjointness_pairs(&self) -> impl Iterator<Item = &(String, String)> {
        self.disjointness.iter()
    }

    // ========================================================================
    // Hierarchy Operations
    // ========================================================================

    /// Add is-a edges from a subclass to each listed superclass.
    ///
    /// The subclass and every superclass must already exist. A missing
    /// subclass fails the whole call; a missing or cycle-forming
    /// superclass only skips that edge (best-effort per-superclass). The
    /// cycle check runs before commit: an edge is rejected when the
    /// subclass is already a transitive ancestor of the superclass.
    pub fn add_hierarchy(
        &mut self,
        registry: &NameRegistry,
        subclass: &str,
        superclasses: &[String],
        info: Option<&str>,
        source: &str,
    ) -> Result<HierarchyOutcome, HierarchyError> {
        let sub_ref = registry
            .resolve(subclass)
            .filter(|r| self.contains(r.as_str()))
            .ok_or_else(|| HierarchyError::UnknownClass(subclass.trim().to_string()))?;
        let sub_name = sub_ref.as_str().to_string();

        let mut outcome = HierarchyOutcome::default();
        for raw_super in superclasses {
            let super_ref = match registry
                .resolve(raw_super)
                .filter(|r| self.contains(r.as_str()))
            {
                Some(r) => r,
                None => {
                    outcome.skipped.push((
                        raw_super.clone(),
                        HierarchyError::UnknownClass(raw_super.trim().to_string()),
                    ));
                    continue;
                }
            };
            let super_name = super_ref.as_str().to_string();

            if self
                .classes
                .get(&sub_name)
                .is_some_and(|c| c.parents.contains(&super_name))
            {
                outcome.duplicates += 1;
                continue;
            }

            // Reachability check from the new superclass back to the
            // subclass: if the subclass is already a transitive ancestor
            // of the superclass (or is the superclass), the edge closes a
            // cycle and is rejected without being applied.
            if super_name == sub_name || self.is_ancestor(&sub_name, &super_name) {
                outcome.skipped.push((
                    super_name.clone(),
                    HierarchyError::Cycle {
                        subclass: sub_name.clone(),
                        superclass: super_name,
                    },
                ));
                continue;
            }

            if let Some(class) = self.classes.get_mut(&sub_name) {
                class.parents.insert(super_name.clone());
                class.touch();
                outcome.applied.push(super_name);
            }
        }

        if !outcome.applied.is_empty() {
            if let (Some(info), Some(class)) = (info, self.classes.get_mut(&sub_name)) {
                attach(&mut class.hierarchy_provenance, info, source);
            }
        }

        Ok(outcome)
    }

    /// Direct superclasses of a class.
    pub fn parents(&self, name: &str) -> Vec<String> {
        self.classes
            .get(name)
            .map(|c| c.parents.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Direct subclasses of a class.
    pub fn children(&self, name: &str) -> Vec<String> {
        self.classes
            .values()
            .filter(|c| c.parents.contains(name))
            .map(|c| c.name.clone())
            .collect()
    }

    /// All transitive superclasses, breadth-first, deduplicated.
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        self.walk(name, |graph, current| graph.parents(current))
    }

    /// All transitive subclasses, breadth-first, deduplicated.
    pub fn descendants(&self, name: &str) -> Vec<String> {
        self.walk(name, |graph, current| graph.children(current))
    }

    /// Whether `candidate` is a transitive ancestor of `name`.
    pub fn is_ancestor(&self, candidate: &str, name: &str) -> bool {
        self.ancestors(name).iter().any(|a| a == candidate)
    }

    fn walk(&self, start: &str, next: impl Fn(&Self, &str) -> Vec<String>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::from([start.to_string()]);
        while let Some(current) = queue.pop_front() {
            for step in next(self, &current) {
                if step != start && seen.insert(step.clone()) {
                    result.push(step.clone());
                    queue.push_back(step);
                }
            }
        }
        result
    }

    // ========================================================================
    // Disjointness Operations
    // ========================================================================

    /// Assert that two classes are mutually exclusive.
    ///
    /// Symmetric and idempotent. Returns whether the pair was newly
    /// recorded (`false` = duplicate no-op).
    pub fn add_disjointness(
        &mut self,
        registry: &NameRegistry,
        class1: &str,
        class2: &str,
    ) -> Result<bool, DisjointnessError> {
        let ref1 = registry
            .resolve(class1)
            .filter(|r| self.contains(r.as_str()))
            .ok_or_else(|| DisjointnessError::UnknownClass(class1.trim().to_string()))?;
        let ref2 = registry
            .resolve(class2)
            .filter(|r| self.contains(r.as_str()))
            .ok_or_else(|| DisjointnessError::UnknownClass(class2.trim().to_string()))?;

        if ref1 == ref2 {
            return Err(DisjointnessError::SelfDisjoint(ref1.into_string()));
        }

        Ok(self
            .disjointness
            .insert(ordered_pair(ref1.into_string(), ref2.into_string())))
    }

    /// Classes explicitly declared disjoint with the given class.
    pub fn disjoint_with(&self, name: &str) -> Vec<String> {
        self.disjointness
            .iter()
            .filter_map(|(a, b)| {
                if a == name {
                    Some(b.clone())
                } else if b == name {
                    Some(a.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn disjointness_count(&self) -> usize {
        self.disjointness.len()
    }
}

fn ordered_pair(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(names: &[&str]) -> (ClassGraph, NameRegistry) {
        let mut graph = ClassGraph::new();
        let mut registry = NameRegistry::new();
        for name in names {
            graph.upsert_class(&mut registry, name, None, "test");
        }
        (graph, registry)
    }

    #[test]
    fn test_upsert_class_is_idempotent() {
        let mut graph = ClassGraph::new();
        let mut registry = NameRegistry::new();

        graph
            .upsert_class(&mut registry, "benzene_ring", Some("aromatic"), "doc-1")
            .unwrap();
        graph
            .upsert_class(&mut registry, "benzene_ring", Some("aromatic"), "doc-1")
            .unwrap();

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get("benzene_ring").unwrap().provenance.len(), 1);
    }

    #[test]
    fn test_upsert_class_rejects_empty_name() {
        let mut graph = ClassGraph::new();
        let mut registry = NameRegistry::new();
        assert!(graph.upsert_class(&mut registry, "   ", None, "doc-1").is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_hierarchy_requires_existing_subclass() {
        let (mut graph, registry) = graph_with(&["base"]);
        let err = graph
            .add_hierarchy(&registry, "missing", &["base".to_string()], None, "doc-1")
            .unwrap_err();
        assert_eq!(err, HierarchyError::UnknownClass("missing".to_string()));
    }

    #[test]
    fn test_add_hierarchy_best_effort_per_superclass() {
        let (mut graph, registry) = graph_with(&["alkyl_groups", "benzene_ring"]);
        let outcome = graph
            .add_hierarchy(
                &registry,
                "alkyl_groups",
                &["benzene_ring".to_string(), "missing".to_string()],
                None,
                "doc-1",
            )
            .unwrap();

        assert_eq!(outcome.applied, vec!["benzene_ring"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(
            outcome.skipped[0].1,
            HierarchyError::UnknownClass("missing".to_string())
        );
        assert_eq!(graph.parents("alkyl_groups"), vec!["benzene_ring"]);
    }

    #[test]
    fn test_add_hierarchy_duplicate_is_noop() {
        let (mut graph, registry) = graph_with(&["a", "b"]);
        graph
            .add_hierarchy(&registry, "a", &["b".to_string()], None, "doc-1")
            .unwrap();
        let outcome = graph
            .add_hierarchy(&registry, "a", &["b".to_string()], None, "doc-1")
            .unwrap();

        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(graph.parents("a").len(), 1);
    }

    #[test]
    fn test_cycle_rejected_and_graph_unchanged() {
        let (mut graph, registry) = graph_with(&["a", "b", "c"]);
        graph
            .add_hierarchy(&registry, "a", &["b".to_string()], None, "doc-1")
            .unwrap();
        graph
            .add_hierarchy(&registry, "b", &["c".to_string()], None, "doc-1")
            .unwrap();

        // c -> a would close the cycle a -> b -> c.
        let outcome = graph
            .add_hierarchy(&registry, "c", &["a".to_string()], None, "doc-1")
            .unwrap();
        assert!(outcome.applied.is_empty());
        assert!(matches!(
            outcome.skipped[0].1,
            HierarchyError::Cycle { .. }
        ));
        assert!(graph.parents("c").is_empty());
        assert!(!graph.ancestors("b").contains(&"a".to_string()));
    }

    #[test]
    fn test_self_edge_is_a_cycle() {
        let (mut graph, registry) = graph_with(&["a"]);
        let outcome = graph
            .add_hierarchy(&registry, "a", &["a".to_string()], None, "doc-1")
            .unwrap();
        assert!(matches!(
            outcome.skipped[0].1,
            HierarchyError::Cycle { .. }
        ));
    }

    #[test]
    fn test_first_superclass_removes_rootness() {
        let (mut graph, registry) = graph_with(&["a", "b"]);
        assert!(graph.get("a").unwrap().is_root());
        graph
            .add_hierarchy(&registry, "a", &["b".to_string()], None, "doc-1")
            .unwrap();
        assert!(!graph.get("a").unwrap().is_root());
        assert!(graph.get("b").unwrap().is_root());
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let (mut graph, registry) = graph_with(&["a", "b", "c"]);
        graph
            .add_hierarchy(&registry, "a", &["b".to_string()], None, "doc-1")
            .unwrap();
        graph
            .add_hierarchy(&registry, "b", &["c".to_string()], None, "doc-1")
            .unwrap();

        assert_eq!(graph.ancestors("a"), vec!["b", "c"]);
        assert_eq!(graph.descendants("c"), vec!["b", "a"]);
        assert_eq!(graph.children("c"), vec!["b"]);
    }

    #[test]
    fn test_disjointness_symmetric_and_idempotent() {
        let (mut graph, registry) = graph_with(&["acid", "base"]);

        assert!(graph.add_disjointness(&registry, "acid", "base").unwrap());
        assert!(!graph.add_disjointness(&registry, "base", "acid").unwrap());

        assert_eq!(graph.disjointness_count(), 1);
        assert_eq!(graph.disjoint_with("acid"), vec!["base"]);
        assert_eq!(graph.disjoint_with("base"), vec!["acid"]);
    }

    #[test]
    fn test_self_disjointness_rejected() {
        let (mut graph, registry) = graph_with(&["acid"]);
        let err = graph.add_disjointness(&registry, "acid", "acid").unwrap_err();
        assert_eq!(err, DisjointnessError::SelfDisjoint("acid".to_string()));
    }

    #[test]
    fn test_disjointness_requires_existing_classes() {
        let (mut graph, registry) = graph_with(&["acid"]);
        let err = graph.add_disjointness(&registry, "acid", "base").unwrap_err();
        assert_eq!(err, DisjointnessError::UnknownClass("base".to_string()));
    }
}
