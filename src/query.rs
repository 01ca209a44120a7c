//! Outbound query surface over the ontology.
//!
//! These are the read operations consumed by the upstream query/tools
//! layer: by-name class lookup, hierarchy traversals, disjoint sets,
//! property restrictions and full subtree parsing. Reads take the store's
//! read lock, so they never observe a partially applied merge phase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::property::ClassRestriction;
use crate::provenance::{Provenanced, ProvenanceRecord};
use crate::store::Ontology;

// ============================================================================
// Result Types
// ============================================================================

/// Basic information about one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    /// Information content from all provenance records.
    pub information: Vec<String>,
    /// Distinct sources that contributed provenance, in first-seen order.
    pub sources: Vec<String>,
    /// Direct superclasses.
    pub parents: Vec<String>,
    /// Whether the class sits directly under the implicit root.
    pub is_root: bool,
}

/// A complete class definition: info, hierarchy, restrictions and data
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub info: ClassInfo,
    pub children: Vec<String>,
    pub ancestors: Vec<String>,
    pub disjoint_with: Vec<String>,
    /// Object-property restrictions attached to this class.
    pub restrictions: Vec<ClassRestriction>,
    /// Data-property values whose owner key includes this class,
    /// keyed by property name.
    pub data_values: BTreeMap<String, Vec<serde_json::Value>>,
}

/// One node of a hierarchy subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtreeNode {
    pub name: String,
    pub children: Vec<SubtreeNode>,
}

/// Counts over the whole ontology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyStats {
    pub class_count: usize,
    pub root_count: usize,
    pub hierarchy_edge_count: usize,
    pub disjointness_count: usize,
    pub data_property_count: usize,
    pub object_property_count: usize,
    pub general_axiom_count: usize,
}

// ============================================================================
// Query Surface
// ============================================================================

impl Ontology {
    /// Basic information about a class, by name.
    pub async fn class_info(&self, name: &str) -> Option<ClassInfo> {
        let data = self.read().await;
        let class_ref = data.registry.resolve(name)?;
        let class = data.graph.get(class_ref.as_str())?;
        Some(ClassInfo {
            name: class.name.clone(),
            information: class.provenance.iter().map(|r| r.content.clone()).collect(),
            sources: distinct_sources(&class.provenance),
            parents: class.parents.iter().cloned().collect(),
            is_root: class.is_root(),
        })
    }

    /// Information attached to a class by a specific source.
    pub async fn class_information_by_source(&self, name: &str, source: &str) -> Vec<String> {
        let data = self.read().await;
        let Some(class_ref) = data.registry.resolve(name) else {
            return Vec::new();
        };
        data.graph
            .get(class_ref.as_str())
            .map(|class| {
                class
                    .information_by_source(source)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn parents(&self, name: &str) -> Vec<String> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.graph.parents(&n))
            .unwrap_or_default()
    }

    pub async fn children(&self, name: &str) -> Vec<String> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.graph.children(&n))
            .unwrap_or_default()
    }

    pub async fn ancestors(&self, name: &str) -> Vec<String> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.graph.ancestors(&n))
            .unwrap_or_default()
    }

    pub async fn descendants(&self, name: &str) -> Vec<String> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.graph.descendants(&n))
            .unwrap_or_default()
    }

    pub async fn disjoint_with(&self, name: &str) -> Vec<String> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.graph.disjoint_with(&n))
            .unwrap_or_default()
    }

    /// Object-property restrictions attached to a class.
    pub async fn restrictions_for(&self, name: &str) -> Vec<ClassRestriction> {
        let data = self.read().await;
        resolve_in(&data, name)
            .map(|n| data.properties.restrictions_for(&n).to_vec())
            .unwrap_or_default()
    }

    /// All values of a data property, keyed by owner-key path string.
    pub async fn data_values(&self, property: &str) -> BTreeMap<String, Vec<serde_json::Value>> {
        let data = self.read().await;
        let Some(canonical) = crate::registry::normalize_name(property) else {
            return BTreeMap::new();
        };
        data.properties
            .data_property(&canonical)
            .map(|prop| {
                prop.values
                    .iter()
                    .map(|(key, values)| (key.as_str().to_string(), values.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parse a complete class definition: info, hierarchy neighborhood,
    /// restrictions and owned data values.
    pub async fn class_definition(&self, name: &str) -> Option<ClassDefinition> {
        let info = self.class_info(name).await?;
        let data = self.read().await;
        let canonical = info.name.clone();

        let mut data_values: BTreeMap<String, Vec<serde_json::Value>> = BTreeMap::new();
        for prop in data.properties.data_properties() {
            let mut values = Vec::new();
            for (key, set) in &prop.values {
                if key.classes().contains(&canonical.as_str()) {
                    values.extend(set.iter().cloned());
                }
            }
            if !values.is_empty() {
                data_values.insert(prop.name.clone(), values);
            }
        }

        Some(ClassDefinition {
            children: data.graph.children(&canonical),
            ancestors: data.graph.ancestors(&canonical),
            disjoint_with: data.graph.disjoint_with(&canonical),
            restrictions: data.properties.restrictions_for(&canonical).to_vec(),
            data_values,
            info,
        })
    }

    /// Hierarchy subtree rooted at a class, or at every root class when
    /// no root is given.
    pub async fn subtree(&self, root: Option<&str>) -> Vec<SubtreeNode> {
        let data = self.read().await;
        match root {
            Some(name) => {
                let Some(class_ref) = data.registry.resolve(name) else {
                    return Vec::new();
                };
                if !data.graph.contains(class_ref.as_str()) {
                    return Vec::new();
                }
                vec![build_subtree(&data.graph, class_ref.as_str())]
            }
            None => data
                .graph
                .roots()
                .iter()
                .map(|class| build_subtree(&data.graph, &class.name))
                .collect(),
        }
    }

    /// Counts over the whole ontology.
    pub async fn stats(&self) -> OntologyStats {
        let data = self.read().await;
        OntologyStats {
            class_count: data.graph.len(),
            root_count: data.graph.roots().len(),
            hierarchy_edge_count: data.graph.iter().map(|c| c.parents.len()).sum(),
            disjointness_count: data.graph.disjointness_count(),
            data_property_count: data.properties.data_property_count(),
            object_property_count: data.properties.object_property_count(),
            general_axiom_count: data.properties.general_axioms().len(),
        }
    }
}

/// Resolve a raw class name against the registry.
fn resolve_in(data: &crate::store::OntologyData, name: &str) -> Option<String> {
    data.registry.resolve(name).map(|r| r.into_string())
}

fn distinct_sources(records: &[ProvenanceRecord]) -> Vec<String> {
    let mut sources = Vec::new();
    for record in records {
        if !sources.contains(&record.source) {
            sources.push(record.source.clone());
        }
    }
    sources
}

fn build_subtree(graph: &crate::graph::ClassGraph, name: &str) -> SubtreeNode {
    SubtreeNode {
        name: name.to_string(),
        children: graph
            .children(name)
            .iter()
            .map(|child| build_subtree(graph, child))
            .collect(),
    }
}
