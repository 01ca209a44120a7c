//! Inbound merge payload: the extraction-shaped document a merge call
//! consumes. All sections are optional; `serde` defaults keep partial
//! payloads deserializable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InstanceError;
use crate::expr::{Combinator, Expression};
use crate::property::Quantifier;

/// A class mention with optional information content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

/// One subclass with its asserted superclasses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyPayload {
    pub subclass: String,
    /// Accepts the singular wire key `superclass`, which holds a list.
    #[serde(default, alias = "superclass")]
    pub superclasses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

/// A pairwise disjointness assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisjointnessPayload {
    pub class1: String,
    pub class2: String,
}

/// A value that may arrive as a single JSON scalar or a list of them.
///
/// `Many` must be tried first: `serde_json::Value` deserializes from any
/// JSON including arrays, so with the variants reversed a wire list
/// would be absorbed as one opaque array value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<serde_json::Value> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// A data property with values keyed by owner-key path strings
/// (class names joined with the owner-key separator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPropertyPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, OneOrMany>,
}

/// A domain or range expression as it arrives off the wire: the entity
/// field holds one name or a comma-separated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionPayload {
    #[serde(default = "default_existence")]
    pub existence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub combinator: Option<Combinator>,
}

fn default_existence() -> bool {
    true
}

impl ExpressionPayload {
    /// Build the structured expression, comma-splitting the entity field.
    /// The combinator defaults to `Single` when absent.
    pub fn to_expression(&self, side: &'static str) -> Result<Expression, InstanceError> {
        let raw = self
            .entity
            .as_deref()
            .ok_or(InstanceError::MissingExpression(side))?;
        let entities: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
        let combinator = self.combinator.unwrap_or(Combinator::Single);
        Expression::build(self.existence, combinator, &entities).map_err(InstanceError::from)
    }
}

/// One object-property instance: domain, range and quantifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstancePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<ExpressionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ExpressionPayload>,
    #[serde(default)]
    pub restriction: Quantifier,
}

impl InstancePayload {
    pub fn domain_expression(&self) -> Result<Expression, InstanceError> {
        self.domain
            .as_ref()
            .ok_or(InstanceError::MissingExpression("domain"))?
            .to_expression("domain")
    }

    pub fn range_expression(&self) -> Result<Expression, InstanceError> {
        self.range
            .as_ref()
            .ok_or(InstanceError::MissingExpression("range"))?
            .to_expression("range")
    }
}

/// An object property with its extracted instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPropertyPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default)]
    pub instances: Vec<InstancePayload>,
}

/// A full merge payload from one source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergePayload {
    /// Source document identifier, recorded on every provenance entry.
    pub source: String,
    #[serde(default)]
    pub entities: Vec<EntityPayload>,
    #[serde(default)]
    pub hierarchy: Vec<HierarchyPayload>,
    #[serde(default)]
    pub disjointness: Vec<DisjointnessPayload>,
    #[serde(default)]
    pub data_properties: Vec<DataPropertyPayload>,
    #[serde(default)]
    pub object_properties: Vec<ObjectPropertyPayload>,
}

impl MergePayload {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entities: Vec::new(),
            hierarchy: Vec::new(),
            disjointness: Vec::new(),
            data_properties: Vec::new(),
            object_properties: Vec::new(),
        }
    }
}
