//! Property store operations.

use std::collections::BTreeMap;

use crate::error::{InstanceError, PropertyError};
use crate::expr::Combinator;
use crate::provenance::Provenanced;
use crate::registry::{normalize_name, NameRegistry};

use super::types::{
    ClassRestriction, DataProperty, GeneralAxiom, InstancePlacement, ObjectProperty, OwnerKey,
    PropertyInstance,
};

/// Owns data properties, object properties, class-attached restrictions
/// and general axioms. Class names are resolved through the shared
/// identifier registry; the store never creates classes.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    data_properties: BTreeMap<String, DataProperty>,
    object_properties: BTreeMap<String, ObjectProperty>,
    /// Restrictions attached to single-class domains, keyed by class name.
    class_restrictions: BTreeMap<String, Vec<ClassRestriction>>,
    /// Axioms over composite domain expressions.
    general_axioms: Vec<GeneralAxiom>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Data Properties
    // ========================================================================

    /// Register or fetch a data property; idempotent like class upsert.
    /// Returns the canonical property name, or `None` for empty names.
    pub fn upsert_data_property(
        &mut self,
        name: &str,
        info: Option<&str>,
        source: &str,
    ) -> Option<String> {
        let canonical = normalize_name(name)?;
        let prop = self
            .data_properties
            .entry(canonical.clone())
            .or_insert_with(|| DataProperty::new(&canonical));
        if let Some(info) = info {
            prop.attach_provenance(info, source);
        }
        Some(canonical)
    }

    /// Accumulate a value for a property under an owner key.
    ///
    /// Every class in the owner key must resolve; the key is the ordered
    /// join of the resolved names. Returns whether the value was newly
    /// added (`false` = duplicate no-op).
    pub fn set_data_value(
        &mut self,
        registry: &NameRegistry,
        property: &str,
        owner_key: &[String],
        value: serde_json::Value,
    ) -> Result<bool, PropertyError> {
        let canonical = normalize_name(property)
            .filter(|p| self.data_properties.contains_key(p))
            .ok_or_else(|| PropertyError::UnknownProperty(property.trim().to_string()))?;

        if owner_key.is_empty() {
            return Err(PropertyError::EmptyOwnerKey);
        }
        let mut resolved = Vec::with_capacity(owner_key.len());
        for raw in owner_key {
            let class_ref = registry
                .resolve(raw)
                .ok_or_else(|| PropertyError::UnknownClass(raw.trim().to_string()))?;
            resolved.push(class_ref.into_string());
        }

        let key = OwnerKey::from_classes(&resolved);
        match self.data_properties.get_mut(&canonical) {
            Some(prop) => Ok(prop.insert_value(key, value)),
            None => Err(PropertyError::UnknownProperty(canonical)),
        }
    }

    pub fn data_property(&self, name: &str) -> Option<&DataProperty> {
        self.data_properties.get(name)
    }

    pub fn data_properties(&self) -> impl Iterator<Item = &DataProperty> {
        self.data_properties.values()
    }

    pub fn data_property_count(&self) -> usize {
        self.data_properties.len()
    }

    // ========================================================================
    // Object Properties
    // ========================================================================

    /// Register or fetch an object property; idempotent.
    pub fn upsert_object_property(
        &mut self,
        name: &str,
        info: Option<&str>,
        source: &str,
    ) -> Option<String> {
        let canonical = normalize_name(name)?;
        let prop = self
            .object_properties
            .entry(canonical.clone())
            .or_insert_with(|| ObjectProperty::new(&canonical));
        if let Some(info) = info {
            prop.attach_provenance(info, source);
        }
        Some(canonical)
    }

    /// Apply one domain/range restriction instance to a property.
    ///
    /// Both expressions must fully resolve against the registry. A
    /// single-class domain attaches the restriction to that class's
    /// definition; a union/intersection domain creates a general axiom
    /// keyed to the composite expression instead, since the domain is not
    /// itself a named class.
    pub fn add_instance(
        &mut self,
        registry: &NameRegistry,
        property: &str,
        instance: PropertyInstance,
    ) -> Result<InstancePlacement, InstanceError> {
        let canonical = normalize_name(property)
            .filter(|p| self.object_properties.contains_key(p))
            .ok_or_else(|| InstanceError::UnknownProperty(property.trim().to_string()))?;

        instance.domain.evaluate(registry).map_err(InstanceError::from)?;
        instance.range.evaluate(registry).map_err(InstanceError::from)?;

        let prop = self
            .object_properties
            .get_mut(&canonical)
            .ok_or_else(|| InstanceError::UnknownProperty(canonical.clone()))?;
        if prop.instances.contains(&instance) {
            return Ok(InstancePlacement::Duplicate);
        }
        prop.instances.push(instance.clone());

        let restriction = ClassRestriction {
            property: canonical,
            quantifier: instance.restriction,
            range: instance.range.clone(),
        };

        if instance.domain.combinator == Combinator::Single {
            let class_name = instance.domain.entities[0].clone();
            let attached = self.class_restrictions.entry(class_name.clone()).or_default();
            if !attached.contains(&restriction) {
                attached.push(restriction);
            }
            Ok(InstancePlacement::Class(class_name))
        } else {
            let axiom = GeneralAxiom {
                domain: instance.domain,
                restriction,
            };
            if !self.general_axioms.contains(&axiom) {
                self.general_axioms.push(axiom);
            }
            Ok(InstancePlacement::GeneralAxiom)
        }
    }

    pub fn object_property(&self, name: &str) -> Option<&ObjectProperty> {
        self.object_properties.get(name)
    }

    pub fn object_properties(&self) -> impl Iterator<Item = &ObjectProperty> {
        self.object_properties.values()
    }

    pub fn object_property_count(&self) -> usize {
        self.object_properties.len()
    }

    /// Restrictions attached to a single named class.
    pub fn restrictions_for(&self, class_name: &str) -> &[ClassRestriction] {
        self.class_restrictions
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn general_axioms(&self) -> &[GeneralAxiom] {
        &self.general_axioms
    }

    // Snapshot support.

    pub(crate) fn insert_data_property_loaded(&mut self, prop: DataProperty) {
        self.data_properties.insert(prop.name.clone(), prop);
    }

    pub(crate) fn insert_object_property_loaded(&mut self, prop: ObjectProperty) {
        self.object_properties.insert(prop.name.clone(), prop);
    }

    pub(crate) fn class_restrictions(&self) -> &BTreeMap<String, Vec<ClassRestriction>> {
        &self.class_restrictions
    }

    pub(crate) fn insert_restrictions_loaded(
        &mut self,
        class_name: String,
        restrictions: Vec<ClassRestriction>,
    ) {
        self.class_restrictions.insert(class_name, restrictions);
    }

    pub(crate) fn insert_axiom_loaded(&mut self, axiom: GeneralAxiom) {
        self.general_axioms.push(axiom);
    }
}
