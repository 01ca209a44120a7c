//! The merge coordinator: applies a payload to an ontology in five
//! phases, persisting after each phase that ran.
//!
//! Phase order is fixed (entities, hierarchy, disjointness, data
//! properties, object properties) so that later phases can resolve the
//! names earlier phases introduced. Per-item failures never abort a
//! phase; they are recorded in the report and the rest of the batch
//! continues. A failed snapshot write does abort the merge, without
//! rolling back phases already applied in memory.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::MergeError;
use crate::merge::payload::MergePayload;
use crate::merge::report::{MergePhase, MergeReport, PhaseReport};
use crate::property::{InstancePlacement, PropertyInstance, OWNER_KEY_SEPARATOR};
use crate::registry::normalize_name;
use crate::store::Ontology;

/// Applies merge payloads to a shared ontology.
pub struct MergeCoordinator {
    ontology: Arc<Ontology>,
}

impl MergeCoordinator {
    pub fn new(ontology: Arc<Ontology>) -> Self {
        Self { ontology }
    }

    pub fn ontology(&self) -> &Arc<Ontology> {
        &self.ontology
    }

    /// Merge one payload. Empty sections are skipped entirely; each
    /// section that ran gets a phase report and a snapshot write.
    pub async fn merge(&self, payload: MergePayload) -> Result<MergeReport, MergeError> {
        let source = payload.source.clone();
        let mut report = MergeReport::new(&source);
        debug!(source = %source, "starting merge");

        if !payload.entities.is_empty() {
            let phase = self.apply_entities(&payload, &source).await;
            self.finish_phase(MergePhase::Entities, phase, &mut report)
                .await?;
        }

        if !payload.hierarchy.is_empty() {
            let phase = self.apply_hierarchy(&payload, &source).await;
            self.finish_phase(MergePhase::Hierarchy, phase, &mut report)
                .await?;
        }

        if !payload.disjointness.is_empty() {
            let phase = self.apply_disjointness(&payload).await;
            self.finish_phase(MergePhase::Disjointness, phase, &mut report)
                .await?;
        }

        if !payload.data_properties.is_empty() {
            let phase = self.apply_data_properties(&payload, &source).await;
            self.finish_phase(MergePhase::DataProperties, phase, &mut report)
                .await?;
        }

        if !payload.object_properties.is_empty() {
            let phase = self.apply_object_properties(&payload, &source).await;
            self.finish_phase(MergePhase::ObjectProperties, phase, &mut report)
                .await?;
        }

        info!(
            source = %source,
            applied = report.total_applied(),
            skipped = report.total_skipped(),
            "merge complete"
        );
        Ok(report)
    }

    /// Record the phase report, then persist. On persistence failure the
    /// accumulated report (including the failed phase, which is already
    /// applied in memory) travels with the error.
    async fn finish_phase(
        &self,
        phase: MergePhase,
        phase_report: PhaseReport,
        report: &mut MergeReport,
    ) -> Result<(), MergeError> {
        debug!(
            phase = %phase,
            applied = phase_report.applied,
            skipped = phase_report.skipped.len(),
            duplicates = phase_report.duplicates,
            "phase applied"
        );
        report.set_phase(phase, phase_report);

        if let Err(source) = self.ontology.persist().await {
            warn!(phase = %phase, error = %source, "snapshot write failed after phase");
            return Err(MergeError::PersistenceFailed {
                report: Box::new(report.clone()),
                source,
            });
        }
        Ok(())
    }

    async fn apply_entities(&self, payload: &MergePayload, source: &str) -> PhaseReport {
        let mut phase = PhaseReport::default();
        let mut guard = self.ontology.write().await;
        let data = &mut *guard;

        for entity in &payload.entities {
            let existed = data.registry.resolve(&entity.name).is_some();
            match data.graph.upsert_class(
                &mut data.registry,
                &entity.name,
                entity.information.as_deref(),
                source,
            ) {
                Some(_) if existed => phase.record_duplicate(),
                Some(_) => phase.record_applied(),
                None => phase.record_skipped(&entity.name, "empty class name"),
            }
        }
        phase
    }

    async fn apply_hierarchy(&self, payload: &MergePayload, source: &str) -> PhaseReport {
        let mut phase = PhaseReport::default();
        let mut guard = self.ontology.write().await;
        let data = &mut *guard;

        for edge in &payload.hierarchy {
            match data.graph.add_hierarchy(
                &data.registry,
                &edge.subclass,
                &edge.superclasses,
                edge.information.as_deref(),
                source,
            ) {
                Ok(outcome) => {
                    phase.applied += outcome.applied.len();
                    phase.duplicates += outcome.duplicates;
                    for (super_name, err) in outcome.skipped {
                        phase.record_skipped(
                            format!("{} -> {}", edge.subclass, super_name),
                            err,
                        );
                    }
                }
                Err(err) => phase.record_skipped(&edge.subclass, err),
            }
        }
        phase
    }

    async fn apply_disjointness(&self, payload: &MergePayload) -> PhaseReport {
        let mut phase = PhaseReport::default();
        let mut guard = self.ontology.write().await;
        let data = &mut *guard;

        for pair in &payload.disjointness {
            match data
                .graph
                .add_disjointness(&data.registry, &pair.class1, &pair.class2)
            {
                Ok(true) => phase.record_applied(),
                Ok(false) => phase.record_duplicate(),
                Err(err) => {
                    phase.record_skipped(format!("{} / {}", pair.class1, pair.class2), err)
                }
            }
        }
        phase
    }

    async fn apply_data_properties(&self, payload: &MergePayload, source: &str) -> PhaseReport {
        let mut phase = PhaseReport::default();
        let mut guard = self.ontology.write().await;
        let data = &mut *guard;

        for prop in &payload.data_properties {
            let existed = normalize_name(&prop.name)
                .is_some_and(|n| data.properties.data_property(&n).is_some());
            let Some(canonical) = data.properties.upsert_data_property(
                &prop.name,
                prop.information.as_deref(),
                source,
            ) else {
                phase.record_skipped(&prop.name, "empty property name");
                continue;
            };
            if existed {
                phase.record_duplicate();
            } else {
                phase.record_applied();
            }

            for (key, values) in &prop.values {
                let owners: Vec<String> = key
                    .split(OWNER_KEY_SEPARATOR)
                    .map(|s| s.to_string())
                    .collect();
                for value in values.clone().into_vec() {
                    match data
                        .properties
                        .set_data_value(&data.registry, &canonical, &owners, value)
                    {
                        Ok(true) => phase.record_applied(),
                        Ok(false) => phase.record_duplicate(),
                        Err(err) => {
                            phase.record_skipped(format!("{}[{}]", canonical, key), err)
                        }
                    }
                }
            }
        }
        phase
    }

    async fn apply_object_properties(&self, payload: &MergePayload, source: &str) -> PhaseReport {
        let mut phase = PhaseReport::default();
        let mut guard = self.ontology.write().await;
        let data = &mut *guard;

        for prop in &payload.object_properties {
            let existed = normalize_name(&prop.name)
                .is_some_and(|n| data.properties.object_property(&n).is_some());
            let Some(canonical) = data.properties.upsert_object_property(
                &prop.name,
                prop.information.as_deref(),
                source,
            ) else {
                phase.record_skipped(&prop.name, "empty property name");
                continue;
            };
            if existed {
                phase.record_duplicate();
            } else {
                phase.record_applied();
            }

            for (index, raw) in prop.instances.iter().enumerate() {
                let item = format!("{}#{}", canonical, index);
                let domain = match raw.domain_expression() {
                    Ok(expr) => expr,
                    Err(err) => {
                        phase.record_skipped(&item, err);
                        continue;
                    }
                };
                let range = match raw.range_expression() {
                    Ok(expr) => expr,
                    Err(err) => {
                        phase.record_skipped(&item, err);
                        continue;
                    }
                };
                let domain_label = domain.describe();
                let instance = PropertyInstance {
                    domain,
                    range,
                    restriction: raw.restriction,
                };
                match data.properties.add_instance(&data.registry, &canonical, instance) {
                    Ok(InstancePlacement::Duplicate) => phase.record_duplicate(),
                    Ok(InstancePlacement::GeneralAxiom) => {
                        debug!(
                            property = %canonical,
                            domain = %domain_label,
                            "restriction attached as general axiom"
                        );
                        phase.record_applied();
                    }
                    Ok(InstancePlacement::Class(_)) => phase.record_applied(),
                    Err(err) => phase.record_skipped(&item, err),
                }
            }
        }
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::payload::{
        DisjointnessPayload, EntityPayload, HierarchyPayload, MergePayload,
    };

    fn entities(source: &str, names: &[&str]) -> MergePayload {
        let mut payload = MergePayload::new(source);
        payload.entities = names
            .iter()
            .map(|n| EntityPayload {
                name: n.to_string(),
                information: None,
            })
            .collect();
        payload
    }

    #[tokio::test]
    async fn test_empty_payload_runs_no_phases() {
        let coordinator = MergeCoordinator::new(Arc::new(Ontology::new("chemistry")));
        let report = coordinator.merge(MergePayload::new("doc-1")).await.unwrap();
        assert!(report.entities.is_none());
        assert!(report.object_properties.is_none());
        assert_eq!(report.total_applied(), 0);
    }

    #[tokio::test]
    async fn test_entities_phase_counts() {
        let coordinator = MergeCoordinator::new(Arc::new(Ontology::new("chemistry")));
        let report = coordinator
            .merge(entities("doc-1", &["acid", "acid", "  "]))
            .await
            .unwrap();
        let phase = report.entities.unwrap();
        assert_eq!(phase.applied, 1);
        assert_eq!(phase.duplicates, 1);
        assert_eq!(phase.skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_hierarchy_unknown_superclass_is_skipped_not_fatal() {
        let ontology = Arc::new(Ontology::new("chemistry"));
        let coordinator = MergeCoordinator::new(ontology.clone());
        coordinator
            .merge(entities("doc-1", &["acid", "compound"]))
            .await
            .unwrap();

        let mut payload = MergePayload::new("doc-1");
        payload.hierarchy = vec![HierarchyPayload {
            subclass: "acid".to_string(),
            superclasses: vec!["compound".to_string(), "phantom".to_string()],
            information: None,
        }];
        let report = coordinator.merge(payload).await.unwrap();
        let phase = report.hierarchy.unwrap();
        assert_eq!(phase.applied, 1);
        assert_eq!(phase.skipped.len(), 1);
        assert!(phase.skipped[0].reason.contains("phantom"));

        assert_eq!(ontology.parents("acid").await, vec!["compound"]);
    }

    #[tokio::test]
    async fn test_disjointness_duplicate_absorbed() {
        let ontology = Arc::new(Ontology::new("chemistry"));
        let coordinator = MergeCoordinator::new(ontology);
        coordinator
            .merge(entities("doc-1", &["acid", "base"]))
            .await
            .unwrap();

        let mut payload = MergePayload::new("doc-2");
        payload.disjointness = vec![
            DisjointnessPayload {
                class1: "acid".to_string(),
                class2: "base".to_string(),
            },
            DisjointnessPayload {
                class1: "base".to_string(),
                class2: "acid".to_string(),
            },
        ];
        let report = coordinator.merge(payload).await.unwrap();
        let phase = report.disjointness.unwrap();
        assert_eq!(phase.applied, 1);
        assert_eq!(phase.duplicates, 1);
    }
}
