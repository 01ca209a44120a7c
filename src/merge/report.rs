//! Per-merge reporting: what each phase applied, skipped and deduplicated.

use serde::{Deserialize, Serialize};

/// The five merge phases, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePhase {
    Entities,
    Hierarchy,
    Disjointness,
    DataProperties,
    ObjectProperties,
}

impl std::fmt::Display for MergePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MergePhase::Entities => "entities",
            MergePhase::Hierarchy => "hierarchy",
            MergePhase::Disjointness => "disjointness",
            MergePhase::DataProperties => "data_properties",
            MergePhase::ObjectProperties => "object_properties",
        };
        f.write_str(name)
    }
}

/// One payload item a phase could not apply, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
    /// A short human-readable description of the item.
    pub item: String,
    pub reason: String,
}

/// Outcome counters for a single phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Items applied as new state.
    pub applied: usize,
    /// Items skipped with a reason (unknown referent, bad arity, cycle).
    pub skipped: Vec<SkippedItem>,
    /// Items already present, absorbed without change.
    pub duplicates: usize,
}

impl PhaseReport {
    pub fn record_applied(&mut self) {
        self.applied += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub fn record_skipped(&mut self, item: impl Into<String>, reason: impl ToString) {
        self.skipped.push(SkippedItem {
            item: item.into(),
            reason: reason.to_string(),
        });
    }
}

/// Full report for one merge call. Phases absent from the payload stay
/// `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Source document the payload came from.
    pub source: String,
    pub entities: Option<PhaseReport>,
    pub hierarchy: Option<PhaseReport>,
    pub disjointness: Option<PhaseReport>,
    pub data_properties: Option<PhaseReport>,
    pub object_properties: Option<PhaseReport>,
}

impl MergeReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    fn phase(&self, phase: MergePhase) -> Option<&PhaseReport> {
        match phase {
            MergePhase::Entities => self.entities.as_ref(),
            MergePhase::Hierarchy => self.hierarchy.as_ref(),
            MergePhase::Disjointness => self.disjointness.as_ref(),
            MergePhase::DataProperties => self.data_properties.as_ref(),
            MergePhase::ObjectProperties => self.object_properties.as_ref(),
        }
    }

    pub(crate) fn set_phase(&mut self, phase: MergePhase, report: PhaseReport) {
        let slot = match phase {
            MergePhase::Entities => &mut self.entities,
            MergePhase::Hierarchy => &mut self.hierarchy,
            MergePhase::Disjointness => &mut self.disjointness,
            MergePhase::DataProperties => &mut self.data_properties,
            MergePhase::ObjectProperties => &mut self.object_properties,
        };
        *slot = Some(report);
    }

    /// Total items applied across all phases that ran.
    pub fn total_applied(&self) -> usize {
        [
            MergePhase::Entities,
            MergePhase::Hierarchy,
            MergePhase::Disjointness,
            MergePhase::DataProperties,
            MergePhase::ObjectProperties,
        ]
        .iter()
        .filter_map(|p| self.phase(*p))
        .map(|r| r.applied)
        .sum()
    }

    /// Total items skipped across all phases that ran.
    pub fn total_skipped(&self) -> usize {
        [
            MergePhase::Entities,
            MergePhase::Hierarchy,
            MergePhase::Disjointness,
            MergePhase::DataProperties,
            MergePhase::ObjectProperties,
        ]
        .iter()
        .filter_map(|p| self.phase(*p))
        .map(|r| r.skipped.len())
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_report_counters() {
        let mut report = PhaseReport::default();
        report.record_applied();
        report.record_applied();
        report.record_duplicate();
        report.record_skipped("acid -> base", "would create a cycle");

        assert_eq!(report.applied, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("cycle"));
    }

    #[test]
    fn test_report_round_trips_as_json() {
        let mut report = MergeReport::new("doc-1");
        let mut hierarchy = PhaseReport::default();
        hierarchy.record_applied();
        hierarchy.record_skipped("acid -> phantom", "Unknown class: phantom");
        report.set_phase(MergePhase::Hierarchy, hierarchy);

        let json = serde_json::to_string(&report).unwrap();
        let back: MergeReport = serde_json::from_str(&json).unwrap();
        let phase = back.hierarchy.unwrap();
        assert_eq!(phase.applied, 1);
        assert_eq!(phase.skipped[0].reason, "Unknown class: phantom");
    }

    #[test]
    fn test_merge_report_totals() {
        let mut report = MergeReport::new("doc-1");
        let mut entities = PhaseReport::default();
        entities.record_applied();
        report.set_phase(MergePhase::Entities, entities);

        let mut hierarchy = PhaseReport::default();
        hierarchy.record_skipped("x", "unknown class");
        report.set_phase(MergePhase::Hierarchy, hierarchy);

        assert_eq!(report.total_applied(), 1);
        assert_eq!(report.total_skipped(), 1);
        assert!(report.disjointness.is_none());
    }
}
