//! Merge pipeline: payload model, phase reports and the coordinator that
//! applies a payload to an ontology in a fixed phase order.

pub mod coordinator;
pub mod payload;
pub mod report;

pub use coordinator::MergeCoordinator;
pub use payload::{
    DataPropertyPayload, DisjointnessPayload, EntityPayload, ExpressionPayload, HierarchyPayload,
    InstancePayload, MergePayload, ObjectPropertyPayload, OneOrMany,
};
pub use report::{MergePhase, MergeReport, PhaseReport, SkippedItem};
