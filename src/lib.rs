//! Ontoforge: Incremental Ontology Merge Engine
//!
//! Merges per-document extraction payloads into a durable chemistry
//! knowledge ontology: classes with provenance, hierarchy and
//! disjointness assertions, data-property values and object-property
//! restrictions. Merges are idempotent and best-effort; items that
//! reference unknown names or would violate a structural invariant are
//! skipped and reported, never fatal to the batch.

pub mod config;
pub mod error;
pub mod expr;
pub mod graph;
pub mod merge;
pub mod property;
pub mod provenance;
pub mod query;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use config::Config;
pub use error::{
    ConfigError, DisjointnessError, ExpressionError, HierarchyError, InstanceError, MergeError,
    OntoforgeError, PropertyError, Result, SnapshotError,
};
pub use expr::{Combinator, Expression};
pub use graph::{Class, ClassGraph, HierarchyOutcome};
pub use merge::{
    DataPropertyPayload, DisjointnessPayload, EntityPayload, ExpressionPayload, HierarchyPayload,
    InstancePayload, MergeCoordinator, MergePayload, MergePhase, MergeReport,
    ObjectPropertyPayload, OneOrMany, PhaseReport, SkippedItem,
};
pub use property::{
    ClassRestriction, DataProperty, GeneralAxiom, InstancePlacement, ObjectProperty, OwnerKey,
    PropertyInstance, PropertyStore, Quantifier, OWNER_KEY_SEPARATOR,
};
pub use provenance::{ProvenanceRecord, Provenanced};
pub use query::{ClassDefinition, ClassInfo, OntologyStats, SubtreeNode};
pub use registry::{normalize_name, ClassRef, NameRegistry};
pub use snapshot::{
    FileSnapshotStore, MemorySnapshotStore, OntologyDocument, SnapshotStore, DOCUMENT_VERSION,
};
pub use store::{Ontology, OntologyData};
