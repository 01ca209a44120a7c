//! Class graph: classes, is-a hierarchy edges and disjointness pairs.
//!
//! The graph enforces the structural invariants of the ontology:
//! referential integrity (edges only between existing classes),
//! acyclicity of the subclass relation, and symmetric, idempotent
//! disjointness.

mod store;
mod types;

pub use store::{ClassGraph, HierarchyOutcome};
pub use types::Class;
