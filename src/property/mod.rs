//! Property store: data properties (value-bearing attributes keyed by an
//! owner class or class-intersection) and object properties (relations
//! expressed through domain/range restriction instances).

mod store;
mod types;

pub use store::PropertyStore;
pub use types::{
    ClassRestriction, DataProperty, GeneralAxiom, InstancePlacement, ObjectProperty, OwnerKey,
    PropertyInstance, Quantifier, OWNER_KEY_SEPARATOR,
};
