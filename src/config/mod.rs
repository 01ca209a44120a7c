//! Configuration loading and validation.

pub mod settings;

pub use settings::{Config, OntologyConfig, StorageConfig};
