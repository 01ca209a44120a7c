//! Durable snapshot document and storage backends.
//!
//! The whole ontology is persisted as a single versioned JSON document
//! holding the class namespace, property namespace and axiom namespace.
//! All collections serialize in deterministic order, so serialize →
//! deserialize → serialize is byte-stable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::SnapshotError;
use crate::graph::Class;
use crate::property::{ClassRestriction, DataProperty, GeneralAxiom, ObjectProperty};

/// Current snapshot document version.
pub const DOCUMENT_VERSION: u32 = 1;

/// The persisted form of a complete ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyDocument {
    pub version: u32,
    /// Namespace the class names are scoped to.
    pub namespace: String,
    pub classes: Vec<Class>,
    pub disjointness: Vec<(String, String)>,
    pub data_properties: Vec<DataProperty>,
    pub object_properties: Vec<ObjectProperty>,
    pub class_restrictions: BTreeMap<String, Vec<ClassRestriction>>,
    pub general_axioms: Vec<GeneralAxiom>,
}

/// Storage backend for ontology snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Write the document durably, replacing any previous snapshot.
    async fn write(&self, document: &OntologyDocument) -> Result<(), SnapshotError>;

    /// Read the last written document, if any.
    async fn read(&self) -> Result<Option<OntologyDocument>, SnapshotError>;
}

// ============================================================================
// File Backend
// ============================================================================

/// JSON file snapshot store.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write never corrupts the previous snapshot.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional snapshot path inside a data directory.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("ontology.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn write(&self, document: &OntologyDocument) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }

    async fn read(&self) -> Result<Option<OntologyDocument>, SnapshotError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let document = serde_json::from_str(&content)?;
                Ok(Some(document))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// Memory Backend
// ============================================================================

/// In-memory snapshot store, mainly for tests.
#[derive(Default)]
pub struct MemorySnapshotStore {
    content: RwLock<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn write(&self, document: &OntologyDocument) -> Result<(), SnapshotError> {
        let content = serde_json::to_string(document)?;
        *self.content.write().await = Some(content);
        Ok(())
    }

    async fn read(&self) -> Result<Option<OntologyDocument>, SnapshotError> {
        let guard = self.content.read().await;
        match guard.as_deref() {
            Some(content) => Ok(Some(serde_json::from_str(content)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_document() -> OntologyDocument {
        OntologyDocument {
            version: DOCUMENT_VERSION,
            namespace: "chemistry".to_string(),
            classes: Vec::new(),
            disjointness: Vec::new(),
            data_properties: Vec::new(),
            object_properties: Vec::new(),
            class_restrictions: BTreeMap::new(),
            general_axioms: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::in_dir(temp_dir.path());

        assert!(store.read().await.unwrap().is_none());

        let mut document = empty_document();
        document.classes.push(Class::new("benzene_ring"));
        store.write(&document).await.unwrap();

        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded.version, DOCUMENT_VERSION);
        assert_eq!(loaded.namespace, "chemistry");
        assert_eq!(loaded.classes.len(), 1);
        assert_eq!(loaded.classes[0].name, "benzene_ring");
    }

    #[tokio::test]
    async fn test_file_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::in_dir(temp_dir.path());

        store.write(&empty_document()).await.unwrap();
        let mut document = empty_document();
        document.classes.push(Class::new("acid"));
        store.write(&document).await.unwrap();

        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded.classes.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert!(store.read().await.unwrap().is_none());

        store.write(&empty_document()).await.unwrap();
        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded.namespace, "chemistry");
    }
}
