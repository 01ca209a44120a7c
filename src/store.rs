//! The ontology store: shared state, locking and the load/save lifecycle.
//!
//! One `Ontology` owns the identifier registry, the class graph and the
//! property store behind a single `RwLock`, so readers always observe a
//! consistent state and a merge phase is applied atomically with respect
//! to readers. The store is passed by handle into the merge coordinator;
//! there is no ambient global state.

use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, SnapshotError};
use crate::graph::ClassGraph;
use crate::property::PropertyStore;
use crate::registry::NameRegistry;
use crate::snapshot::{OntologyDocument, SnapshotStore, DOCUMENT_VERSION};

/// The combined mutable state of one ontology.
#[derive(Debug, Default)]
pub struct OntologyData {
    /// Namespace the class names are scoped to. Lives behind the lock so
    /// loading a document adopts its namespace together with its data.
    pub namespace: String,
    /// Identifier registry shared by both stores.
    pub registry: NameRegistry,
    /// Classes, hierarchy edges and disjointness pairs.
    pub graph: ClassGraph,
    /// Data and object properties, restrictions and axioms.
    pub properties: PropertyStore,
}

/// An incrementally built ontology with optional durable snapshots.
pub struct Ontology {
    data: RwLock<OntologyData>,
    snapshot: Option<Arc<dyn SnapshotStore>>,
    /// Serializes snapshot writes.
    persist_lock: AsyncMutex<()>,
}

impl Ontology {
    /// Create an empty in-memory ontology without persistence.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(OntologyData {
                namespace: namespace.into(),
                ..OntologyData::default()
            }),
            snapshot: None,
            persist_lock: AsyncMutex::new(()),
        }
    }

    /// Create an ontology backed by a snapshot store, loading the
    /// existing document if one is present.
    pub async fn with_snapshot(
        namespace: impl Into<String>,
        snapshot: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        let mut ontology = Self::new(namespace);
        if let Some(document) = snapshot.read().await? {
            tracing::info!(
                namespace = %document.namespace,
                classes = document.classes.len(),
                "Loaded ontology snapshot"
            );
            let mut data = ontology.data.write().await;
            Self::apply_document(&mut data, document);
        }
        ontology.snapshot = Some(snapshot);
        Ok(ontology)
    }

    pub async fn namespace(&self) -> String {
        self.data.read().await.namespace.clone()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, OntologyData> {
        self.data.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, OntologyData> {
        self.data.write().await
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write a durable snapshot of the current state, if a snapshot store
    /// is configured.
    pub async fn persist(&self) -> std::result::Result<(), SnapshotError> {
        let Some(ref snapshot) = self.snapshot else {
            return Ok(());
        };

        let _lock = self.persist_lock.lock().await;
        let document = {
            let data = self.data.read().await;
            Self::build_document(&data)
        };
        snapshot.write(&document).await
    }

    /// Serialize the current state into a snapshot document.
    pub async fn save(&self) -> OntologyDocument {
        let data = self.data.read().await;
        Self::build_document(&data)
    }

    /// Replace the current state, namespace included, with a previously
    /// saved document.
    pub async fn load(&self, document: OntologyDocument) {
        let mut data = self.data.write().await;
        *data = OntologyData::default();
        Self::apply_document(&mut data, document);
    }

    fn build_document(data: &OntologyData) -> OntologyDocument {
        OntologyDocument {
            version: DOCUMENT_VERSION,
            namespace: data.namespace.clone(),
            classes: data.graph.iter().cloned().collect(),
            disjointness: data.graph.disjointness_pairs().cloned().collect(),
            data_properties: data.properties.data_properties().cloned().collect(),
            object_properties: data.properties.object_properties().cloned().collect(),
            class_restrictions: data.properties.class_restrictions().clone(),
            general_axioms: data.properties.general_axioms().to_vec(),
        }
    }

    fn apply_document(data: &mut OntologyData, document: OntologyDocument) {
        data.namespace = document.namespace;
        for class in document.classes {
            data.registry.register(&class.name);
            data.graph.insert_loaded(class);
        }
        for pair in document.disjointness {
            data.graph.insert_disjointness_loaded(pair);
        }
        for prop in document.data_properties {
            data.properties.insert_data_property_loaded(prop);
        }
        for prop in document.object_properties {
            data.properties.insert_object_property_loaded(prop);
        }
        for (class_name, restrictions) in document.class_restrictions {
            data.properties
                .insert_restrictions_loaded(class_name, restrictions);
        }
        for axiom in document.general_axioms {
            data.properties.insert_axiom_loaded(axiom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshotStore;

    #[tokio::test]
    async fn test_new_ontology_is_empty() {
        let ontology = Ontology::new("chemistry");
        let data = ontology.read().await;
        assert!(data.graph.is_empty());
        assert_eq!(data.properties.data_property_count(), 0);
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let ontology = Ontology::new("chemistry");
        {
            let mut guard = ontology.write().await;
            let data = &mut *guard;
            data.graph
                .upsert_class(&mut data.registry, "acid", Some("proton donor"), "doc-1");
            data.graph
                .upsert_class(&mut data.registry, "base", None, "doc-1");
            data.graph
                .add_disjointness(&data.registry, "acid", "base")
                .unwrap();
        }

        let saved = ontology.save().await;

        let restored = Ontology::new("chemistry");
        restored.load(saved.clone()).await;
        let resaved = restored.save().await;

        assert_eq!(
            serde_json::to_string(&saved).unwrap(),
            serde_json::to_string(&resaved).unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_adopts_document_namespace() {
        let ontology = Ontology::new("chemistry");
        {
            let mut guard = ontology.write().await;
            let data = &mut *guard;
            data.graph
                .upsert_class(&mut data.registry, "acid", None, "doc-1");
        }
        let saved = ontology.save().await;

        // A handle constructed under a different name takes on the
        // document's namespace, so re-saving reproduces the document.
        let restored = Ontology::new("materials");
        restored.load(saved.clone()).await;
        assert_eq!(restored.namespace().await, "chemistry");

        let resaved = restored.save().await;
        assert_eq!(
            serde_json::to_string(&saved).unwrap(),
            serde_json::to_string(&resaved).unwrap()
        );
    }

    #[tokio::test]
    async fn test_with_snapshot_loads_existing() {
        let snapshot = Arc::new(MemorySnapshotStore::new());

        {
            let ontology = Ontology::with_snapshot("chemistry", snapshot.clone())
                .await
                .unwrap();
            {
                let mut guard = ontology.write().await;
                let data = &mut *guard;
                data.graph
                    .upsert_class(&mut data.registry, "benzene_ring", None, "doc-1");
            }
            ontology.persist().await.unwrap();
        }

        let reopened = Ontology::with_snapshot("ignored", snapshot).await.unwrap();
        assert_eq!(reopened.namespace().await, "chemistry");
        let data = reopened.read().await;
        assert!(data.graph.contains("benzene_ring"));
        assert!(data.registry.exists("benzene_ring"));
    }
}
