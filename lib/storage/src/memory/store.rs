use crate::memory::graph::{MemGraph, MemNode, UndoLog};
use crate::memory::snapshot::MemGraphSnapshot;
use async_trait::async_trait;
use rdf_lpg_common::error::StorageError;
use rdf_lpg_common::{
    Direction, GraphStore, GraphTransaction, NodeId, Relationship, RelationshipId,
};
use rdf_lpg_model::{PropertyValue, TypedValue};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// A memory-based property graph.
///
/// Transactions are serialized: [GraphStore::begin] waits until the previous transaction has been
/// committed or dropped. Dropping a transaction without committing it rolls back its changes.
#[derive(Default)]
pub struct MemGraphStore {
    /// The graph content. The lock is held by the active transaction.
    graph: Arc<Mutex<MemGraph>>,
    /// Persisted namespace definitions, from prefix to namespace.
    pub(super) namespaces: Mutex<BTreeMap<String, String>>,
    /// Vocabulary mappings, from IRI to name.
    pub(super) vocabulary_mappings: Vec<(String, String)>,
}

impl MemGraphStore {
    /// Creates an empty [MemGraphStore].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vocabulary mappings used when mapping IRIs to custom names.
    #[must_use]
    pub fn with_vocabulary_mappings<I, S, T>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.vocabulary_mappings = mappings
            .into_iter()
            .map(|(iri, name)| (iri.into(), name.into()))
            .collect();
        self
    }

    /// Creates a read-only copy of the current content of the store.
    ///
    /// Waits for the active transaction, if any.
    pub async fn snapshot(&self) -> MemGraphSnapshot {
        MemGraphSnapshot::new(self.graph.lock().await.clone())
    }
}

#[async_trait]
impl GraphStore for MemGraphStore {
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>, StorageError> {
        let graph = Arc::clone(&self.graph).lock_owned().await;
        let undo = graph.undo_log();
        Ok(Box::new(MemGraphTransaction {
            graph,
            undo: Some(undo),
        }))
    }
}

/// A transaction on a [MemGraphStore] with exclusive access to the graph.
pub struct MemGraphTransaction {
    graph: OwnedMutexGuard<MemGraph>,
    /// `None` once the transaction has been committed.
    undo: Option<UndoLog>,
}

impl MemGraphTransaction {
    /// Splits the transaction into the graph and the undo log of this transaction.
    fn parts(&mut self) -> Result<(&mut MemGraph, &mut UndoLog), StorageError> {
        let undo = self.undo.as_mut().ok_or_else(|| {
            StorageError::Other("The transaction has already been committed".into())
        })?;
        Ok((&mut *self.graph, undo))
    }

    fn update_node<T>(
        &mut self,
        node: NodeId,
        update: impl FnOnce(&mut MemNode) -> T,
    ) -> Result<T, StorageError> {
        let (graph, undo) = self.parts()?;
        graph.update_node(undo, node, update)
    }
}

impl Drop for MemGraphTransaction {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            debug!("Rolling back an uncommitted transaction");
            self.graph.rollback(undo);
        }
    }
}

#[async_trait]
impl GraphTransaction for MemGraphTransaction {
    async fn find_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<Option<NodeId>, StorageError> {
        Ok(self.graph.find_node(label, key, value))
    }

    async fn merge_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<NodeId, StorageError> {
        if let Some(node) = self.graph.find_node(label, key, value) {
            return Ok(node);
        }
        let node = MemNode {
            labels: BTreeSet::from([label.to_owned()]),
            properties: BTreeMap::from([(
                key.to_owned(),
                PropertyValue::Scalar(value.clone()),
            )]),
            relationships: BTreeSet::new(),
        };
        let (graph, undo) = self.parts()?;
        Ok(graph.create_node(undo, node))
    }

    async fn labels(&mut self, node: NodeId) -> Result<Vec<String>, StorageError> {
        Ok(self.graph.node(node)?.labels.iter().cloned().collect())
    }

    async fn add_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError> {
        if self.graph.node(node)?.labels.contains(label) {
            return Ok(false);
        }
        self.update_node(node, |node| node.labels.insert(label.to_owned()))
    }

    async fn remove_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError> {
        if !self.graph.node(node)?.labels.contains(label) {
            return Ok(false);
        }
        self.update_node(node, |node| node.labels.remove(label))
    }

    async fn property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError> {
        Ok(self.graph.node(node)?.properties.get(key).cloned())
    }

    async fn property_keys(&mut self, node: NodeId) -> Result<Vec<String>, StorageError> {
        Ok(self.graph.node(node)?.properties.keys().cloned().collect())
    }

    async fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), StorageError> {
        self.update_node(node, |node| {
            node.properties.insert(key.to_owned(), value);
        })
    }

    async fn remove_property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError> {
        if !self.graph.node(node)?.properties.contains_key(key) {
            return Ok(None);
        }
        self.update_node(node, |node| node.properties.remove(key))
    }

    async fn merge_relationship(
        &mut self,
        start: NodeId,
        rel_type: &str,
        end: NodeId,
    ) -> Result<RelationshipId, StorageError> {
        let existing = self
            .graph
            .relationships_of(start, Some(rel_type), Direction::Outgoing)?
            .find(|rel| rel.end == end)
            .map(|rel| rel.id);
        if let Some(existing) = existing {
            return Ok(existing);
        }
        let (graph, undo) = self.parts()?;
        graph.create_relationship(undo, start, rel_type, end)
    }

    async fn relationships(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Relationship>, StorageError> {
        Ok(self
            .graph
            .relationships_of(node, rel_type, direction)?
            .cloned()
            .collect())
    }

    async fn degree(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<usize, StorageError> {
        Ok(self
            .graph
            .relationships_of(node, rel_type, direction)?
            .count())
    }

    async fn delete_relationship(
        &mut self,
        relationship: RelationshipId,
    ) -> Result<bool, StorageError> {
        let (graph, undo) = self.parts()?;
        graph.delete_relationship(undo, relationship)
    }

    async fn delete_node(&mut self, node: NodeId) -> Result<bool, StorageError> {
        let (graph, undo) = self.parts()?;
        graph.delete_node(undo, node)
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let mut transaction = self;
        transaction.parts()?;
        transaction.undo = None;
        debug!("Committed a transaction");
        Ok(())
    }
}
