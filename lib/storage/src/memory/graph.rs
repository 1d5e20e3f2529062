use rdf_lpg_common::error::StorageError;
use rdf_lpg_common::{Direction, NodeId, Relationship, RelationshipId};
use rdf_lpg_model::{PropertyValue, TypedValue};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// A node of a [MemGraph].
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MemNode {
    pub labels: BTreeSet<String>,
    pub properties: BTreeMap<String, PropertyValue>,
    /// Incoming and outgoing relationships.
    pub relationships: BTreeSet<RelationshipId>,
}

/// The state of the elements a transaction touched, as it was before the first modification.
#[derive(Debug)]
pub(crate) struct UndoLog {
    nodes: FxHashMap<NodeId, Option<MemNode>>,
    relationships: FxHashMap<RelationshipId, Option<Relationship>>,
    next_node_id: u64,
    next_relationship_id: u64,
}

/// The content of a [MemGraphStore](super::MemGraphStore).
///
/// Scalar string properties are indexed by key and value, which makes looking up nodes by their
/// identifier cheap. Every mutation records the previous state in an [UndoLog] such that an
/// uncommitted transaction can be rolled back.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemGraph {
    next_node_id: u64,
    next_relationship_id: u64,
    nodes: BTreeMap<NodeId, MemNode>,
    relationships: BTreeMap<RelationshipId, Relationship>,
    string_index: FxHashMap<(String, String), BTreeSet<NodeId>>,
}

impl MemGraph {
    pub fn undo_log(&self) -> UndoLog {
        UndoLog {
            nodes: FxHashMap::default(),
            relationships: FxHashMap::default(),
            next_node_id: self.next_node_id,
            next_relationship_id: self.next_relationship_id,
        }
    }

    /// Restores the state captured by `undo`.
    pub fn rollback(&mut self, undo: UndoLog) {
        for (id, original) in undo.nodes {
            if let Some(current) = self.nodes.remove(&id) {
                self.unindex(id, &current);
            }
            if let Some(original) = original {
                self.index(id, &original);
                self.nodes.insert(id, original);
            }
        }
        for (id, original) in undo.relationships {
            match original {
                Some(original) => self.relationships.insert(id, original),
                None => self.relationships.remove(&id),
            };
        }
        self.next_node_id = undo.next_node_id;
        self.next_relationship_id = undo.next_relationship_id;
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MemNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn node(&self, id: NodeId) -> Result<&MemNode, StorageError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| StorageError::UnknownElement(id.to_string()))
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn find_node(&self, label: &str, key: &str, value: &TypedValue) -> Option<NodeId> {
        let matches = |node: &MemNode| {
            node.labels.contains(label)
                && node.properties.get(key).and_then(PropertyValue::as_scalar) == Some(value)
        };
        match value {
            TypedValue::String(value) => self
                .string_index
                .get(&(key.to_owned(), value.clone()))?
                .iter()
                .copied()
                .find(|id| self.nodes.get(id).is_some_and(&matches)),
            _ => self
                .nodes
                .iter()
                .find(|(_, node)| matches(node))
                .map(|(id, _)| *id),
        }
    }

    pub fn create_node(&mut self, undo: &mut UndoLog, node: MemNode) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        undo.nodes.entry(id).or_insert(None);
        self.index(id, &node);
        self.nodes.insert(id, node);
        id
    }

    /// Applies `update` to the node `id`. Keeps the property index up to date.
    pub fn update_node<T>(
        &mut self,
        undo: &mut UndoLog,
        id: NodeId,
        update: impl FnOnce(&mut MemNode) -> T,
    ) -> Result<T, StorageError> {
        let Some(mut node) = self.nodes.remove(&id) else {
            return Err(StorageError::UnknownElement(id.to_string()));
        };
        undo.nodes.entry(id).or_insert_with(|| Some(node.clone()));
        self.unindex(id, &node);
        let result = update(&mut node);
        self.index(id, &node);
        self.nodes.insert(id, node);
        Ok(result)
    }

    pub fn delete_node(&mut self, undo: &mut UndoLog, id: NodeId) -> Result<bool, StorageError> {
        let Some(node) = self.nodes.get(&id) else {
            return Ok(false);
        };
        if !node.relationships.is_empty() {
            return Err(StorageError::Other(
                format!("Cannot delete {id}, it still has relationships").into(),
            ));
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.unindex(id, &node);
            undo.nodes.entry(id).or_insert(Some(node));
        }
        Ok(true)
    }

    pub fn create_relationship(
        &mut self,
        undo: &mut UndoLog,
        start: NodeId,
        rel_type: &str,
        end: NodeId,
    ) -> Result<RelationshipId, StorageError> {
        self.node(start)?;
        self.node(end)?;
        let id = RelationshipId::new(self.next_relationship_id);
        self.next_relationship_id += 1;
        undo.relationships.entry(id).or_insert(None);
        self.relationships.insert(
            id,
            Relationship {
                id,
                start,
                end,
                rel_type: rel_type.to_owned(),
            },
        );
        self.update_node(undo, start, |node| node.relationships.insert(id))?;
        self.update_node(undo, end, |node| node.relationships.insert(id))?;
        Ok(id)
    }

    pub fn delete_relationship(
        &mut self,
        undo: &mut UndoLog,
        id: RelationshipId,
    ) -> Result<bool, StorageError> {
        let Some(relationship) = self.relationships.remove(&id) else {
            return Ok(false);
        };
        let (start, end) = (relationship.start, relationship.end);
        undo.relationships.entry(id).or_insert(Some(relationship));
        self.update_node(undo, start, |node| node.relationships.remove(&id))?;
        self.update_node(undo, end, |node| node.relationships.remove(&id))?;
        Ok(true)
    }

    /// Returns the relationships of `node` matching `rel_type` and `direction`.
    pub fn relationships_of<'a>(
        &'a self,
        node: NodeId,
        rel_type: Option<&'a str>,
        direction: Direction,
    ) -> Result<impl Iterator<Item = &'a Relationship> + 'a, StorageError> {
        Ok(self
            .node(node)?
            .relationships
            .iter()
            .filter_map(move |id| self.relationships.get(id))
            .filter(move |rel| {
                direction.matches(node, rel) && rel_type.map_or(true, |t| rel.rel_type == t)
            }))
    }

    fn index(&mut self, id: NodeId, node: &MemNode) {
        for (key, value) in Self::indexed_properties(node) {
            self.string_index.entry((key, value)).or_default().insert(id);
        }
    }

    fn unindex(&mut self, id: NodeId, node: &MemNode) {
        for entry in Self::indexed_properties(node) {
            if let Some(ids) = self.string_index.get_mut(&entry) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.string_index.remove(&entry);
                }
            }
        }
    }

    fn indexed_properties(node: &MemNode) -> impl Iterator<Item = (String, String)> + '_ {
        node.properties.iter().filter_map(|(key, value)| match value {
            PropertyValue::Scalar(TypedValue::String(value)) => Some((key.clone(), value.clone())),
            _ => None,
        })
    }
}
