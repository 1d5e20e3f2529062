use crate::error::StorageError;
use async_trait::async_trait;
use rdf_lpg_model::{PropertyValue, TypedValue};
use std::fmt::{Display, Formatter};

/// A handle to a node of a [GraphStore].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// A handle to a relationship of a [GraphStore].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipId(u64);

impl RelationshipId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for RelationshipId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "relationship {}", self.0)
    }
}

/// A directed, typed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Relationship {
    pub id: RelationshipId,
    pub start: NodeId,
    pub end: NodeId,
    pub rel_type: String,
}

/// The direction of relationships relative to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    /// Returns whether `relationship` is attached to `node` in this direction.
    pub fn matches(self, node: NodeId, relationship: &Relationship) -> bool {
        match self {
            Direction::Outgoing => relationship.start == node,
            Direction::Incoming => relationship.end == node,
            Direction::Both => relationship.start == node || relationship.end == node,
        }
    }
}

/// A labeled property graph that receives the result of a mapping job.
///
/// All mutations happen inside a [GraphTransaction]. A transaction that is dropped without being
/// committed leaves the graph untouched.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Starts a new transaction. Writers are serialized; the returned transaction observes its
    /// own writes.
    async fn begin(&self) -> Result<Box<dyn GraphTransaction>, StorageError>;
}

/// A unit of work against a [GraphStore].
#[async_trait]
pub trait GraphTransaction: Send {
    /// Finds a node carrying `label` whose property `key` equals `value`.
    async fn find_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<Option<NodeId>, StorageError>;

    /// Returns the node carrying `label` with `key = value`, creating it if it does not exist.
    async fn merge_node(
        &mut self,
        label: &str,
        key: &str,
        value: &TypedValue,
    ) -> Result<NodeId, StorageError>;

    /// Returns the labels of `node`.
    async fn labels(&mut self, node: NodeId) -> Result<Vec<String>, StorageError>;

    /// Adds `label` to `node`. Returns `false` if the label was already present.
    async fn add_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError>;

    /// Removes `label` from `node`. Returns `false` if the label was not present.
    async fn remove_label(&mut self, node: NodeId, label: &str) -> Result<bool, StorageError>;

    /// Returns the value of the property `key` of `node`.
    async fn property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError>;

    /// Returns the keys of all properties of `node`.
    async fn property_keys(&mut self, node: NodeId) -> Result<Vec<String>, StorageError>;

    /// Sets the property `key` of `node`, replacing any previous value.
    async fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), StorageError>;

    /// Removes the property `key` from `node` and returns its previous value.
    async fn remove_property(
        &mut self,
        node: NodeId,
        key: &str,
    ) -> Result<Option<PropertyValue>, StorageError>;

    /// Returns the relationship `start -[rel_type]-> end`, creating it if it does not exist.
    async fn merge_relationship(
        &mut self,
        start: NodeId,
        rel_type: &str,
        end: NodeId,
    ) -> Result<RelationshipId, StorageError>;

    /// Returns the relationships of `node` in `direction`, optionally restricted to `rel_type`.
    async fn relationships(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Relationship>, StorageError>;

    /// Returns the number of relationships of `node` in `direction`, optionally restricted to
    /// `rel_type`.
    async fn degree(
        &mut self,
        node: NodeId,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<usize, StorageError>;

    /// Deletes a relationship. Returns `false` if it did not exist.
    async fn delete_relationship(&mut self, relationship: RelationshipId)
        -> Result<bool, StorageError>;

    /// Deletes a node without relationships. Returns `false` if it did not exist.
    ///
    /// Deleting a node that still has relationships is an error.
    async fn delete_node(&mut self, node: NodeId) -> Result<bool, StorageError>;

    /// Makes all changes of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;
}
