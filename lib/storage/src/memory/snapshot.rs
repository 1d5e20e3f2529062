use crate::memory::graph::{MemGraph, MemNode};
use rdf_lpg_common::{NodeId, Relationship};
use rdf_lpg_model::vocab::lpg;
use rdf_lpg_model::{PropertyValue, TypedValue};
use std::collections::{BTreeMap, BTreeSet};

/// A read-only copy of a [MemGraphStore](super::MemGraphStore).
#[derive(Clone, Debug)]
pub struct MemGraphSnapshot {
    graph: MemGraph,
}

/// A node of a [MemGraphSnapshot].
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub labels: BTreeSet<String>,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl NodeView {
    fn new(id: NodeId, node: &MemNode) -> Self {
        Self {
            id,
            labels: node.labels.clone(),
            properties: node.properties.clone(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Returns the stable identifier of the resource this node stands for.
    pub fn uri(&self) -> Option<&str> {
        self.property(lpg::URI)
            .and_then(PropertyValue::as_scalar)
            .and_then(TypedValue::as_str)
    }
}

impl MemGraphSnapshot {
    pub(super) fn new(graph: MemGraph) -> Self {
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes().count()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.relationships().count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn nodes(&self) -> Vec<NodeView> {
        self.graph
            .nodes()
            .map(|(id, node)| NodeView::new(id, node))
            .collect()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeView> {
        self.graph.node(id).ok().map(|node| NodeView::new(id, node))
    }

    /// Finds the resource node with the given `uri`.
    pub fn find_by_uri(&self, uri: &str) -> Option<NodeView> {
        let id = self
            .graph
            .find_node(lpg::RESOURCE, lpg::URI, &TypedValue::from(uri))?;
        self.node(id)
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.graph.relationships().cloned().collect()
    }

    /// Returns all relationships as `(start uri, type, end uri)`, ordered.
    pub fn relationship_triples(&self) -> BTreeSet<(String, String, String)> {
        let uri = |id: NodeId| {
            self.node(id)
                .and_then(|node| node.uri().map(ToOwned::to_owned))
                .unwrap_or_else(|| id.to_string())
        };
        self.graph
            .relationships()
            .map(|rel| (uri(rel.start), rel.rel_type.clone(), uri(rel.end)))
            .collect()
    }
}
