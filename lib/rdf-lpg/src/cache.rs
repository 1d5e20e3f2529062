//! Locating the nodes of resources while deleting.

use lru::LruCache;
use rdf_lpg_common::error::StorageError;
use rdf_lpg_common::{GraphTransaction, NodeId};
use rdf_lpg_mapping::resource_key;
use rdf_lpg_model::vocab::lpg;
use rdf_lpg_model::{NamedOrBlankNodeRef, TypedValue};
use std::num::NonZeroUsize;

/// The result of locating the node of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeResolution {
    Found(NodeId),
    /// No node exists for the resource.
    NotFound,
    /// The resource is a blank node, which has no stable identifier to look up.
    Unresolved,
}

/// A bounded, least-recently-used cache from resource identifiers to nodes.
///
/// Absent nodes are cached as well, so each resource is looked up at most once while it stays in
/// the cache.
pub struct NodeCache {
    entries: LruCache<String, Option<NodeId>>,
}

impl NodeCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Locates the node of `resource`, asking `transaction` on a cache miss.
    pub async fn resolve(
        &mut self,
        transaction: &mut dyn GraphTransaction,
        resource: NamedOrBlankNodeRef<'_>,
    ) -> Result<NodeResolution, StorageError> {
        if resource.is_blank_node() {
            return Ok(NodeResolution::Unresolved);
        }
        let key = resource_key(resource);
        let node = match self.entries.get(&key) {
            Some(node) => *node,
            None => {
                let node = transaction
                    .find_node(lpg::RESOURCE, lpg::URI, &TypedValue::String(key.clone()))
                    .await?;
                self.entries.put(key, node);
                node
            }
        };
        Ok(node.map_or(NodeResolution::NotFound, NodeResolution::Found))
    }

    /// Records that the node of `resource` has been deleted.
    pub fn invalidate(&mut self, resource: NamedOrBlankNodeRef<'_>) {
        self.entries.put(resource_key(resource), None);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
