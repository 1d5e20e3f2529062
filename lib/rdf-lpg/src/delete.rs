//! Removing previously imported triples from a property graph.

use crate::cache::{NodeCache, NodeResolution};
use crate::error::JobError;
use crate::job;
use crate::summary::DeleteSummary;
use async_trait::async_trait;
use oxrdfio::RdfParser;
use rdf_lpg_common::{Direction, GraphStore, GraphTransaction, MappingStore, NodeId};
use rdf_lpg_mapping::{
    BatchCommitter, MappingPolicy, NamespacePrefixRegistry, RelationshipCandidate, StagedBuffer,
    StagedResource, StatementAccumulator, TripleCounters,
};
use rdf_lpg_model::vocab::lpg;
use rdf_lpg_model::{NamedOrBlankNodeRef, PropertyValue, Triple, TypedValue};
use std::io::Read;
use tracing::{info, warn};

/// Deletes RDF from a graph store.
///
/// The triples must be mapped with the same policy (and namespace definitions) that was used when
/// importing them, such that they resolve to the same labels, property keys, and relationship
/// types.
pub struct Deleter<'a, S> {
    store: &'a S,
    policy: MappingPolicy,
}

impl<'a, S: GraphStore + MappingStore> Deleter<'a, S> {
    pub fn new(store: &'a S, policy: MappingPolicy) -> Self {
        Self { store, policy }
    }

    /// Deletes the triples of the document in `reader`.
    pub async fn delete_from_reader(
        &self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
    ) -> Result<DeleteSummary, JobError> {
        self.run(crate::io::triples_from_reader(parser, reader))
            .await
    }

    /// Deletes `triples`.
    pub async fn delete_triples(
        &self,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<DeleteSummary, JobError> {
        self.run(triples.into_iter().map(Ok)).await
    }

    async fn run(
        &self,
        triples: impl IntoIterator<Item = Result<Triple, JobError>>,
    ) -> Result<DeleteSummary, JobError> {
        let resolver = job::load_resolver(self.store, &self.policy).await?;
        let cache = NodeCache::new(self.policy.node_cache_size);
        let mut engine = DeletionEngine::new(self.store, cache);
        let mut accumulator = StatementAccumulator::new(self.policy.clone(), resolver);
        let counters = job::run(&mut accumulator, &mut engine, triples).await?;
        info!(
            "Deletion finished. {} triples deleted out of {} parsed.",
            counters.triples_mapped.saturating_sub(engine.not_deleted()),
            counters.triples_parsed
        );
        Ok(DeleteSummary {
            triples_parsed: counters.triples_parsed,
            triples_mapped: counters.triples_mapped,
            not_deleted: engine.not_deleted(),
            extra_info: engine.extra_info(),
            namespaces: accumulator.resolver().namespaces().to_prefix_map(),
        })
    }
}

/// Removes each staged batch from a graph store within a single transaction.
///
/// For every staged resource, its labels and property values are removed from its node. Array
/// values are removed one occurrence at a time and the remaining values keep their order. Every
/// staged relationship is deleted, after which endpoints that have no relationship and no
/// property besides their identifier left are deleted as well. Nodes are only checked right after
/// one of their relationships is deleted, so a node whose last property is removed in a later
/// batch than its last relationship stays in the graph.
///
/// Statements that cannot be found in the graph are counted as not deleted. This includes every
/// statement about a blank node, as blank nodes cannot be located across jobs.
pub struct DeletionEngine<'a, S> {
    store: &'a S,
    cache: NodeCache,
    not_deleted: u64,
    blank_node_statements: u64,
}

impl<'a, S: GraphStore> DeletionEngine<'a, S> {
    pub fn new(store: &'a S, cache: NodeCache) -> Self {
        Self {
            store,
            cache,
            not_deleted: 0,
            blank_node_statements: 0,
        }
    }

    /// The number of statements that could not be deleted so far.
    pub fn not_deleted(&self) -> u64 {
        self.not_deleted
    }

    /// A note on the statements that could not be deleted because they contain a blank node.
    pub fn extra_info(&self) -> Option<String> {
        (self.blank_node_statements > 0).then(|| {
            format!(
                "{} of the statements could not be deleted, due to containing a blank node.",
                self.blank_node_statements
            )
        })
    }

    fn skip(&mut self, statements: usize, blank_node: bool) {
        let statements = u64::try_from(statements).unwrap_or(u64::MAX);
        self.not_deleted = self.not_deleted.saturating_add(statements);
        if blank_node {
            self.blank_node_statements = self.blank_node_statements.saturating_add(statements);
        }
    }

    async fn delete_resource(
        &mut self,
        transaction: &mut dyn GraphTransaction,
        resource: NamedOrBlankNodeRef<'_>,
        staged: &StagedResource,
    ) -> Result<(), JobError> {
        let statements = staged.statement_count();
        if statements == 0 {
            return Ok(());
        }
        let node = match self.cache.resolve(transaction, resource).await? {
            NodeResolution::Found(node) => node,
            NodeResolution::NotFound => {
                self.skip(statements, false);
                return Ok(());
            }
            NodeResolution::Unresolved => {
                self.skip(statements, true);
                return Ok(());
            }
        };

        for label in &staged.labels {
            if !transaction.remove_label(node, label).await? {
                self.skip(1, false);
            }
        }

        for (key, value) in &staged.properties {
            match value {
                PropertyValue::Scalar(_) => {
                    transaction.remove_property(node, key).await?;
                }
                PropertyValue::Array(values) => {
                    let stored = transaction.property(node, key).await?;
                    let Some(stored) = stored else {
                        self.skip(values.len(), false);
                        continue;
                    };
                    let (remaining, missing) = subtract(stored.values(), values);
                    self.skip(missing, false);
                    if remaining.is_empty() {
                        transaction.remove_property(node, key).await?;
                    } else if remaining.len() != stored.values().len() {
                        transaction
                            .set_property(node, key, PropertyValue::Array(remaining))
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_relationship(
        &mut self,
        transaction: &mut dyn GraphTransaction,
        candidate: &RelationshipCandidate,
    ) -> Result<(), JobError> {
        let Some((start_resource, end_resource)) = candidate.endpoints() else {
            self.skip(1, false);
            return Ok(());
        };
        let start = self.cache.resolve(transaction, start_resource).await?;
        let end = self.cache.resolve(transaction, end_resource).await?;
        let (start, end) = match (start, end) {
            (NodeResolution::Found(start), NodeResolution::Found(end)) => (start, end),
            (NodeResolution::Unresolved, _) | (_, NodeResolution::Unresolved) => {
                self.skip(1, true);
                return Ok(());
            }
            _ => {
                self.skip(1, false);
                return Ok(());
            }
        };

        let rel_type = Some(candidate.rel_type.as_str());
        let outgoing = transaction.degree(start, rel_type, Direction::Outgoing).await?;
        let incoming = transaction.degree(end, rel_type, Direction::Incoming).await?;
        let relationship = if outgoing < incoming {
            transaction
                .relationships(start, rel_type, Direction::Outgoing)
                .await?
                .into_iter()
                .find(|rel| rel.end == end)
        } else {
            transaction
                .relationships(end, rel_type, Direction::Incoming)
                .await?
                .into_iter()
                .find(|rel| rel.start == start)
        };
        let Some(relationship) = relationship else {
            self.skip(1, false);
            return Ok(());
        };
        transaction.delete_relationship(relationship.id).await?;

        if delete_if_orphan(transaction, start).await? {
            self.cache.invalidate(start_resource);
        }
        if end != start && delete_if_orphan(transaction, end).await? {
            self.cache.invalidate(end_resource);
        }
        Ok(())
    }
}

#[async_trait]
impl<S: GraphStore> BatchCommitter for DeletionEngine<'_, S> {
    type Error = JobError;

    async fn commit(
        &mut self,
        batch: &StagedBuffer,
        _namespaces: &NamespacePrefixRegistry,
        counters: &TripleCounters,
    ) -> Result<(), JobError> {
        let mut transaction = self.store.begin().await?;
        let not_deleted_before = self.not_deleted;

        for (resource, staged) in batch.resources() {
            self.delete_resource(transaction.as_mut(), resource.as_ref(), staged)
                .await?;
        }
        for candidate in batch.relationships() {
            self.delete_relationship(transaction.as_mut(), candidate)
                .await?;
        }

        transaction.commit().await?;
        let skipped = self.not_deleted - not_deleted_before;
        if skipped > 0 {
            warn!("{skipped} statements of the batch could not be deleted");
        }
        info!(
            "Successful partial commit of {} triples. {} triples processed so far...",
            counters.batch_triples_mapped, counters.triples_mapped
        );
        Ok(())
    }
}

/// Deletes `node` if it has no relationships and no property other than its identifier.
async fn delete_if_orphan(
    transaction: &mut dyn GraphTransaction,
    node: NodeId,
) -> Result<bool, JobError> {
    if transaction.degree(node, None, Direction::Both).await? > 0 {
        return Ok(false);
    }
    let keys = transaction.property_keys(node).await?;
    if keys.len() != 1 || keys[0] != lpg::URI {
        return Ok(false);
    }
    Ok(transaction.delete_node(node).await?)
}

/// Removes one occurrence of each of `removed` from `stored`.
///
/// Returns the remaining values in their original order and the number of `removed` values that
/// were not found.
fn subtract(stored: &[TypedValue], removed: &[TypedValue]) -> (Vec<TypedValue>, usize) {
    let mut pending = removed.iter().collect::<Vec<_>>();
    let remaining = stored
        .iter()
        .filter(|value| {
            match pending.iter().position(|removed| *removed == *value) {
                Some(position) => {
                    pending.swap_remove(position);
                    false
                }
                None => true,
            }
        })
        .cloned()
        .collect();
    (remaining, pending.len())
}
