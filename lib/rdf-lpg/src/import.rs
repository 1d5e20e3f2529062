//! Writing triples into a property graph.

use crate::error::JobError;
use crate::job;
use crate::summary::ImportSummary;
use async_trait::async_trait;
use oxrdfio::RdfParser;
use rdf_lpg_common::{GraphStore, GraphTransaction, MappingStore, NodeId};
use rdf_lpg_mapping::error::MappingError;
use rdf_lpg_mapping::{
    resource_key, BatchCommitter, MappingPolicy, NamespacePrefixRegistry, StagedBuffer,
    StatementAccumulator, TripleCounters,
};
use rdf_lpg_model::vocab::lpg;
use rdf_lpg_model::{NamedOrBlankNodeRef, PropertyValue, Triple, TypedValue};
use rustc_hash::FxHashMap;
use std::io::Read;
use tracing::info;

/// Imports RDF into a graph store.
///
/// Usage example:
/// ```
/// use rdf_lpg::import::Importer;
/// use rdf_lpg::io::RdfFormat;
/// use rdf_lpg::mapping::{MappingPolicy, UriHandling};
/// use rdf_lpg::storage::memory::MemGraphStore;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = MemGraphStore::new();
/// let policy = MappingPolicy::default().with_uri_handling(UriHandling::Ignore);
/// let data = r#"<http://example.com/ann> <http://example.com/name> "Ann" ."#;
/// let summary = Importer::new(&store, policy)
///     .import_from_reader(RdfFormat::NTriples, data.as_bytes())
///     .await?;
/// assert_eq!(summary.triples_mapped, 1);
///
/// let snapshot = store.snapshot().await;
/// let ann = snapshot.find_by_uri("http://example.com/ann").unwrap();
/// assert_eq!(ann.property("name").unwrap().values()[0].as_str(), Some("Ann"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
pub struct Importer<'a, S> {
    store: &'a S,
    policy: MappingPolicy,
}

impl<'a, S: GraphStore + MappingStore> Importer<'a, S> {
    pub fn new(store: &'a S, policy: MappingPolicy) -> Self {
        Self { store, policy }
    }

    /// Imports the document in `reader`.
    pub async fn import_from_reader(
        &self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
    ) -> Result<ImportSummary, JobError> {
        self.run(crate::io::triples_from_reader(parser, reader))
            .await
    }

    /// Imports `triples`.
    pub async fn import_triples(
        &self,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<ImportSummary, JobError> {
        self.run(triples.into_iter().map(Ok)).await
    }

    async fn run(
        &self,
        triples: impl IntoIterator<Item = Result<Triple, JobError>>,
    ) -> Result<ImportSummary, JobError> {
        let resolver = job::load_resolver(self.store, &self.policy).await?;
        let mut accumulator = StatementAccumulator::new(self.policy.clone(), resolver);
        let mut loader = DirectStatementLoader::new(self.store);
        let counters = job::run(&mut accumulator, &mut loader, triples).await?;
        job::save_namespaces(
            self.store,
            accumulator.resolver().namespaces(),
            &mut loader.saved_namespaces,
        )
        .await?;
        info!(
            "Import finished. {} triples mapped out of {} parsed.",
            counters.triples_mapped, counters.triples_parsed
        );
        Ok(ImportSummary::new(
            counters,
            accumulator.resolver().namespaces().to_prefix_map(),
        ))
    }
}

/// Writes each staged batch into a graph store within a single transaction.
///
/// Nodes are merged on their identifier, relationships on their endpoints and type. Staged arrays
/// are appended to the values already stored on the node.
///
/// The prefixes allocated for a batch are persisted while its transaction is open. If another job
/// bound one of them to a different namespace in the meantime, the batch is rolled back and the
/// job fails with a conflict.
pub struct DirectStatementLoader<'a, S> {
    store: &'a S,
    saved_namespaces: usize,
}

impl<'a, S: GraphStore + MappingStore> DirectStatementLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            saved_namespaces: 0,
        }
    }
}

#[async_trait]
impl<S: GraphStore + MappingStore> BatchCommitter for DirectStatementLoader<'_, S> {
    type Error = JobError;

    async fn commit(
        &mut self,
        batch: &StagedBuffer,
        namespaces: &NamespacePrefixRegistry,
        counters: &TripleCounters,
    ) -> Result<(), JobError> {
        let mut transaction = self.store.begin().await?;
        let mut nodes = FxHashMap::default();

        for (resource, staged) in batch.resources() {
            let node = merge_resource(transaction.as_mut(), &mut nodes, resource.as_ref()).await?;
            for label in &staged.labels {
                transaction.add_label(node, label).await?;
            }
            for (key, value) in &staged.properties {
                let value = match value {
                    PropertyValue::Array(values) => {
                        append_to_stored(transaction.as_mut(), node, key, values).await?
                    }
                    PropertyValue::Scalar(_) => value.clone(),
                };
                transaction.set_property(node, key, value).await?;
            }
        }

        for candidate in batch.relationships() {
            let Some((start, end)) = candidate.endpoints() else {
                continue;
            };
            let start = merge_resource(transaction.as_mut(), &mut nodes, start).await?;
            let end = merge_resource(transaction.as_mut(), &mut nodes, end).await?;
            transaction
                .merge_relationship(start, &candidate.rel_type, end)
                .await?;
        }

        job::save_namespaces(self.store, namespaces, &mut self.saved_namespaces).await?;
        transaction.commit().await?;
        info!(
            "Successful partial commit of {} triples. {} triples ingested so far...",
            counters.batch_triples_mapped, counters.triples_mapped
        );
        Ok(())
    }
}

async fn merge_resource(
    transaction: &mut dyn GraphTransaction,
    nodes: &mut FxHashMap<String, NodeId>,
    resource: NamedOrBlankNodeRef<'_>,
) -> Result<NodeId, JobError> {
    let key = resource_key(resource);
    if let Some(node) = nodes.get(&key) {
        return Ok(*node);
    }
    let node = transaction
        .merge_node(lpg::RESOURCE, lpg::URI, &TypedValue::String(key.clone()))
        .await?;
    nodes.insert(key, node);
    Ok(node)
}

/// Returns the stored value of `key` with `values` appended.
async fn append_to_stored(
    transaction: &mut dyn GraphTransaction,
    node: NodeId,
    key: &str,
    values: &[TypedValue],
) -> Result<PropertyValue, JobError> {
    let Some(mut stored) = transaction.property(node, key).await? else {
        return Ok(PropertyValue::Array(values.to_vec()));
    };
    for value in values {
        stored
            .push(value.clone())
            .map_err(|source| MappingError::MixedArrayTypes {
                property: key.to_owned(),
                source,
            })?;
    }
    Ok(stored)
}
