//! Mapping triples into an in-memory graph without writing them anywhere.

use crate::error::JobError;
use crate::job;
use async_trait::async_trait;
use oxrdfio::RdfParser;
use rdf_lpg_common::MappingStore;
use rdf_lpg_mapping::error::MappingError;
use rdf_lpg_mapping::{
    resource_key, BatchCommitter, CommitBatchSize, MappingPolicy, NamespacePrefixRegistry,
    StagedBuffer, StatementAccumulator, TripleCounters, UriResolver, VocabularyMappings,
};
use rdf_lpg_model::vocab::lpg;
use rdf_lpg_model::{PropertyValue, Triple, TypedValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

/// A node of a [PreviewGraph].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreviewNode {
    pub labels: BTreeSet<String>,
    pub properties: BTreeMap<String, PropertyValue>,
}

/// A relationship of a [PreviewGraph], between the identifiers of its endpoints.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRelationship {
    pub start: String,
    pub rel_type: String,
    pub end: String,
}

/// The nodes and relationships an import would create in an empty graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewGraph {
    /// The nodes by their identifier.
    pub nodes: BTreeMap<String, PreviewNode>,
    pub relationships: BTreeSet<PreviewRelationship>,
    pub triples_parsed: u64,
    pub triples_mapped: u64,
    pub namespaces: BTreeMap<String, String>,
}

impl PreviewGraph {
    pub fn node(&self, uri: &str) -> Option<&PreviewNode> {
        self.nodes.get(uri)
    }

    fn add_batch(&mut self, batch: &StagedBuffer) -> Result<(), MappingError> {
        for (resource, staged) in batch.resources() {
            let node = self.node_mut(resource_key(resource.as_ref()));
            node.labels.extend(staged.labels.iter().cloned());
            for (key, value) in &staged.properties {
                match (node.properties.get_mut(key), value) {
                    (Some(stored), PropertyValue::Array(values)) => {
                        for value in values {
                            stored.push(value.clone()).map_err(|source| {
                                MappingError::MixedArrayTypes {
                                    property: key.clone(),
                                    source,
                                }
                            })?;
                        }
                    }
                    _ => {
                        node.properties.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        for candidate in batch.relationships() {
            let Some((start, end)) = candidate.endpoints() else {
                continue;
            };
            let (start, end) = (resource_key(start), resource_key(end));
            self.node_mut(start.clone());
            self.node_mut(end.clone());
            self.relationships.insert(PreviewRelationship {
                start,
                rel_type: candidate.rel_type.clone(),
                end,
            });
        }
        Ok(())
    }

    fn node_mut(&mut self, uri: String) -> &mut PreviewNode {
        self.nodes.entry(uri).or_insert_with_key(|uri| PreviewNode {
            labels: BTreeSet::from([lpg::RESOURCE.to_owned()]),
            properties: BTreeMap::from([(
                lpg::URI.to_owned(),
                PropertyValue::Scalar(TypedValue::String(uri.clone())),
            )]),
        })
    }
}

/// Maps RDF into a [PreviewGraph].
///
/// The whole document is staged in a single batch, regardless of the commit size of the policy.
pub struct Previewer {
    policy: MappingPolicy,
    resolver: UriResolver,
}

impl Previewer {
    /// Creates a previewer that starts without any namespace definitions.
    pub fn new(policy: MappingPolicy) -> Self {
        let resolver = UriResolver::new(
            policy.uri_handling,
            policy.apply_naming_convention,
            NamespacePrefixRegistry::new(),
            VocabularyMappings::default(),
        );
        Self::with_resolver(policy, resolver)
    }

    /// Creates a previewer that uses the namespace definitions and mappings of `store`.
    ///
    /// Nothing is written to `store`.
    pub async fn load(store: &impl MappingStore, policy: MappingPolicy) -> Result<Self, JobError> {
        let resolver = job::load_resolver(store, &policy).await?;
        Ok(Self::with_resolver(policy, resolver))
    }

    fn with_resolver(policy: MappingPolicy, resolver: UriResolver) -> Self {
        Self {
            policy: policy.with_commit_batch_size(CommitBatchSize::Unbounded),
            resolver,
        }
    }

    /// Previews the document in `reader`.
    pub async fn preview_from_reader(
        self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
    ) -> Result<PreviewGraph, JobError> {
        self.run(crate::io::triples_from_reader(parser, reader))
            .await
    }

    /// Previews `triples`.
    pub async fn preview_triples(
        self,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<PreviewGraph, JobError> {
        self.run(triples.into_iter().map(Ok)).await
    }

    async fn run(
        self,
        triples: impl IntoIterator<Item = Result<Triple, JobError>>,
    ) -> Result<PreviewGraph, JobError> {
        let mut accumulator = StatementAccumulator::new(self.policy, self.resolver);
        let mut collector = PreviewCollector::default();
        let counters = job::run(&mut accumulator, &mut collector, triples).await?;
        let mut graph = collector.graph;
        graph.triples_parsed = counters.triples_parsed;
        graph.triples_mapped = counters.triples_mapped;
        graph.namespaces = accumulator.resolver().namespaces().to_prefix_map();
        Ok(graph)
    }
}

#[derive(Default)]
struct PreviewCollector {
    graph: PreviewGraph,
}

#[async_trait]
impl BatchCommitter for PreviewCollector {
    type Error = JobError;

    async fn commit(
        &mut self,
        batch: &StagedBuffer,
        _namespaces: &NamespacePrefixRegistry,
        _counters: &TripleCounters,
    ) -> Result<(), JobError> {
        Ok(self.graph.add_batch(batch)?)
    }
}
