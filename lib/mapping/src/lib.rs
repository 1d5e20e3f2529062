//! Maps a stream of RDF triples onto labeled property graph elements.
//!
//! The entry point is the [StatementAccumulator], which classifies triples under a
//! [MappingPolicy] and hands periodic batches to a [BatchCommitter].

mod accumulator;
mod classify;
mod coercion;
pub mod error;
mod namespaces;
mod policy;
mod resolver;
mod staged;

pub use accumulator::{BatchCommitter, StatementAccumulator, TripleCounters};
pub use classify::{classify_triple, resource_key, Classification, StatementSink};
pub use coercion::coerce_literal;
pub use namespaces::{split_iri, NamespacePrefixRegistry};
pub use policy::{
    CommitBatchSize, MappingPolicy, MultivalHandling, RdfTypeHandling, UriHandling,
    DEFAULT_COMMIT_SIZE, DEFAULT_NODE_CACHE_SIZE,
};
pub use resolver::{UriResolver, VocabularyMappings};
pub use staged::{RelationshipCandidate, StagedBuffer, StagedResource};
