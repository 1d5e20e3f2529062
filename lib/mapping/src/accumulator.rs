use crate::classify::{classify_triple, Classification};
use crate::error::MappingError;
use crate::namespaces::NamespacePrefixRegistry;
use crate::policy::MappingPolicy;
use crate::resolver::UriResolver;
use crate::staged::StagedBuffer;
use async_trait::async_trait;
use rdf_lpg_model::Triple;

/// The progress of a mapping job.
///
/// `triples_mapped <= triples_parsed` holds at all times and both only grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TripleCounters {
    /// All triples seen so far.
    pub triples_parsed: u64,
    /// All triples staged so far, including the current batch.
    pub triples_mapped: u64,
    /// The triples staged in the current batch.
    pub batch_triples_mapped: u64,
}

impl TripleCounters {
    pub fn record(&mut self, classification: Classification) {
        self.triples_parsed += 1;
        if classification.is_mapped() {
            self.triples_mapped += 1;
            self.batch_triples_mapped += 1;
        }
    }
}

/// Consumes staged batches. Implemented by the forward import (writing the batch into a graph) and
/// the deletion (removing the batch from a graph).
#[async_trait]
pub trait BatchCommitter: Send {
    type Error: From<MappingError> + Send;

    /// Applies `batch` durably. `namespaces` hold every prefix the batch may refer to and
    /// `counters` reflect the job progress including this batch.
    async fn commit(
        &mut self,
        batch: &StagedBuffer,
        namespaces: &NamespacePrefixRegistry,
        counters: &TripleCounters,
    ) -> Result<(), Self::Error>;
}

/// Classifies triples one at a time and hands full batches to a [BatchCommitter].
///
/// A batch is flushed right after the triple that makes the number of mapped triples in the batch
/// reach the configured commit size. The staged buffer is empty after every successful flush. A
/// failed flush or triple aborts the job; later calls fail with [MappingError::Aborted].
pub struct StatementAccumulator {
    policy: MappingPolicy,
    resolver: UriResolver,
    buffer: StagedBuffer,
    counters: TripleCounters,
    aborted: bool,
}

impl StatementAccumulator {
    pub fn new(policy: MappingPolicy, resolver: UriResolver) -> Self {
        Self {
            policy,
            resolver,
            buffer: StagedBuffer::new(),
            counters: TripleCounters::default(),
            aborted: false,
        }
    }

    pub fn policy(&self) -> &MappingPolicy {
        &self.policy
    }

    pub fn resolver(&self) -> &UriResolver {
        &self.resolver
    }

    pub fn counters(&self) -> &TripleCounters {
        &self.counters
    }

    /// The triples staged since the last flush.
    pub fn buffer(&self) -> &StagedBuffer {
        &self.buffer
    }

    /// Stages `triple` and flushes the batch into `committer` if it is full.
    pub async fn handle_triple<C: BatchCommitter>(
        &mut self,
        triple: &Triple,
        committer: &mut C,
    ) -> Result<Classification, C::Error> {
        if self.aborted {
            return Err(MappingError::Aborted.into());
        }
        let classification =
            match classify_triple(&self.policy, &mut self.resolver, triple, &mut self.buffer) {
                Ok(classification) => classification,
                Err(error) => {
                    self.aborted = true;
                    return Err(error.into());
                }
            };
        self.counters.record(classification);
        if classification.is_mapped()
            && self
                .policy
                .commit_batch_size
                .is_reached(self.counters.batch_triples_mapped)
        {
            self.flush(committer).await?;
        }
        Ok(classification)
    }

    /// Flushes the remaining staged triples and returns the final counters.
    pub async fn finish<C: BatchCommitter>(
        &mut self,
        committer: &mut C,
    ) -> Result<TripleCounters, C::Error> {
        if self.aborted {
            return Err(MappingError::Aborted.into());
        }
        if !self.buffer.is_empty() {
            self.flush(committer).await?;
        }
        Ok(self.counters)
    }

    async fn flush<C: BatchCommitter>(&mut self, committer: &mut C) -> Result<(), C::Error> {
        if let Err(error) = committer
            .commit(&self.buffer, self.resolver.namespaces(), &self.counters)
            .await
        {
            self.aborted = true;
            return Err(error);
        }
        self.buffer.clear();
        self.counters.batch_triples_mapped = 0;
        Ok(())
    }
}
