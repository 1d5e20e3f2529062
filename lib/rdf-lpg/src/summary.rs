//! The results of the jobs.

use rdf_lpg_mapping::TripleCounters;
use serde::Serialize;
use std::collections::BTreeMap;

/// The outcome of an import job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub triples_parsed: u64,
    pub triples_mapped: u64,
    /// All namespace definitions known at the end of the job, from prefix to namespace.
    pub namespaces: BTreeMap<String, String>,
}

impl ImportSummary {
    pub(crate) fn new(counters: TripleCounters, namespaces: BTreeMap<String, String>) -> Self {
        Self {
            triples_parsed: counters.triples_parsed,
            triples_mapped: counters.triples_mapped,
            namespaces,
        }
    }
}

/// The outcome of a deletion job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub triples_parsed: u64,
    pub triples_mapped: u64,
    /// The mapped statements that were not found in the graph or could not be located at all.
    pub not_deleted: u64,
    /// A note on statements that could not be deleted because they contain a blank node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    pub namespaces: BTreeMap<String, String>,
}

impl DeleteSummary {
    /// Returns the number of statements that were actually removed from the graph.
    pub fn triples_deleted(&self) -> u64 {
        self.triples_mapped.saturating_sub(self.not_deleted)
    }
}
