use crate::error::JobError;
use rdf_lpg_common::error::{CorruptionError, StorageError};
use rdf_lpg_common::MappingStore;
use rdf_lpg_mapping::{
    BatchCommitter, MappingPolicy, NamespacePrefixRegistry, StatementAccumulator, TripleCounters,
    UriHandling, UriResolver, VocabularyMappings,
};
use rdf_lpg_model::Triple;
use tracing::debug;

/// Creates the resolver of a job from the definitions persisted in `store`.
pub(crate) async fn load_resolver<S: MappingStore>(
    store: &S,
    policy: &MappingPolicy,
) -> Result<UriResolver, JobError> {
    let definitions = store.load_namespaces().await?;
    debug!("Loaded {} namespace definitions", definitions.len());
    let namespaces = NamespacePrefixRegistry::from_definitions(definitions)
        .map_err(|msg| StorageError::from(CorruptionError::msg(msg)))?;

    let mappings = if policy.uri_handling == UriHandling::Map {
        let mappings = VocabularyMappings::new(store.load_vocabulary_mappings().await?);
        debug!("Loaded {} vocabulary mappings", mappings.len());
        mappings
    } else {
        VocabularyMappings::default()
    };

    Ok(UriResolver::new(
        policy.uri_handling,
        policy.apply_naming_convention,
        namespaces,
        mappings,
    ))
}

/// Feeds `triples` through `accumulator` into `committer` and flushes the last batch.
pub(crate) async fn run<C, I>(
    accumulator: &mut StatementAccumulator,
    committer: &mut C,
    triples: I,
) -> Result<TripleCounters, JobError>
where
    C: BatchCommitter<Error = JobError>,
    I: IntoIterator<Item = Result<Triple, JobError>>,
{
    for triple in triples {
        accumulator.handle_triple(&triple?, committer).await?;
    }
    accumulator.finish(committer).await
}

/// Persists the prefixes allocated during the job that earlier calls did not persist yet.
///
/// `saved` counts the definitions of `namespaces` that are already persisted.
pub(crate) async fn save_namespaces<S: MappingStore>(
    store: &S,
    namespaces: &NamespacePrefixRegistry,
    saved: &mut usize,
) -> Result<(), JobError> {
    let definitions = namespaces.new_definitions();
    let unsaved = definitions.get(*saved..).unwrap_or_default();
    if !unsaved.is_empty() {
        store.save_namespaces(unsaved).await?;
        debug!("Saved {} new namespace definitions", unsaved.len());
        *saved = definitions.len();
    }
    Ok(())
}
