use oxrdfio::RdfParseError;
use rdf_lpg_common::error::StorageError;
use rdf_lpg_mapping::error::MappingError;
use rdf_lpg_model::IriParseError;
use std::io;

/// An error raised while running an import, deletion, or preview job.
///
/// Every variant is fatal: the job stops at the first error. Batches committed before the error
/// are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// An error raised while reading the RDF document.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    /// An error raised by the graph store, e.g. while committing a batch.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A triple could not be mapped onto the property graph.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// The base IRI is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        /// The IRI itself.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

impl From<JobError> for io::Error {
    #[inline]
    fn from(error: JobError) -> Self {
        match error {
            JobError::Storage(error) => error.into(),
            JobError::Parsing(error) => error.into(),
            JobError::Mapping(_) => Self::new(io::ErrorKind::InvalidData, error.to_string()),
            JobError::InvalidBaseIri { .. } => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
        }
    }
}
