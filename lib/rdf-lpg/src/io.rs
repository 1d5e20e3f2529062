//! Reading triples from RDF documents.

use crate::error::JobError;
use rdf_lpg_model::Triple;
use std::io::Read;

pub use oxrdfio::{RdfFormat, RdfParser};

/// Creates a parser for `format`, resolving relative IRIs against `base_iri` if given.
pub fn parser(format: RdfFormat, base_iri: Option<&str>) -> Result<RdfParser, JobError> {
    let parser = RdfParser::from_format(format);
    match base_iri {
        Some(iri) => parser
            .with_base_iri(iri)
            .map_err(|error| JobError::InvalidBaseIri {
                iri: iri.to_owned(),
                error,
            }),
        None => Ok(parser),
    }
}

/// Returns the triples of the document in `reader`.
///
/// Quads in named graphs are read as triples of the default graph.
pub fn triples_from_reader<R: Read>(
    parser: impl Into<RdfParser>,
    reader: R,
) -> impl Iterator<Item = Result<Triple, JobError>> {
    parser
        .into()
        .for_reader(reader)
        .map(|quad| quad.map(Triple::from).map_err(JobError::from))
}
