use crate::error::MappingError;
use crate::namespaces::{split_iri, NamespacePrefixRegistry};
use crate::policy::UriHandling;
use rdf_lpg_model::vocab::{lpg, rdf};
use rdf_lpg_model::{ElementKind, NamedNodeRef};
use rustc_hash::FxHashMap;
use tracing::warn;

/// An externally supplied table mapping full IRIs to graph names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VocabularyMappings {
    mappings: FxHashMap<String, String>,
}

impl VocabularyMappings {
    /// Creates the table from `(IRI, name)` pairs.
    ///
    /// A mapping on `rdf:type` is not applicable when importing RDF. It is dropped with a warning.
    pub fn new<I>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut mappings = mappings.into_iter().collect::<FxHashMap<_, _>>();
        if mappings.remove(rdf::TYPE.as_str()).is_some() {
            warn!("Mapping on rdf:type property is not applicable in RDF import and will be discarded");
        }
        Self { mappings }
    }

    pub fn get(&self, iri: &str) -> Option<&str> {
        self.mappings.get(iri).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Turns IRIs into graph-safe names for labels, relationship types, property keys, and datatypes.
///
/// The result only depends on the input and the namespace registry. The registry only grows (in
/// [UriHandling::Shorten] mode), hence the same IRI always resolves to the same name within a job.
#[derive(Clone, Debug)]
pub struct UriResolver {
    handling: UriHandling,
    apply_naming_convention: bool,
    namespaces: NamespacePrefixRegistry,
    mappings: VocabularyMappings,
}

impl UriResolver {
    pub fn new(
        handling: UriHandling,
        apply_naming_convention: bool,
        namespaces: NamespacePrefixRegistry,
        mappings: VocabularyMappings,
    ) -> Self {
        Self {
            handling,
            apply_naming_convention,
            namespaces,
            mappings,
        }
    }

    pub fn handling(&self) -> UriHandling {
        self.handling
    }

    pub fn namespaces(&self) -> &NamespacePrefixRegistry {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespacePrefixRegistry {
        &mut self.namespaces
    }

    /// Resolves `iri` to the name of a graph element of the given `kind`.
    pub fn resolve(
        &mut self,
        iri: NamedNodeRef<'_>,
        kind: ElementKind,
    ) -> Result<String, MappingError> {
        match self.handling {
            UriHandling::Shorten | UriHandling::ShortenStrict => {
                let (namespace, local_name) = split_iri(iri.as_str());
                let strict = self.handling == UriHandling::ShortenStrict;
                let prefix = self.namespaces.get_prefix_or_add(namespace, strict)?;
                Ok(format!("{prefix}{}{local_name}", lpg::PREFIX_SEPARATOR))
            }
            UriHandling::Ignore => Ok(self.local_name(iri.as_str(), kind)),
            UriHandling::Map => Ok(match self.mappings.get(iri.as_str()) {
                Some(name) => name.to_owned(),
                None => self.local_name(iri.as_str(), kind),
            }),
            UriHandling::Keep => Ok(iri.as_str().to_owned()),
        }
    }

    fn local_name(&self, iri: &str, kind: ElementKind) -> String {
        let (_, local_name) = split_iri(iri);
        if self.apply_naming_convention {
            apply_naming_convention(local_name, kind)
        } else {
            local_name.to_owned()
        }
    }
}

fn apply_naming_convention(name: &str, kind: ElementKind) -> String {
    let mut chars = name.chars();
    match (kind, chars.next()) {
        (ElementKind::Relationship, _) => name.to_uppercase(),
        (ElementKind::Label, Some(first)) => first.to_uppercase().chain(chars).collect(),
        (ElementKind::Property, Some(first)) => first.to_lowercase().chain(chars).collect(),
        _ => name.to_owned(),
    }
}
