use crate::error::MappingError;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Conventional prefixes for widely used vocabularies. They are preferred over generated
/// prefixes when they are still free.
const POPULAR_NAMESPACES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("sch", "http://schema.org/"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dct", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("sh", "http://www.w3.org/ns/shacl#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("geo", "http://www.opengis.net/ont/geosparql#"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
];

/// Splits an IRI into its namespace and local name.
///
/// The split happens after the last `#`, otherwise after the last `/`, otherwise after the last
/// `:`. IRIs without any of these have an empty namespace.
pub fn split_iri(iri: &str) -> (&str, &str) {
    let split = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .or_else(|| iri.rfind(':'))
        .map_or(0, |idx| idx + 1);
    iri.split_at(split)
}

/// A bidirectional mapping between namespaces and their short prefixes.
///
/// Prefixes are only ever added. Once a namespace is bound to a prefix, it resolves to that prefix
/// for the lifetime of the registry.
#[derive(Clone, Debug, Default)]
pub struct NamespacePrefixRegistry {
    prefix_to_namespace: FxHashMap<String, String>,
    namespace_to_prefix: FxHashMap<String, String>,
    /// Prefixes allocated since the registry was loaded, in allocation order.
    allocated: Vec<String>,
    next_generated: usize,
}

impl NamespacePrefixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from existing `(prefix, namespace)` definitions.
    ///
    /// Fails with a description of the problem if a prefix or a namespace is bound twice.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut registry = Self::new();
        for (prefix, namespace) in definitions {
            if let Some(existing) = registry.prefix_to_namespace.get(&prefix) {
                if *existing != namespace {
                    return Err(format!(
                        "Prefix '{prefix}' is bound to both <{existing}> and <{namespace}>"
                    ));
                }
                continue;
            }
            if let Some(existing) = registry.namespace_to_prefix.get(&namespace) {
                return Err(format!(
                    "Namespace <{namespace}> is bound to both '{existing}' and '{prefix}'"
                ));
            }
            registry.bind(prefix, namespace);
        }
        Ok(registry)
    }

    /// Returns the prefix of `namespace`, allocating one if necessary.
    ///
    /// In `strict` mode, unknown namespaces are an error instead.
    pub fn get_prefix_or_add(
        &mut self,
        namespace: &str,
        strict: bool,
    ) -> Result<&str, MappingError> {
        if !self.namespace_to_prefix.contains_key(namespace) {
            if strict {
                return Err(MappingError::UndefinedNamespace {
                    namespace: namespace.to_owned(),
                });
            }
            let prefix = self.next_prefix(namespace);
            self.allocated.push(prefix.clone());
            self.bind(prefix, namespace.to_owned());
        }
        Ok(self
            .namespace_to_prefix
            .get(namespace)
            .map_or("", String::as_str))
    }

    /// Explicitly binds `prefix` to `namespace`, e.g. for a strict job.
    ///
    /// Returns `false` if either is already bound to something else.
    pub fn add(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> bool {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match (
            self.prefix_to_namespace.get(&prefix),
            self.namespace_to_prefix.get(&namespace),
        ) {
            (Some(existing), _) => *existing == namespace,
            (None, Some(_)) => false,
            (None, None) => {
                self.allocated.push(prefix.clone());
                self.bind(prefix, namespace);
                true
            }
        }
    }

    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.namespace_to_prefix.get(namespace).map(String::as_str)
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefix_to_namespace.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefix_to_namespace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix_to_namespace.is_empty()
    }

    /// Returns the `(prefix, namespace)` pairs added since the registry was created.
    pub fn new_definitions(&self) -> Vec<(String, String)> {
        self.allocated
            .iter()
            .filter_map(|prefix| {
                self.prefix_to_namespace
                    .get(prefix)
                    .map(|namespace| (prefix.clone(), namespace.clone()))
            })
            .collect()
    }

    /// Returns all definitions, ordered by prefix.
    pub fn to_prefix_map(&self) -> BTreeMap<String, String> {
        self.prefix_to_namespace
            .iter()
            .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
            .collect()
    }

    fn bind(&mut self, prefix: String, namespace: String) {
        self.namespace_to_prefix
            .insert(namespace.clone(), prefix.clone());
        self.prefix_to_namespace.insert(prefix, namespace);
    }

    fn next_prefix(&mut self, namespace: &str) -> String {
        let popular = POPULAR_NAMESPACES
            .iter()
            .find(|(_, ns)| *ns == namespace)
            .map(|(prefix, _)| *prefix);
        if let Some(prefix) = popular {
            if !self.prefix_to_namespace.contains_key(prefix) {
                return prefix.to_owned();
            }
        }
        loop {
            let candidate = format!("ns{}", self.next_generated);
            self.next_generated += 1;
            if !self.prefix_to_namespace.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
