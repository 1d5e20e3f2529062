use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// The number of mapped triples after which a batch is committed by default.
pub const DEFAULT_COMMIT_SIZE: usize = 25_000;

/// The default capacity of the node resolution cache used while deleting.
pub const DEFAULT_NODE_CACHE_SIZE: usize = 10_000;

/// How IRIs of predicates, types, and custom datatypes become graph names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UriHandling {
    /// `prefix__localName`, allocating prefixes for new namespaces.
    #[default]
    Shorten,
    /// `prefix__localName`, failing for namespaces without a defined prefix.
    ShortenStrict,
    /// The local name only.
    Ignore,
    /// The name given by the vocabulary mappings, falling back to [UriHandling::Ignore].
    Map,
    /// The full IRI.
    Keep,
}

impl UriHandling {
    /// Returns whether prefixes are used (and possibly allocated) in this mode.
    pub fn is_shorten(self) -> bool {
        matches!(self, UriHandling::Shorten | UriHandling::ShortenStrict)
    }
}

/// How multiple values for the same subject and predicate are staged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MultivalHandling {
    /// The last value wins.
    #[default]
    Overwrite,
    /// All values are kept in arrival order.
    Array,
}

/// How `rdf:type` statements are mapped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RdfTypeHandling {
    /// Types become node labels.
    #[default]
    Labels,
    /// Types are regular resources connected by a relationship.
    #[serde(alias = "NONE")]
    Nodes,
    /// Types become node labels and, additionally, resources connected by a relationship.
    LabelsAndNodes,
}

impl RdfTypeHandling {
    pub fn creates_labels(self) -> bool {
        matches!(self, RdfTypeHandling::Labels | RdfTypeHandling::LabelsAndNodes)
    }
}

/// The number of mapped triples per commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawCommitBatchSize")]
pub enum CommitBatchSize {
    Bounded(NonZeroUsize),
    /// Everything is committed at the end of the job.
    Unbounded,
}

impl CommitBatchSize {
    /// Returns whether a batch of `mapped` triples is full.
    pub fn is_reached(self, mapped: u64) -> bool {
        match self {
            CommitBatchSize::Bounded(size) => {
                let size = u64::try_from(size.get()).unwrap_or(u64::MAX);
                mapped != 0 && mapped % size == 0
            }
            CommitBatchSize::Unbounded => false,
        }
    }
}

impl Default for CommitBatchSize {
    fn default() -> Self {
        NonZeroUsize::new(DEFAULT_COMMIT_SIZE).map_or(Self::Unbounded, Self::Bounded)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommitBatchSize {
    Size(usize),
    Keyword(String),
}

impl TryFrom<RawCommitBatchSize> for CommitBatchSize {
    type Error = String;

    fn try_from(value: RawCommitBatchSize) -> Result<Self, Self::Error> {
        match value {
            RawCommitBatchSize::Size(size) => NonZeroUsize::new(size)
                .map(CommitBatchSize::Bounded)
                .ok_or_else(|| "The commit size must be positive".to_owned()),
            RawCommitBatchSize::Keyword(keyword) if keyword.eq_ignore_ascii_case("unbounded") => {
                Ok(CommitBatchSize::Unbounded)
            }
            RawCommitBatchSize::Keyword(keyword) => Err(format!(
                "Invalid commit size '{keyword}', expected a positive number or 'unbounded'"
            )),
        }
    }
}

/// The immutable configuration of a mapping job.
///
/// The serialized form uses the parameter names of the classic import procedures, e.g.
/// `{"handleVocabUris": "IGNORE", "handleMultival": "ARRAY", "commitSize": 500}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MappingPolicy {
    #[serde(rename = "handleVocabUris")]
    pub uri_handling: UriHandling,
    #[serde(rename = "handleMultival")]
    pub multival: MultivalHandling,
    #[serde(rename = "handleRDFTypes")]
    pub rdf_type_handling: RdfTypeHandling,
    /// Upper-cases relationship types, capitalizes labels, and lower-cases the first letter of
    /// property keys whenever the namespace is dropped.
    #[serde(rename = "applyNeo4jNaming")]
    pub apply_naming_convention: bool,
    #[serde(rename = "keepLangTag")]
    pub keep_language_tag: bool,
    pub keep_custom_data_types: bool,
    /// Only string literals with this language tag are kept.
    pub language_filter: Option<String>,
    /// Predicates (full IRIs) whose triples are skipped.
    pub predicate_exclusion_list: Option<FxHashSet<String>>,
    /// Predicates (full IRIs) that are staged as arrays in [MultivalHandling::Array] mode. `None`
    /// means all predicates.
    #[serde(rename = "multivalPropList")]
    pub multival_prop_allow_list: Option<FxHashSet<String>>,
    /// Predicates (full IRIs) whose custom datatypes are kept. `None` means all predicates.
    #[serde(rename = "customDataTypePropList")]
    pub custom_datatype_prop_allow_list: Option<FxHashSet<String>>,
    #[serde(rename = "commitSize")]
    pub commit_batch_size: CommitBatchSize,
    pub node_cache_size: NonZeroUsize,
}

impl Default for MappingPolicy {
    fn default() -> Self {
        Self {
            uri_handling: UriHandling::default(),
            multival: MultivalHandling::default(),
            rdf_type_handling: RdfTypeHandling::default(),
            apply_naming_convention: false,
            keep_language_tag: false,
            keep_custom_data_types: false,
            language_filter: None,
            predicate_exclusion_list: None,
            multival_prop_allow_list: None,
            custom_datatype_prop_allow_list: None,
            commit_batch_size: CommitBatchSize::default(),
            node_cache_size: NonZeroUsize::new(DEFAULT_NODE_CACHE_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl MappingPolicy {
    #[must_use]
    pub fn with_uri_handling(mut self, uri_handling: UriHandling) -> Self {
        self.uri_handling = uri_handling;
        self
    }

    #[must_use]
    pub fn with_multival(mut self, multival: MultivalHandling) -> Self {
        self.multival = multival;
        self
    }

    #[must_use]
    pub fn with_rdf_type_handling(mut self, rdf_type_handling: RdfTypeHandling) -> Self {
        self.rdf_type_handling = rdf_type_handling;
        self
    }

    #[must_use]
    pub fn with_naming_convention(mut self, apply: bool) -> Self {
        self.apply_naming_convention = apply;
        self
    }

    #[must_use]
    pub fn with_keep_language_tag(mut self, keep: bool) -> Self {
        self.keep_language_tag = keep;
        self
    }

    #[must_use]
    pub fn with_keep_custom_data_types(mut self, keep: bool) -> Self {
        self.keep_custom_data_types = keep;
        self
    }

    #[must_use]
    pub fn with_language_filter(mut self, language: impl Into<String>) -> Self {
        self.language_filter = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_predicate_exclusions<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicate_exclusion_list = Some(predicates.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_multival_allow_list<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.multival_prop_allow_list = Some(predicates.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_custom_datatype_allow_list<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_datatype_prop_allow_list =
            Some(predicates.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_commit_batch_size(mut self, size: CommitBatchSize) -> Self {
        self.commit_batch_size = size;
        self
    }

    #[must_use]
    pub fn with_node_cache_size(mut self, size: NonZeroUsize) -> Self {
        self.node_cache_size = size;
        self
    }

    pub fn is_excluded(&self, predicate: &str) -> bool {
        self.predicate_exclusion_list
            .as_ref()
            .is_some_and(|list| list.contains(predicate))
    }

    /// Returns whether values of `predicate` are staged as arrays.
    pub fn stages_as_array(&self, predicate: &str) -> bool {
        self.multival == MultivalHandling::Array
            && self
                .multival_prop_allow_list
                .as_ref()
                .map_or(true, |list| list.contains(predicate))
    }

    /// Returns whether the custom datatype of literals of `predicate` is appended to the value.
    pub fn keeps_custom_datatype(&self, predicate: &str) -> bool {
        self.keep_custom_data_types
            && !matches!(self.uri_handling, UriHandling::Ignore | UriHandling::Map)
            && self
                .custom_datatype_prop_allow_list
                .as_ref()
                .map_or(true, |list| list.contains(predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_classic_parameters() {
        let policy: MappingPolicy = serde_json::from_str(
            r#"{
                "handleVocabUris": "IGNORE",
                "handleMultival": "ARRAY",
                "handleRDFTypes": "LABELS_AND_NODES",
                "multivalPropList": ["http://example.com/tag"],
                "languageFilter": "en",
                "commitSize": 500
            }"#,
        )
        .unwrap();
        assert_eq!(policy.uri_handling, UriHandling::Ignore);
        assert_eq!(policy.multival, MultivalHandling::Array);
        assert_eq!(policy.rdf_type_handling, RdfTypeHandling::LabelsAndNodes);
        assert_eq!(policy.language_filter.as_deref(), Some("en"));
        assert_eq!(
            policy.commit_batch_size,
            CommitBatchSize::Bounded(NonZeroUsize::new(500).unwrap())
        );
        assert!(policy.stages_as_array("http://example.com/tag"));
        assert!(!policy.stages_as_array("http://example.com/name"));
        assert!(!policy.keep_custom_data_types);
    }

    #[test]
    fn deserialize_unbounded_commit_size() {
        let policy: MappingPolicy =
            serde_json::from_str(r#"{"commitSize": "unbounded", "handleRDFTypes": "NONE"}"#)
                .unwrap();
        assert_eq!(policy.commit_batch_size, CommitBatchSize::Unbounded);
        assert_eq!(policy.rdf_type_handling, RdfTypeHandling::Nodes);
        assert!(serde_json::from_str::<MappingPolicy>(r#"{"commitSize": 0}"#).is_err());
        assert!(serde_json::from_str::<MappingPolicy>(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn batch_size_is_reached_at_multiples() {
        let size = CommitBatchSize::Bounded(NonZeroUsize::new(3).unwrap());
        let reached = (0..=9).filter(|n| size.is_reached(*n)).collect::<Vec<_>>();
        assert_eq!(reached, vec![3, 6, 9]);
        assert!(!CommitBatchSize::Unbounded.is_reached(3));
    }

    #[test]
    fn custom_datatypes_are_not_kept_when_namespaces_are_dropped() {
        let policy = MappingPolicy::default().with_keep_custom_data_types(true);
        assert!(policy.keeps_custom_datatype("http://example.com/price"));
        let policy = policy.with_uri_handling(UriHandling::Ignore);
        assert!(!policy.keeps_custom_datatype("http://example.com/price"));
    }
}
