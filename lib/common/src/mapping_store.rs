use crate::error::StorageError;
use async_trait::async_trait;

/// Durable mapping configuration that lives next to the graph.
///
/// Holds the namespace prefix definitions (used when shortening IRIs) and the vocabulary mappings
/// (used when mapping IRIs to custom names).
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Loads all `(prefix, namespace)` definitions.
    async fn load_namespaces(&self) -> Result<Vec<(String, String)>, StorageError>;

    /// Persists `(prefix, namespace)` definitions next to the existing ones.
    ///
    /// Implementations must serialize concurrent calls. If a namespace or a prefix is already
    /// bound differently, nothing is written and [StorageError::Conflict] is returned.
    async fn save_namespaces(&self, definitions: &[(String, String)]) -> Result<(), StorageError>;

    /// Loads all `(IRI, name)` vocabulary mappings.
    async fn load_vocabulary_mappings(&self) -> Result<Vec<(String, String)>, StorageError>;
}
