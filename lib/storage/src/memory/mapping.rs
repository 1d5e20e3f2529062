use crate::memory::MemGraphStore;
use async_trait::async_trait;
use rdf_lpg_common::error::StorageError;
use rdf_lpg_common::MappingStore;
use tracing::debug;

#[async_trait]
impl MappingStore for MemGraphStore {
    async fn load_namespaces(&self) -> Result<Vec<(String, String)>, StorageError> {
        Ok(self
            .namespaces
            .lock()
            .await
            .iter()
            .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
            .collect())
    }

    async fn save_namespaces(&self, definitions: &[(String, String)]) -> Result<(), StorageError> {
        let mut namespaces = self.namespaces.lock().await;
        let mut updated = namespaces.clone();
        for (prefix, namespace) in definitions {
            if let Some(existing) = updated.get(prefix) {
                if existing != namespace {
                    return Err(StorageError::Conflict(format!(
                        "Prefix '{prefix}' is already bound to <{existing}>"
                    )));
                }
                continue;
            }
            if let Some((existing, _)) = updated.iter().find(|(_, ns)| *ns == namespace) {
                return Err(StorageError::Conflict(format!(
                    "Namespace <{namespace}> is already bound to '{existing}'"
                )));
            }
            updated.insert(prefix.clone(), namespace.clone());
        }
        debug!(
            "Saved {} namespace definitions",
            updated.len() - namespaces.len()
        );
        *namespaces = updated;
        Ok(())
    }

    async fn load_vocabulary_mappings(&self) -> Result<Vec<(String, String)>, StorageError> {
        Ok(self.vocabulary_mappings.clone())
    }
}
