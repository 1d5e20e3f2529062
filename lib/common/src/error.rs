use std::error::Error;
use std::io;

/// An error related to graph store operations (lookups, writes, commits...).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// Error related to data corruption.
    #[error(transparent)]
    Corruption(#[from] CorruptionError),
    /// A concurrent job already persisted conflicting data.
    #[error("Conflicting write: {0}")]
    Conflict(String),
    /// A node or relationship handle does not refer to an element of the graph.
    #[error("The graph element {0} does not exist")]
    UnknownElement(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Corruption(error) => error.into(),
            StorageError::Conflict(_) | StorageError::UnknownElement(_) => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
            StorageError::Other(error) => Self::other(error),
        }
    }
}

/// An error returned if some content in the graph store is corrupted.
///
/// For example, a persisted namespace definition binding one prefix to two namespaces.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct CorruptionError(#[from] CorruptionErrorKind);

#[derive(Debug, thiserror::Error)]
enum CorruptionErrorKind {
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl CorruptionError {
    /// Builds an error from another error.
    #[inline]
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self(CorruptionErrorKind::Other(error.into()))
    }

    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(CorruptionErrorKind::Msg(msg.into()))
    }
}

impl From<CorruptionError> for io::Error {
    #[inline]
    fn from(error: CorruptionError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
