//! An in-memory, transactional property graph.
mod graph;
mod mapping;
mod snapshot;
mod store;

pub use snapshot::{MemGraphSnapshot, NodeView};
pub use store::{MemGraphStore, MemGraphTransaction};
