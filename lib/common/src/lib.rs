pub mod error;
mod graph_store;
mod mapping_store;

pub use graph_store::{Direction, GraphStore, GraphTransaction, NodeId, Relationship, RelationshipId};
pub use mapping_store::MappingStore;
