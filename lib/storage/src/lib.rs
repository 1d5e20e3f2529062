//! Contains storage layer implementations for the RDF to property graph mapping jobs.

pub mod memory;
