//! Vocabularies used while mapping RDF into a property graph.

pub use oxrdf::vocab::{rdf, rdfs, xsd};

/// The names the mapping writes into the property graph itself.
pub mod lpg {
    /// The label every materialized resource carries.
    pub const RESOURCE: &str = "Resource";
    /// The property holding the stable identifier of a resource.
    pub const URI: &str = "uri";
    /// Identifier scheme used for blank nodes. Blank node identifiers are only stable within a
    /// single parse.
    pub const BNODE_SCHEME: &str = "bnode://";
    /// Separates a namespace prefix from a local name (`ns0__name`).
    pub const PREFIX_SEPARATOR: &str = "__";
    /// Separates a literal value from its retained custom datatype (`12^^ns0__Euro`).
    pub const CUSTOM_DATA_TYPE_SEPARATOR: &str = "^^";
}
