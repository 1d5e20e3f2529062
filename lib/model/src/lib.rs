mod element;
mod error;
mod value;
pub mod vocab;

pub use element::ElementKind;
pub use error::*;
pub use value::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxrdf::{
    BlankNode, BlankNodeRef, IriParseError, Literal, LiteralRef, NamedNode, NamedNodeRef,
    NamedOrBlankNode, NamedOrBlankNodeRef, Subject, SubjectRef, Term, TermRef, Triple, TripleRef,
};
pub use oxsdatatypes::{Boolean, Date, DateTime, Double};
