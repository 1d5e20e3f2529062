use rdf_lpg_model::ValueKindMismatchError;

/// An error raised while mapping a triple onto property graph elements.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// Strict IRI shortening found a namespace without a defined prefix.
    #[error("No prefix has been defined for namespace <{namespace}> and strict shortening is enabled")]
    UndefinedNamespace {
        /// The namespace without prefix.
        namespace: String,
    },
    /// A literal is not in the lexical space of its (numeric or boolean) datatype.
    #[error("The literal \"{value}\" is not a valid <{datatype}>")]
    InvalidLiteral {
        /// The lexical form of the literal.
        value: String,
        /// The datatype IRI of the literal.
        datatype: String,
    },
    /// Values of different kinds were staged for the same array property.
    #[error("Cannot mix value types in the array property '{property}': {source}")]
    MixedArrayTypes {
        /// The property name.
        property: String,
        #[source]
        source: ValueKindMismatchError,
    },
    /// A previous triple or batch failed and the job cannot continue.
    #[error("The job has been aborted after a previous failure")]
    Aborted,
}
