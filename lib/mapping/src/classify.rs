use crate::coercion::coerce_literal;
use crate::error::MappingError;
use crate::policy::{MappingPolicy, RdfTypeHandling};
use crate::resolver::UriResolver;
use rdf_lpg_model::vocab::{lpg, rdf};
use rdf_lpg_model::{ElementKind, NamedOrBlankNodeRef, Subject, Term, Triple, TypedValue};

/// The capabilities a triple classification needs from its destination.
///
/// Implemented by the staged buffer of batch jobs and by in-memory previews.
pub trait StatementSink {
    /// Makes sure `resource` becomes a node, even if nothing else is staged for it.
    fn materialize_resource(&mut self, resource: NamedOrBlankNodeRef<'_>);

    /// Adds `label` to the labels of `subject`.
    fn stage_label(&mut self, subject: NamedOrBlankNodeRef<'_>, label: String);

    /// Sets (or, if `as_array` is set, appends to) the property `key` of `subject`.
    fn stage_property(
        &mut self,
        subject: NamedOrBlankNodeRef<'_>,
        key: String,
        value: TypedValue,
        as_array: bool,
    ) -> Result<(), MappingError>;

    /// Retains `statement` as a relationship of type `rel_type` between its subject and object.
    fn stage_relationship(&mut self, statement: Triple, rel_type: String);
}

/// How a single triple was mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The predicate is on the exclusion list.
    Excluded,
    /// The triple contains a quoted triple, which has no property graph counterpart.
    Unsupported,
    /// The literal was dropped by the language filter.
    Filtered,
    /// The literal became a property value.
    Property,
    /// The `rdf:type` statement became a label.
    Label,
    /// The triple became a relationship.
    Relationship,
}

impl Classification {
    /// Returns whether the triple was mapped onto a graph element.
    pub fn is_mapped(self) -> bool {
        matches!(
            self,
            Classification::Property | Classification::Label | Classification::Relationship
        )
    }
}

/// Returns the stable identifier of `resource`, stored in the `uri` property of its node.
pub fn resource_key(resource: NamedOrBlankNodeRef<'_>) -> String {
    match resource {
        NamedOrBlankNodeRef::NamedNode(node) => node.as_str().to_owned(),
        NamedOrBlankNodeRef::BlankNode(node) => format!("{}{}", lpg::BNODE_SCHEME, node.as_str()),
    }
}

/// Classifies `triple` under `policy` and stages the result in `sink`.
///
/// 1. Triples with an excluded predicate are skipped.
/// 2. Literal objects become property values of the subject.
/// 3. `rdf:type` statements with a non-blank object become labels if the policy asks for it. With
///    [RdfTypeHandling::LabelsAndNodes], they also become a relationship to the type resource.
/// 4. Everything else becomes a relationship between two resources.
pub fn classify_triple(
    policy: &MappingPolicy,
    resolver: &mut UriResolver,
    triple: &Triple,
    sink: &mut impl StatementSink,
) -> Result<Classification, MappingError> {
    if policy.is_excluded(triple.predicate.as_str()) {
        return Ok(Classification::Excluded);
    }

    let subject = match &triple.subject {
        Subject::NamedNode(node) => NamedOrBlankNodeRef::from(node.as_ref()),
        Subject::BlankNode(node) => NamedOrBlankNodeRef::from(node.as_ref()),
        Subject::Triple(_) => return Ok(Classification::Unsupported),
    };

    match &triple.object {
        Term::Literal(literal) => {
            let key = resolver.resolve(triple.predicate.as_ref(), ElementKind::Property)?;
            let Some(value) =
                coerce_literal(policy, resolver, triple.predicate.as_ref(), literal.as_ref())?
            else {
                return Ok(Classification::Filtered);
            };
            let as_array = policy.stages_as_array(triple.predicate.as_str());
            sink.stage_property(subject, key, value, as_array)?;
            Ok(Classification::Property)
        }
        Term::NamedNode(object)
            if triple.predicate == rdf::TYPE && policy.rdf_type_handling.creates_labels() =>
        {
            let label = resolver.resolve(object.as_ref(), ElementKind::Label)?;
            sink.stage_label(subject, label);
            if policy.rdf_type_handling == RdfTypeHandling::LabelsAndNodes {
                let object = NamedOrBlankNodeRef::from(object.as_ref());
                stage_relationship(resolver, sink, subject, object, triple)?;
            }
            Ok(Classification::Label)
        }
        Term::NamedNode(object) => {
            let object = NamedOrBlankNodeRef::from(object.as_ref());
            stage_relationship(resolver, sink, subject, object, triple)
        }
        Term::BlankNode(object) => {
            let object = NamedOrBlankNodeRef::from(object.as_ref());
            stage_relationship(resolver, sink, subject, object, triple)
        }
        Term::Triple(_) => Ok(Classification::Unsupported),
    }
}

fn stage_relationship(
    resolver: &mut UriResolver,
    sink: &mut impl StatementSink,
    subject: NamedOrBlankNodeRef<'_>,
    object: NamedOrBlankNodeRef<'_>,
    triple: &Triple,
) -> Result<Classification, MappingError> {
    sink.materialize_resource(subject);
    sink.materialize_resource(object);
    let rel_type = resolver.resolve(triple.predicate.as_ref(), ElementKind::Relationship)?;
    sink.stage_relationship(triple.clone(), rel_type);
    Ok(Classification::Relationship)
}
