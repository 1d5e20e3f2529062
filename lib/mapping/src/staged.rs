use crate::classify::StatementSink;
use crate::error::MappingError;
use rdf_lpg_model::{
    NamedOrBlankNode, NamedOrBlankNodeRef, PropertyValue, Subject, Term, Triple, TypedValue,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// The labels and properties staged for one resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StagedResource {
    pub labels: BTreeSet<String>,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl StagedResource {
    /// Returns the number of statements this resource stands for. Every label, scalar, and array
    /// element was staged from one triple.
    pub fn statement_count(&self) -> usize {
        self.labels.len()
            + self
                .properties
                .values()
                .map(|value| value.values().len())
                .sum::<usize>()
    }
}

/// A statement between two resources that becomes a relationship.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationshipCandidate {
    pub statement: Triple,
    /// The resolved relationship type.
    pub rel_type: String,
}

impl RelationshipCandidate {
    /// Returns the subject and the object of the statement.
    pub fn endpoints(&self) -> Option<(NamedOrBlankNodeRef<'_>, NamedOrBlankNodeRef<'_>)> {
        let start: NamedOrBlankNodeRef<'_> = match &self.statement.subject {
            Subject::NamedNode(node) => node.as_ref().into(),
            Subject::BlankNode(node) => node.as_ref().into(),
            Subject::Triple(_) => return None,
        };
        let end: NamedOrBlankNodeRef<'_> = match &self.statement.object {
            Term::NamedNode(node) => node.as_ref().into(),
            Term::BlankNode(node) => node.as_ref().into(),
            Term::Literal(_) | Term::Triple(_) => return None,
        };
        Some((start, end))
    }
}

/// The in-memory accumulation of one batch.
///
/// Literal objects never get an entry; only subjects and non-literal objects do.
#[derive(Clone, Debug, Default)]
pub struct StagedBuffer {
    resources: FxHashMap<NamedOrBlankNode, StagedResource>,
    relationships: FxHashSet<RelationshipCandidate>,
}

impl StagedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> impl Iterator<Item = (&NamedOrBlankNode, &StagedResource)> {
        self.resources.iter()
    }

    pub fn resource(&self, resource: NamedOrBlankNodeRef<'_>) -> Option<&StagedResource> {
        self.resources.get(&resource.into_owned())
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipCandidate> {
        self.relationships.iter()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.relationships.is_empty()
    }

    pub fn clear(&mut self) {
        self.resources.clear();
        self.relationships.clear();
    }

    fn entry(&mut self, resource: NamedOrBlankNodeRef<'_>) -> &mut StagedResource {
        self.resources.entry(resource.into_owned()).or_default()
    }
}

impl StatementSink for StagedBuffer {
    fn materialize_resource(&mut self, resource: NamedOrBlankNodeRef<'_>) {
        self.entry(resource);
    }

    fn stage_label(&mut self, subject: NamedOrBlankNodeRef<'_>, label: String) {
        self.entry(subject).labels.insert(label);
    }

    fn stage_property(
        &mut self,
        subject: NamedOrBlankNodeRef<'_>,
        key: String,
        value: TypedValue,
        as_array: bool,
    ) -> Result<(), MappingError> {
        let properties = &mut self.entry(subject).properties;
        if !as_array {
            properties.insert(key, PropertyValue::Scalar(value));
            return Ok(());
        }
        match properties.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(PropertyValue::singleton_array(value));
            }
            Entry::Occupied(mut entry) => {
                entry
                    .get_mut()
                    .push(value)
                    .map_err(|source| MappingError::MixedArrayTypes {
                        property: entry.key().clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    fn stage_relationship(&mut self, statement: Triple, rel_type: String) {
        self.relationships
            .insert(RelationshipCandidate { statement, rel_type });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_lpg_model::{BlankNode, NamedNode, NamedNodeRef};

    const ANN: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://example.com/ann");

    #[test]
    fn arrays_keep_arrival_order_and_duplicates() {
        let mut buffer = StagedBuffer::new();
        for tag in ["x", "y", "x"] {
            buffer
                .stage_property(ANN.into(), "tag".to_owned(), TypedValue::from(tag), true)
                .unwrap();
        }
        let resource = buffer.resource(ANN.into()).unwrap();
        assert_eq!(
            resource.properties["tag"],
            PropertyValue::Array(vec![
                TypedValue::from("x"),
                TypedValue::from("y"),
                TypedValue::from("x")
            ])
        );
        assert_eq!(resource.statement_count(), 3);
    }

    #[test]
    fn overwrite_keeps_last_value() {
        let mut buffer = StagedBuffer::new();
        for name in ["Ann", "Anne"] {
            buffer
                .stage_property(ANN.into(), "name".to_owned(), TypedValue::from(name), false)
                .unwrap();
        }
        assert_eq!(
            buffer.resource(ANN.into()).unwrap().properties["name"],
            PropertyValue::Scalar(TypedValue::from("Anne"))
        );
    }

    #[test]
    fn mixed_array_types_are_rejected() {
        let mut buffer = StagedBuffer::new();
        buffer
            .stage_property(ANN.into(), "age".to_owned(), TypedValue::Integer(3), true)
            .unwrap();
        let result =
            buffer.stage_property(ANN.into(), "age".to_owned(), TypedValue::from("3"), true);
        assert!(matches!(
            result,
            Err(MappingError::MixedArrayTypes { property, .. }) if property == "age"
        ));
    }

    #[test]
    fn materializing_is_idempotent() {
        let mut buffer = StagedBuffer::new();
        let blank = BlankNode::new_unchecked("b0");
        buffer.stage_label(ANN.into(), "Person".to_owned());
        buffer.materialize_resource(ANN.into());
        buffer.materialize_resource(blank.as_ref().into());
        assert_eq!(buffer.resource_count(), 2);
        assert!(buffer.resource(ANN.into()).unwrap().labels.contains("Person"));

        let statement = Triple::new(
            ANN.into_owned(),
            NamedNode::new_unchecked("http://example.com/knows"),
            blank.clone(),
        );
        buffer.stage_relationship(statement.clone(), "knows".to_owned());
        buffer.stage_relationship(statement, "knows".to_owned());
        assert_eq!(buffer.relationship_count(), 1);
        let candidate = buffer.relationships().next().unwrap();
        assert_eq!(
            candidate.endpoints(),
            Some((ANN.into(), blank.as_ref().into()))
        );

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
