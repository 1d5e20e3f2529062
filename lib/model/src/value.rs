use crate::ValueKindMismatchError;
use oxsdatatypes::{Date, DateTime};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A scalar value that can be stored as (part of) a property of a node.
///
/// RDF literals are coerced into one of these values. Apart from strings, the original lexical
/// form of the literal is not retained.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// A string. Language tags and custom datatypes may be encoded as a suffix.
    String(String),
    /// A 64-bit integer.
    Integer(i64),
    /// A double precision float.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A calendar date.
    Date(Date),
    /// A date with a time.
    DateTime(DateTime),
}

impl TypedValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::String(_) => ValueKind::String,
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Float(_) => ValueKind::Float,
            TypedValue::Boolean(_) => ValueKind::Boolean,
            TypedValue::Date(_) => ValueKind::Date,
            TypedValue::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Returns the string slice if this is a [TypedValue::String].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::String(value) => write!(f, "{value:?}"),
            TypedValue::Integer(value) => write!(f, "{value}"),
            TypedValue::Float(value) => write!(f, "{value}"),
            TypedValue::Boolean(value) => write!(f, "{value}"),
            TypedValue::Date(value) => write!(f, "{value}"),
            TypedValue::DateTime(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_owned())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::String(value) => serializer.serialize_str(value),
            TypedValue::Integer(value) => serializer.serialize_i64(*value),
            TypedValue::Float(value) => serializer.serialize_f64(*value),
            TypedValue::Boolean(value) => serializer.serialize_bool(*value),
            TypedValue::Date(value) => serializer.collect_str(value),
            TypedValue::DateTime(value) => serializer.collect_str(value),
        }
    }
}

/// The underlying primitive type of a [TypedValue].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::DateTime => "date-time",
        })
    }
}

/// The value of a property. Either a single value or a homogeneous, ordered array of values.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Scalar(TypedValue),
    Array(Vec<TypedValue>),
}

impl PropertyValue {
    /// Creates an array with a single element.
    pub fn singleton_array(value: TypedValue) -> Self {
        PropertyValue::Array(vec![value])
    }

    /// Creates an array from `values`, checking that all elements share one [ValueKind].
    pub fn try_array(values: Vec<TypedValue>) -> Result<Self, ValueKindMismatchError> {
        if let Some(first) = values.first() {
            let expected = first.kind();
            if let Some(other) = values.iter().find(|v| v.kind() != expected) {
                return Err(ValueKindMismatchError {
                    expected,
                    found: other.kind(),
                });
            }
        }
        Ok(PropertyValue::Array(values))
    }

    /// Returns the kind of the contained values. Empty arrays have no kind.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            PropertyValue::Scalar(value) => Some(value.kind()),
            PropertyValue::Array(values) => values.first().map(TypedValue::kind),
        }
    }

    /// Appends `value` to this array. A scalar is turned into a two-element array.
    ///
    /// Fails if `value` has a different [ValueKind] than the values already present.
    pub fn push(&mut self, value: TypedValue) -> Result<(), ValueKindMismatchError> {
        if let Some(expected) = self.kind() {
            if expected != value.kind() {
                return Err(ValueKindMismatchError {
                    expected,
                    found: value.kind(),
                });
            }
        }
        match self {
            PropertyValue::Scalar(current) => {
                let current = current.clone();
                *self = PropertyValue::Array(vec![current, value]);
            }
            PropertyValue::Array(values) => values.push(value),
        }
        Ok(())
    }

    /// Returns all contained values. A scalar is viewed as a one-element slice.
    pub fn values(&self) -> &[TypedValue] {
        match self {
            PropertyValue::Scalar(value) => std::slice::from_ref(value),
            PropertyValue::Array(values) => values,
        }
    }

    /// Returns the scalar value, if this is not an array.
    pub fn as_scalar(&self) -> Option<&TypedValue> {
        match self {
            PropertyValue::Scalar(value) => Some(value),
            PropertyValue::Array(_) => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }
}

impl From<TypedValue> for PropertyValue {
    fn from(value: TypedValue) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Scalar(value) => value.serialize(serializer),
            PropertyValue::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}
