use crate::ValueKind;
use thiserror::Error;

/// Raised if a value is added to an array property holding values of another kind.
///
/// Property graph arrays are homogeneous. For example, appending a boolean to an array of integers
/// is not possible.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Cannot store a {found} value in an array of {expected} values")]
pub struct ValueKindMismatchError {
    /// The kind of the values already in the array.
    pub expected: ValueKind,
    /// The kind of the rejected value.
    pub found: ValueKind,
}
