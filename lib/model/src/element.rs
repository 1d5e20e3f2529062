/// The kind of graph element a name is resolved for.
///
/// The kind only matters when a naming convention is applied to local names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A relationship type, e.g. `KNOWS`.
    Relationship,
    /// A node label, e.g. `Person`.
    Label,
    /// A property key, e.g. `firstName`.
    Property,
    /// The datatype suffix of a literal with a custom datatype.
    Datatype,
}
