use thiserror::Error;

/// An error raised while declaring a model.
///
/// Every invariant that would otherwise lead to an invalid SPARQL query is checked when a
/// [Triple](crate::Triple) or an [EntityModel](crate::EntityModel) is constructed. A model that
/// was built successfully always compiles to a well-formed query.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A field that renders a property path has no properties.
    #[error("There are no properties associated with the field '{field}'.")]
    MissingProperties { field: String },
    /// An entity filter field has no values to filter for.
    #[error("The entity filter field '{field}' has no values.")]
    MissingFilterValues { field: String },
    /// A list field has an empty separator.
    #[error("The list field '{field}' has an empty separator.")]
    EmptySeparator { field: String },
    /// `MINUS` and `UNION` cannot be combined in the same clause.
    #[error("Union and Minus should not be used in the same clause (property '{property}').")]
    UnionWithMinus { property: String },
    /// One of the reserved fields is missing.
    #[error("The model '{model}' does not declare the reserved field '{field}'.")]
    MissingReservedField { model: String, field: String },
    /// A reserved field has been declared with the wrong kind.
    #[error("The reserved field '{field}' of the model '{model}' must be a {expected} field.")]
    InvalidReservedField {
        model: String,
        field: String,
        expected: &'static str,
    },
    /// A computed property shares its name with a field or another property.
    #[error("The model '{model}' declares '{name}' more than once.")]
    DuplicateProperty { model: String, name: String },
    /// A configured regular expression could not be parsed.
    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
}
