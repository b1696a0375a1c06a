//! Error types for schema and filter-model declarations.

use thiserror::Error;

/// Errors that can occur when declaring schemas or compiling filter models.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema for this root is already present in the registry.
    #[error("a schema for root '{root}' is already registered")]
    AlreadyRegistered {
        /// The colliding root name.
        root: String,
    },

    /// A filter attribute declared a default value.
    #[error("filter attribute '{name}' declares a default value; defaults are not allowed on filter models")]
    FilterDefault {
        /// Name of the offending attribute.
        name: String,
    },

    /// A filter attribute names nothing in the bound schema.
    #[error("filter attribute '{name}' is not an index or field of schema '{root}'")]
    FilterUnknownAttribute {
        /// Name of the offending attribute.
        name: String,
        /// Root of the schema the model was compiled against.
        root: String,
    },

    /// A filter attribute uses a leaf short name that matches several flat paths.
    #[error("filter attribute '{name}' is ambiguous: it matches {candidates:?}; use a fully qualified name")]
    FilterAmbiguousAlias {
        /// The ambiguous short name.
        name: String,
        /// The flat paths it could refer to.
        candidates: Vec<String>,
    },

    /// A filter attribute's declared type disagrees with the schema.
    #[error("filter attribute '{name}' has type {found}, expected {expected} or its optional form")]
    FilterTypeMismatch {
        /// Name of the offending attribute.
        name: String,
        /// Type declared by the schema.
        expected: String,
        /// Type declared by the filter model.
        found: String,
    },

    /// A bound filter value does not match the attribute's declared type.
    #[error("filter value for '{name}' does not match declared type {expected}")]
    FilterValueType {
        /// Name of the attribute the value was supplied for.
        name: String,
        /// Type declared for the attribute.
        expected: String,
    },

    /// A filter value names an attribute the model does not declare.
    #[error("filter value '{name}' is not declared by the filter model for schema '{root}'")]
    UnknownFilterValue {
        /// Name of the undeclared value.
        name: String,
        /// Root of the schema the model was compiled against.
        root: String,
    },
}
