//! Attribute types shared by index, field, and filter declarations.

use std::fmt;

use serde_json::Value;

/// The primitive type an index, field, or filter attribute is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A floating-point number.
    Float,
    /// A string.
    Str,
    /// An ordered list of values.
    List,
    /// A string-keyed mapping.
    Map,
}

impl AttrType {
    /// Returns true if a JSON value inhabits this type.
    ///
    /// Null is handled by the optional mechanism, not here. `Float` accepts
    /// any number; `Int` requires an integral one.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Str => value.is_string(),
            Self::List => value.is_array(),
            Self::Map => value.is_object(),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::Str => write!(f, "Str"),
            Self::List => write!(f, "List"),
            Self::Map => write!(f, "Map"),
        }
    }
}

/// One entry of a schema's ordered index sequence.
///
/// Index order is significant: it is the order of nesting levels between the
/// document root and the entities, and the unflattener reproduces it.
#[derive(Debug, Clone)]
pub struct IndexAttr {
    /// The index name.
    pub name: String,
    /// Declared type of the index values.
    pub ty: AttrType,
    /// Whether the attribute admits null.
    pub optional: bool,
    /// Declared default. Index values always come from document keys, so
    /// this participates in declarations only.
    pub default: Value,
}

impl IndexAttr {
    /// Creates a required index attribute with no default.
    pub fn new(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            default: Value::Null,
        }
    }

    /// Marks the attribute as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
