//! Filter models and bound filter values.
//!
//! A filter model is a declaration of filterable attributes compiled against
//! one schema. Compilation resolves each declared name to an index or a flat
//! field path (leaf short names are accepted when they are unambiguous),
//! checks the declared type, and stores the resulting name-to-path map.
//! Values only enter through [`FilterModel::bind`], which yields the
//! [`FilterValues`] the engine consumes.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{
    attr::AttrType,
    error::SchemaError,
    schema::Schema,
};

/// One declared attribute of a filter model.
#[derive(Debug, Clone)]
pub struct FilterAttr {
    /// Declared name: an index name, a flat path, or a leaf short name.
    pub name: String,
    /// Declared type; must agree with the schema attribute it binds to.
    pub ty: AttrType,
    /// Whether the attribute admits null (the "no constraint" sentinel).
    pub optional: bool,
    /// Declared default. Any non-null default is rejected at compile time.
    pub default: Value,
}

impl FilterAttr {
    /// Creates a required filter attribute with no default.
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

    /// Attaches a default value. Compilation rejects it; the constructor
    /// exists so the rejection has something to reject.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }
}

/// Leaf short names of a schema, split into unique and ambiguous.
struct LeafAliases {
    /// Short names that resolve to exactly one flat path.
    unique: IndexMap<String, String>,
    /// Short names shared by several flat paths.
    ambiguous: IndexMap<String, Vec<String>>,
}

/// Computes the short-name alias tables for a schema's flat fields.
fn leaf_aliases(schema: &Schema) -> LeafAliases {
    let mut candidates: IndexMap<String, Vec<String>> = IndexMap::new();
    for spec in schema.flat_fields() {
        candidates
            .entry(spec.short_name().to_string())
            .or_default()
            .push(spec.name.clone());
    }

    let mut unique = IndexMap::new();
    let mut ambiguous = IndexMap::new();
    for (short, flats) in candidates {
        if flats.len() == 1 {
            // A short name equal to its own flat path is not an alias.
            if short != flats[0] {
                unique.insert(short, flats.into_iter().next().unwrap_or_default());
            }
        } else {
            ambiguous.insert(short, flats);
        }
    }

    LeafAliases { unique, ambiguous }
}

/// A filter declaration compiled against a schema.
#[derive(Debug, Clone)]
pub struct FilterModel {
    /// Root of the schema the model was compiled against.
    schema_root: String,
    /// The declared attributes.
    attrs: Vec<FilterAttr>,
    /// Name-to-flat-path map for non-index attributes.
    name_map: IndexMap<String, String>,
    /// Names among `attrs` that bind to indexes.
    index_attrs: Vec<String>,
}

impl FilterModel {
    /// Compiles a filter declaration against a schema.
    ///
    /// Each attribute must name an index, a flat path, or an unambiguous
    /// leaf short name, with a type equal to the declaration it binds to
    /// (optionality is free on the filter side). Defaults are rejected.
    pub fn compile(schema: &Schema, attrs: Vec<FilterAttr>) -> Result<Self, SchemaError> {
        let aliases = leaf_aliases(schema);

        let mut name_map = IndexMap::new();
        let mut index_attrs = Vec::new();

        for attr in &attrs {
            if !attr.default.is_null() {
                return Err(SchemaError::FilterDefault {
                    name: attr.name.clone(),
                });
            }

            if let Some(index) = schema.index(&attr.name) {
                if attr.ty != index.ty {
                    return Err(SchemaError::FilterTypeMismatch {
                        name: attr.name.clone(),
                        expected: index.ty.to_string(),
                        found: attr.ty.to_string(),
                    });
                }
                index_attrs.push(attr.name.clone());
                continue;
            }

            let flat_name = if let Some(spec) = schema.flat_field(&attr.name) {
                spec.name.clone()
            } else if let Some(flat) = aliases.unique.get(&attr.name) {
                flat.clone()
            } else if let Some(candidates) = aliases.ambiguous.get(&attr.name) {
                return Err(SchemaError::FilterAmbiguousAlias {
                    name: attr.name.clone(),
                    candidates: candidates.clone(),
                });
            } else {
                return Err(SchemaError::FilterUnknownAttribute {
                    name: attr.name.clone(),
                    root: schema.root().to_string(),
                });
            };

            let spec = schema
                .flat_field(&flat_name)
                .ok_or_else(|| SchemaError::FilterUnknownAttribute {
                    name: attr.name.clone(),
                    root: schema.root().to_string(),
                })?;
            if attr.ty != spec.ty {
                return Err(SchemaError::FilterTypeMismatch {
                    name: attr.name.clone(),
                    expected: spec.ty.to_string(),
                    found: attr.ty.to_string(),
                });
            }

            name_map.insert(attr.name.clone(), flat_name);
        }

        Ok(Self {
            schema_root: schema.root().to_string(),
            attrs,
            name_map,
            index_attrs,
        })
    }

    /// Compiles the empty model: no attributes, nothing bindable.
    pub fn empty(schema: &Schema) -> Self {
        Self {
            schema_root: schema.root().to_string(),
            attrs: Vec::new(),
            name_map: IndexMap::new(),
            index_attrs: Vec::new(),
        }
    }

    /// Compiles the implicit model used for bare keyword filter values:
    /// every index, every flat field, and every unique leaf alias, all
    /// optional.
    pub fn implicit(schema: &Schema) -> Self {
        let mut attrs = Vec::new();
        for index in schema.indexes() {
            attrs.push(FilterAttr::new(&index.name, index.ty).optional());
        }
        for spec in schema.flat_fields() {
            attrs.push(FilterAttr::new(&spec.name, spec.ty).optional());
        }
        for (short, flat) in leaf_aliases(schema).unique {
            if schema.has_index(&short) {
                continue;
            }
            if let Some(spec) = schema.flat_field(&flat) {
                attrs.push(FilterAttr::new(short, spec.ty).optional());
            }
        }

        // Every generated attribute resolves by construction.
        Self::compile(schema, attrs).unwrap_or_else(|_| Self::empty(schema))
    }

    /// Returns the root of the schema this model was compiled against.
    pub fn schema_root(&self) -> &str {
        &self.schema_root
    }

    /// Returns the declared attributes.
    pub fn attrs(&self) -> &[FilterAttr] {
        &self.attrs
    }

    /// Returns the name-to-flat-path map for non-index attributes.
    pub fn name_map(&self) -> &IndexMap<String, String> {
        &self.name_map
    }

    /// Looks up a declared attribute by name.
    fn attr(&self, name: &str) -> Option<&FilterAttr> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// Materializes filter values against this model.
    ///
    /// Null values are the "no constraint" sentinel and are dropped. Unknown
    /// names and type-incompatible values are rejected.
    pub fn bind(&self, values: Map<String, Value>) -> Result<FilterValues, SchemaError> {
        let mut indexes = Map::new();
        let mut fields = Map::new();

        for (name, value) in values {
            let Some(attr) = self.attr(&name) else {
                return Err(SchemaError::UnknownFilterValue {
                    name,
                    root: self.schema_root.clone(),
                });
            };

            if value.is_null() {
                continue;
            }
            if !attr.ty.matches(&value) {
                return Err(SchemaError::FilterValueType {
                    name,
                    expected: attr.ty.to_string(),
                });
            }

            if self.index_attrs.contains(&name) {
                indexes.insert(name, value);
            } else {
                let flat = self.name_map.get(&name).cloned().unwrap_or(name);
                fields.insert(flat, value);
            }
        }

        Ok(FilterValues {
            schema_root: self.schema_root.clone(),
            indexes,
            fields,
        })
    }
}

/// Non-null filter values bound through a compiled model.
///
/// Index values constrain the document traversal; field values are applied
/// to flattened entries under the normalized string comparison. The keys of
/// `fields` are already resolved flat paths.
#[derive(Debug, Clone)]
pub struct FilterValues {
    /// Root of the schema the values were bound for.
    schema_root: String,
    /// Index-name-to-value constraints.
    indexes: Map<String, Value>,
    /// Flat-path-to-value constraints.
    fields: Map<String, Value>,
}

impl FilterValues {
    /// Returns the root of the schema the values were bound for.
    pub fn schema_root(&self) -> &str {
        &self.schema_root
    }

    /// Returns the constraint for an index, if any.
    pub fn index_value(&self, name: &str) -> Option<&Value> {
        self.indexes.get(name)
    }

    /// Returns the flat-path constraints.
    pub fn field_values(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns true if no constraint is present.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty() && self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{attr::IndexAttr, fields::FieldTree};

    use super::*;

    fn books_schema() -> Schema {
        Schema::new(
            "books",
            vec![IndexAttr::new("id", AttrType::Str)],
            FieldTree::new()
                .field("title", AttrType::Str)
                .field("available", AttrType::Bool)
                .group(
                    "publisher",
                    FieldTree::new()
                        .field("name", AttrType::Str)
                        .field("city", AttrType::Str),
                )
                .group("author", FieldTree::new().field("name", AttrType::Str)),
        )
    }

    #[test]
    fn compile_binds_flat_paths_and_indexes() {
        let schema = books_schema();
        let model = FilterModel::compile(
            &schema,
            vec![
                FilterAttr::new("id", AttrType::Str).optional(),
                FilterAttr::new("publisher.city", AttrType::Str).optional(),
            ],
        )
        .unwrap();

        assert_eq!(model.schema_root(), "books");
        assert_eq!(
            model.name_map().get("publisher.city"),
            Some(&"publisher.city".to_string())
        );
    }

    #[test]
    fn compile_resolves_unique_alias() {
        let schema = books_schema();
        let model = FilterModel::compile(
            &schema,
            vec![FilterAttr::new("city", AttrType::Str).optional()],
        )
        .unwrap();
        assert_eq!(model.name_map().get("city"), Some(&"publisher.city".to_string()));
    }

    #[test]
    fn compile_rejects_ambiguous_alias() {
        let schema = books_schema();
        // "name" is a leaf of both publisher and author.
        let err = FilterModel::compile(
            &schema,
            vec![FilterAttr::new("name", AttrType::Str).optional()],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::FilterAmbiguousAlias { ref name, .. } if name == "name"));
    }

    #[test]
    fn compile_rejects_unknown_attribute() {
        let schema = books_schema();
        let err = FilterModel::compile(
            &schema,
            vec![FilterAttr::new("isbn", AttrType::Str)],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::FilterUnknownAttribute { ref name, .. } if name == "isbn"));
    }

    #[test]
    fn compile_rejects_type_mismatch() {
        let schema = books_schema();
        let err = FilterModel::compile(
            &schema,
            vec![FilterAttr::new("title", AttrType::Int)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::FilterTypeMismatch { ref expected, ref found, .. }
                if expected == "Str" && found == "Int"
        ));
    }

    #[test]
    fn compile_rejects_defaults() {
        let schema = books_schema();
        let err = FilterModel::compile(
            &schema,
            vec![FilterAttr::new("title", AttrType::Str).with_default(json!("1984"))],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::FilterDefault { ref name } if name == "title"));
    }

    #[test]
    fn bind_splits_index_and_field_values() {
        let schema = books_schema();
        let model = FilterModel::implicit(&schema);

        let mut values = Map::new();
        values.insert("id".to_string(), json!("book_101"));
        values.insert("city".to_string(), json!("London"));
        values.insert("title".to_string(), Value::Null);

        let bound = model.bind(values).unwrap();
        assert_eq!(bound.index_value("id"), Some(&json!("book_101")));
        let fields: Vec<(&String, &Value)> = bound.field_values().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "publisher.city");
    }

    #[test]
    fn bind_rejects_unknown_value() {
        let schema = books_schema();
        let model = FilterModel::empty(&schema);
        let mut values = Map::new();
        values.insert("title".to_string(), json!("1984"));
        let err = model.bind(values).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownFilterValue { ref name, .. } if name == "title"));
    }

    #[test]
    fn bind_rejects_wrong_value_type() {
        let schema = books_schema();
        let model = FilterModel::implicit(&schema);
        let mut values = Map::new();
        values.insert("available".to_string(), json!("yes"));
        let err = model.bind(values).unwrap_err();
        assert!(matches!(err, SchemaError::FilterValueType { ref name, .. } if name == "available"));
    }

    #[test]
    fn null_values_impose_no_constraint() {
        let schema = books_schema();
        let model = FilterModel::implicit(&schema);
        let mut values = Map::new();
        values.insert("title".to_string(), Value::Null);
        let bound = model.bind(values).unwrap();
        assert!(bound.is_empty());
    }
}
