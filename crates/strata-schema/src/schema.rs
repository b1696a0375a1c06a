//! Schema declarations.
//!
//! A schema binds a document root to an ordered index sequence and a field
//! tree. The flat field list is computed once at construction; everything
//! downstream (flattening, filter compilation, SQL resolution) works off the
//! precomputed specs rather than re-walking the tree.

use crate::{
    attr::IndexAttr,
    fields::{FieldSpec, FieldTree},
};

/// A declared collection shape: root name, index sequence, field tree.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Top-level document key this schema describes.
    root: String,
    /// Ordered index attributes; order is the nesting order.
    indexes: Vec<IndexAttr>,
    /// Declared entity shape.
    fields: FieldTree,
    /// Flat leaf specs, precomputed from `fields`.
    flat: Vec<FieldSpec>,
}

impl Schema {
    /// Creates a schema and precomputes its flat field set.
    pub fn new(root: impl Into<String>, indexes: Vec<IndexAttr>, fields: FieldTree) -> Self {
        let flat = fields.flat_specs();
        Self {
            root: root.into(),
            indexes,
            fields,
            flat,
        }
    }

    /// Returns the root name.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the ordered index attributes.
    pub fn indexes(&self) -> &[IndexAttr] {
        &self.indexes
    }

    /// Returns the index names in nesting order.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.iter().map(|attr| attr.name.as_str())
    }

    /// Looks up an index attribute by name.
    pub fn index(&self, name: &str) -> Option<&IndexAttr> {
        self.indexes.iter().find(|attr| attr.name == name)
    }

    /// Returns true if `name` is one of the schema's indexes.
    pub fn has_index(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// Returns the declared field tree.
    pub fn fields(&self) -> &FieldTree {
        &self.fields
    }

    /// Returns the precomputed flat field specs.
    pub fn flat_fields(&self) -> &[FieldSpec] {
        &self.flat
    }

    /// Looks up a flat field spec by its dotted name.
    pub fn flat_field(&self, name: &str) -> Option<&FieldSpec> {
        self.flat.iter().find(|spec| spec.name == name)
    }
}
