//! Field trees and their flattened form.
//!
//! A schema's fields are declared as an ordered tree: leaves carry a type and
//! a default, internal nodes are named sub-trees. A leaf is addressed by its
//! *flat path*, the dotted join of its ancestor names (`publisher.city`).
//! The set of flat paths is computed once per schema and drives flattening,
//! filtering, SQL projection, and unflattening.

use serde_json::Value;

use crate::attr::AttrType;

/// A leaf field declaration.
#[derive(Debug, Clone)]
pub struct FieldLeaf {
    /// Declared type of the field values.
    pub ty: AttrType,
    /// Value used when the field is absent from an entity.
    pub default: Value,
}

/// One node of a field tree: a leaf or a named group of children.
#[derive(Debug, Clone)]
pub enum FieldNode {
    /// A terminal field.
    Leaf(FieldLeaf),
    /// A nested sub-tree.
    Group(FieldTree),
}

/// An ordered tree of field declarations.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    /// Child declarations in declaration order.
    entries: Vec<(String, FieldNode)>,
}

impl FieldTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf field with a null default.
    #[must_use]
    pub fn field(self, name: impl Into<String>, ty: AttrType) -> Self {
        self.field_with_default(name, ty, Value::Null)
    }

    /// Adds a leaf field with an explicit default.
    #[must_use]
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: AttrType,
        default: Value,
    ) -> Self {
        self.entries
            .push((name.into(), FieldNode::Leaf(FieldLeaf { ty, default })));
        self
    }

    /// Adds a named sub-tree.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, children: Self) -> Self {
        self.entries.push((name.into(), FieldNode::Group(children)));
        self
    }

    /// Returns the child declarations in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns true if the tree declares nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collects the leaf specs of this tree, depth-first in declaration order.
    pub(crate) fn flat_specs(&self) -> Vec<FieldSpec> {
        let mut out = Vec::new();
        self.collect(&mut Vec::new(), &mut out);
        out
    }

    /// Recursive worker for [`FieldTree::flat_specs`].
    fn collect(&self, prefix: &mut Vec<String>, out: &mut Vec<FieldSpec>) {
        for (name, node) in &self.entries {
            prefix.push(name.clone());
            match node {
                FieldNode::Leaf(leaf) => out.push(FieldSpec {
                    name: prefix.join("."),
                    path: prefix.clone(),
                    ty: leaf.ty,
                    default: leaf.default.clone(),
                }),
                FieldNode::Group(children) => children.collect(prefix, out),
            }
            prefix.pop();
        }
    }
}

/// A flattened leaf: the precomputed form the engine works with.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Dotted flat path (`publisher.city`).
    pub name: String,
    /// Path segments from the entity root to the leaf.
    pub path: Vec<String>,
    /// Declared type.
    pub ty: AttrType,
    /// Default used when the entity lacks the field.
    pub default: Value,
}

impl FieldSpec {
    /// Returns the final path segment (the leaf's short name).
    pub fn short_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_tree() -> FieldTree {
        FieldTree::new()
            .field("title", AttrType::Str)
            .field_with_default("available", AttrType::Bool, json!(false))
            .group(
                "publisher",
                FieldTree::new()
                    .field("name", AttrType::Str)
                    .field("city", AttrType::Str),
            )
    }

    #[test]
    fn flat_specs_are_depth_first_in_declaration_order() {
        let names: Vec<String> = sample_tree()
            .flat_specs()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec!["title", "available", "publisher.name", "publisher.city"]
        );
    }

    #[test]
    fn flat_spec_paths_and_defaults() {
        let specs = sample_tree().flat_specs();
        let available = specs.iter().find(|s| s.name == "available").unwrap();
        assert_eq!(available.default, json!(false));

        let city = specs.iter().find(|s| s.name == "publisher.city").unwrap();
        assert_eq!(city.path, vec!["publisher", "city"]);
        assert_eq!(city.short_name(), "city");
    }

    #[test]
    fn nested_groups_join_all_ancestors() {
        let tree = FieldTree::new().group(
            "a",
            FieldTree::new().group("b", FieldTree::new().field("c", AttrType::Int)),
        );
        let specs = tree.flat_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "a.b.c");
        assert_eq!(specs[0].path, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_tree() {
        assert!(FieldTree::new().is_empty());
        assert!(FieldTree::new().flat_specs().is_empty());
    }
}
