//! The schema registry.
//!
//! A registry is an explicit context value threaded through the operations
//! that need cross-schema knowledge (SQL, unflattening). Registration order
//! is preserved; all registrations are expected to complete before queries
//! run, and the registry itself takes no locks.

use indexmap::IndexMap;

use crate::{error::SchemaError, schema::Schema};

/// Root-name-to-schema mapping with preserved registration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Registered schemas keyed by root.
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its root name.
    pub fn register(&mut self, schema: Schema) -> Result<(), SchemaError> {
        let root = schema.root().to_string();
        if self.schemas.contains_key(&root) {
            return Err(SchemaError::AlreadyRegistered { root });
        }
        self.schemas.insert(root, schema);
        Ok(())
    }

    /// Looks up a schema by root name.
    pub fn get(&self, root: &str) -> Option<&Schema> {
        self.schemas.get(root)
    }

    /// Returns true if a schema is registered for `root`.
    pub fn contains(&self, root: &str) -> bool {
        self.schemas.contains_key(root)
    }

    /// Iterates the registered schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(root, schema)| (root.as_str(), schema))
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{attr::{AttrType, IndexAttr}, fields::FieldTree};

    use super::*;

    fn schema(root: &str) -> Schema {
        Schema::new(
            root,
            vec![IndexAttr::new("id", AttrType::Str)],
            FieldTree::new().field("title", AttrType::Str),
        )
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("books")).unwrap();
        assert!(registry.contains("books"));
        assert_eq!(registry.get("books").unwrap().root(), "books");
        assert!(registry.get("movies").is_none());
    }

    #[test]
    fn duplicate_root_is_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("books")).unwrap();
        let err = registry.register(schema("books")).unwrap_err();
        assert!(matches!(err, SchemaError::AlreadyRegistered { ref root } if root == "books"));
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("movies")).unwrap();
        registry.register(schema("books")).unwrap();
        let roots: Vec<&str> = registry.iter().map(|(root, _)| root).collect();
        assert_eq!(roots, vec!["movies", "books"]);
    }
}
