//! In-memory search and SQL over hierarchical record collections.
//!
//! A document is a nested JSON mapping whose top-level keys are *roots*;
//! each root nests through the levels named by its schema's *indexes* and
//! ends at entity mappings. Against registered schemas this crate offers:
//!
//! - [`flatten`]: schema-directed flattening into uniform flat entries
//! - [`search`] / [`search_fields`] / [`search_any`]: boolean free-text
//!   search (AND/OR/NOT, implicit AND, optional fuzzy matching) over
//!   selected fields
//! - [`sql`]: a restricted `SELECT … FROM … [JOIN … ON …] [WHERE …]`
//!   dialect over the same schemas
//! - [`unflat`] / [`unflat_fields`]: rebuilding a nested document from
//!   canonical `{root, indexes, fields}` records, including extra roots
//!   produced by joins
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use strata::{AttrType, FieldTree, IndexAttr, Schema, SchemaRegistry, sql, unflat};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(Schema::new(
//!     "books",
//!     vec![IndexAttr::new("id", AttrType::Str)],
//!     FieldTree::new().field("title", AttrType::Str),
//! ))?;
//!
//! let doc = json!({"books": {"book_101": {"title": "1984"}}});
//! let records = sql("SELECT title FROM books", &doc, &registry)?;
//! let tree = unflat(&records, &registry);
//! assert_eq!(tree, json!({"books": {"book_101": {"title": "1984"}}}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod error;
mod flatten;
mod matcher;
mod search;
mod sql;
mod unflat;

pub use error::{EngineError, SqlClause};
pub use flatten::flatten;
pub use matcher::{MatchParams, similarity_threshold};
pub use search::{SearchParams, search, search_any, search_fields};
pub use sql::sql;
pub use unflat::{unflat, unflat_fields};

// Re-export the declaration and query-language surface so callers need
// only one crate.
pub use strata_query::{QueryExpr, QuerySyntaxError, parse as parse_query};
pub use strata_schema::{
    AttrType, Entry, FieldLeaf, FieldNode, FieldSpec, FieldTree, FilterAttr, FilterModel,
    FilterValues, IndexAttr, Record, Schema, SchemaError, SchemaRegistry,
};
