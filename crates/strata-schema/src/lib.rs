//! Schema declarations, filter models, and record types for strata.
//!
//! This crate holds everything the engine needs to know about the *shape*
//! of a collection before any document is touched:
//!
//! - [`Schema`]: a root name, an ordered index sequence, and a field tree
//!   with precomputed flat paths
//! - [`FilterModel`] / [`FilterValues`]: declared filter attributes compiled
//!   against a schema, and values bound through them
//! - [`SchemaRegistry`]: the context object threaded through SQL and
//!   unflattening
//! - [`Record`]: the canonical `{root, indexes, fields}` result shape
//!
//! # Example
//!
//! ```
//! use strata_schema::{AttrType, FieldTree, IndexAttr, Schema};
//!
//! let schema = Schema::new(
//!     "books",
//!     vec![IndexAttr::new("id", AttrType::Str)],
//!     FieldTree::new()
//!         .field("title", AttrType::Str)
//!         .group("publisher", FieldTree::new().field("city", AttrType::Str)),
//! );
//! assert_eq!(schema.flat_fields().len(), 2);
//! ```

#![warn(missing_docs)]

mod attr;
mod error;
mod fields;
mod filter;
mod record;
mod registry;
mod schema;
pub mod value;

pub use attr::{AttrType, IndexAttr};
pub use error::SchemaError;
pub use fields::{FieldLeaf, FieldNode, FieldSpec, FieldTree};
pub use filter::{FilterAttr, FilterModel, FilterValues};
pub use record::{Entry, Record};
pub use registry::SchemaRegistry;
pub use schema::Schema;
