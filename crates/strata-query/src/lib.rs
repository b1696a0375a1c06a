//! Boolean query parsing and AST for strata search.
//!
//! This crate provides the free-text query language used by the search
//! façade:
//!
//! - **Terms**: `orwell` - words to match against a field
//! - **AND**: `orwell 1984` or `orwell AND 1984` - both must match
//! - **OR**: `orwell OR huxley` - alternatives
//! - **NOT**: `orwell NOT essays` - exclusion
//! - **Grouping**: `(a b) OR (c d)` - precedence control
//!
//! Adjacent primaries are joined by an implicit AND, so `a b` and
//! `a AND b` parse identically. Reserved words are uppercase; `and`,
//! `or`, and `not` are ordinary terms.
//!
//! The crate is purely syntactic: evaluation takes a caller-supplied
//! term matcher, so how a term matches an entry (substring, exact,
//! fuzzy) is decided by the engine.
//!
//! # Example
//!
//! ```
//! use strata_query::parse;
//!
//! let expr = parse("title NOT draft").unwrap().unwrap();
//! assert!(expr.matches(&|term: &str| term == "title"));
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::QueryExpr;
pub use error::QuerySyntaxError;
pub use lexer::{Token, insert_implicit_and, tokenize};
pub use parser::parse;
