//! The restricted SQL dialect.
//!
//! Accepts exactly this surface:
//!
//! ```text
//! SELECT <select-list | *>
//! FROM   <root>[.<idx1>[.<idx2>...]]
//! [ (INNER JOIN | JOIN | CROSS JOIN) <root>[.<idx...>]
//!     [ ON <ident> = <ident> (AND <ident> = <ident>)* ] ]
//! [ WHERE <where-expr> ]
//! ```
//!
//! No aliases, ORDER BY, LIMIT, projection expressions, non-equality
//! comparisons, outer joins, or subqueries. WHERE supports `=`, `AND`,
//! `OR`, and parentheses; literals are quoted strings, integers, decimals,
//! and case-insensitive `TRUE`/`FALSE`.

mod ast;
mod exec;
mod lexer;
mod parser;

use serde_json::Value;

use strata_schema::{Record, SchemaRegistry};

use crate::error::EngineError;

/// Executes a SQL statement against a document.
///
/// The FROM (and JOIN) roots are resolved through the registry; results
/// come back in canonical `{root, indexes, fields}` shape with the
/// unrestricted field map under `_all_fields`. A single trailing `;` is
/// permitted.
pub fn sql(
    statement: &str,
    document: &Value,
    registry: &SchemaRegistry,
) -> Result<Vec<Record>, EngineError> {
    let trimmed = statement.trim();
    let trimmed = trimmed
        .strip_suffix(';')
        .map_or(trimmed, str::trim_end);

    let tokens = lexer::tokenize(trimmed)?;
    let stmt = parser::parse(tokens)?;
    exec::execute(&stmt, document, registry)
}
