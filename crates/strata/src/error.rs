//! Error types for the strata engine.

use std::fmt;

use strata_query::QuerySyntaxError;
use strata_schema::SchemaError;
use thiserror::Error;

/// The SQL clause in which a bad reference appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlClause {
    /// The SELECT list.
    Select,
    /// The FROM clause.
    From,
    /// A JOIN ON condition.
    Join,
    /// The WHERE expression.
    Where,
}

impl fmt::Display for SqlClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::From => write!(f, "FROM"),
            Self::Join => write!(f, "JOIN"),
            Self::Where => write!(f, "WHERE"),
        }
    }
}

/// Errors that can occur when searching or executing SQL.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed boolean search query.
    #[error(transparent)]
    QuerySyntax(#[from] QuerySyntaxError),

    /// Malformed SQL statement.
    #[error("invalid SQL: {0}")]
    SqlSyntax(String),

    /// SELECT, FROM, JOIN, or WHERE named a missing root, index, or field.
    #[error("unknown reference '{name}' in {clause} clause")]
    UnknownReference {
        /// The clause containing the reference.
        clause: SqlClause,
        /// The unresolvable name.
        name: String,
    },

    /// FROM path index segments disagree with the schema's index order.
    #[error("FROM path indexes {found:?} do not match schema indexes {expected:?}")]
    FromIndexMismatch {
        /// Index segments as written in the FROM path.
        found: Vec<String>,
        /// The prefix of the schema's index order they were checked against.
        expected: Vec<String>,
    },

    /// JOIN clause shape problems: JOIN without ON, CROSS JOIN with ON,
    /// or an empty ON conjunction.
    #[error("invalid join: {0}")]
    JoinSyntax(String),

    /// Filter values were bound for a different schema than the one being
    /// searched.
    #[error("filter values bound for root '{found}' cannot be used with schema '{expected}'")]
    NotAFilterModel {
        /// Root of the schema being queried.
        expected: String,
        /// Root the filter values were bound for.
        found: String,
    },

    /// Schema or filter declaration failure.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
