//! Parsed SQL statement structure.
//!
//! The parser produces explicit tagged variants; resolution against the
//! schema registry happens later, in the executor, so these types carry
//! names exactly as written.

use serde_json::Value;

/// The SELECT list: `*` or explicit column names.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectList {
    /// `SELECT *`
    Star,
    /// Explicit names, in statement order.
    Columns(Vec<String>),
}

/// A FROM target: root name plus optional index-path suffix.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FromPath {
    /// The root name (first path segment).
    pub root: String,
    /// The remaining segments, checked against the schema's index order.
    pub indexes: Vec<String>,
}

impl FromPath {
    /// Splits a dotted FROM identifier into root and index segments.
    pub(crate) fn parse(ident: &str) -> Self {
        let mut parts = ident.split('.').map(String::from);
        let root = parts.next().unwrap_or_default();
        Self {
            root,
            indexes: parts.collect(),
        }
    }
}

/// The join variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinKind {
    /// `INNER JOIN` / `JOIN`: requires an ON conjunction.
    Inner,
    /// `CROSS JOIN`: every pair, no ON clause allowed.
    Cross,
}

/// A parsed join clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JoinClause {
    /// Inner or cross.
    pub kind: JoinKind,
    /// The right-hand FROM target.
    pub from: FromPath,
    /// ON equalities as written, `(left ident, right ident)` pairs.
    pub on: Vec<(String, String)>,
}

/// A literal on the right-hand side of a WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    /// A quoted (or bare-identifier) string.
    Str(String),
    /// `TRUE` / `FALSE`, case-insensitive.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A decimal.
    Float(f64),
}

impl Literal {
    /// Converts the literal to a JSON value for typed equality.
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::from(*n),
            Self::Float(x) => Value::from(*x),
        }
    }
}

/// A WHERE expression: the boolean grammar over equality conditions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WhereExpr {
    /// Conjunction; all must hold.
    And(Vec<Self>),
    /// Disjunction; at least one must hold.
    Or(Vec<Self>),
    /// `<ident> = <literal>`, with the identifier as written.
    Cond {
        /// The identifier as written in the statement.
        ident: String,
        /// The comparison literal.
        value: Literal,
    },
}

impl WhereExpr {
    /// Creates an And expression, flattening nested Ands.
    pub(crate) fn and(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();
        match flattened.len() {
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::And(flattened),
        }
    }

    /// Creates an Or expression, flattening nested Ors.
    pub(crate) fn or(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();
        match flattened.len() {
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::Or(flattened),
        }
    }
}

/// A complete parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectStatement {
    /// The SELECT list.
    pub select: SelectList,
    /// The primary FROM target.
    pub from: FromPath,
    /// The optional join clause.
    pub join: Option<JoinClause>,
    /// The optional WHERE expression.
    pub where_expr: Option<WhereExpr>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_path_splits_root_and_indexes() {
        let path = FromPath::parse("books.id");
        assert_eq!(path.root, "books");
        assert_eq!(path.indexes, vec!["id"]);

        let path = FromPath::parse("books");
        assert_eq!(path.root, "books");
        assert!(path.indexes.is_empty());
    }

    #[test]
    fn literal_to_value() {
        assert_eq!(Literal::Str("x".into()).to_value(), json!("x"));
        assert_eq!(Literal::Bool(true).to_value(), json!(true));
        assert_eq!(Literal::Int(3).to_value(), json!(3));
        assert_eq!(Literal::Float(2.5).to_value(), json!(2.5));
    }

    #[test]
    fn where_and_flattens() {
        let cond = |ident: &str| WhereExpr::Cond {
            ident: ident.into(),
            value: Literal::Int(1),
        };
        let nested = WhereExpr::and(vec![cond("a"), WhereExpr::And(vec![cond("b"), cond("c")])]);
        assert_eq!(nested, WhereExpr::And(vec![cond("a"), cond("b"), cond("c")]));
        assert_eq!(WhereExpr::and(vec![cond("a")]), cond("a"));
    }
}
