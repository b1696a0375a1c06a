//! Query abstract syntax tree.
//!
//! The AST is an explicit tagged variant rather than a closure tree, so
//! expressions can be inspected, compared in tests, and evaluated with
//! short-circuiting.

use std::fmt;

/// A parsed boolean query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// A single search term.
    Term(String),

    /// Negation: entries must NOT match this expression.
    Not(Box<Self>),

    /// Conjunction: all sub-expressions must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Vec<Self>),
}

impl QueryExpr {
    /// Creates an And expression, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Self::And(vec![]),
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::And(flattened),
        }
    }

    /// Creates an Or expression, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        let flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Self::Or(vec![]),
            1 => flattened.into_iter().next().unwrap(),
            _ => Self::Or(flattened),
        }
    }

    /// Evaluates the expression against a term matcher.
    ///
    /// The matcher decides whether a single term matches the entry under
    /// consideration; And/Or evaluation short-circuits left to right.
    pub fn matches<F>(&self, match_term: &F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::Term(term) => match_term(term),
            Self::Not(inner) => !inner.matches(match_term),
            Self::And(exprs) => exprs.iter().all(|e| e.matches(match_term)),
            Self::Or(exprs) => exprs.iter().any(|e| e.matches(match_term)),
        }
    }

    /// Formats the expression as a tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(s) => writeln!(f, "{prefix}Term({s:?})"),
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::And(exprs) => {
                writeln!(f, "{prefix}And")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}Or")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> QueryExpr {
        QueryExpr::Term(s.into())
    }

    #[test]
    fn and_flattens_nested() {
        let nested = QueryExpr::and(vec![
            term("a"),
            QueryExpr::And(vec![term("b"), term("c")]),
        ]);
        assert_eq!(nested, QueryExpr::And(vec![term("a"), term("b"), term("c")]));
    }

    #[test]
    fn and_single_element_unwraps() {
        assert_eq!(QueryExpr::and(vec![term("a")]), term("a"));
    }

    #[test]
    fn or_flattens_nested() {
        let nested = QueryExpr::or(vec![
            term("a"),
            QueryExpr::Or(vec![term("b"), term("c")]),
        ]);
        assert_eq!(nested, QueryExpr::Or(vec![term("a"), term("b"), term("c")]));
    }

    #[test]
    fn evaluation_short_circuits() {
        let expr = QueryExpr::and(vec![term("a"), term("b")]);
        assert!(expr.matches(&|t: &str| t == "a" || t == "b"));
        assert!(!expr.matches(&|t: &str| t == "a"));

        let expr = QueryExpr::or(vec![term("a"), term("b")]);
        assert!(expr.matches(&|t: &str| t == "b"));
    }

    #[test]
    fn double_negation_is_identity() {
        let inner = term("x");
        let double = QueryExpr::Not(Box::new(QueryExpr::Not(Box::new(inner.clone()))));
        for hit in [true, false] {
            assert_eq!(double.matches(&|_: &str| hit), inner.matches(&|_: &str| hit));
        }
    }
}
