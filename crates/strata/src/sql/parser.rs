//! SQL statement parser.
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! statement → SELECT select_list FROM path [join] [WHERE where_expr]
//! join      → (INNER JOIN | JOIN | CROSS JOIN) path [ON cond (AND cond)*]
//! where_expr→ where_term ("OR" where_term)*
//! where_term→ where_factor ("AND" where_factor)*
//! where_factor → "(" where_expr ")" | IDENT "=" literal
//! ```
//!
//! Join-shape violations (ON missing or misplaced, empty ON conjunction)
//! surface as [`EngineError::JoinSyntax`]; everything else malformed is
//! [`EngineError::SqlSyntax`].

use crate::{
    error::EngineError,
    sql::{
        ast::{FromPath, JoinClause, JoinKind, Literal, SelectList, SelectStatement, WhereExpr},
        lexer::SqlToken,
    },
};

/// Recursive descent parser for SQL statements.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<SqlToken>,
    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<SqlToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the complete statement.
    fn parse(mut self) -> Result<SelectStatement, EngineError> {
        self.expect_keyword("SELECT")?;
        let select = self.parse_select_list()?;
        self.expect_keyword("FROM")?;
        let from = FromPath::parse(&self.take_name("FROM target")?);

        let join = self.parse_join()?;

        let where_expr = if self.take_keyword("WHERE") {
            Some(self.parse_where_expr()?)
        } else {
            None
        };

        if let Some(token) = self.peek() {
            return Err(EngineError::SqlSyntax(format!(
                "unexpected token {token:?} after statement"
            )));
        }

        Ok(SelectStatement {
            select,
            from,
            join,
            where_expr,
        })
    }

    /// Parses `*` or a comma-separated list of column names.
    fn parse_select_list(&mut self) -> Result<SelectList, EngineError> {
        if self.peek() == Some(&SqlToken::Star) {
            self.advance();
            return Ok(SelectList::Star);
        }

        let mut columns = vec![self.take_name("SELECT list")?];
        while self.peek() == Some(&SqlToken::Comma) {
            self.advance();
            columns.push(self.take_name("SELECT list")?);
        }
        Ok(SelectList::Columns(columns))
    }

    /// Parses an optional join clause.
    fn parse_join(&mut self) -> Result<Option<JoinClause>, EngineError> {
        let kind = if self.take_keyword("INNER") {
            if !self.take_keyword("JOIN") {
                return Err(EngineError::JoinSyntax(
                    "expected JOIN after INNER".to_string(),
                ));
            }
            JoinKind::Inner
        } else if self.take_keyword("CROSS") {
            if !self.take_keyword("JOIN") {
                return Err(EngineError::JoinSyntax(
                    "expected JOIN after CROSS".to_string(),
                ));
            }
            JoinKind::Cross
        } else if self.take_keyword("JOIN") {
            JoinKind::Inner
        } else {
            return Ok(None);
        };

        let from = FromPath::parse(&self.take_name("JOIN target")?);

        let on = if self.take_keyword("ON") {
            self.parse_on_conditions()?
        } else {
            Vec::new()
        };

        match kind {
            JoinKind::Inner if on.is_empty() => Err(EngineError::JoinSyntax(
                "JOIN requires an ON clause".to_string(),
            )),
            JoinKind::Cross if !on.is_empty() => Err(EngineError::JoinSyntax(
                "CROSS JOIN must not have an ON clause".to_string(),
            )),
            _ => Ok(Some(JoinClause { kind, from, on })),
        }
    }

    /// Parses `ident = ident (AND ident = ident)*` after ON.
    fn parse_on_conditions(&mut self) -> Result<Vec<(String, String)>, EngineError> {
        // An ON keyword followed by no condition is an empty ON clause.
        if !matches!(self.peek(), Some(SqlToken::Ident(word)) if !is_clause_keyword(word)) {
            return Err(EngineError::JoinSyntax("empty ON clause".to_string()));
        }

        let mut conditions = Vec::new();
        loop {
            let left = self.take_name("ON condition")?;
            self.expect_token(&SqlToken::Eq, "'=' in ON condition")?;
            let right = self.take_name("ON condition")?;
            conditions.push((left, right));

            if !self.take_keyword("AND") {
                break;
            }
        }
        Ok(conditions)
    }

    /// Parses: where_expr → where_term ("OR" where_term)*
    fn parse_where_expr(&mut self) -> Result<WhereExpr, EngineError> {
        let mut left = self.parse_where_term()?;
        while self.take_keyword("OR") {
            let right = self.parse_where_term()?;
            left = WhereExpr::or(vec![left, right]);
        }
        Ok(left)
    }

    /// Parses: where_term → where_factor ("AND" where_factor)*
    fn parse_where_term(&mut self) -> Result<WhereExpr, EngineError> {
        let mut left = self.parse_where_factor()?;
        while self.take_keyword("AND") {
            let right = self.parse_where_factor()?;
            left = WhereExpr::and(vec![left, right]);
        }
        Ok(left)
    }

    /// Parses: where_factor → "(" where_expr ")" | condition
    fn parse_where_factor(&mut self) -> Result<WhereExpr, EngineError> {
        if self.peek() == Some(&SqlToken::LParen) {
            self.advance();
            let inner = self.parse_where_expr()?;
            self.expect_token(&SqlToken::RParen, "closing ')' in WHERE clause")?;
            return Ok(inner);
        }

        let ident = self.take_name("WHERE condition")?;
        self.expect_token(&SqlToken::Eq, "'=' in WHERE condition")?;
        let value = self.take_literal()?;
        Ok(WhereExpr::Cond { ident, value })
    }

    /// Consumes a literal token and interprets it.
    fn take_literal(&mut self) -> Result<Literal, EngineError> {
        let literal = match self.peek() {
            Some(SqlToken::Str(s)) => Literal::Str(s.clone()),
            Some(SqlToken::Int(n)) => Literal::Int(*n),
            Some(SqlToken::Float(x)) => Literal::Float(*x),
            Some(SqlToken::Ident(word)) if word.eq_ignore_ascii_case("TRUE") => Literal::Bool(true),
            Some(SqlToken::Ident(word)) if word.eq_ignore_ascii_case("FALSE") => {
                Literal::Bool(false)
            }
            Some(SqlToken::Ident(word)) if is_clause_keyword(word) => {
                return Err(EngineError::SqlSyntax(format!(
                    "expected value but got {word:?} in WHERE clause"
                )));
            }
            // A bare identifier compares as a string.
            Some(SqlToken::Ident(word)) => Literal::Str(word.clone()),
            Some(token) => {
                return Err(EngineError::SqlSyntax(format!(
                    "expected value but got {token:?} in WHERE clause"
                )));
            }
            None => {
                return Err(EngineError::SqlSyntax(
                    "unexpected end of WHERE clause (expected value)".to_string(),
                ));
            }
        };
        self.advance();
        Ok(literal)
    }

    /// Consumes an identifier token, rejecting clause keywords.
    fn take_name(&mut self, context: &str) -> Result<String, EngineError> {
        match self.peek() {
            Some(SqlToken::Ident(word)) if !is_clause_keyword(word) => {
                let name = word.clone();
                self.advance();
                Ok(name)
            }
            Some(token) => Err(EngineError::SqlSyntax(format!(
                "expected identifier in {context} but got {token:?}"
            ))),
            None => Err(EngineError::SqlSyntax(format!(
                "unexpected end of statement (expected {context})"
            ))),
        }
    }

    /// Consumes the expected keyword or fails.
    fn expect_keyword(&mut self, keyword: &str) -> Result<(), EngineError> {
        if self.take_keyword(keyword) {
            Ok(())
        } else {
            Err(EngineError::SqlSyntax(format!(
                "expected {keyword} at token {}",
                self.position
            )))
        }
    }

    /// Consumes the given keyword if it is next; returns whether it was.
    fn take_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the expected punctuation token or fails.
    fn expect_token(&mut self, token: &SqlToken, what: &str) -> Result<(), EngineError> {
        if self.peek() == Some(token) {
            self.advance();
            Ok(())
        } else {
            Err(EngineError::SqlSyntax(format!("expected {what}")))
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&SqlToken> {
        self.tokens.get(self.position)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Returns true for words that introduce or continue a clause and so can
/// never be column or table names.
fn is_clause_keyword(word: &str) -> bool {
    const KEYWORDS: [&str; 8] = ["SELECT", "FROM", "WHERE", "JOIN", "INNER", "CROSS", "ON", "AND"];
    KEYWORDS.iter().any(|kw| word.eq_ignore_ascii_case(kw))
}

/// Parses a token stream into a statement.
pub(crate) fn parse(tokens: Vec<SqlToken>) -> Result<SelectStatement, EngineError> {
    Parser::new(tokens).parse()
}
