//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! expr    → term ("OR" term)*
//! term    → factor ("AND" factor)*
//! factor  → "NOT" factor | primary
//! primary → TERM | "(" expr ")"
//! ```
//!
//! Before descent, the implicit AND is inserted between adjacent primaries,
//! so the parser only ever sees explicit operators.

use crate::{
    ast::QueryExpr,
    error::QuerySyntaxError,
    lexer::{Token, insert_implicit_and, tokenize},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Option<QueryExpr>, QuerySyntaxError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_expr()?;

        if self.position < self.tokens.len() {
            return Err(QuerySyntaxError::new(
                format!("unexpected token: {:?}", self.tokens[self.position]),
                Some(self.position),
            ));
        }

        Ok(Some(expr))
    }

    /// Parses: expr → term ("OR" term)*
    fn parse_expr(&mut self) -> Result<QueryExpr, QuerySyntaxError> {
        let mut left = self.parse_term()?;

        while self.check(&Token::Or) {
            self.advance(); // consume OR
            let right = self.parse_term()?;
            left = QueryExpr::or(vec![left, right]);
        }

        Ok(left)
    }

    /// Parses: term → factor ("AND" factor)*
    fn parse_term(&mut self) -> Result<QueryExpr, QuerySyntaxError> {
        let mut left = self.parse_factor()?;

        while self.check(&Token::And) {
            self.advance(); // consume AND
            let right = self.parse_factor()?;
            left = QueryExpr::and(vec![left, right]);
        }

        Ok(left)
    }

    /// Parses: factor → "NOT" factor | primary
    fn parse_factor(&mut self) -> Result<QueryExpr, QuerySyntaxError> {
        if self.check(&Token::Not) {
            self.advance(); // consume NOT
            let inner = self.parse_factor()?;
            return Ok(QueryExpr::Not(Box::new(inner)));
        }

        self.parse_primary()
    }

    /// Parses: primary → TERM | "(" expr ")"
    fn parse_primary(&mut self) -> Result<QueryExpr, QuerySyntaxError> {
        match self.peek().cloned() {
            Some(Token::Term(text)) => {
                self.advance();
                Ok(QueryExpr::Term(text))
            }

            Some(Token::LParen) => {
                self.advance(); // consume (
                let inner = self.parse_expr()?;
                if !self.check(&Token::RParen) {
                    return Err(QuerySyntaxError::new(
                        "missing closing parenthesis",
                        Some(self.position),
                    ));
                }
                self.advance(); // consume )
                Ok(inner)
            }

            Some(token) => Err(QuerySyntaxError::new(
                format!("unexpected token {token:?} where a term was expected"),
                Some(self.position),
            )),

            None => Err(QuerySyntaxError::new("unexpected end of query", None)),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Checks if the current token equals the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into an AST.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(expr))` for valid
/// queries, or `Err` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<QueryExpr>, QuerySyntaxError> {
    let tokens = insert_implicit_and(tokenize(input));
    Parser::new(tokens).parse()
}
