//! SQL statement lexer.
//!
//! Produces the token stream for the statement parser: identifiers (which
//! may contain dots, covering `books.publisher.city` and
//! `movies.indexes.id`), quoted strings, integer and decimal literals, and
//! the punctuation `= ( ) , *`. Keywords are ordinary identifiers here;
//! the parser matches them case-insensitively.

use std::{iter::Peekable, str::Chars};

use crate::error::EngineError;

/// A token in the SQL dialect.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlToken {
    /// An identifier or keyword: `[A-Za-z_][A-Za-z0-9_.]*`.
    Ident(String),
    /// A quoted string literal, quotes stripped.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// A decimal literal.
    Float(f64),
    /// `=`
    Eq,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `*`
    Star,
}

impl SqlToken {
    /// Returns true if this token is the given keyword (case-insensitive).
    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Ident(word) if word.eq_ignore_ascii_case(keyword))
    }
}

/// Tokenizes a SQL statement.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position, for error messages.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Result<Vec<SqlToken>, EngineError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<SqlToken>, EngineError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '=' => {
                self.advance();
                SqlToken::Eq
            }
            '(' => {
                self.advance();
                SqlToken::LParen
            }
            ')' => {
                self.advance();
                SqlToken::RParen
            }
            ',' => {
                self.advance();
                SqlToken::Comma
            }
            '*' => {
                self.advance();
                SqlToken::Star
            }
            '\'' | '"' => self.read_string(ch)?,
            '-' => self.read_number()?,
            _ if ch.is_ascii_digit() => self.read_number()?,
            _ if ch.is_ascii_alphabetic() || ch == '_' => self.read_ident(),
            _ => {
                return Err(EngineError::SqlSyntax(format!(
                    "unexpected character {ch:?} at byte {}",
                    self.position
                )));
            }
        };

        Ok(Some(token))
    }

    /// Reads a quoted string literal, stripping the quotes. A backslash
    /// escapes the following character.
    fn read_string(&mut self, quote: char) -> Result<SqlToken, EngineError> {
        let start = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();
        loop {
            match self.chars.peek() {
                Some(&ch) if ch == quote => {
                    self.advance();
                    return Ok(SqlToken::Str(content));
                }
                Some(&'\\') => {
                    self.advance();
                    if let Some(&escaped) = self.chars.peek() {
                        content.push(escaped);
                        self.advance();
                    }
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(EngineError::SqlSyntax(format!(
                        "unterminated string literal starting at byte {start}"
                    )));
                }
            }
        }
    }

    /// Reads an integer or decimal literal, with optional leading minus.
    fn read_number(&mut self) -> Result<SqlToken, EngineError> {
        let start = self.position;
        let mut text = String::new();

        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.advance();
        }

        let mut saw_digit = false;
        let mut saw_dot = false;
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                saw_digit = true;
            } else if ch == '.' && !saw_dot && saw_digit {
                saw_dot = true;
            } else {
                break;
            }
            text.push(ch);
            self.advance();
        }

        if !saw_digit {
            return Err(EngineError::SqlSyntax(format!(
                "expected digits after '-' at byte {start}"
            )));
        }

        if saw_dot {
            text.parse::<f64>()
                .map(SqlToken::Float)
                .map_err(|_| EngineError::SqlSyntax(format!("invalid number {text:?} at byte {start}")))
        } else {
            text.parse::<i64>()
                .map(SqlToken::Int)
                .map_err(|_| EngineError::SqlSyntax(format!("invalid number {text:?} at byte {start}")))
        }
    }

    /// Reads an identifier (letters, digits, underscores, dots).
    fn read_ident(&mut self) -> SqlToken {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        SqlToken::Ident(word)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a SQL statement.
pub(crate) fn tokenize(input: &str) -> Result<Vec<SqlToken>, EngineError> {
    Lexer::new(input).tokenize()
}
