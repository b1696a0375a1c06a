//! Error type for boolean query parsing.

use std::{error::Error, fmt};

/// A malformed boolean query.
///
/// `position` is the index of the offending token in the token stream
/// (after implicit-AND insertion), or `None` when the input ended early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySyntaxError {
    /// Error message.
    pub message: String,
    /// Offending token index, if applicable.
    pub position: Option<usize>,
}

impl QuerySyntaxError {
    /// Creates a new syntax error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for QuerySyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(idx) => write!(f, "query syntax error at token {}: {}", idx, self.message),
            None => write!(f, "query syntax error: {}", self.message),
        }
    }
}

impl Error for QuerySyntaxError {}
