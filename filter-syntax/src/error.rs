use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// A character no token rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalChar {
    pub ch: char,
    pub position: usize,
}

impl fmt::Display for IllegalChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at byte {}", self.ch, self.position)
    }
}

fn list_illegal(chars: &[IllegalChar]) -> String {
    chars.iter().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("{} illegal character(s): {}", .0.len(), list_illegal(.0))]
    IllegalCharacters(Vec<IllegalChar>),
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },
    #[error("unexpected end of filter, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unknown filter type `{0}`")]
    UnknownFilterType(String),
    #[error("value `{0}` must be quoted")]
    UnquotedValue(String),
    #[error("integer `{0}` is out of range")]
    IntegerOutOfRange(String),
}

/// Lexical or syntax failure. Parsing never returns a partial tree alongside
/// one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Characters rejected by the lexer, empty for syntax errors.
    pub fn illegal_characters(&self) -> &[IllegalChar] {
        match &self.kind {
            ParseErrorKind::IllegalCharacters(chars) => chars,
            _ => &[],
        }
    }

    pub fn is_unknown_filter_type(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnknownFilterType(_))
    }
}

/// A value that cannot be written as a string literal. The language has no
/// escape for `"`, so a bound tree holding one would not print back to text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value `{value}` bound to {variable} contains a double quote")]
pub struct BindError {
    pub variable: String,
    pub value: String,
}
