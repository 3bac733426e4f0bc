use std::fmt;

/// Token classes produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    FilterType,
    Id,
    Integer,
    String,
    And,
    Or,
    Not,
    Comma,
    In,
    LParen,
    RParen,
    Variable,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::FilterType => "FILTERTYPE",
            TokenKind::Id => "ID",
            TokenKind::Integer => "INTEGER",
            TokenKind::String => "STRING",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Comma => "COMMA",
            TokenKind::In => "IN",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Variable => "VARIABLE",
        };
        f.write_str(name)
    }
}

/// One lexed token. `value` holds the matched text; for strings the quotes
/// are stripped, for variables the leading `$` is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte offset of the first character of the match.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{} \"{}\"", self.kind, self.value),
            _ => write!(f, "{} `{}`", self.kind, self.value),
        }
    }
}
