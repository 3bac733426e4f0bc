//! Two-phase lexer: [`scan`] splits the input into generic tokens (every word
//! comes out as [`TokenKind::Id`]), then [`KeywordTable::classify`] turns words
//! into keywords, filter types, variables, or bare identifiers.

use crate::{IllegalChar, ParseError, ParseErrorKind, Token, TokenKind};
use std::collections::BTreeSet;
use tracing::debug;

/// Immutable table of the filter-type names known when the engine starts.
///
/// Filter-type names are matched case-sensitively; only the `and`/`or`/`in`/
/// `not` keywords ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    filter_types: BTreeSet<String>,
}

impl KeywordTable {
    pub fn new<I, S>(filter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_types: filter_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filter_types.contains(name)
    }

    pub fn filter_types(&self) -> impl Iterator<Item = &str> {
        self.filter_types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.filter_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filter_types.is_empty()
    }

    /// Classifies a `[A-Za-z$]+` word.
    pub fn classify(&self, word: &str) -> TokenKind {
        if word.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else if word.eq_ignore_ascii_case("in") {
            TokenKind::In
        } else if word.eq_ignore_ascii_case("not") {
            TokenKind::Not
        } else if self.contains(word) {
            TokenKind::FilterType
        } else if word.starts_with('$') {
            TokenKind::Variable
        } else {
            TokenKind::Id
        }
    }
}

/// Output of the generic scan: tokens plus every character that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexReport {
    pub tokens: Vec<Token>,
    pub illegal: Vec<IllegalChar>,
}

impl LexReport {
    pub fn is_clean(&self) -> bool {
        self.illegal.is_empty()
    }
}

/// Lexes `input`, failing if any illegal character was seen.
pub fn lex(input: &str, keywords: &KeywordTable) -> Result<Vec<Token>, ParseError> {
    let report = lex_lossy(input, keywords);
    match report.illegal.first() {
        None => Ok(report.tokens),
        Some(first) => {
            let position = first.position;
            Err(ParseError::new(
                ParseErrorKind::IllegalCharacters(report.illegal),
                position,
            ))
        }
    }
}

/// Lexes `input` best-effort: illegal characters are recorded and skipped so
/// the caller can show every problem at once. A report with illegal
/// characters must not be handed to the parser as if it were valid.
pub fn lex_lossy(input: &str, keywords: &KeywordTable) -> LexReport {
    let mut report = scan(input);
    for token in &mut report.tokens {
        if token.kind == TokenKind::Id {
            token.kind = keywords.classify(&token.value);
        }
    }
    debug!(
        tokens = report.tokens.len(),
        illegal = report.illegal.len(),
        "lexed filter"
    );
    report
}

/// First phase: tokenize without consulting any registry.
pub fn scan(input: &str) -> LexReport {
    let mut report = LexReport::default();
    let mut pos = 0;
    while let Some(ch) = input[pos..].chars().next() {
        let rest = &input[pos..];
        match ch {
            ' ' | '\t' | '\n' | '\r' => pos += 1,
            '&' if rest.starts_with("&&") => {
                report.tokens.push(Token::new(TokenKind::And, "&&", pos));
                pos += 2;
            }
            '|' if rest.starts_with("||") => {
                report.tokens.push(Token::new(TokenKind::Or, "||", pos));
                pos += 2;
            }
            '"' => match rest[1..].find('"') {
                Some(len) => {
                    let text = &rest[1..1 + len];
                    report.tokens.push(Token::new(TokenKind::String, text, pos));
                    pos += len + 2;
                }
                None => {
                    report.illegal.push(IllegalChar { ch, position: pos });
                    pos += 1;
                }
            },
            '0'..='9' => {
                let len = span(rest, |c| c.is_ascii_digit());
                report
                    .tokens
                    .push(Token::new(TokenKind::Integer, &rest[..len], pos));
                pos += len;
            }
            ',' => {
                report.tokens.push(Token::new(TokenKind::Comma, ",", pos));
                pos += 1;
            }
            '=' => {
                report.tokens.push(Token::new(TokenKind::In, "=", pos));
                pos += 1;
            }
            '(' => {
                report.tokens.push(Token::new(TokenKind::LParen, "(", pos));
                pos += 1;
            }
            ')' => {
                report.tokens.push(Token::new(TokenKind::RParen, ")", pos));
                pos += 1;
            }
            c if is_word_char(c) => {
                let len = span(rest, is_word_char);
                report
                    .tokens
                    .push(Token::new(TokenKind::Id, &rest[..len], pos));
                pos += len;
            }
            _ => {
                report.illegal.push(IllegalChar { ch, position: pos });
                pos += ch.len_utf8();
            }
        }
    }
    report
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$'
}

// Byte length of the leading run of characters accepted by `accept`.
fn span(text: &str, accept: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|&(_, c)| !accept(c))
        .map_or(text.len(), |(idx, _)| idx)
}
