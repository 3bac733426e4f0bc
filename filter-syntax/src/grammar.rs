//! The filter grammar, written once and driven by a [`Reduce`] implementation.
//!
//! ```text
//! filter     := filterpart | ε
//! filterpart := filterpart (AND | OR) filterpart     -- equal precedence, left assoc
//!             | NOT filterpart                       -- binds tighter than AND/OR
//!             | LPAREN filterpart RPAREN
//!             | FILTERTYPE IN expression
//!             | FILTERTYPE IN VARIABLE
//! expression := expression COMMA expression | STRING | INTEGER
//! ```

use crate::{
    BoolOp, Literal, Node, ParseError, ParseErrorKind, Token, TokenKind, ast::flatten_values,
};

/// Callbacks invoked as productions are reduced. The grammar owns the shape
/// of the tree; implementations decide what each reduction produces.
pub trait Reduce {
    type Output;

    /// Root of the filter; `None` for empty input.
    fn filter(&mut self, root: Option<Self::Output>) -> Self::Output;
    fn binary(&mut self, left: Self::Output, op: BoolOp, right: Self::Output) -> Self::Output;
    fn not(&mut self, inner: Self::Output) -> Self::Output;
    fn literal(&mut self, literal: Literal) -> Self::Output;
    fn comma(&mut self, left: Self::Output, right: Self::Output) -> Self::Output;
    fn filter_part(&mut self, filter_type: &str, values: Self::Output) -> Self::Output;
    fn variable_part(&mut self, filter_type: &str, variable: &str) -> Self::Output;

    /// Parenthesized sub-filter. Most outputs have no use for the grouping.
    fn group(&mut self, inner: Self::Output) -> Self::Output {
        inner
    }
}

/// Parses `tokens` with the given actions. `end` is the input length, used
/// as the position of "unexpected end" errors.
pub fn parse_tokens<R: Reduce + ?Sized>(
    tokens: &[Token],
    end: usize,
    actions: &mut R,
) -> Result<R::Output, ParseError> {
    Grammar {
        tokens,
        pos: 0,
        end,
        actions,
    }
    .parse()
}

/// Builds the predicate AST ([`Node`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct AstBuilder;

impl Reduce for AstBuilder {
    type Output = Node;

    fn filter(&mut self, root: Option<Node>) -> Node {
        Node::Filter(root.map(Box::new))
    }

    fn binary(&mut self, left: Node, op: BoolOp, right: Node) -> Node {
        Node::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn not(&mut self, inner: Node) -> Node {
        Node::Not(Box::new(inner))
    }

    fn literal(&mut self, literal: Literal) -> Node {
        match literal {
            Literal::String(text) => Node::StringLit(text),
            Literal::Integer(value) => Node::IntLit(value),
        }
    }

    fn comma(&mut self, left: Node, right: Node) -> Node {
        Node::Comma {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn filter_part(&mut self, filter_type: &str, values: Node) -> Node {
        Node::FilterPart {
            filter_type: filter_type.to_string(),
            values: Some(flatten_values(values)),
            variable: None,
        }
    }

    fn variable_part(&mut self, filter_type: &str, variable: &str) -> Node {
        Node::variable_part(filter_type, variable)
    }
}

struct Grammar<'t, 'a, R: ?Sized> {
    tokens: &'t [Token],
    pos: usize,
    end: usize,
    actions: &'a mut R,
}

impl<'t, R: Reduce + ?Sized> Grammar<'t, '_, R> {
    fn parse(mut self) -> Result<R::Output, ParseError> {
        if self.peek().is_none() {
            return Ok(self.actions.filter(None));
        }
        let root = self.filter_part()?;
        if let Some(token) = self.peek() {
            return Err(unexpected(token, "AND, OR or end of filter"));
        }
        Ok(self.actions.filter(Some(root)))
    }

    fn filter_part(&mut self) -> Result<R::Output, ParseError> {
        let mut left = self.unary()?;
        while let Some(op) = self.peek().and_then(bool_op) {
            self.pos += 1;
            let right = self.unary()?;
            left = self.actions.binary(left, op, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<R::Output, ParseError> {
        const EXPECTED: &str = "a filter type, NOT or `(`";
        let Some(token) = self.next() else {
            return Err(self.end_error(EXPECTED));
        };
        match token.kind {
            TokenKind::Not => {
                let inner = self.unary()?;
                Ok(self.actions.not(inner))
            }
            TokenKind::LParen => {
                let inner = self.filter_part()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(self.actions.group(inner))
            }
            TokenKind::FilterType => self.filter_part_body(token),
            TokenKind::Id => Err(ParseError::new(
                ParseErrorKind::UnknownFilterType(token.value.clone()),
                token.position,
            )),
            _ => Err(unexpected(token, EXPECTED)),
        }
    }

    fn filter_part_body(&mut self, filter_type: &Token) -> Result<R::Output, ParseError> {
        self.expect(TokenKind::In, "`=` or IN")?;
        if let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Variable) {
            self.pos += 1;
            return Ok(self.actions.variable_part(&filter_type.value, &token.value));
        }
        let values = self.expression()?;
        Ok(self.actions.filter_part(&filter_type.value, values))
    }

    fn expression(&mut self) -> Result<R::Output, ParseError> {
        let mut left = self.value()?;
        while self.peek().is_some_and(|t| t.kind == TokenKind::Comma) {
            self.pos += 1;
            let right = self.value()?;
            left = self.actions.comma(left, right);
        }
        Ok(left)
    }

    fn value(&mut self) -> Result<R::Output, ParseError> {
        const EXPECTED: &str = "a quoted string or an integer";
        let Some(token) = self.next() else {
            return Err(self.end_error(EXPECTED));
        };
        let literal = match token.kind {
            TokenKind::String => Literal::String(token.value.clone()),
            TokenKind::Integer => match token.value.parse() {
                Ok(value) => Literal::Integer(value),
                Err(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::IntegerOutOfRange(token.value.clone()),
                        token.position,
                    ));
                }
            },
            // A bare word never names a value, e.g. `Clan = Ventrue`.
            TokenKind::Id => {
                return Err(ParseError::new(
                    ParseErrorKind::UnquotedValue(token.value.clone()),
                    token.position,
                ));
            }
            _ => return Err(unexpected(token, EXPECTED)),
        };
        Ok(self.actions.literal(literal))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(unexpected(token, expected)),
            None => Err(self.end_error(expected)),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn end_error(&self, expected: &'static str) -> ParseError {
        ParseError::new(ParseErrorKind::UnexpectedEnd { expected }, self.end)
    }
}

fn bool_op(token: &Token) -> Option<BoolOp> {
    match token.kind {
        TokenKind::And => Some(BoolOp::And),
        TokenKind::Or => Some(BoolOp::Or),
        _ => None,
    }
}

fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken {
            found: token.to_string(),
            expected,
        },
        token.position,
    )
}
