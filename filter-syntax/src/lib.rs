//! # Card filter expression syntax
//!
//! `filter-syntax` lexes and parses the small boolean filter language used to
//! query a card catalog:
//!
//! ```text
//! CardType = "Vampire" AND Clan = "Ventrue", "Toreador" OR Discipline = $disc
//! ```
//!
//! The grammar is defined once ([`grammar`]) and reduced by pluggable actions:
//! [`AstBuilder`] yields the [`Node`] tree that the predicate builder consumes,
//! [`WidgetBuilder`] yields form descriptors for an interactive filter editor.
//!
//! Filter-type names are not keywords of the language. They come from a
//! [`KeywordTable`] that the caller builds once from its registry, so the
//! lexer only does a lookup to tell `Clan` (a filter type) from `Foo` (an
//! unknown identifier).
//!
//! ## Example
//! ```
//! use filter_syntax::{parse_filter, BoolOp, KeywordTable, Node};
//!
//! let keywords = KeywordTable::new(["Clan", "CardType"]);
//! let node = parse_filter("CardType = \"Vampire\" AND Clan = \"Ventrue\", \"Tremere\"", &keywords).unwrap();
//! let Node::Filter(Some(root)) = &node else { panic!() };
//! let Node::BinOp { op, right, .. } = &**root else { panic!() };
//! assert_eq!(*op, BoolOp::And);
//! assert!(matches!(&**right, Node::FilterPart { values: Some(values), .. } if values.len() == 2));
//! // printing gives back equivalent filter text
//! assert_eq!(node.to_string(), "CardType = \"Vampire\" AND Clan = \"Ventrue\", \"Tremere\"");
//! ```

mod ast;
mod error;
pub mod grammar;
mod lexer;
mod token;
mod widget;

pub use ast::{BoolOp, Literal, Node, flatten_values};
pub use error::{BindError, IllegalChar, ParseError, ParseErrorKind};
pub use grammar::{AstBuilder, Reduce, parse_tokens};
pub use lexer::{KeywordTable, LexReport, lex, lex_lossy, scan};
pub use token::{Token, TokenKind};
pub use widget::{DomainSource, ValueDomain, Widget, WidgetBuilder};

/// Parses filter text into the predicate AST.
pub fn parse_filter(input: &str, keywords: &KeywordTable) -> Result<Node, ParseError> {
    parse_with(input, keywords, &mut AstBuilder)
}

/// Parses filter text into widget descriptors for the filter editor.
pub fn parse_widgets<D: DomainSource + ?Sized>(
    input: &str,
    keywords: &KeywordTable,
    domains: &D,
) -> Result<Vec<Widget>, ParseError> {
    parse_with(input, keywords, &mut WidgetBuilder::new(domains))
}

/// Lexes and parses `input` with arbitrary reduce actions.
pub fn parse_with<R: Reduce + ?Sized>(
    input: &str,
    keywords: &KeywordTable,
    actions: &mut R,
) -> Result<R::Output, ParseError> {
    let tokens = lex(input, keywords)?;
    parse_tokens(&tokens, input.len(), actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> KeywordTable {
        KeywordTable::new(["A", "B", "C", "D", "Clan"])
    }

    fn part(filter_type: &str, value: &str) -> Node {
        Node::filter_part(filter_type, [value])
    }

    fn bin(left: Node, op: BoolOp, right: Node) -> Node {
        Node::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn root(node: Node) -> Node {
        Node::Filter(Some(Box::new(node)))
    }

    #[test]
    fn parses_empty_filter() {
        assert_eq!(parse_filter("", &keywords()).unwrap(), Node::empty());
        assert_eq!(parse_filter(" \t\n", &keywords()).unwrap(), Node::empty());
    }

    #[test]
    fn and_or_share_precedence_and_associate_left() {
        let node = parse_filter(
            "A = \"a\" AND B = \"b\" OR C = \"c\" AND D = \"d\"",
            &keywords(),
        )
        .unwrap();
        let expected = bin(
            bin(
                bin(part("A", "a"), BoolOp::And, part("B", "b")),
                BoolOp::Or,
                part("C", "c"),
            ),
            BoolOp::And,
            part("D", "d"),
        );
        assert_eq!(node, root(expected));
    }

    #[test]
    fn comma_binds_tighter_than_and() {
        let node = parse_filter("A = \"x\", \"y\" AND B = \"z\"", &keywords()).unwrap();
        let expected = bin(
            Node::filter_part("A", ["x", "y"]),
            BoolOp::And,
            part("B", "z"),
        );
        assert_eq!(node, root(expected));
    }

    #[test]
    fn parentheses_override_grouping() {
        let node = parse_filter("A = \"a\" AND (B = \"b\" OR C = \"c\")", &keywords()).unwrap();
        let expected = bin(
            part("A", "a"),
            BoolOp::And,
            bin(part("B", "b"), BoolOp::Or, part("C", "c")),
        );
        assert_eq!(node, root(expected));
    }

    #[test]
    fn not_binds_to_the_next_operand_only() {
        let node = parse_filter("NOT A = \"a\" AND B = \"b\"", &keywords()).unwrap();
        let expected = bin(
            Node::Not(Box::new(part("A", "a"))),
            BoolOp::And,
            part("B", "b"),
        );
        assert_eq!(node, root(expected));
    }

    #[test]
    fn integers_and_variables() {
        let node = parse_filter("A = 1, 12 OR B in $b", &keywords()).unwrap();
        let expected = bin(
            Node::FilterPart {
                filter_type: "A".into(),
                values: Some(vec![Node::IntLit(1), Node::IntLit(12)]),
                variable: None,
            },
            BoolOp::Or,
            Node::variable_part("B", "$b"),
        );
        assert_eq!(node, root(expected));
    }

    #[test]
    fn rejects_trailing_tokens() {
        let err = parse_filter("A = \"a\" B = \"b\"", &keywords()).unwrap_err();
        assert_eq!(err.position, 8);
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn rejects_unknown_filter_type() {
        let err = parse_filter("Bogus = \"x\"", &keywords()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownFilterType("Bogus".into()));
        assert_eq!(err.position, 0);
    }

    #[test]
    fn rejects_unquoted_value() {
        let err = parse_filter("Clan = Ventrue", &keywords()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnquotedValue("Ventrue".into()));
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let err = parse_filter("(A = \"a\"", &keywords()).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedEnd { expected: "`)`" }
        );
        assert_eq!(err.position, 8);

        let err = parse_filter("A = \"a\")", &keywords()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn variable_cannot_join_a_value_list() {
        assert!(parse_filter("A = $a, \"b\"", &keywords()).is_err());
        assert!(parse_filter("A = \"b\", $a", &keywords()).is_err());
    }

    #[test]
    fn integer_overflow_is_reported() {
        let err = parse_filter("A = 99999999999999999999", &keywords()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::IntegerOutOfRange(_)));
    }
}
