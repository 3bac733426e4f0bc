#![allow(dead_code)]
//! Shared helpers for `filter-syntax` integration tests.

use filter_syntax::*;

pub const FILTER_TYPES: &[&str] = &[
    "CardType",
    "Clan",
    "Discipline",
    "Sect",
    "Group",
    "Capacity",
    "CardName",
    "CardText",
    "CardSet",
];

pub fn keywords() -> KeywordTable {
    KeywordTable::new(FILTER_TYPES.iter().copied())
}

pub fn parse_ok(input: &str) -> Node {
    parse_filter(input, &keywords()).unwrap()
}

pub fn parse_err(input: &str) -> ParseError {
    parse_filter(input, &keywords()).unwrap_err()
}

pub fn root(node: &Node) -> &Node {
    match node {
        Node::Filter(Some(inner)) => inner,
        other => panic!("expected non-empty Filter, got: {other:?}"),
    }
}

pub fn as_binop(node: &Node) -> (&Node, BoolOp, &Node) {
    match node {
        Node::BinOp { left, op, right } => (left, *op, right),
        other => panic!("expected BinOp, got: {other:?}"),
    }
}

pub fn as_not(node: &Node) -> &Node {
    match node {
        Node::Not(inner) => inner,
        other => panic!("expected Not, got: {other:?}"),
    }
}

pub fn part_is(node: &Node, filter_type: &str, expected: &[&str]) {
    match node {
        Node::FilterPart {
            filter_type: ft,
            values: Some(values),
            variable: None,
        } => {
            assert_eq!(ft, filter_type);
            let texts: Vec<String> = values
                .iter()
                .map(|value| match value {
                    Node::StringLit(text) => text.clone(),
                    Node::IntLit(value) => value.to_string(),
                    other => panic!("expected literal, got: {other:?}"),
                })
                .collect();
            assert_eq!(texts, expected);
        }
        other => panic!("expected literal FilterPart, got: {other:?}"),
    }
}

pub fn variable_is(node: &Node, filter_type: &str, variable: &str) {
    match node {
        Node::FilterPart {
            filter_type: ft,
            values: None,
            variable: Some(var),
        } => {
            assert_eq!(ft, filter_type);
            assert_eq!(var, variable);
        }
        other => panic!("expected variable FilterPart, got: {other:?}"),
    }
}

/// Domain source that enumerates clans and leaves everything else free text.
pub fn clan_domains(filter_type: &str) -> ValueDomain {
    match filter_type {
        "Clan" => ValueDomain::Choices(vec!["Toreador".into(), "Ventrue".into()]),
        _ => ValueDomain::FreeText,
    }
}
