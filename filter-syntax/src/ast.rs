use crate::BindError;
use std::{collections::BTreeMap, fmt};

/// AND/OR. Both have the same precedence and associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => f.write_str("AND"),
            BoolOp::Or => f.write_str("OR"),
        }
    }
}

/// Terminal value handed to the reduce actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    Integer(i64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(text) => write!(f, "\"{text}\""),
            Literal::Integer(value) => write!(f, "{value}"),
        }
    }
}

/// Parsed filter tree. Nodes are never mutated once built; combining or
/// binding returns a fresh tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root wrapper. `None` means the user entered nothing.
    Filter(Option<Box<Node>>),
    BinOp {
        left: Box<Node>,
        op: BoolOp,
        right: Box<Node>,
    },
    Not(Box<Node>),
    /// `filter_type = values`. `values` is `None` for an interactive slot,
    /// in which case `variable` names it.
    FilterPart {
        filter_type: String,
        values: Option<Vec<Node>>,
        variable: Option<String>,
    },
    /// Value list builder (`"a", "b"`). Flattened into `FilterPart::values`.
    Comma {
        left: Box<Node>,
        right: Box<Node>,
    },
    StringLit(String),
    IntLit(i64),
    IdLit(String),
}

impl Node {
    pub fn empty() -> Self {
        Node::Filter(None)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Filter(None))
    }

    /// Literal `filter_type = v1, v2, ...` part.
    pub fn filter_part<I, S>(filter_type: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::FilterPart {
            filter_type: filter_type.into(),
            values: Some(
                values
                    .into_iter()
                    .map(|value| Node::StringLit(value.into()))
                    .collect(),
            ),
            variable: None,
        }
    }

    /// `filter_type = $variable` slot.
    pub fn variable_part(filter_type: impl Into<String>, variable: impl Into<String>) -> Self {
        Node::FilterPart {
            filter_type: filter_type.into(),
            values: None,
            variable: Some(variable.into()),
        }
    }

    pub fn and(self, other: Node) -> Node {
        self.combine(BoolOp::And, other)
    }

    pub fn or(self, other: Node) -> Node {
        self.combine(BoolOp::Or, other)
    }

    pub fn negate(self) -> Node {
        match self.into_root() {
            None => Node::empty(),
            Some(inner) => Node::Filter(Some(Box::new(Node::Not(Box::new(inner))))),
        }
    }

    // An empty operand is the identity, so it simply disappears.
    fn combine(self, op: BoolOp, other: Node) -> Node {
        match (self.into_root(), other.into_root()) {
            (None, None) => Node::empty(),
            (Some(only), None) | (None, Some(only)) => Node::Filter(Some(Box::new(only))),
            (Some(left), Some(right)) => Node::Filter(Some(Box::new(Node::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            }))),
        }
    }

    fn into_root(self) -> Option<Node> {
        match self {
            Node::Filter(root) => root.map(|node| *node),
            other => Some(other),
        }
    }

    /// Every interactive slot as `(filter_type, variable)`, left to right.
    pub fn variables(&self) -> Vec<(&str, &str)> {
        let mut slots = Vec::new();
        self.collect_variables(&mut slots);
        slots
    }

    fn collect_variables<'a>(&'a self, slots: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Node::Filter(Some(inner)) | Node::Not(inner) => inner.collect_variables(slots),
            Node::BinOp { left, right, .. } => {
                left.collect_variables(slots);
                right.collect_variables(slots);
            }
            Node::FilterPart {
                filter_type,
                values: None,
                variable: Some(variable),
            } => slots.push((filter_type.as_str(), variable.as_str())),
            _ => {}
        }
    }

    /// Returns a copy with each bound slot replaced by its string values.
    /// Slots without a binding are left in place. A value containing `"` has
    /// no literal form and is rejected.
    pub fn bind(&self, bindings: &BTreeMap<String, Vec<String>>) -> Result<Node, BindError> {
        Ok(match self {
            Node::Filter(root) => Node::Filter(match root {
                Some(inner) => Some(Box::new(inner.bind(bindings)?)),
                None => None,
            }),
            Node::BinOp { left, op, right } => Node::BinOp {
                left: Box::new(left.bind(bindings)?),
                op: *op,
                right: Box::new(right.bind(bindings)?),
            },
            Node::Not(inner) => Node::Not(Box::new(inner.bind(bindings)?)),
            Node::FilterPart {
                filter_type,
                values: None,
                variable: Some(variable),
            } => match bindings.get(variable) {
                Some(values) => {
                    if let Some(value) = values.iter().find(|value| value.contains('"')) {
                        return Err(BindError {
                            variable: variable.clone(),
                            value: value.clone(),
                        });
                    }
                    Node::filter_part(filter_type.clone(), values.iter().cloned())
                }
                None => self.clone(),
            },
            other => other.clone(),
        })
    }
}

/// Flattens a `Comma` chain into its leaves, left to right.
pub fn flatten_values(node: Node) -> Vec<Node> {
    let mut values = Vec::new();
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node {
            Node::Comma { left, right } => {
                pending.push(*right);
                pending.push(*left);
            }
            leaf => values.push(leaf),
        }
    }
    values
}

// Prints text the parser reads back into an equivalent tree. Right operands
// of a binary node are parenthesized when they are themselves binary, since
// the grammar is left-associative.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Filter(None) => Ok(()),
            Node::Filter(Some(inner)) => fmt::Display::fmt(inner, f),
            Node::BinOp { left, op, right } => {
                write!(f, "{left} {op} ")?;
                if matches!(**right, Node::BinOp { .. }) {
                    write!(f, "({right})")
                } else {
                    fmt::Display::fmt(right, f)
                }
            }
            Node::Not(inner) => write!(f, "NOT ({inner})"),
            Node::FilterPart {
                filter_type,
                values,
                variable,
            } => {
                write!(f, "{filter_type} = ")?;
                match (values, variable) {
                    (Some(values), _) => {
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            fmt::Display::fmt(value, f)?;
                        }
                        Ok(())
                    }
                    (None, Some(variable)) => f.write_str(variable),
                    (None, None) => f.write_str("$"),
                }
            }
            Node::Comma { left, right } => write!(f, "{left}, {right}"),
            Node::StringLit(text) => write!(f, "\"{text}\""),
            Node::IntLit(value) => write!(f, "{value}"),
            Node::IdLit(text) => f.write_str(text),
        }
    }
}
