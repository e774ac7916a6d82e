//! Symbolic expression tree shared by every core transformation.
//!
//! # Responsibility
//! - Represent host-runtime values as a closed `Leaf | Composite` variant.
//! - Render any node back to its canonical textual form.
//! - Read MeTTa-style expression text into nodes.
//!
//! # Invariants
//! - Rendering is total: every node has exactly one textual form.
//! - Leaf text is kept verbatim (quoted strings keep their quotes).

use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One value of the symbolic expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Symbol, number or quoted string, stored as written.
    Leaf(String),
    /// Ordered child list, rendered as `(child child ...)`.
    Composite(Vec<Node>),
}

impl Node {
    /// Builds a leaf node.
    pub fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }

    /// Builds a composite node from ordered children.
    pub fn composite(children: impl IntoIterator<Item = Node>) -> Self {
        Self::Composite(children.into_iter().collect())
    }

    /// Returns child nodes, or `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Self::Leaf(_) => None,
            Self::Composite(children) => Some(children.as_slice()),
        }
    }

    /// Number of children; leaves report zero.
    pub fn arity(&self) -> usize {
        self.children().map_or(0, <[Node]>::len)
    }

    /// Returns leaf text, or `None` for composites.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(text) => Some(text.as_str()),
            Self::Composite(_) => None,
        }
    }

    /// Collects leaf texts depth-first, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Leaf(text) => out.push(text.as_str()),
        Node::Composite(children) => {
            for child in children {
                collect_leaves(child, out);
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(text) => f.write_str(text),
            Self::Composite(children) => {
                f.write_str("(")?;
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::leaf(value)
    }
}

/// Expression text reader errors. Offsets are byte positions in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedClose { offset: usize },
    UnclosedList { offset: usize },
    UnterminatedString { offset: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedClose { offset } => {
                write!(f, "unexpected `)` at byte {offset}")
            }
            Self::UnclosedList { offset } => {
                write!(f, "expression opened at byte {offset} is never closed")
            }
            Self::UnterminatedString { offset } => {
                write!(f, "string literal starting at byte {offset} is not terminated")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses every top-level expression in `input`.
///
/// Supports parentheses, whitespace-separated symbols, double-quoted strings
/// with backslash escapes, and `;` comments running to end of line.
///
/// # Errors
/// - Returns `ParseError` on unbalanced parentheses or an unterminated string.
pub fn parse_nodes(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut stack: Vec<(usize, Vec<Node>)> = Vec::new();
    let mut top = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let current = bytes[pos];
        match current {
            b'(' => {
                stack.push((pos, Vec::new()));
                pos += 1;
            }
            b')' => {
                let (_, children) = stack
                    .pop()
                    .ok_or(ParseError::UnexpectedClose { offset: pos })?;
                push_node(&mut stack, &mut top, Node::Composite(children));
                pos += 1;
            }
            b';' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'"' => {
                let end = scan_string(bytes, pos)?;
                push_node(&mut stack, &mut top, Node::leaf(&input[pos..end]));
                pos = end;
            }
            byte if byte.is_ascii_whitespace() => pos += 1,
            _ => {
                let start = pos;
                while pos < bytes.len() && !is_symbol_boundary(bytes[pos]) {
                    pos += 1;
                }
                push_node(&mut stack, &mut top, Node::leaf(&input[start..pos]));
            }
        }
    }

    if let Some((offset, _)) = stack.first() {
        return Err(ParseError::UnclosedList { offset: *offset });
    }
    Ok(top)
}

/// Parses exactly one expression, ignoring surrounding whitespace/comments.
///
/// Returns `Ok(None)` when the input holds no expression.
pub fn parse_node(input: &str) -> Result<Option<Node>, ParseError> {
    Ok(parse_nodes(input)?.into_iter().next())
}

fn push_node(stack: &mut [(usize, Vec<Node>)], top: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some((_, children)) => children.push(node),
        None => top.push(node),
    }
}

fn scan_string(bytes: &[u8], start: usize) -> Result<usize, ParseError> {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err(ParseError::UnterminatedString { offset: start })
}

fn is_symbol_boundary(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'(' | b')' | b';' | b'"')
}
