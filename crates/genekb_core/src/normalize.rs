//! Synonym and summary normalization.
//!
//! # Invariants
//! - Synonym order follows source order; duplicates are preserved.
//! - Summary text is never truncated or whitespace-collapsed.

use crate::model::expr::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Splits stringified synonym text into entries.
///
/// Strips one leading `(` and one trailing `)` when present, then splits on
/// whitespace runs. Empty input yields an empty list.
pub fn split_synonym_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix('(').unwrap_or(trimmed);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    WHITESPACE_RE
        .split(inner.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes a synonym sub-expression into a flat list.
///
/// Composites contribute their leaves in order; a leaf holding stringified
/// list text goes through `split_synonym_text`.
pub fn normalize_synonyms(expr: &Node) -> Vec<String> {
    match expr {
        Node::Leaf(text) => split_synonym_text(text),
        Node::Composite(_) => expr.leaves().into_iter().map(str::to_string).collect(),
    }
}

/// Normalizes a summary sub-expression into a single text blob.
pub fn normalize_summary(expr: &Node) -> String {
    match expr.children() {
        Some(children) => children
            .iter()
            .map(Node::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        None => expr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_summary, normalize_synonyms, split_synonym_text};
    use crate::model::expr::{parse_node, Node};

    #[test]
    fn splits_delimited_synonym_text() {
        assert_eq!(split_synonym_text("(a b c)"), vec!["a", "b", "c"]);
        assert_eq!(split_synonym_text("a  b\tc"), vec!["a", "b", "c"]);
        assert!(split_synonym_text("").is_empty());
        assert!(split_synonym_text("()").is_empty());
    }

    #[test]
    fn strips_only_one_delimiter_pair() {
        assert_eq!(split_synonym_text("((a) b)"), vec!["(a)", "b"]);
    }

    #[test]
    fn composite_synonyms_keep_order_and_duplicates() {
        let expr = parse_node("(brca1 brca (rnf53 brca1))")
            .expect("valid input")
            .expect("one node");
        assert_eq!(
            normalize_synonyms(&expr),
            vec!["brca1", "brca", "rnf53", "brca1"]
        );
        assert!(normalize_synonyms(&Node::composite([])).is_empty());
    }

    #[test]
    fn summary_joins_children_or_returns_leaf() {
        let composite = Node::composite([Node::leaf("x"), Node::leaf("y"), Node::leaf("z")]);
        assert_eq!(normalize_summary(&composite), "x y z");
        assert_eq!(normalize_summary(&Node::leaf("hello")), "hello");
    }

    #[test]
    fn nested_groups_flatten_only_in_composite_form() {
        let composite = parse_node("((a) b)").expect("valid input").expect("one node");
        assert_eq!(normalize_synonyms(&composite), vec!["a", "b"]);
        assert_eq!(normalize_synonyms(&Node::leaf("((a) b)")), vec!["(a)", "b"]);
    }

    #[test]
    fn summary_keeps_nested_children_rendered() {
        let expr = parse_node("(binds (DNA repair) \"  spaced  \")")
            .expect("valid input")
            .expect("one node");
        assert_eq!(normalize_summary(&expr), "binds (DNA repair) \"  spaced  \"");
    }
}
