//! Merging an externally produced summary back into a gene record.
//!
//! # Responsibility
//! - Validate the `(<record> (<summary>))` pairing shape.
//! - Produce an `AnnotatedRecord` that serializes with the external summary.
//!
//! # Invariants
//! - The external summary always overrides the record's own summary field.
//! - Shape problems are returned as `MergeError` values, never panics.

use crate::model::expr::Node;
use crate::model::gene::{extract, GeneRecord, MalformedRecord};
use crate::normalize::normalize_summary;
use crate::relation::{to_relations, RelationStatement};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level parts of a record-and-summary pairing.
const PAIR_ARITY: usize = 2;
/// Field count of a record carried without its own summary.
const RECORD_WITHOUT_SUMMARY_ARITY: usize = 7;

/// A gene record paired with an externally obtained summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    pub record: GeneRecord,
    pub summary: String,
}

impl AnnotatedRecord {
    /// Serializes the record with the external summary in place.
    pub fn to_relations(&self) -> Vec<RelationStatement> {
        to_relations(&self.record, Some(self.summary.as_str()))
    }
}

/// Structural mismatch in a record-and-summary pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Top level did not hold exactly a record part and a summary part.
    Shape { observed: usize, raw: String },
    /// Record part has neither 7 nor 8 fields.
    Record(MalformedRecord),
    /// Summary part carries no text child.
    EmptySummary { raw: String },
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape { observed, raw } => write!(
                f,
                "expected (record (summary)) with {PAIR_ARITY} parts, got {observed}: {raw}"
            ),
            Self::Record(marker) => write!(f, "malformed record: {marker}"),
            Self::EmptySummary { raw } => write!(f, "summary part has no text: {raw}"),
        }
    }
}

impl Error for MergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Record(marker) => Some(marker),
            _ => None,
        }
    }
}

/// Splits a `(<record> (<summary>))` pairing into an `AnnotatedRecord`.
///
/// The record part may carry 8 fields, or 7 when it has no own summary; the
/// summary text joins every child of the summary part, each normalized.
pub fn merge(expr: &Node) -> Result<AnnotatedRecord, MergeError> {
    let [record_expr, summary_expr] = expr.children().unwrap_or_default() else {
        return Err(MergeError::Shape {
            observed: expr.arity(),
            raw: expr.to_string(),
        });
    };

    let summary = match summary_expr.children() {
        Some(parts) if !parts.is_empty() => parts
            .iter()
            .map(normalize_summary)
            .collect::<Vec<_>>()
            .join(" "),
        _ => {
            return Err(MergeError::EmptySummary {
                raw: summary_expr.to_string(),
            })
        }
    };

    let record = match record_expr.children() {
        Some(fields) if fields.len() == RECORD_WITHOUT_SUMMARY_ARITY => {
            let mut completed = fields.to_vec();
            completed.push(Node::leaf(summary.as_str()));
            extract(&Node::Composite(completed)).map_err(MergeError::Record)?
        }
        _ => extract(record_expr).map_err(MergeError::Record)?,
    };

    Ok(AnnotatedRecord { record, summary })
}

#[cfg(test)]
mod tests {
    use super::{merge, MergeError};
    use crate::model::expr::{parse_node, Node};

    fn node(text: &str) -> Node {
        parse_node(text).expect("valid input").expect("one node")
    }

    #[test]
    fn accepts_record_without_own_summary() {
        let input = Node::composite([
            node("(G1 protein_coding 1 100 200 BRCA1 (brca1 brca))"),
            Node::composite([Node::leaf("DNA repair gene")]),
        ]);
        let annotated = merge(&input).expect("seven-field record merges");
        assert_eq!(annotated.summary, "DNA repair gene");
        assert_eq!(annotated.record.summary, Node::leaf("DNA repair gene"));
        assert_eq!(annotated.record.name, Node::leaf("BRCA1"));
    }

    #[test]
    fn composite_summary_child_is_flattened_to_text() {
        let annotated = merge(&node("((G1 t 1 1 2 N () own) ((short text)))"))
            .expect("well-formed pairing");
        assert_eq!(annotated.summary, "short text");
    }

    #[test]
    fn multi_child_summary_keeps_every_word() {
        let annotated = merge(&node("((G1 t 1 1 2 N () own) (BRCA1 repairs DNA))"))
            .expect("well-formed pairing");
        assert_eq!(annotated.summary, "BRCA1 repairs DNA");
        assert_eq!(
            annotated.to_relations()[8].value(),
            Some(&Node::leaf("BRCA1 repairs DNA"))
        );
    }

    #[test]
    fn rejects_wrong_top_level_shape() {
        for text in ["((G1 t 1 1 2 N () s))", "(a b c)", "leaf"] {
            let err = merge(&node(text)).expect_err("shape mismatch");
            assert!(matches!(err, MergeError::Shape { .. }), "{text}");
        }
    }

    #[test]
    fn rejects_empty_summary_part() {
        for text in ["((G1 t 1 1 2 N () s) ())", "((G1 t 1 1 2 N () s) bare)"] {
            let err = merge(&node(text)).expect_err("summary has no child");
            assert!(matches!(err, MergeError::EmptySummary { .. }), "{text}");
        }
    }

    #[test]
    fn rejects_record_with_wrong_arity() {
        let err = merge(&node("((G1 t 1) (S))")).expect_err("three-field record");
        assert!(matches!(err, MergeError::Record(ref marker) if marker.observed == 3));
        assert!(err.to_string().contains("expected 8 fields, got 3"));
    }
}
