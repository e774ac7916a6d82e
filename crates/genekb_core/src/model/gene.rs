//! Gene record model and positional field extraction.
//!
//! # Responsibility
//! - Bind the 8 positional fields of a record expression to named fields.
//! - Report wrong-arity input as a `MalformedRecord` marker value.
//!
//! # Invariants
//! - A `GeneRecord` always originates from exactly 8 fields.
//! - Field nodes are kept in their native symbolic form (no coercion).

use crate::model::expr::Node;
use crate::normalize::{normalize_summary, normalize_synonyms};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of positional fields in a well-formed record expression.
pub const GENE_RECORD_ARITY: usize = 8;

/// Canonical 8-field gene entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub id: Node,
    pub gene_type: Node,
    pub chromosome: Node,
    pub start: Node,
    pub end: Node,
    pub name: Node,
    /// Synonym sub-expression, normalized on demand.
    pub synonyms: Node,
    /// Record-owned summary, composite or plain text.
    pub summary: Node,
}

impl GeneRecord {
    /// Returns the normalized synonym list.
    pub fn synonym_list(&self) -> Vec<String> {
        normalize_synonyms(&self.synonyms)
    }

    /// Returns the normalized summary text.
    pub fn summary_text(&self) -> String {
        normalize_summary(&self.summary)
    }

    /// Field values in positional order.
    pub fn fields(&self) -> [&Node; GENE_RECORD_ARITY] {
        [
            &self.id,
            &self.gene_type,
            &self.chromosome,
            &self.start,
            &self.end,
            &self.name,
            &self.synonyms,
            &self.summary,
        ]
    }

    /// Rebuilds the record expression in positional order.
    pub fn to_node(&self) -> Node {
        Node::composite(self.fields().into_iter().cloned())
    }

    /// Plain-string projection used for JSON output.
    pub fn view(&self) -> GeneRecordView {
        GeneRecordView {
            id: self.id.to_string(),
            gene_type: self.gene_type.to_string(),
            chromosome: self.chromosome.to_string(),
            start: self.start.to_string(),
            end: self.end.to_string(),
            name: self.name.to_string(),
            synonyms: self.synonym_list(),
            summary: self.summary_text(),
        }
    }
}

/// Serializable projection of a `GeneRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneRecordView {
    pub id: String,
    #[serde(rename = "type")]
    pub gene_type: String,
    pub chromosome: String,
    pub start: String,
    pub end: String,
    pub name: String,
    pub synonyms: Vec<String>,
    pub summary: String,
}

/// Skip marker for an expression with the wrong number of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Observed child count (leaves count as zero).
    pub observed: usize,
    /// Rendered form of the offending expression.
    pub raw: String,
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected {GENE_RECORD_ARITY} fields, got {}: {}",
            self.observed, self.raw
        )
    }
}

impl Error for MalformedRecord {}

/// Extracts a record from an 8-child expression.
///
/// Never panics; any other arity yields `MalformedRecord`.
pub fn extract(expr: &Node) -> Result<GeneRecord, MalformedRecord> {
    match expr.children() {
        Some([id, gene_type, chromosome, start, end, name, synonyms, summary]) => Ok(GeneRecord {
            id: id.clone(),
            gene_type: gene_type.clone(),
            chromosome: chromosome.clone(),
            start: start.clone(),
            end: end.clone(),
            name: name.clone(),
            synonyms: synonyms.clone(),
            summary: summary.clone(),
        }),
        _ => Err(MalformedRecord {
            observed: expr.arity(),
            raw: expr.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, GENE_RECORD_ARITY};
    use crate::model::expr::{parse_node, Node};

    fn node(text: &str) -> Node {
        parse_node(text).expect("valid input").expect("one node")
    }

    #[test]
    fn binds_fields_positionally() {
        let record = extract(&node("(G1 protein_coding 1 100 200 BRCA1 (brca1 brca) (a b))"))
            .expect("well-formed record");
        assert_eq!(record.id, Node::leaf("G1"));
        assert_eq!(record.name, Node::leaf("BRCA1"));
        assert_eq!(record.synonyms.to_string(), "(brca1 brca)");
        assert_eq!(record.summary_text(), "a b");
        assert_eq!(record.fields().len(), GENE_RECORD_ARITY);
    }

    #[test]
    fn wrong_arity_returns_marker_with_count() {
        for (text, expected) in [("(a b c)", 3), ("(1 2 3 4 5 6 7 8 9)", 9), ("()", 0)] {
            let marker = extract(&node(text)).expect_err("arity mismatch");
            assert_eq!(marker.observed, expected);
            assert_eq!(marker.raw, text);
        }
    }

    #[test]
    fn leaf_input_is_malformed() {
        let marker = extract(&Node::leaf("G1")).expect_err("leaf is not a record");
        assert_eq!(marker.observed, 0);
        assert!(marker.to_string().contains("expected 8 fields, got 0"));
    }

    #[test]
    fn to_node_round_trips_expression() {
        let source = node("(G2 ncRNA X 5 9 MIR1 () \"short\")");
        let record = extract(&source).expect("well-formed record");
        assert_eq!(record.to_node(), source);
    }
}
