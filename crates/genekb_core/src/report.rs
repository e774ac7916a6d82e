//! Human-readable gene report rendering.
//!
//! # Responsibility
//! - Render one decorated block per gene record.
//! - Render the page header written once at the top of a report file.
//!
//! # Invariants
//! - Section order is fixed: symbol, id, type, chromosome, location,
//!   summary, synonyms.
//! - An empty synonym list renders the literal `(none)` marker.

use crate::model::expr::Node;
use crate::model::gene::{extract, GeneRecord, MalformedRecord, GENE_RECORD_ARITY};

/// Title used for report page headers.
pub const DEFAULT_REPORT_TITLE: &str = "GENE DATA SUMMARY";
/// Marker printed when a record has no synonyms.
pub const NO_SYNONYMS_MARKER: &str = "(none)";

const BLOCK_WIDTH: usize = 70;
const HEADER_WIDTH: usize = 80;
const SYNONYM_INDENT: &str = "                  ";

/// Formats a record expression, or a skip notice when it is malformed.
pub fn format_report(expr: &Node) -> String {
    match extract(expr) {
        Ok(record) => format_record(&record),
        Err(marker) => format_malformed(&marker),
    }
}

/// Formats one well-formed record block.
pub fn format_record(record: &GeneRecord) -> String {
    let heavy_rule = "=".repeat(BLOCK_WIDTH);
    let mut lines = vec![
        String::new(),
        heavy_rule.clone(),
        format!("Gene Symbol : {}", record.name),
        format!("Gene ID     : {}", record.id),
        heavy_rule,
        format!("Type        : {}", record.gene_type),
        format!("Chromosome  : {}", record.chromosome),
        format!("Location    : {} - {}", record.start, record.end),
        format!("Summary     : {}", record.summary_text()),
        "Synonyms    :".to_string(),
    ];

    let synonyms = record.synonym_list();
    if synonyms.is_empty() {
        lines.push(format!("{SYNONYM_INDENT}{NO_SYNONYMS_MARKER}"));
    } else {
        lines.extend(
            synonyms
                .iter()
                .map(|synonym| format!("{SYNONYM_INDENT}- {synonym}")),
        );
    }
    lines.push("-".repeat(BLOCK_WIDTH));
    lines.join("\n")
}

/// Formats the non-fatal skip notice for a wrong-arity expression.
pub fn format_malformed(marker: &MalformedRecord) -> String {
    format!(
        "\nSkipping : Expected {GENE_RECORD_ARITY} fields, got {}.\n    Raw expression: {}\n{}",
        marker.observed,
        marker.raw,
        "-".repeat(BLOCK_WIDTH)
    )
}

/// Builds a framed page header with a centered title.
pub fn generate_header(title: &str) -> String {
    let frame = "#".repeat(HEADER_WIDTH);
    let inner = HEADER_WIDTH - 2;
    format!("\n{frame}\n#{title:^inner$}#\n{frame}\n")
}

/// Page header with `DEFAULT_REPORT_TITLE`.
pub fn default_header() -> String {
    generate_header(DEFAULT_REPORT_TITLE)
}
