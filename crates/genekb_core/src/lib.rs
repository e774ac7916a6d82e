//! Core gene record transformations for genekb.
//! This crate owns record validation and both persisted text formats.

pub mod config;
pub mod logging;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod relation;
pub mod report;
pub mod sink;
pub mod summarize;

pub use config::{ConfigError, GenekbConfig, SummarizerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use merge::{merge, AnnotatedRecord, MergeError};
pub use model::expr::{parse_node, parse_nodes, Node, ParseError};
pub use model::gene::{extract, GeneRecord, GeneRecordView, MalformedRecord, GENE_RECORD_ARITY};
pub use normalize::{normalize_summary, normalize_synonyms, split_synonym_text};
pub use relation::{
    collect_records, parse_statements, render_statements, to_relations, RelationStatement,
    STATEMENTS_PER_RECORD,
};
pub use report::{default_header, format_record, format_report, generate_header};
pub use sink::{append_knowledge, append_report, append_with_header, AppendAck, SinkError};
pub use summarize::{GeminiSummarizer, Summarizer, NOT_INITIALIZED_TEXT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
