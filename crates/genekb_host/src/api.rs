//! Operations exported to the host expression runtime.
//!
//! # Responsibility
//! - Adapt host expression arguments to core transformations.
//! - Turn every failure into a result value the host can display.
//!
//! # Invariants
//! - Exported functions never panic and never return an error type; failures
//!   come back as text atoms or `(error <message>)` expressions.
//! - Each call runs once to completion; nothing is retried.

use genekb_core::{
    append_knowledge, append_report, format_report, merge, render_statements, GeminiSummarizer,
    GenekbConfig, Node, Summarizer,
};
use log::{error, info};
use std::path::{Component, Path};

/// Result text of a successful report save.
pub const REPORT_SAVED_TEXT: &str = "Gene summary result saved";
/// Head symbol of error expressions returned to the host.
pub const ERROR_HEAD: &str = "error";

/// Read-only state shared by every operation call.
pub struct HostContext {
    pub config: GenekbConfig,
    summarizer: Box<dyn Summarizer>,
}

impl HostContext {
    /// Builds the context with the HTTP summarizer from `config`.
    pub fn new(config: GenekbConfig) -> Self {
        let summarizer = GeminiSummarizer::new(config.summarizer.clone());
        Self::with_summarizer(config, Box::new(summarizer))
    }

    /// Builds the context around a caller-provided summarizer.
    pub fn with_summarizer(config: GenekbConfig, summarizer: Box<dyn Summarizer>) -> Self {
        Self { config, summarizer }
    }
}

/// Formats one record as a report block and appends it to the report file.
///
/// Malformed records are appended as skip notices. Returns
/// `REPORT_SAVED_TEXT`, or a failure text when the file cannot be written.
pub fn save_human_readable_output(
    ctx: &HostContext,
    record_expr: &Node,
    filename_expr: &Node,
) -> Vec<Node> {
    let file_name = match file_name_from(filename_expr) {
        Ok(name) => name,
        Err(message) => return text_result("save_human_readable_output", message),
    };
    let formatted = format_report(record_expr);
    match append_report(&ctx.config.report_dir, &file_name, &formatted) {
        Ok(ack) => {
            info!(
                "event=save_report module=host status=ok path={}",
                ack.path.display()
            );
            vec![Node::leaf(REPORT_SAVED_TEXT)]
        }
        Err(err) => text_result(
            "save_human_readable_output",
            format!("failed to write output to file: {err}"),
        ),
    }
}

/// Merges a `(record (summary))` pairing and appends its relations to the
/// knowledge file.
pub fn write_summary(ctx: &HostContext, annotated_expr: &Node, filename_expr: &Node) -> Vec<Node> {
    let file_name = match file_name_from(filename_expr) {
        Ok(name) => name,
        Err(message) => return text_result("write_summary", message),
    };
    let annotated = match merge(annotated_expr) {
        Ok(annotated) => annotated,
        Err(err) => return text_result("write_summary", err.to_string()),
    };

    let content = render_statements(&annotated.to_relations());
    match append_knowledge(&ctx.config.knowledge_dir, &file_name, &content) {
        Ok(ack) => {
            info!(
                "event=write_summary module=host status=ok path={}",
                ack.path.display()
            );
            vec![Node::leaf(format!(
                "Gene knowledge with summary appended to: {}",
                ack.path.display()
            ))]
        }
        Err(err) => text_result(
            "write_summary",
            format!("failed to write output to file: {err}"),
        ),
    }
}

/// Merges a `(record (summary))` pairing and returns its relation statements.
pub fn format_new_gene_data(annotated_expr: &Node) -> Vec<Node> {
    match merge(annotated_expr) {
        Ok(annotated) => annotated
            .to_relations()
            .iter()
            .map(|statement| statement.to_node())
            .collect(),
        Err(err) => vec![error_node("format_new_gene_data", err.to_string())],
    }
}

/// Summarizes a record and returns `((<record parts>) (<summary>))`.
///
/// The record's parts are rendered and space-joined into the summarizer
/// input. Summarizer failures come back as the summary text itself.
pub fn summarize_gene_data(ctx: &HostContext, record_expr: &Node) -> Vec<Node> {
    let Some(parts) = record_expr.children() else {
        return vec![error_node(
            "summarize_gene_data",
            format!("expected a record expression, got `{record_expr}`"),
        )];
    };
    let text = parts
        .iter()
        .map(Node::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let summary = ctx.summarizer.summarize(&text);
    vec![Node::composite([
        Node::Composite(parts.to_vec()),
        Node::composite([Node::leaf(summary)]),
    ])]
}

/// Reads a file name from a symbol or string-literal argument.
fn file_name_from(expr: &Node) -> Result<String, String> {
    let raw = expr
        .as_leaf()
        .ok_or_else(|| format!("file name must be a symbol or string, got `{expr}`"))?;
    let name = raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
        .trim();
    if name.is_empty() {
        return Err("file name must not be empty".to_string());
    }
    // Names resolve under the configured directory only.
    let stays_inside = Path::new(name)
        .components()
        .all(|part| matches!(part, Component::Normal(_) | Component::CurDir));
    if !stays_inside {
        return Err(format!(
            "file name must be relative without `..` components, got `{name}`"
        ));
    }
    Ok(name.to_string())
}

fn text_result(op: &str, message: impl Into<String>) -> Vec<Node> {
    let message = message.into();
    error!("event={op} module=host status=error error={message}");
    vec![Node::leaf(format!("{op} failed: {message}"))]
}

fn error_node(op: &str, message: impl Into<String>) -> Node {
    let message = message.into();
    error!("event={op} module=host status=error error={message}");
    Node::composite([Node::leaf(ERROR_HEAD), Node::leaf(message)])
}
