//! Command-line driver for genekb.
//!
//! # Responsibility
//! - Read record expressions from a `.metta` file and run them through the
//!   host operation table by name.
//! - Read knowledge files back and print the recovered records as JSON.

use genekb_core::{
    collect_records, default_header, default_log_level, extract, format_report, init_logging,
    parse_nodes, parse_statements, render_statements, to_relations, GenekbConfig, Node,
};
use genekb_host::{HostContext, OperationRegistry};
use std::process::ExitCode;

const ENV_LOG_DIR: &str = "GENEKB_LOG_DIR";
const ENV_LOG_LEVEL: &str = "GENEKB_LOG_LEVEL";
const DEFAULT_REPORT_FILE: &str = "gene_summary_result.txt";
const DEFAULT_KNOWLEDGE_FILE: &str = "gene_with_summary.metta";

const USAGE: &str = "usage:
  genekb report <records.metta> [report-file]      print and save human-readable reports
  genekb relations <records.metta>                 print relation statements
  genekb annotate <records.metta> [knowledge-file] summarize records and append to knowledge file
  genekb load <knowledge.metta>                    print records stored in a knowledge file as JSON
  genekb ops                                       list host operations";

fn main() -> ExitCode {
    init_logging_from_env();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let config = match GenekbConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("genekb: {err}");
            return ExitCode::FAILURE;
        }
    };
    let ctx = HostContext::new(config);
    let registry = OperationRegistry::builtin();

    let result = match (command.as_str(), &args[1..]) {
        ("ops", []) => {
            list_operations(&registry);
            Ok(())
        }
        ("report", [input, rest @ ..]) if rest.len() <= 1 => {
            let file = rest.first().map_or(DEFAULT_REPORT_FILE, String::as_str);
            run_report(&registry, &ctx, input, file)
        }
        ("relations", [input]) => run_relations(input),
        ("annotate", [input, rest @ ..]) if rest.len() <= 1 => {
            let file = rest.first().map_or(DEFAULT_KNOWLEDGE_FILE, String::as_str);
            run_annotate(&registry, &ctx, input, file)
        }
        ("load", [input]) => run_load(input),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("genekb: {message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging_from_env() {
    let Ok(log_dir) = std::env::var(ENV_LOG_DIR) else {
        return;
    };
    let level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| default_log_level().to_string());
    if let Err(err) = init_logging(&level, log_dir.trim()) {
        eprintln!("genekb: logging disabled: {err}");
    }
}

fn read_records(path: &str) -> Result<Vec<Node>, String> {
    let text =
        std::fs::read_to_string(path).map_err(|err| format!("cannot read `{path}`: {err}"))?;
    parse_nodes(&text).map_err(|err| format!("cannot parse `{path}`: {err}"))
}

fn call(
    registry: &OperationRegistry,
    ctx: &HostContext,
    name: &str,
    args: &[Node],
) -> Result<Vec<Node>, String> {
    registry
        .invoke(ctx, name, args)
        .map_err(|err| err.to_string())
}

fn list_operations(registry: &OperationRegistry) {
    for spec in registry.operations() {
        println!("{} : {}", spec.name, spec.signature());
    }
}

fn run_report(
    registry: &OperationRegistry,
    ctx: &HostContext,
    input: &str,
    file: &str,
) -> Result<(), String> {
    let file_node = Node::leaf(file);
    for record in read_records(input)? {
        println!("{}{}", default_header(), format_report(&record));
        let args = [record, file_node.clone()];
        for result in call(registry, ctx, "save_human_readable_output", &args)? {
            println!("{result}");
        }
    }
    Ok(())
}

fn run_relations(input: &str) -> Result<(), String> {
    for record in read_records(input)? {
        match extract(&record) {
            Ok(gene) => print!("{}", render_statements(&to_relations(&gene, None))),
            Err(marker) => eprintln!("genekb: skipping malformed record: {marker}"),
        }
    }
    Ok(())
}

fn run_annotate(
    registry: &OperationRegistry,
    ctx: &HostContext,
    input: &str,
    file: &str,
) -> Result<(), String> {
    let file_node = Node::leaf(file);
    for record in read_records(input)? {
        for pairing in call(registry, ctx, "summarize_gene_data", &[record])? {
            for result in call(registry, ctx, "write_summary", &[pairing, file_node.clone()])? {
                println!("{result}");
            }
        }
    }
    Ok(())
}

fn run_load(input: &str) -> Result<(), String> {
    let text =
        std::fs::read_to_string(input).map_err(|err| format!("cannot read `{input}`: {err}"))?;
    let statements =
        parse_statements(&text).map_err(|err| format!("cannot parse `{input}`: {err}"))?;
    let views: Vec<_> = collect_records(&statements)
        .iter()
        .map(|record| record.view())
        .collect();
    let json = serde_json::to_string_pretty(&views)
        .map_err(|err| format!("cannot encode records: {err}"))?;
    println!("{json}");
    Ok(())
}
