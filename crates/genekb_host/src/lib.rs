//! Host-runtime boundary for genekb.
//!
//! # Responsibility
//! - Expose the gene operations under the names the host runtime calls.
//! - Keep name lookup out of the core crate; core functions stay typed.

pub mod api;
pub mod registry;

pub use api::{
    format_new_gene_data, save_human_readable_output, summarize_gene_data, write_summary,
    HostContext, REPORT_SAVED_TEXT,
};
pub use registry::{DispatchError, OperationRegistry, OperationSpec, TypeTag, BUILTIN_OPERATIONS};
