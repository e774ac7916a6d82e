//! Named-operation table for the host expression runtime.
//!
//! # Responsibility
//! - Map operation names to typed handlers with declared signatures.
//! - Resolve names and check arity at the boundary only.
//!
//! # Invariants
//! - Operation names are unique within one registry.
//! - Handlers are plain functions; no state is kept between calls.

use crate::api::{
    format_new_gene_data, save_human_readable_output, summarize_gene_data, write_summary,
    HostContext,
};
use genekb_core::Node;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host runtime type tags used in operation signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// Any compound or symbol expression.
    Expression,
    /// Result atom handed back to the host.
    Atom,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expression => "Expression",
            Self::Atom => "Atom",
        }
    }
}

type Handler = fn(&HostContext, &[Node]) -> Vec<Node>;

/// One registered operation.
#[derive(Clone, Copy)]
pub struct OperationSpec {
    pub name: &'static str,
    pub params: &'static [TypeTag],
    pub returns: TypeTag,
    handler: Handler,
}

impl OperationSpec {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Signature in host notation, e.g. `(-> Expression Expression Atom)`.
    pub fn signature(&self) -> String {
        let mut parts: Vec<&str> = self.params.iter().map(|tag| tag.as_str()).collect();
        parts.push(self.returns.as_str());
        format!("(-> {})", parts.join(" "))
    }
}

impl std::fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("signature", &self.signature())
            .finish()
    }
}

const RECORD_AND_FILE: &[TypeTag] = &[TypeTag::Expression, TypeTag::Expression];
const RECORD_ONLY: &[TypeTag] = &[TypeTag::Expression];

/// Built-in gene operations exported to the host runtime.
pub const BUILTIN_OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name: "save_human_readable_output",
        params: RECORD_AND_FILE,
        returns: TypeTag::Atom,
        handler: save_report_handler,
    },
    OperationSpec {
        name: "write_summary",
        params: RECORD_AND_FILE,
        returns: TypeTag::Atom,
        handler: write_summary_handler,
    },
    OperationSpec {
        name: "format_new_gene_data",
        params: RECORD_ONLY,
        returns: TypeTag::Atom,
        handler: format_relations_handler,
    },
    OperationSpec {
        name: "summarize_gene_data",
        params: RECORD_ONLY,
        returns: TypeTag::Atom,
        handler: summarize_handler,
    },
];

// Arity is checked by `OperationRegistry::invoke` before a handler runs.
fn save_report_handler(ctx: &HostContext, args: &[Node]) -> Vec<Node> {
    save_human_readable_output(ctx, &args[0], &args[1])
}

fn write_summary_handler(ctx: &HostContext, args: &[Node]) -> Vec<Node> {
    write_summary(ctx, &args[0], &args[1])
}

fn format_relations_handler(_ctx: &HostContext, args: &[Node]) -> Vec<Node> {
    format_new_gene_data(&args[0])
}

fn summarize_handler(ctx: &HostContext, args: &[Node]) -> Vec<Node> {
    summarize_gene_data(ctx, &args[0])
}

/// Name-indexed operation table.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    entries: BTreeMap<&'static str, OperationSpec>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `BUILTIN_OPERATIONS`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in BUILTIN_OPERATIONS {
            if let Err(err) = registry.register(*spec) {
                error!("event=op_register module=host status=error op={} error={err}", spec.name);
            }
        }
        registry
    }

    /// Registers one operation.
    pub fn register(&mut self, spec: OperationSpec) -> Result<(), DispatchError> {
        if self.entries.contains_key(spec.name) {
            return Err(DispatchError::DuplicateOperation(spec.name.to_string()));
        }
        self.entries.insert(spec.name, spec);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OperationSpec> {
        self.entries.get(name)
    }

    /// Registered specs in name order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.entries.values()
    }

    /// Resolves `name` and runs its handler.
    ///
    /// # Errors
    /// - `DispatchError::UnknownOperation` when `name` is not registered.
    /// - `DispatchError::ArityMismatch` when `args` has the wrong length.
    pub fn invoke(
        &self,
        ctx: &HostContext,
        name: &str,
        args: &[Node],
    ) -> Result<Vec<Node>, DispatchError> {
        let Some(spec) = self.entries.get(name) else {
            warn!("event=op_dispatch module=host status=error op={name} error_code=unknown_operation");
            return Err(DispatchError::UnknownOperation(name.to_string()));
        };
        if args.len() != spec.arity() {
            warn!(
                "event=op_dispatch module=host status=error op={name} error_code=arity_mismatch expected={} got={}",
                spec.arity(),
                args.len()
            );
            return Err(DispatchError::ArityMismatch {
                name: spec.name,
                expected: spec.arity(),
                got: args.len(),
            });
        }
        info!("event=op_dispatch module=host status=ok op={name}");
        Ok((spec.handler)(ctx, args))
    }
}

/// Operation lookup and registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    UnknownOperation(String),
    DuplicateOperation(String),
    ArityMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
            Self::DuplicateOperation(name) => write!(f, "operation already registered: {name}"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(f, "{name} expects {expected} argument(s), got {got}"),
        }
    }
}

impl Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::{DispatchError, OperationRegistry, BUILTIN_OPERATIONS};
    use crate::api::HostContext;
    use genekb_core::{GenekbConfig, Node};
    use std::collections::BTreeSet;

    #[test]
    fn builtin_registry_exposes_all_operations() {
        let registry = OperationRegistry::builtin();
        assert_eq!(registry.len(), BUILTIN_OPERATIONS.len());
        let names: Vec<&str> = registry.operations().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec![
                "format_new_gene_data",
                "save_human_readable_output",
                "summarize_gene_data",
                "write_summary"
            ]
        );
        assert_eq!(
            registry
                .get("write_summary")
                .expect("registered operation")
                .signature(),
            "(-> Expression Expression Atom)"
        );
    }

    #[test]
    fn builtin_operation_names_are_distinct() {
        let names: BTreeSet<&str> = BUILTIN_OPERATIONS.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), BUILTIN_OPERATIONS.len());
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = OperationRegistry::builtin();
        let err = registry
            .register(BUILTIN_OPERATIONS[0])
            .expect_err("duplicate registration must fail");
        assert!(matches!(err, DispatchError::DuplicateOperation(_)));
    }

    #[test]
    fn invoke_rejects_unknown_names_and_wrong_arity() {
        let registry = OperationRegistry::builtin();
        let ctx = HostContext::new(GenekbConfig::default());

        let err = registry
            .invoke(&ctx, "summarize", &[Node::leaf("x")])
            .expect_err("unknown operation");
        assert_eq!(err, DispatchError::UnknownOperation("summarize".to_string()));

        let err = registry
            .invoke(&ctx, "format_new_gene_data", &[])
            .expect_err("missing argument");
        assert_eq!(
            err.to_string(),
            "format_new_gene_data expects 1 argument(s), got 0"
        );
    }
}
