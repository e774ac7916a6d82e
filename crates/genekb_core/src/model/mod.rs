//! Symbolic value and gene record model.
//!
//! # Responsibility
//! - Define the expression tree consumed from the host runtime.
//! - Define the canonical 8-field gene record derived from it.
//!
//! # Invariants
//! - Every model value is an immutable snapshot of one input expression.

pub mod expr;
pub mod gene;
