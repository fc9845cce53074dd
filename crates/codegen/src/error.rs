//! Kernel synthesis errors.
//!
//! All of these indicate a logic error in the layer producing the graph,
//! not a transient condition. Synthesis for the whole graph aborts on the
//! first one; nothing here is retried.

use thiserror::Error;

use fieldflow_foundation::FieldType;

use crate::opcode::Opcode;

/// Codegen result type.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors raised during kernel synthesis.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// No kernel-language function implements this opcode.
    #[error("unsupported opcode: {opcode}")]
    UnsupportedOpcode { opcode: Opcode },

    /// Input or result field types violate the opcode's shape rule.
    #[error("type mismatch for {opcode}: expected {expected}, found {found}")]
    TypeMismatch {
        opcode: Opcode,
        expected: FieldType,
        found: FieldType,
    },

    /// Wrong number of input registers for the opcode's arity.
    #[error("{opcode} takes {expected} field input(s), found {found}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// A closed-set invariant was violated; not user-recoverable.
    #[error("internal synthesis error: {0}")]
    Internal(String),
}
