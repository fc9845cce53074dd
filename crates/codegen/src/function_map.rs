//! Opcode to kernel-language function mapping.
//!
//! Pure lookup with no side effects. A missing entry is a compiler-integrity
//! error ([`CodegenError::UnsupportedOpcode`]) and aborts synthesis for the
//! node immediately.

use crate::error::{CodegenError, Result};
use crate::opcode::{BinaryOp, Opcode};

/// Returns the kernel-language function name implementing `opcode`.
pub fn function_name(opcode: Opcode) -> Result<&'static str> {
    let name = match opcode {
        Opcode::Binary(op) => binary_function(op),
        Opcode::BinaryConst { op, .. } => binary_const_function(op),
    };
    name.ok_or(CodegenError::UnsupportedOpcode { opcode })
}

fn binary_function(op: BinaryOp) -> Option<&'static str> {
    Some(match op {
        BinaryOp::Add => "add",
        BinaryOp::Subtract => "subtract",
        BinaryOp::Multiply => "multiply",
        BinaryOp::Divide => "divide",
        BinaryOp::Max => "max",
        BinaryOp::Min => "min",
        BinaryOp::Pow => "pow",
        BinaryOp::Atan2 => "atan2",
    })
}

fn binary_const_function(op: BinaryOp) -> Option<&'static str> {
    Some(match op {
        BinaryOp::Add => "add_const",
        BinaryOp::Subtract => "subtract_const",
        BinaryOp::Multiply => "multiply_const",
        BinaryOp::Divide => "divide_const",
        BinaryOp::Max => "max_const",
        BinaryOp::Min => "min_const",
        BinaryOp::Pow => "pow_const",
        // No constant-splat form exists for atan2.
        BinaryOp::Atan2 => return None,
    })
}
