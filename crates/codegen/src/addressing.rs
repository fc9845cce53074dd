//! Addressing mode selection.
//!
//! The addressing mode fixes the per-thread work granularity for a kernel's
//! whole lifetime. Selection is a pure function of static shape information;
//! the same graph always compiles to the same kernel structure.

use serde::{Deserialize, Serialize};

use fieldflow_foundation::{FieldType, VirtualFieldRegister};

/// Largest tensor point (in scalar elements) that one thread processes
/// whole. Matches the native vector width of the kernel-language targets,
/// so vectorized loads across the tensor dimension stay single-register.
pub const SMALL_TENSOR_MAX_POINTS: usize = 4;

/// Per-thread work granularity of a kernel. Chosen once per kernel, fixed
/// for its lifetime. A closed set: every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingMode {
    /// One thread processes an entire tensor-valued point, vectorized
    /// across tensor elements. Amortizes per-thread overhead but requires
    /// uniform tensor shapes in the kernel body.
    SmallTensorAddressing,
    /// One thread processes exactly one scalar tensor element. The
    /// always-correct fallback.
    TensorElementAddressing,
}

/// Chooses the addressing mode for a kernel with the given inputs and
/// result type.
///
/// `SmallTensorAddressing` is preferred when the result tensor fits the
/// per-thread resource limit and every input's tensor shape matches the
/// result's, so the kernel body can handle all operands uniformly.
pub fn select(inputs: &[VirtualFieldRegister], result_type: &FieldType) -> AddressingMode {
    let small = result_type.tensor.points() <= SMALL_TENSOR_MAX_POINTS
        && inputs
            .iter()
            .all(|input| input.field_type.tensor == result_type.tensor);
    if small {
        AddressingMode::SmallTensorAddressing
    } else {
        AddressingMode::TensorElementAddressing
    }
}
