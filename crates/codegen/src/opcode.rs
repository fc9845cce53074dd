//! Opcode model.
//!
//! Opcodes form a small closed set of variants with opcode-specific payload
//! (an embedded constant for the `*Const` form), so they are a sum type with
//! capability methods rather than a type hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

use fieldflow_foundation::{FieldType, VirtualFieldRegister};

use crate::error::{CodegenError, Result};

/// Elementwise binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Max,
    Min,
    Pow,
    Atan2,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Max => "max",
            BinaryOp::Min => "min",
            BinaryOp::Pow => "pow",
            BinaryOp::Atan2 => "atan2",
        };
        write!(f, "{name}")
    }
}

/// An immutable tag identifying the operation a kernel implements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Opcode {
    /// Elementwise binary operation over two field operands.
    Binary(BinaryOp),
    /// Elementwise binary operation with one field operand and an embedded
    /// literal constant.
    BinaryConst { op: BinaryOp, constant: f32 },
}

impl Opcode {
    /// Number of field input registers the opcode consumes.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::Binary(_) => 2,
            Opcode::BinaryConst { .. } => 1,
        }
    }

    /// Whether the generated code must know how many tensor elements each
    /// thread handles. Constant-splat kernels vectorize the literal across
    /// the tensor dimension, so they carry this requirement.
    pub fn needs_vector_length(&self) -> bool {
        match self {
            Opcode::Binary(_) => false,
            Opcode::BinaryConst { .. } => true,
        }
    }

    /// The embedded literal constant, if the opcode carries one.
    pub fn constant(&self) -> Option<f32> {
        match self {
            Opcode::Binary(_) => None,
            Opcode::BinaryConst { constant, .. } => Some(*constant),
        }
    }

    /// Applies the opcode's shape rule to the input registers.
    ///
    /// All operations here are elementwise: every field input must share one
    /// field type, which is also the result type. Arity violations and
    /// mismatched operand types fail before any code text is emitted.
    pub fn result_type(&self, inputs: &[VirtualFieldRegister]) -> Result<FieldType> {
        let expected = self.arity();
        if inputs.len() != expected {
            return Err(CodegenError::ArityMismatch {
                opcode: *self,
                expected,
                found: inputs.len(),
            });
        }
        let first = &inputs[0].field_type;
        for input in &inputs[1..] {
            if input.field_type != *first {
                return Err(CodegenError::TypeMismatch {
                    opcode: *self,
                    expected: first.clone(),
                    found: input.field_type.clone(),
                });
            }
        }
        Ok(first.clone())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Binary(op) => write!(f, "{op}"),
            Opcode::BinaryConst { op, constant } => write!(f, "{op}_const({constant})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldflow_foundation::RegisterId;

    use super::*;

    fn reg(id: u64, ftype: FieldType) -> VirtualFieldRegister {
        VirtualFieldRegister::new(RegisterId(id), ftype)
    }

    #[test]
    fn test_arity() {
        assert_eq!(Opcode::Binary(BinaryOp::Add).arity(), 2);
        let op = Opcode::BinaryConst {
            op: BinaryOp::Multiply,
            constant: 2.0,
        };
        assert_eq!(op.arity(), 1);
    }

    #[test]
    fn test_vector_length_requirement() {
        assert!(!Opcode::Binary(BinaryOp::Add).needs_vector_length());
        assert!(Opcode::BinaryConst {
            op: BinaryOp::Add,
            constant: 1.0
        }
        .needs_vector_length());
    }

    #[test]
    fn test_result_type_elementwise() {
        let ftype = FieldType::scalar();
        let inputs = vec![reg(0, ftype.clone()), reg(1, ftype.clone())];
        let result = Opcode::Binary(BinaryOp::Add).result_type(&inputs).unwrap();
        assert_eq!(result, ftype);
    }

    #[test]
    fn test_result_type_arity_mismatch() {
        let inputs = vec![reg(0, FieldType::scalar())];
        let err = Opcode::Binary(BinaryOp::Add)
            .result_type(&inputs)
            .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::ArityMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_result_type_operand_mismatch() {
        use fieldflow_foundation::{ElementKind, FieldShape, TensorShape};

        let vec3 = FieldType::new(
            ElementKind::Float32,
            TensorShape::new(vec![3]).unwrap(),
            FieldShape::zero_dimensional(),
        );
        let inputs = vec![reg(0, FieldType::scalar()), reg(1, vec3)];
        let err = Opcode::Binary(BinaryOp::Add)
            .result_type(&inputs)
            .unwrap_err();
        assert!(matches!(err, CodegenError::TypeMismatch { .. }));
    }
}
