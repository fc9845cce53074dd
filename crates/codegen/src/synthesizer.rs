//! Kernel synthesis.
//!
//! Composes addressing-mode selection and function resolution into the
//! kernel source fragment for one operator node. Synthesis is pure and
//! never mutates its inputs, so independent nodes compile in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fieldflow_foundation::{FieldType, VirtualFieldRegister};

use crate::addressing::{select, AddressingMode};
use crate::error::{CodegenError, Result};
use crate::function_map::function_name;
use crate::opcode::Opcode;

/// One compiled unit of generated code implementing a single operator node.
///
/// Immutable after construction: opcode, ordered input registers, result
/// type, the addressing mode fixed for the kernel's lifetime, and the
/// generated source fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperKernel {
    pub opcode: Opcode,
    pub inputs: Vec<VirtualFieldRegister>,
    pub result_type: FieldType,
    pub addressing: AddressingMode,
    /// Single-statement body using the `@outN`/`@inN` placeholder
    /// convention of the external emission layer.
    pub source: String,
}

/// One operator node awaiting synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelRequest {
    pub inputs: Vec<VirtualFieldRegister>,
    pub opcode: Opcode,
    pub result_type: FieldType,
}

/// Synthesizes the kernel for one operator node.
///
/// Arity and shape rules are checked before any code text is emitted;
/// `result_type` must equal the type implied by applying the opcode's shape
/// rule to the inputs.
pub fn synthesize(
    inputs: &[VirtualFieldRegister],
    opcode: Opcode,
    result_type: &FieldType,
) -> Result<HyperKernel> {
    let implied = opcode.result_type(inputs)?;
    if implied != *result_type {
        return Err(CodegenError::TypeMismatch {
            opcode,
            expected: implied,
            found: result_type.clone(),
        });
    }
    if inputs.is_empty() {
        return Err(CodegenError::Internal(format!(
            "no input registers for {opcode}"
        )));
    }

    let addressing = select(inputs, result_type);
    let function = function_name(opcode)?;

    // Vectorizing kernels must know how many tensor elements one thread
    // handles: the full tensor point under small-tensor addressing, one
    // scalar otherwise. The addressing set is closed and matched
    // exhaustively.
    let vector_length = if opcode.needs_vector_length() {
        Some(match addressing {
            AddressingMode::SmallTensorAddressing => result_type.tensor.points(),
            AddressingMode::TensorElementAddressing => 1,
        })
    } else {
        None
    };

    let mut args: Vec<String> = (0..inputs.len())
        .map(|i| format!("read(@in{i})"))
        .collect();
    if let Some(constant) = opcode.constant() {
        args.push(format!("{constant:?}"));
    }
    if let Some(vector_length) = vector_length {
        args.push(vector_length.to_string());
    }
    let source = format!("@out0 = {function}({});", args.join(", "));

    debug!(
        opcode = %opcode,
        mode = ?addressing,
        function,
        vector_length,
        "synthesized kernel"
    );

    Ok(HyperKernel {
        opcode,
        inputs: inputs.to_vec(),
        result_type: result_type.clone(),
        addressing,
        source,
    })
}

/// Synthesizes kernels for a set of independent operator nodes in parallel.
///
/// Output order matches request order. The first error aborts the whole
/// graph; partial results are discarded.
pub fn synthesize_graph(requests: &[KernelRequest]) -> Result<Vec<HyperKernel>> {
    requests
        .par_iter()
        .map(|request| synthesize(&request.inputs, request.opcode, &request.result_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use fieldflow_foundation::{ElementKind, FieldShape, RegisterId, TensorShape};

    use super::*;
    use crate::opcode::BinaryOp;

    fn ftype(tensor_dims: Vec<usize>) -> FieldType {
        let tensor = if tensor_dims.is_empty() {
            TensorShape::scalar()
        } else {
            TensorShape::new(tensor_dims).unwrap()
        };
        FieldType::new(ElementKind::Float32, tensor, FieldShape::zero_dimensional())
    }

    fn reg(id: u64, ftype: FieldType) -> VirtualFieldRegister {
        VirtualFieldRegister::new(RegisterId(id), ftype)
    }

    #[test]
    fn test_binary_fragment() {
        let ftype = ftype(vec![]);
        let inputs = vec![reg(0, ftype.clone()), reg(1, ftype.clone())];
        let kernel = synthesize(&inputs, Opcode::Binary(BinaryOp::Add), &ftype).unwrap();

        assert_eq!(kernel.source, "@out0 = add(read(@in0), read(@in1));");
        assert_eq!(kernel.addressing, AddressingMode::SmallTensorAddressing);
        assert_eq!(kernel.inputs.len(), 2);
    }

    #[test]
    fn test_const_fragment_carries_constant_and_vector_length() {
        let ftype = ftype(vec![3]);
        let inputs = vec![reg(0, ftype.clone())];
        let opcode = Opcode::BinaryConst {
            op: BinaryOp::Multiply,
            constant: 1.5,
        };
        let kernel = synthesize(&inputs, opcode, &ftype).unwrap();

        // Small-tensor addressing: one thread handles all 3 tensor elements.
        assert_eq!(kernel.addressing, AddressingMode::SmallTensorAddressing);
        assert_eq!(kernel.source, "@out0 = multiply_const(read(@in0), 1.5, 3);");
    }

    #[test]
    fn test_vector_length_is_one_under_element_addressing() {
        // 9-element tensor exceeds the small-tensor limit.
        let ftype = ftype(vec![3, 3]);
        let inputs = vec![reg(0, ftype.clone())];
        let opcode = Opcode::BinaryConst {
            op: BinaryOp::Add,
            constant: 2.0,
        };
        let kernel = synthesize(&inputs, opcode, &ftype).unwrap();

        assert_eq!(kernel.addressing, AddressingMode::TensorElementAddressing);
        assert_eq!(kernel.source, "@out0 = add_const(read(@in0), 2.0, 1);");
    }

    #[test]
    fn test_declared_result_type_must_match_shape_rule() {
        let scalar = ftype(vec![]);
        let vec2 = ftype(vec![2]);
        let inputs = vec![reg(0, scalar.clone()), reg(1, scalar)];
        let err = synthesize(&inputs, Opcode::Binary(BinaryOp::Add), &vec2).unwrap_err();
        assert!(matches!(err, CodegenError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unsupported_opcode_aborts_before_emission() {
        let ftype = ftype(vec![]);
        let inputs = vec![reg(0, ftype.clone())];
        let opcode = Opcode::BinaryConst {
            op: BinaryOp::Atan2,
            constant: 1.0,
        };
        assert!(matches!(
            synthesize(&inputs, opcode, &ftype),
            Err(CodegenError::UnsupportedOpcode { .. })
        ));
    }

    #[test]
    fn test_graph_synthesis_matches_per_node() {
        let ftype = ftype(vec![2]);
        let requests: Vec<KernelRequest> = (0..8u64)
            .map(|i| KernelRequest {
                inputs: vec![reg(2 * i, ftype.clone()), reg(2 * i + 1, ftype.clone())],
                opcode: Opcode::Binary(BinaryOp::Multiply),
                result_type: ftype.clone(),
            })
            .collect();

        let parallel = synthesize_graph(&requests).unwrap();
        for (kernel, request) in parallel.iter().zip(&requests) {
            let single =
                synthesize(&request.inputs, request.opcode, &request.result_type).unwrap();
            assert_eq!(*kernel, single);
        }
    }

    #[test]
    fn test_graph_synthesis_aborts_on_first_error() {
        let scalar = ftype(vec![]);
        let requests = vec![
            KernelRequest {
                inputs: vec![reg(0, scalar.clone()), reg(1, scalar.clone())],
                opcode: Opcode::Binary(BinaryOp::Add),
                result_type: scalar.clone(),
            },
            KernelRequest {
                inputs: vec![reg(2, scalar.clone())],
                opcode: Opcode::Binary(BinaryOp::Add),
                result_type: scalar,
            },
        ];
        assert!(synthesize_graph(&requests).is_err());
    }
}
