//! Fieldflow Codegen
//!
//! Translates operator nodes (opcode, input registers, result type) into
//! concrete kernel source fragments.
//!
//! # Overview
//!
//! Synthesis for one operator node proceeds in three steps:
//!
//! 1. **Addressing mode selection** — decide whether one thread processes a
//!    whole tensor point ([`AddressingMode::SmallTensorAddressing`]) or a
//!    single scalar element ([`AddressingMode::TensorElementAddressing`]).
//! 2. **Function resolution** — map the opcode to the kernel-language
//!    function implementing it.
//! 3. **Fragment emission** — emit a single-statement body using the
//!    `@outN`/`@inN` placeholder convention of the external emission layer.
//!
//! All of this is pure: no shared state is touched, so independent operator
//! nodes compile in parallel ([`synthesize_graph`]).

pub mod addressing;
pub mod error;
pub mod function_map;
pub mod opcode;
pub mod synthesizer;

pub use addressing::{select, AddressingMode, SMALL_TENSOR_MAX_POINTS};
pub use error::{CodegenError, Result};
pub use function_map::function_name;
pub use opcode::{BinaryOp, Opcode};
pub use synthesizer::{synthesize, synthesize_graph, HyperKernel, KernelRequest};
