//! Fieldflow Foundation
//!
//! Core type model shared by the compiler and runtime: field descriptions
//! (element kind, tensor shape, spatial shape) and the typed identifiers
//! used to wire compiled operators together.

pub mod ids;
pub mod types;

pub use ids::{RegisterId, VirtualFieldRegister};
pub use types::{ElementKind, FieldShape, FieldType, ShapeError, TensorShape};
