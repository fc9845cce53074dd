//! Typed identifiers for compiled-graph wiring.
//!
//! Registers are identified by opaque numeric ids; identity matters only
//! for connecting kernel inputs to producer outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::FieldType;

/// Opaque identity of a virtual field register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterId(pub u64);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<u64> for RegisterId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The output slot of one compiled operator.
///
/// Owned by the graph; kernels hold cheap clones of the descriptor and use
/// the id for wiring only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualFieldRegister {
    pub id: RegisterId,
    pub field_type: FieldType,
}

impl VirtualFieldRegister {
    pub fn new(id: RegisterId, field_type: FieldType) -> Self {
        Self { id, field_type }
    }
}

impl fmt::Display for VirtualFieldRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_identity() {
        let a = VirtualFieldRegister::new(RegisterId(1), FieldType::scalar());
        let b = VirtualFieldRegister::new(RegisterId(1), FieldType::scalar());
        let c = VirtualFieldRegister::new(RegisterId(2), FieldType::scalar());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_register_display() {
        assert_eq!(RegisterId(7).to_string(), "r7");
    }
}
