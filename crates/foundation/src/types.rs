//! Field type descriptions.
//!
//! A field is a multi-dimensional array of tensor-valued samples. Its type
//! is the triple (element kind, tensor shape, field shape); two field types
//! are equal iff all three components match. All shapes are immutable once
//! constructed, and all flattened layouts are row-major with the first
//! dimension slowest-varying.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of spatial dimensions a field may have.
pub const MAX_FIELD_DIMENSIONS: usize = 3;

/// Errors raised while constructing shapes.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("field shape has {0} dimensions, maximum is {MAX_FIELD_DIMENSIONS}")]
    TooManyDimensions(usize),

    #[error("shape dimension {index} is zero")]
    ZeroDimension { index: usize },
}

/// The scalar element kind of a field.
///
/// Currently a single numeric kind; kept as an enum so the type model does
/// not change shape when further kinds are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// 32-bit floating point, the kernel-language scalar type.
    Float32,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Float32 => write!(f, "f32"),
        }
    }
}

/// The shape of the tensor stored at each field point.
///
/// Rank 0 is a scalar. Dimensions are small fixed sizes known at graph
/// build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorShape(Vec<usize>);

impl TensorShape {
    /// The rank-0 (scalar) tensor shape.
    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    /// Creates a tensor shape from ordered dimensions.
    pub fn new(dimensions: Vec<usize>) -> Result<Self, ShapeError> {
        if let Some(index) = dimensions.iter().position(|&d| d == 0) {
            return Err(ShapeError::ZeroDimension { index });
        }
        Ok(Self(dimensions))
    }

    /// Tensor rank (0 for scalars).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// True if this is the scalar shape.
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of scalar elements in one tensor point (1 for rank 0).
    pub fn points(&self) -> usize {
        self.0.iter().product()
    }

    /// Ordered dimensions.
    pub fn dimensions(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            write!(f, "scalar")
        } else {
            let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
            write!(f, "tensor[{}]", dims.join("x"))
        }
    }
}

/// The spatial shape of a field: 0 to 3 dimensions with sizes.
///
/// A 0-D field holds exactly one tensor point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldShape(Vec<usize>);

impl FieldShape {
    /// The 0-D field shape (a single point).
    pub fn zero_dimensional() -> Self {
        Self(Vec::new())
    }

    /// Creates a field shape from ordered sizes, slowest-varying first.
    pub fn new(sizes: Vec<usize>) -> Result<Self, ShapeError> {
        if sizes.len() > MAX_FIELD_DIMENSIONS {
            return Err(ShapeError::TooManyDimensions(sizes.len()));
        }
        if let Some(index) = sizes.iter().position(|&d| d == 0) {
            return Err(ShapeError::ZeroDimension { index });
        }
        Ok(Self(sizes))
    }

    /// Number of spatial dimensions (0–3).
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    /// Ordered sizes, slowest-varying first.
    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    /// Number of tensor points in the field (1 for 0-D).
    pub fn points(&self) -> usize {
        self.0.iter().product()
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "0d")
        } else {
            let sizes: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
            write!(f, "{}", sizes.join("x"))
        }
    }
}

/// The complete type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// Scalar element kind.
    pub element: ElementKind,
    /// Shape of the tensor at each field point.
    pub tensor: TensorShape,
    /// Spatial shape of the field.
    pub field: FieldShape,
}

impl FieldType {
    pub fn new(element: ElementKind, tensor: TensorShape, field: FieldShape) -> Self {
        Self {
            element,
            tensor,
            field,
        }
    }

    /// A 0-D field of scalars: the smallest field type.
    pub fn scalar() -> Self {
        Self::new(
            ElementKind::Float32,
            TensorShape::scalar(),
            FieldShape::zero_dimensional(),
        )
    }

    /// Total number of scalars in the flattened row-major layout.
    pub fn volume(&self) -> usize {
        self.field.points() * self.tensor.points()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} field of {}", self.field, self.tensor, self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field_type_volume() {
        let ftype = FieldType::scalar();
        assert_eq!(ftype.volume(), 1);
        assert!(ftype.tensor.is_scalar());
        assert_eq!(ftype.field.dimensions(), 0);
    }

    #[test]
    fn test_tensor_shape_points() {
        assert_eq!(TensorShape::scalar().points(), 1);
        assert_eq!(TensorShape::new(vec![3]).unwrap().points(), 3);
        assert_eq!(TensorShape::new(vec![2, 2]).unwrap().points(), 4);
    }

    #[test]
    fn test_field_type_equality() {
        let a = FieldType::new(
            ElementKind::Float32,
            TensorShape::new(vec![2]).unwrap(),
            FieldShape::new(vec![4, 4]).unwrap(),
        );
        let b = FieldType::new(
            ElementKind::Float32,
            TensorShape::new(vec![2]).unwrap(),
            FieldShape::new(vec![4, 4]).unwrap(),
        );
        let c = FieldType::new(
            ElementKind::Float32,
            TensorShape::scalar(),
            FieldShape::new(vec![4, 4]).unwrap(),
        );
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_field_shape_limits() {
        assert!(FieldShape::new(vec![2, 3, 4]).is_ok());
        assert!(matches!(
            FieldShape::new(vec![2, 3, 4, 5]),
            Err(ShapeError::TooManyDimensions(4))
        ));
        assert!(matches!(
            FieldShape::new(vec![2, 0]),
            Err(ShapeError::ZeroDimension { index: 1 })
        ));
    }

    #[test]
    fn test_volume_is_row_major_product() {
        let ftype = FieldType::new(
            ElementKind::Float32,
            TensorShape::new(vec![3]).unwrap(),
            FieldShape::new(vec![2, 5]).unwrap(),
        );
        assert_eq!(ftype.volume(), 2 * 5 * 3);
    }
}
