//! Materialized field buffers.
//!
//! A [`Field`] is the flat row-major buffer a boundary device attaches to:
//! `field_type.volume()` scalars, first dimension slowest-varying. Fill and
//! drain enforce the exact-count contract from both sides — a host callback
//! must supply or consume exactly `volume()` scalars, and a failed fill
//! leaves the previous contents untouched.

use fieldflow_foundation::FieldType;

use crate::error::{Error, Result};

/// A materialized field: type plus flattened row-major contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    field_type: FieldType,
    data: Vec<f32>,
}

impl Field {
    /// Creates a zero-filled field of the given type.
    pub fn zeroed(field_type: FieldType) -> Self {
        let volume = field_type.volume();
        Self {
            field_type,
            data: vec![0.0; volume],
        }
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Flattened row-major contents.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flattened contents, written by compiled kernels.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Number of scalars in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces the contents from an iterator of scalars.
    ///
    /// The iterator must yield exactly `len()` scalars: fewer fails with
    /// [`Error::Underflow`], more with [`Error::Overflow`]. On failure the
    /// previous contents are retained — no partial write is valid.
    pub fn fill_from(&mut self, mut scalars: impl Iterator<Item = f32>) -> Result<()> {
        let expected = self.data.len();
        let mut staging = Vec::with_capacity(expected);
        while staging.len() < expected {
            match scalars.next() {
                Some(value) => staging.push(value),
                None => {
                    return Err(Error::Underflow {
                        expected,
                        got: staging.len(),
                    });
                }
            }
        }
        if scalars.next().is_some() {
            return Err(Error::Overflow { expected });
        }
        self.data.copy_from_slice(&staging);
        Ok(())
    }

    /// Drains the contents into a writer callback.
    ///
    /// The writer must consume exactly `len()` scalars; consuming fewer
    /// fails with [`Error::Underflow`], calling `next()` again after the
    /// field is exhausted fails with [`Error::Overflow`]. Checked after the
    /// writer returns, so a failed drain has no partial effect.
    pub fn drain_to(&self, writer: &mut dyn FnMut(&mut DrainIter<'_>)) -> Result<()> {
        drain_scalars(&self.data, writer)
    }
}

/// Drains a scalar slice into a writer under the exact-count contract.
pub(crate) fn drain_scalars(
    data: &[f32],
    writer: &mut dyn FnMut(&mut DrainIter<'_>),
) -> Result<()> {
    let mut iter = DrainIter {
        inner: data.iter(),
        consumed: 0,
        overran: false,
    };
    writer(&mut iter);

    let expected = data.len();
    if iter.overran {
        return Err(Error::Overflow { expected });
    }
    if iter.consumed < expected {
        return Err(Error::Underflow {
            expected,
            got: iter.consumed,
        });
    }
    Ok(())
}

/// Counting iterator handed to actuator writers.
///
/// Records how many scalars the writer consumed and whether it kept pulling
/// after exhaustion, so the drain contract can be enforced on the consumer
/// side.
pub struct DrainIter<'a> {
    inner: std::slice::Iter<'a, f32>,
    consumed: usize,
    overran: bool,
}

impl Iterator for DrainIter<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        match self.inner.next() {
            Some(&value) => {
                self.consumed += 1;
                Some(value)
            }
            None => {
                self.overran = true;
                None
            }
        }
    }
}
