//! Boundary device abstraction.
//!
//! A boundary device wraps a host callback and the field it attaches to.
//! Sensors carry data host → graph, actuators graph → host. The external
//! execution cycle drives every device through `reset` once, then `step`
//! once per cycle.

use crate::error::Result;
use crate::field::{DrainIter, Field};

/// Host hook invoked on `reset`, before internal state reinitializes.
pub type ResetHookFn = Box<dyn FnMut() + Send>;

/// A sequence of scalars crossing the boundary.
pub type ScalarIter = Box<dyn Iterator<Item = f32> + Send>;

/// What a pipelined sensor's host callback returned for one read.
pub enum SensorData {
    /// The next field contents, flattened row-major.
    NewData(ScalarIter),
    /// No new data this cycle; the field keeps its previous contents.
    Repeat,
}

/// Host read callback for a pipelined sensor. Receives the device's
/// sequencing counter (how many reads have completed) so a restored host
/// source can resume from the right position.
pub type PipelinedReadFn = Box<dyn FnMut(u64) -> SensorData + Send>;

/// Host read callback for an unpipelined sensor; data is always supplied.
pub type ReadFn = Box<dyn FnMut() -> ScalarIter + Send>;

/// Host write callback for an actuator. Must consume exactly the field's
/// flattened scalar count from the iterator — no fewer, and without
/// polling `next()` past that count: one extra call to check for
/// exhaustion counts as overflow and fails the step. Writers that know the
/// field's volume should take exactly that many scalars rather than
/// iterating to exhaustion.
pub type WriteFn = Box<dyn FnMut(&mut DrainIter<'_>) + Send>;

/// A host-facing boundary device (sensor or actuator).
///
/// `reset` runs the host reset hook and reinitializes sequencing state;
/// `step` advances the device by exactly one cycle. Each device owns its
/// sequencing state exclusively.
pub trait BoundaryDevice: Send {
    fn reset(&mut self) -> Result<()>;

    fn step(&mut self) -> Result<()>;

    /// The field this device attaches to.
    fn field(&self) -> &Field;

    /// Mutable access for the compiled kernels that produce or consume the
    /// field's value.
    fn field_mut(&mut self) -> &mut Field;
}
