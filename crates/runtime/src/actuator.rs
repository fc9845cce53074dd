//! Actuators: graph → host boundary devices.
//!
//! An unpipelined actuator drains the field's current contents into the
//! host writer with zero added latency: the value observed at cycle N is
//! the value computed at cycle N, including at reset. A pipelined actuator
//! trades immediacy for decoupled timing with a latency fixed at exactly
//! one cycle: each step delivers the value latched on the previous cycle,
//! then latches the current one.

use fieldflow_foundation::FieldType;

use crate::checkpoint::{CheckpointRecord, Checkpointable};
use crate::device::{BoundaryDevice, ResetHookFn, WriteFn};
use crate::error::{Error, Result};
use crate::field::{drain_scalars, Field};

/// Stable restore tag for [`PipelinedActuator`].
pub const PIPELINED_ACTUATOR_TAG: &str = "pipelined-actuator";

/// Graph → host device with zero added latency.
pub struct UnpipelinedActuator {
    field: Field,
    write: WriteFn,
    reset_hook: ResetHookFn,
}

impl UnpipelinedActuator {
    pub fn new(field_type: FieldType, write: WriteFn, reset_hook: ResetHookFn) -> Self {
        Self {
            field: Field::zeroed(field_type),
            write,
            reset_hook,
        }
    }

    fn drain_once(&mut self) -> Result<()> {
        let write = &mut self.write;
        self.field.drain_to(&mut |scalars| write(scalars))
    }
}

impl BoundaryDevice for UnpipelinedActuator {
    fn reset(&mut self) -> Result<()> {
        (self.reset_hook)();
        self.drain_once()
    }

    fn step(&mut self) -> Result<()> {
        self.drain_once()
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }
}

/// Graph → host device with a fixed one-cycle latency.
///
/// The sequencing counter records how many deliveries have completed.
pub struct PipelinedActuator {
    field: Field,
    /// Value latched on the previous cycle, delivered on the next step.
    pending: Vec<f32>,
    write: WriteFn,
    reset_hook: ResetHookFn,
    values_written: u64,
    /// Set by `restore`: the first step latches the field before delivering,
    /// so the replayed cycle's value is the one in flight.
    replay: bool,
}

impl PipelinedActuator {
    pub fn new(field_type: FieldType, write: WriteFn, reset_hook: ResetHookFn) -> Self {
        let field = Field::zeroed(field_type);
        let pending = field.as_slice().to_vec();
        Self {
            field,
            pending,
            write,
            reset_hook,
            values_written: 0,
            replay: false,
        }
    }

    /// Reconstructs an actuator from a checkpoint record.
    ///
    /// Requires a scalar-tensor field type and exactly one counter token.
    /// At checkpoint time the actuator held a latched value the host had
    /// not yet observed; the caller must re-materialize the checkpointed
    /// cycle's field contents before the first post-restore `step`, and
    /// that step latches them before delivering — replaying the in-flight
    /// value, then resuming the one-cycle discipline.
    pub fn restore(
        field_type: FieldType,
        record: &CheckpointRecord,
        write: WriteFn,
        reset_hook: ResetHookFn,
    ) -> Result<Self> {
        if !field_type.tensor.is_scalar() {
            return Err(Error::TypeMismatch {
                expected: "field of scalar tensors".to_string(),
                found: field_type,
            });
        }
        let counter = record.parse_counter()?;
        let field = Field::zeroed(field_type);
        let pending = field.as_slice().to_vec();
        Ok(Self {
            field,
            pending,
            write,
            reset_hook,
            values_written: counter,
            replay: true,
        })
    }
}

impl BoundaryDevice for PipelinedActuator {
    fn reset(&mut self) -> Result<()> {
        (self.reset_hook)();
        self.values_written = 0;
        self.replay = false;
        // Latch the initial value without delivering it.
        self.pending.copy_from_slice(self.field.as_slice());
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        if self.replay {
            self.pending.copy_from_slice(self.field.as_slice());
            self.replay = false;
        }
        let write = &mut self.write;
        drain_scalars(&self.pending, &mut |scalars| write(scalars))?;
        self.pending.copy_from_slice(self.field.as_slice());
        self.values_written += 1;
        Ok(())
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }
}

impl Checkpointable for PipelinedActuator {
    fn tag(&self) -> &'static str {
        PIPELINED_ACTUATOR_TAG
    }

    fn checkpoint(&self) -> CheckpointRecord {
        CheckpointRecord::from_counter(self.values_written.saturating_sub(1))
    }
}
