//! Sensors: host → graph boundary devices.
//!
//! A pipelined sensor reads one value per cycle, strictly before the
//! compiled kernels that consume the field execute in that cycle, so
//! supplied data adds no latency relative to internal computation. Its host
//! callback may decline (`Repeat`), leaving the field's previous contents
//! in place. An unpipelined sensor always receives a full sequence and
//! carries no cross-cycle state.

use tracing::trace;

use fieldflow_foundation::FieldType;

use crate::checkpoint::{CheckpointRecord, Checkpointable};
use crate::device::{BoundaryDevice, PipelinedReadFn, ReadFn, ResetHookFn, SensorData};
use crate::error::{Error, Result};
use crate::field::Field;

/// Stable restore tag for [`PipelinedSensor`].
pub const PIPELINED_SENSOR_TAG: &str = "pipelined-sensor";

/// Host → graph device with a per-cycle sequencing counter.
///
/// The counter records how many reads have completed. `reset` zeroes it and
/// performs one priming read, so cycle-0 data is visible to kernels in
/// cycle 0.
pub struct PipelinedSensor {
    field: Field,
    read: PipelinedReadFn,
    reset_hook: ResetHookFn,
    values_read: u64,
}

impl PipelinedSensor {
    pub fn new(field_type: FieldType, read: PipelinedReadFn, reset_hook: ResetHookFn) -> Self {
        Self {
            field: Field::zeroed(field_type),
            read,
            reset_hook,
            values_read: 0,
        }
    }

    /// Reconstructs a sensor from a checkpoint record.
    ///
    /// Requires a scalar-tensor field type; parses exactly one counter token
    /// and immediately replays the read that supplied the checkpointed
    /// device's current contents, so subsequent `step` calls reproduce the
    /// uninterrupted run's value sequence. All-or-nothing: any failure
    /// returns an error and no device.
    pub fn restore(
        field_type: FieldType,
        record: &CheckpointRecord,
        read: PipelinedReadFn,
        reset_hook: ResetHookFn,
    ) -> Result<Self> {
        if !field_type.tensor.is_scalar() {
            return Err(Error::TypeMismatch {
                expected: "field of scalar tensors".to_string(),
                found: field_type,
            });
        }
        let counter = record.parse_counter()?;
        let mut sensor = Self {
            field: Field::zeroed(field_type),
            read,
            reset_hook,
            values_read: counter,
        };
        sensor.read_once()?;
        Ok(sensor)
    }

    fn read_once(&mut self) -> Result<()> {
        match (self.read)(self.values_read) {
            SensorData::NewData(scalars) => self.field.fill_from(scalars)?,
            SensorData::Repeat => {
                trace!(read_index = self.values_read, "sensor repeated previous data");
            }
        }
        self.values_read += 1;
        Ok(())
    }
}

impl BoundaryDevice for PipelinedSensor {
    fn reset(&mut self) -> Result<()> {
        (self.reset_hook)();
        self.values_read = 0;
        self.read_once()
    }

    fn step(&mut self) -> Result<()> {
        self.read_once()
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }
}

impl Checkpointable for PipelinedSensor {
    fn tag(&self) -> &'static str {
        PIPELINED_SENSOR_TAG
    }

    fn checkpoint(&self) -> CheckpointRecord {
        CheckpointRecord::from_counter(self.values_read.saturating_sub(1))
    }
}

/// Host → graph device with no cross-cycle state.
///
/// The callback returns a bare sequence (never optional) and is invoked
/// synchronously once per `reset` and once per `step`.
pub struct UnpipelinedSensor {
    field: Field,
    read: ReadFn,
    reset_hook: ResetHookFn,
}

impl UnpipelinedSensor {
    pub fn new(field_type: FieldType, read: ReadFn, reset_hook: ResetHookFn) -> Self {
        Self {
            field: Field::zeroed(field_type),
            read,
            reset_hook,
        }
    }

    fn read_once(&mut self) -> Result<()> {
        let scalars = (self.read)();
        self.field.fill_from(scalars)
    }
}

impl BoundaryDevice for UnpipelinedSensor {
    fn reset(&mut self) -> Result<()> {
        (self.reset_hook)();
        self.read_once()
    }

    fn step(&mut self) -> Result<()> {
        self.read_once()
    }

    fn field(&self) -> &Field {
        &self.field
    }

    fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }
}
