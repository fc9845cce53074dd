//! Fieldflow Runtime
//!
//! The boundary between the compiled dataflow graph and the host process:
//! sensors inject host data into fields, actuators drain computed fields
//! back out, and pipelined devices checkpoint their sequencing state so a
//! restored device's future outputs are indistinguishable from an
//! uninterrupted run.
//!
//! # Execution model
//!
//! Each cycle is strictly sequential: `reset` once, then repeated `step`
//! calls, each ordered as sensors → compiled kernels → actuators. Host
//! callbacks run synchronously inside the step; a callback that cannot
//! satisfy its scalar-count contract fails the step instead of hanging.

pub mod actuator;
pub mod checkpoint;
pub mod cycle;
pub mod device;
pub mod error;
pub mod field;
pub mod sensor;

pub use actuator::{PipelinedActuator, UnpipelinedActuator, PIPELINED_ACTUATOR_TAG};
pub use checkpoint::{CheckpointRecord, Checkpointable, RestoreFn, RestoreRegistry};
pub use cycle::{CycleDriver, KernelPassFn};
pub use device::{
    BoundaryDevice, PipelinedReadFn, ReadFn, ResetHookFn, ScalarIter, SensorData, WriteFn,
};
pub use error::{Error, Result};
pub use field::{DrainIter, Field};
pub use sensor::{PipelinedSensor, UnpipelinedSensor, PIPELINED_SENSOR_TAG};
