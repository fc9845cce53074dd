//! Execution-cycle driver.
//!
//! Implements the in-device half of the external ExecutionCycle contract:
//! `reset` once, then `step` once per cycle, each fully ordered as
//! (sensor reads) → (compiled kernel execution) → (actuator drains).
//! The graph-level scheduler that decides *when* to call `reset`/`step`
//! stays external; overlap across device boundaries is permitted to an
//! implementation only if observable output ordering is unchanged, and
//! this driver performs none.

use tracing::{debug, trace};

use crate::device::BoundaryDevice;
use crate::error::Result;
use crate::field::Field;

/// Compiled-kernel execution for one cycle: reads sensor fields, writes
/// actuator fields. Supplied by the external scheduler.
pub type KernelPassFn = Box<dyn FnMut(&[&Field], &mut [&mut Field]) -> Result<()> + Send>;

/// Sequences boundary devices and the kernel pass through reset/step.
pub struct CycleDriver {
    sensors: Vec<Box<dyn BoundaryDevice>>,
    actuators: Vec<Box<dyn BoundaryDevice>>,
    kernels: KernelPassFn,
    cycle: u64,
}

impl CycleDriver {
    pub fn new(kernels: KernelPassFn) -> Self {
        Self {
            sensors: Vec::new(),
            actuators: Vec::new(),
            kernels,
            cycle: 0,
        }
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn BoundaryDevice>) {
        self.sensors.push(sensor);
    }

    pub fn add_actuator(&mut self, actuator: Box<dyn BoundaryDevice>) {
        self.actuators.push(actuator);
    }

    /// Resets every device, runs the kernel pass once so actuators observe
    /// the cycle-0 value, and drains actuators.
    ///
    /// Sensor resets run before the kernel pass, actuator resets after, so
    /// an unpipelined actuator's reset drain sees the value computed at
    /// reset.
    pub fn reset(&mut self) -> Result<()> {
        debug!(
            sensors = self.sensors.len(),
            actuators = self.actuators.len(),
            "resetting execution cycle"
        );
        for sensor in &mut self.sensors {
            sensor.reset()?;
        }
        self.run_kernels()?;
        for actuator in &mut self.actuators {
            actuator.reset()?;
        }
        self.cycle = 0;
        Ok(())
    }

    /// Advances every device by exactly one cycle.
    pub fn step(&mut self) -> Result<()> {
        trace!(cycle = self.cycle, "stepping execution cycle");
        for sensor in &mut self.sensors {
            sensor.step()?;
        }
        self.run_kernels()?;
        for actuator in &mut self.actuators {
            actuator.step()?;
        }
        self.cycle += 1;
        Ok(())
    }

    /// Cycles completed since the last reset.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    fn run_kernels(&mut self) -> Result<()> {
        let inputs: Vec<&Field> = self.sensors.iter().map(|s| s.field()).collect();
        let mut outputs: Vec<&mut Field> =
            self.actuators.iter_mut().map(|a| a.field_mut()).collect();
        (self.kernels)(&inputs, &mut outputs)
    }
}
