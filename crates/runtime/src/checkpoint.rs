//! Checkpoint/restore protocol for pipelined boundary devices.
//!
//! Only pipelined devices checkpoint: unpipelined devices carry no
//! cross-cycle state beyond what their reset hook reinitializes. A record
//! encodes the device's sequencing counter offset one step behind its live
//! value — at checkpoint time the most recently produced value has not yet
//! been observed by the opposite end of the pipeline, so a restored device
//! must replay that in-flight value before continuing. Restore is
//! all-or-nothing: any failure returns an error and no device.
//!
//! # Record format
//!
//! Whitespace-separated decimal integer tokens. Current devices use exactly
//! one token (the offset counter); parsers reject any other token count.
//!
//! # Dispatch
//!
//! Each checkpointable device carries a stable type tag. The
//! [`RestoreRegistry`] maps tags to restore closures supplied by the host,
//! so reconstruction dispatches from (tag, record) alone.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fieldflow_foundation::FieldType;

use crate::device::BoundaryDevice;
use crate::error::{Error, Result};

/// Opaque serialized sequencing state of one pipelined device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRecord(String);

impl CheckpointRecord {
    /// Encodes a single-counter record.
    pub fn from_counter(counter: u64) -> Self {
        Self(counter.to_string())
    }

    /// Wraps an externally supplied record string, unvalidated.
    pub fn from_string(record: String) -> Self {
        Self(record)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the record as exactly one decimal integer token.
    pub fn parse_counter(&self) -> Result<u64> {
        let mut tokens = self.0.split_whitespace();
        let first = tokens.next().ok_or_else(|| self.malformed("no tokens"))?;
        if tokens.next().is_some() {
            return Err(self.malformed("more than one token"));
        }
        first
            .parse()
            .map_err(|_| self.malformed("token is not a decimal integer"))
    }

    fn malformed(&self, reason: &str) -> Error {
        Error::MalformedCheckpoint {
            record: self.0.clone(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CheckpointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pipelined device whose sequencing state can be serialized.
pub trait Checkpointable: BoundaryDevice {
    /// Stable type tag used to look up the restore factory.
    fn tag(&self) -> &'static str;

    /// Serializes the sequencing counter, offset one step behind its live
    /// value so restore replays the in-flight value.
    fn checkpoint(&self) -> CheckpointRecord;
}

/// Restore factory: reconstructs a device from its field type and record.
/// Host closures capture the callbacks the rebuilt device needs.
pub type RestoreFn =
    Box<dyn Fn(FieldType, &CheckpointRecord) -> Result<Box<dyn BoundaryDevice>> + Send + Sync>;

/// Maps stable device tags to restore factories.
#[derive(Default)]
pub struct RestoreRegistry {
    factories: IndexMap<String, RestoreFn>,
}

impl RestoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registers the restore factory for a device tag. A later registration
    /// for the same tag replaces the earlier one.
    pub fn register(&mut self, tag: impl Into<String>, factory: RestoreFn) {
        let tag = tag.into();
        debug!(tag = %tag, "registered restore factory");
        self.factories.insert(tag, factory);
    }

    /// Reconstructs a device from its tag, field type, and record.
    pub fn restore(
        &self,
        tag: &str,
        field_type: FieldType,
        record: &CheckpointRecord,
    ) -> Result<Box<dyn BoundaryDevice>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| Error::UnknownDeviceTag {
                tag: tag.to_string(),
            })?;
        debug!(tag = %tag, record = %record, "restoring boundary device");
        factory(field_type, record)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SensorData;
    use crate::sensor::PipelinedSensor;

    #[test]
    fn test_parse_single_counter() {
        assert_eq!(CheckpointRecord::from_counter(7).parse_counter().unwrap(), 7);
        assert_eq!(
            CheckpointRecord::from_string("  42 ".to_string())
                .parse_counter()
                .unwrap(),
            42
        );
    }

    #[test]
    fn test_reject_wrong_token_count() {
        let empty = CheckpointRecord::from_string(String::new());
        assert!(matches!(
            empty.parse_counter(),
            Err(Error::MalformedCheckpoint { .. })
        ));

        let two = CheckpointRecord::from_string("1 2".to_string());
        assert!(matches!(
            two.parse_counter(),
            Err(Error::MalformedCheckpoint { .. })
        ));
    }

    #[test]
    fn test_reject_non_integer_token() {
        let record = CheckpointRecord::from_string("abc".to_string());
        assert!(matches!(
            record.parse_counter(),
            Err(Error::MalformedCheckpoint { .. })
        ));
    }

    fn restore_scalar_sensor(
        field_type: FieldType,
        record: &CheckpointRecord,
    ) -> Result<Box<dyn BoundaryDevice>> {
        let sensor = PipelinedSensor::restore(
            field_type,
            record,
            Box::new(|index| SensorData::NewData(Box::new(std::iter::once(index as f32)))),
            Box::new(|| {}),
        )?;
        Ok(Box::new(sensor))
    }

    #[test]
    fn test_registry_dispatch() {
        let mut registry = RestoreRegistry::new();
        registry.register("pipelined-sensor", Box::new(restore_scalar_sensor));

        let record = CheckpointRecord::from_counter(0);
        let device = registry
            .restore("pipelined-sensor", FieldType::scalar(), &record)
            .unwrap();
        assert_eq!(device.field().len(), 1);

        let err = registry
            .restore("unknown", FieldType::scalar(), &record)
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownDeviceTag { .. }));
    }
}
