//! Runtime errors.

use thiserror::Error;

use fieldflow_foundation::FieldType;

/// Runtime result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors.
///
/// Data-contract violations are fatal to the current cycle; checkpoint
/// errors make `restore` all-or-nothing. Nothing here is retried — retries,
/// if desired, belong to the external scheduler.
#[derive(Debug, Error)]
pub enum Error {
    #[error("callback supplied {got} of {expected} scalars")]
    Underflow { expected: usize, got: usize },

    #[error("callback exceeded the field's {expected} scalars")]
    Overflow { expected: usize },

    #[error("field type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: FieldType,
    },

    #[error("malformed checkpoint record {record:?}: {reason}")]
    MalformedCheckpoint { record: String, reason: String },

    #[error("no restore factory registered for device tag {tag:?}")]
    UnknownDeviceTag { tag: String },
}
