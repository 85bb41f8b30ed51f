//! Error types for batch validation in switchlog-types.

use thiserror::Error;

/// Errors raised while validating an inbound event batch.
///
/// Validation always happens before any storage access, so a batch that
/// fails here has caused zero mutations. These map to a client-error
/// response at the transport boundary.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The batch's group identifier is empty.
    #[error("missing or empty group_id")]
    EmptyGroupId,

    /// The batch's device label is empty.
    #[error("missing or empty device")]
    EmptyDevice,

    /// The batch contains no events.
    #[error("event batch is empty")]
    EmptyBatch,

    /// The raw payload did not decode into a batch (wrong field type,
    /// missing field, non-numeric timestamp).
    #[error("malformed batch: {0}")]
    Malformed(String),
}

/// Result type alias using switchlog-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
