//! Errors reported by the normalizer.

use thiserror::Error;

/// Reasons a payload could not be turned into a [`Reading`](crate::Reading).
///
/// None of these abort an evaluation: [`normalize_or_default`](crate::normalize_or_default)
/// converts them into a notice next to a sentinel reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The JSON is neither a header table nor a sequence of records.
    #[error("Unrecognized payload shape: {0}")]
    UnrecognizedPayloadShape(String),

    /// No column or key matched the field name or any of its fallbacks.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// The field exists but does not hold a finite number.
    #[error("Invalid value for {field}: {raw}")]
    InvalidValue { field: String, raw: String },

    /// The time field is not an ISO-8601 timestamp.
    #[error("Cannot parse timestamp {0:?}")]
    TimestampParse(String),
}
