//! Error types for partial date values and field settings

use thiserror::Error;

use crate::component::Component;

/// Result type for partial date operations
pub type Result<T> = std::result::Result<T, PartialDateError>;

/// Errors that can occur while building, loading or saving a partial date
#[derive(Debug, Error)]
pub enum PartialDateError {
    /// Component value outside its valid range
    #[error("{component} value {value} is out of range ({min}..={max})")]
    OutOfRange {
        component: Component,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A numeric operation was requested on the timezone component
    #[error("{component} is not a numeric component")]
    NotNumeric { component: Component },

    /// Text does not fit its storage column
    #[error("{field} is {len} characters long, the limit is {max}")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// Timestamp is NaN or infinite
    #[error("timestamp must be finite, got {0}")]
    InvalidTimestamp(f64),

    /// Unrecognised component name
    #[error("unknown date component: {name}")]
    UnknownComponent { name: String },

    /// A submitted component value has the wrong shape
    #[error("invalid value for {component}: {value}")]
    InvalidComponentValue {
        component: Component,
        value: serde_json::Value,
    },

    /// Estimate table configuration could not be parsed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The serialized settings blob could not be read or written
    #[error("settings blob error: {0}")]
    Blob(#[from] serde_json::Error),

    /// Configuration store failure
    #[error("configuration store error: {message}")]
    Store { message: String },
}

/// Render a list of errors as one `; ` separated message.
pub(crate) fn join_messages<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why an estimate line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationErrorReason {
    #[error("expected 3 '|' separated fields, found {0}")]
    FieldCount(usize),

    #[error("'{0}' is not a valid bound")]
    InvalidBound(String),

    #[error("label is empty")]
    EmptyLabel,

    #[error("component does not take estimates")]
    NotEstimable,

    #[error("estimate configuration must be text")]
    NotText,
}

/// A malformed `start|end|label` estimate line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{component} estimates, line {line_number} ('{line}'): {reason}")]
pub struct ConfigurationError {
    pub component: Component,
    /// One-based line number within the component's configuration text
    pub line_number: usize,
    pub line: String,
    pub reason: ConfigurationErrorReason,
}
