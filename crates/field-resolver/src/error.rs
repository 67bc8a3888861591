//! Error types for the dataset collaborator and configuration.

use thiserror::Error;

/// Errors reported by a dataset collaborator.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The run is not (yet) published or the source cannot be reached.
    #[error("dataset unavailable: {0}")]
    Unavailable(String),

    /// The requested raw variable does not exist in the dataset.
    #[error("variable not found: {0}")]
    MissingVariable(String),

    /// A time index outside the dataset's time axis was requested.
    #[error("time index {index} outside time axis of length {len}")]
    TimeIndexOutOfRange { index: usize, len: usize },

    /// Variable data does not match the declared grid shape.
    #[error("variable '{variable}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    /// Coordinates or payload violate the dataset invariants.
    #[error("malformed dataset: {0}")]
    Malformed(String),

    /// Transport failure while reading.
    #[error("read failed: {0}")]
    ReadFailed(String),
}

impl DatasetError {
    /// Create a Malformed error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::ReadFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Invalid resolver configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be > 0")]
    MustBePositive { field: &'static str },

    #[error("provider_url must not be empty")]
    EmptyProviderUrl,
}
