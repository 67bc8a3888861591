//! Error taxonomy for forecast field resolution.

use thiserror::Error;

use crate::bbox::{BboxError, BoundingBox};

/// Result type alias using ForecastError.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Primary error type for field resolution requests.
///
/// `run` fields carry the run identity as displayed by `ForecastRun`, or
/// `"unknown run"` when the dataset does not report one.
#[derive(Debug, Error)]
pub enum ForecastError {
    // === Request Errors ===
    #[error("Unknown parameter '{parameter}' at lead time index {lead_time} ({run})")]
    UnknownParameter {
        parameter: String,
        lead_time: i64,
        run: String,
    },

    #[error(
        "Lead time index {index} out of range for '{parameter}' ({run}): {available} time steps available"
    )]
    LeadTimeOutOfRange {
        parameter: String,
        index: i64,
        available: usize,
        run: String,
    },

    #[error(
        "Invalid bounding box {bbox} for '{parameter}' at lead time index {lead_time} ({run}): {source}"
    )]
    InvalidBoundingBox {
        bbox: BoundingBox,
        parameter: String,
        lead_time: i64,
        run: String,
        #[source]
        source: BboxError,
    },

    #[error(
        "Bounding box {bbox} contains no grid points for '{parameter}' at lead time index {lead_time} ({run})"
    )]
    EmptySelection {
        parameter: String,
        bbox: BoundingBox,
        lead_time: i64,
        run: String,
    },

    // === Dataset Errors ===
    #[error(
        "Failed to read '{variable}' for '{parameter}' at lead time index {lead_time} ({run}): {message}"
    )]
    DatasetReadError {
        parameter: String,
        variable: String,
        lead_time: i64,
        run: String,
        message: String,
    },

    #[error(
        "Dataset unavailable for '{parameter}' at lead time index {lead_time} ({run}): {message}"
    )]
    DatasetUnavailable {
        parameter: String,
        lead_time: i64,
        run: String,
        message: String,
    },
}

impl ForecastError {
    /// Short stable code for user-facing surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::UnknownParameter { .. } => "UnknownParameter",
            ForecastError::LeadTimeOutOfRange { .. } => "LeadTimeOutOfRange",
            ForecastError::InvalidBoundingBox { .. } => "InvalidBoundingBox",
            ForecastError::EmptySelection { .. } => "EmptySelection",
            ForecastError::DatasetReadError { .. } => "DatasetReadError",
            ForecastError::DatasetUnavailable { .. } => "DatasetUnavailable",
        }
    }

    /// Caller/configuration errors, as opposed to environmental ones.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ForecastError::UnknownParameter { .. }
                | ForecastError::LeadTimeOutOfRange { .. }
                | ForecastError::InvalidBoundingBox { .. }
                | ForecastError::EmptySelection { .. }
        )
    }

    /// Resolution never retries; callers pick another run instead.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Display label for an optional run identity.
pub fn run_label<T: std::fmt::Display>(run: Option<T>) -> String {
    run.map(|r| r.to_string())
        .unwrap_or_else(|| "unknown run".to_string())
}
