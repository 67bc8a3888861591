//! Common types and utilities shared across the forecast workspace.

pub mod bbox;
pub mod error;
pub mod time;

pub use bbox::{regions, BboxError, BoundingBox};
pub use error::{run_label, ForecastError, ForecastResult};
pub use time::{format_valid_time, lead_indices, lead_tag, ForecastRun, ModelCycle, TimeParseError};
