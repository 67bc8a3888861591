//! The dataset collaborator seam and an in-memory implementation.
//!
//! A [`GridDataset`] is a read-only time × lat × lon grid keyed by raw
//! variable names. A [`DatasetSource`] opens one dataset per model run.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use forecast_common::ForecastRun;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::grid::{nullable_floats, Grid2D};

/// Read access to one model run's gridded output.
///
/// Implementations must keep `times()` strictly increasing, aligned with
/// lead-time indices starting at 0, and must be safe to read from several
/// threads at once.
pub trait GridDataset: Send + Sync {
    /// Run identity, when the dataset knows it.
    fn run(&self) -> Option<ForecastRun>;

    /// Valid times, one per lead-time index.
    fn times(&self) -> &[DateTime<Utc>];

    /// Latitude coordinates, ascending or descending.
    fn latitudes(&self) -> &[f64];

    /// Longitude coordinates, ascending or descending.
    fn longitudes(&self) -> &[f64];

    /// Read one variable at one time index over the full lat × lon extent.
    fn read_slice(&self, variable: &str, time_index: usize) -> Result<Grid2D, DatasetError>;
}

impl<D: GridDataset + ?Sized> GridDataset for Arc<D> {
    fn run(&self) -> Option<ForecastRun> {
        (**self).run()
    }

    fn times(&self) -> &[DateTime<Utc>] {
        (**self).times()
    }

    fn latitudes(&self) -> &[f64] {
        (**self).latitudes()
    }

    fn longitudes(&self) -> &[f64] {
        (**self).longitudes()
    }

    fn read_slice(&self, variable: &str, time_index: usize) -> Result<Grid2D, DatasetError> {
        (**self).read_slice(variable, time_index)
    }
}

/// Opens datasets by model run.
///
/// Opening a run that is not published yet fails with
/// [`DatasetError::Unavailable`].
pub trait DatasetSource: Send + Sync {
    type Dataset: GridDataset;

    fn open_run(&self, run: &ForecastRun) -> Result<Arc<Self::Dataset>, DatasetError>;
}

/// A fully materialized dataset.
///
/// Variables are stored flattened as `[time][lat][lon]`. This is what JSON
/// snapshots deserialize into, and what tests build by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDataset {
    run: Option<ForecastRun>,
    time: Vec<DateTime<Utc>>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    #[serde(default)]
    variables: BTreeMap<String, Variable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct Variable(#[serde(with = "nullable_floats")] Vec<f32>);

impl MemoryDataset {
    /// Create an empty dataset over the given axes.
    pub fn new(
        run: Option<ForecastRun>,
        time: Vec<DateTime<Utc>>,
        lat: Vec<f64>,
        lon: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let dataset = Self {
            run,
            time,
            lat,
            lon,
            variables: BTreeMap::new(),
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Add a variable, flattened as `[time][lat][lon]`.
    pub fn with_variable(mut self, name: &str, data: Vec<f32>) -> Result<Self, DatasetError> {
        self.insert_variable(name, data)?;
        Ok(self)
    }

    /// Add or replace a variable, flattened as `[time][lat][lon]`.
    pub fn insert_variable(&mut self, name: &str, data: Vec<f32>) -> Result<(), DatasetError> {
        let expected = self.time.len() * self.slice_len();
        if data.len() != expected {
            return Err(DatasetError::ShapeMismatch {
                variable: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        self.variables.insert(name.to_string(), Variable(data));
        Ok(())
    }

    /// Attach a run identity.
    pub fn with_run(mut self, run: ForecastRun) -> Self {
        self.run = Some(run);
        self
    }

    /// Names of the stored variables.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Load a JSON snapshot.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a JSON snapshot and check its invariants.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        let expected = dataset.time.len() * dataset.slice_len();
        for (name, Variable(data)) in &dataset.variables {
            if data.len() != expected {
                return Err(DatasetError::ShapeMismatch {
                    variable: name.clone(),
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(dataset)
    }

    /// Write a JSON snapshot.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn slice_len(&self) -> usize {
        self.lat.len() * self.lon.len()
    }

    fn validate(&self) -> Result<(), DatasetError> {
        if self.lat.is_empty() || self.lon.is_empty() {
            return Err(DatasetError::malformed("latitude and longitude axes must be non-empty"));
        }
        if self.lat.iter().chain(&self.lon).any(|v| !v.is_finite()) {
            return Err(DatasetError::malformed("coordinates must be finite"));
        }
        if self.time.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DatasetError::malformed("time axis must be strictly increasing"));
        }
        Ok(())
    }
}

impl GridDataset for MemoryDataset {
    fn run(&self) -> Option<ForecastRun> {
        self.run
    }

    fn times(&self) -> &[DateTime<Utc>] {
        &self.time
    }

    fn latitudes(&self) -> &[f64] {
        &self.lat
    }

    fn longitudes(&self) -> &[f64] {
        &self.lon
    }

    fn read_slice(&self, variable: &str, time_index: usize) -> Result<Grid2D, DatasetError> {
        let Variable(data) = self
            .variables
            .get(variable)
            .ok_or_else(|| DatasetError::MissingVariable(variable.to_string()))?;

        if time_index >= self.time.len() {
            return Err(DatasetError::TimeIndexOutOfRange {
                index: time_index,
                len: self.time.len(),
            });
        }

        let len = self.slice_len();
        let start = time_index * len;
        data.get(start..start + len)
            .and_then(|slice| Grid2D::new(slice.to_vec(), self.lon.len(), self.lat.len()))
            .ok_or_else(|| {
                DatasetError::malformed(format!(
                    "'{}' holds {} values, too few for time index {}",
                    variable,
                    data.len(),
                    time_index
                ))
            })
    }
}
