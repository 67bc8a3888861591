//! Common helpers for field-resolver integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use field_resolver::{DatasetError, GridDataset, Grid2D, MemoryDataset};
use forecast_common::{BoundingBox, ForecastRun};
use test_utils::{
    create_precipitation_grid, create_pressure_grid, create_temperature_grid, create_u_wind_grid,
    create_v_wind_grid, fixtures, hourly_times, lat_axis, lon_axis, run_init,
};

/// Returns the path to the committed testdata directory.
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Run stored in `testdata/gfs20250115_00z.json`.
pub fn fixture_run() -> ForecastRun {
    ForecastRun::parse("20250115", "00").expect("valid run")
}

pub fn bbox(extent: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(extent.0, extent.1, extent.2, extent.3)
}

/// Synthetic 0.25° run over western Java with every raw variable present.
pub fn java_dataset(steps: usize, descending_lat: bool) -> MemoryDataset {
    let init = run_init(2025, 1, 15, 0);
    let grid = fixtures::grid::JAVA_WEST;
    let lat = lat_axis(grid.min_lat, grid.max_lat, descending_lat);
    let lon = lon_axis(grid.min_lon, grid.max_lon);
    build_dataset(fixture_run(), hourly_times(init, steps), lat, lon)
}

pub fn build_dataset(
    run: ForecastRun,
    times: Vec<DateTime<Utc>>,
    lat: Vec<f64>,
    lon: Vec<f64>,
) -> MemoryDataset {
    let (w, h) = (lon.len(), lat.len());
    let steps = times.len();

    let stack = |f: &dyn Fn(usize) -> Vec<f32>| -> Vec<f32> { (0..steps).flat_map(f).collect() };

    MemoryDataset::new(Some(run), times, lat, lon)
        .and_then(|ds| ds.with_variable("tmp2m", stack(&|t| create_temperature_grid(w, h, t))))
        .and_then(|ds| {
            ds.with_variable(
                "pratesfc",
                stack(&|t| create_precipitation_grid(w, h, t as u32)),
            )
        })
        .and_then(|ds| ds.with_variable("prmslmsl", stack(&|_| create_pressure_grid(w, h))))
        .and_then(|ds| {
            ds.with_variable("ugrd10m", stack(&|t| create_u_wind_grid(w, h, 2.0 + t as f32)))
        })
        .and_then(|ds| ds.with_variable("vgrd10m", stack(&|_| create_v_wind_grid(w, h, 4.0))))
        .expect("synthetic dataset is consistent")
}

/// Counts `read_slice` calls on the wrapped dataset.
pub struct CountingDataset<D> {
    pub inner: D,
    reads: AtomicUsize,
}

impl<D> CountingDataset<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl<D: GridDataset> GridDataset for CountingDataset<D> {
    fn run(&self) -> Option<ForecastRun> {
        self.inner.run()
    }

    fn times(&self) -> &[DateTime<Utc>] {
        self.inner.times()
    }

    fn latitudes(&self) -> &[f64] {
        self.inner.latitudes()
    }

    fn longitudes(&self) -> &[f64] {
        self.inner.longitudes()
    }

    fn read_slice(&self, variable: &str, time_index: usize) -> Result<Grid2D, DatasetError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_slice(variable, time_index)
    }
}

/// Fails every read at one time index, as a dropped connection would.
pub struct FailingDataset<D> {
    pub inner: D,
    pub fail_at: usize,
}

impl<D: GridDataset> GridDataset for FailingDataset<D> {
    fn run(&self) -> Option<ForecastRun> {
        self.inner.run()
    }

    fn times(&self) -> &[DateTime<Utc>] {
        self.inner.times()
    }

    fn latitudes(&self) -> &[f64] {
        self.inner.latitudes()
    }

    fn longitudes(&self) -> &[f64] {
        self.inner.longitudes()
    }

    fn read_slice(&self, variable: &str, time_index: usize) -> Result<Grid2D, DatasetError> {
        if time_index == self.fail_at {
            return Err(DatasetError::read_failed(format!(
                "connection reset while reading {variable}[{time_index}]"
            )));
        }
        self.inner.read_slice(variable, time_index)
    }
}

/// Position of `target` on a coordinate axis.
pub fn index_of(axis: &[f64], target: f64) -> usize {
    axis.iter()
        .position(|&v| (v - target).abs() < 1e-9)
        .unwrap_or_else(|| panic!("{target} not on axis"))
}
