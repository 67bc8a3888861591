//! JSON snapshot datasets for offline use.
//!
//! A snapshot directory holds one file per run, named
//! `gfs{YYYYMMDD}_{HH}z.json`, each a serialized [`MemoryDataset`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use forecast_common::ForecastRun;
use tracing::{debug, info};

use crate::dataset::{DatasetSource, GridDataset, MemoryDataset};
use crate::error::DatasetError;

/// Opens runs from a directory of JSON snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a run is stored in.
    pub fn path_for(&self, run: &ForecastRun) -> PathBuf {
        self.dir.join(snapshot_file_name(run))
    }

    /// Write `dataset` as the snapshot for `run`.
    pub fn store(&self, run: &ForecastRun, dataset: &MemoryDataset) -> Result<PathBuf, DatasetError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(run);
        dataset.clone().with_run(*run).to_json_file(&path)?;
        info!(run = %run, path = ?path, "Stored dataset snapshot");
        Ok(path)
    }
}

impl DatasetSource for SnapshotSource {
    type Dataset = MemoryDataset;

    fn open_run(&self, run: &ForecastRun) -> Result<Arc<MemoryDataset>, DatasetError> {
        let path = self.path_for(run);
        if !path.exists() {
            return Err(DatasetError::Unavailable(format!(
                "no snapshot for {} at {}",
                run,
                path.display()
            )));
        }

        let dataset = MemoryDataset::from_json_file(&path)?;
        let dataset = match dataset.run() {
            Some(stored) if stored != *run => {
                return Err(DatasetError::malformed(format!(
                    "snapshot {} holds {}, expected {}",
                    path.display(),
                    stored,
                    run
                )));
            }
            Some(_) => dataset,
            None => dataset.with_run(*run),
        };

        debug!(run = %run, path = ?path, steps = dataset.times().len(), "Opened snapshot");
        Ok(Arc::new(dataset))
    }
}

/// `gfs{YYYYMMDD}_{HH}z.json`
pub fn snapshot_file_name(run: &ForecastRun) -> String {
    format!("gfs{}_{}z.json", run.date.format("%Y%m%d"), run.cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn run(cycle: &str) -> ForecastRun {
        ForecastRun::parse("20250115", cycle).unwrap()
    }

    fn dataset() -> MemoryDataset {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap();
        MemoryDataset::new(None, vec![t0], vec![-6.0], vec![106.0])
            .unwrap()
            .with_variable("tmp2m", vec![299.0])
            .unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(snapshot_file_name(&run("06")), "gfs20250115_06z.json");
    }

    #[test]
    fn test_store_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path());
        source.store(&run("06"), &dataset()).unwrap();

        let opened = source.open_run(&run("06")).unwrap();
        assert_eq!(opened.run(), Some(run("06")));
        assert_eq!(opened.read_slice("tmp2m", 0).unwrap().data, vec![299.0]);
    }

    #[test]
    fn test_missing_snapshot_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path());
        assert!(matches!(
            source.open_run(&run("18")),
            Err(DatasetError::Unavailable(_))
        ));
    }

    #[test]
    fn test_mismatched_run_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path());
        dataset()
            .with_run(run("00"))
            .to_json_file(source.path_for(&run("12")))
            .unwrap();
        assert!(matches!(
            source.open_run(&run("12")),
            Err(DatasetError::Malformed(_))
        ));
    }

    #[test]
    fn test_corrupt_snapshot_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path());
        std::fs::write(source.path_for(&run("00")), "{not json").unwrap();
        assert!(matches!(
            source.open_run(&run("00")),
            Err(DatasetError::Malformed(_))
        ));
    }
}
