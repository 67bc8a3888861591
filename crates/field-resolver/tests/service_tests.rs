//! Integration tests for the request-level service over snapshot sources.

mod common;

use std::sync::Arc;

use common::{bbox, fixture_run, java_dataset, testdata_dir};
use field_resolver::{
    DatasetSource, FieldRequest, ForecastService, LruRunCache, ResolverConfig, SnapshotSource,
};
use forecast_common::{lead_indices, ForecastError, ForecastRun};
use test_utils::{fixtures, require_test_file, temp_test_dir};

fn service_over(dir: &std::path::Path) -> ForecastService<LruRunCache<SnapshotSource>> {
    let config = ResolverConfig {
        run_cache_capacity: 2,
        ..Default::default()
    };
    let source = LruRunCache::new(SnapshotSource::new(dir), config.run_cache_capacity);
    ForecastService::from_config(source, &config)
}

#[test]
fn test_committed_snapshot_through_service() {
    let path = require_test_file!("gfs20250115_00z.json");
    let service = service_over(path.parent().unwrap());
    let request = FieldRequest::new(
        fixture_run(),
        "prmslmsl",
        0,
        bbox(fixtures::bbox::SOEKARNO_HATTA),
    );

    let field = service.resolve(&request).unwrap();
    assert_eq!(field.shape(), (5, 7));
    assert_eq!(field.run(), Some(fixture_run()));
    let (min, max) = field.values().finite_range().unwrap();
    assert!(min > 1000.0 && max < 1020.0, "hPa range {min}..{max}");
}

#[test]
fn test_runs_are_opened_once() {
    let dir = temp_test_dir();
    let run = fixture_run();
    SnapshotSource::new(dir.path())
        .store(&run, &java_dataset(7, false))
        .unwrap();

    let service = service_over(dir.path());
    let region = bbox(fixtures::bbox::SOEKARNO_HATTA);
    for lead in [0, 1, 2] {
        service
            .resolve(&FieldRequest::new(run, "tmp2m", lead, region))
            .unwrap();
    }

    let stats = service.source().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_animation_frames() {
    let dir = temp_test_dir();
    let run = fixture_run();
    SnapshotSource::new(dir.path())
        .store(&run, &java_dataset(13, true))
        .unwrap();

    let service = service_over(dir.path());
    let leads = lead_indices(0, 12, 3);
    let frames = service
        .resolve_animation(&run, "wind10m", &leads, &bbox(fixtures::bbox::SOEKARNO_HATTA))
        .unwrap();

    assert_eq!(frames.len(), 5);
    let tags: Vec<_> = frames.iter().map(|f| f.lead_tag()).collect();
    assert_eq!(tags, ["GFS t+000", "GFS t+003", "GFS t+006", "GFS t+009", "GFS t+012"]);
    assert!(frames.iter().all(|f| f.wind().is_some()));
}

#[test]
fn test_missing_run_is_unavailable() {
    let dir = temp_test_dir();
    let service = service_over(dir.path());
    let run = ForecastRun::parse("20250116", "18").unwrap();

    let err = service
        .resolve(&FieldRequest::new(run, "tmp2m", 0, bbox(fixtures::bbox::SOEKARNO_HATTA)))
        .unwrap_err();
    assert_eq!(err.code(), "DatasetUnavailable");
    assert!(!err.is_user_error());
    assert!(err
        .to_string()
        .starts_with("Dataset unavailable for 'tmp2m' at lead time index 0 (gfs 20250116 18z)"));

    // Not cached: storing the run afterwards makes it resolvable.
    SnapshotSource::new(dir.path())
        .store(&run, &java_dataset(1, false))
        .unwrap();
    assert!(service
        .resolve(&FieldRequest::new(run, "tmp2m", 0, bbox(fixtures::bbox::SOEKARNO_HATTA)))
        .is_ok());
}

#[test]
fn test_corrupt_snapshot_is_read_error() {
    let dir = temp_test_dir();
    let run = fixture_run();
    std::fs::write(SnapshotSource::new(dir.path()).path_for(&run), "{not json").unwrap();

    let service = service_over(dir.path());
    let err = service
        .resolve(&FieldRequest::new(run, "tmp2m", 0, bbox(fixtures::bbox::SOEKARNO_HATTA)))
        .unwrap_err();

    assert_eq!(err.code(), "DatasetReadError");
    assert!(!err.is_user_error());
    assert!(matches!(
        err,
        ForecastError::DatasetReadError { ref parameter, lead_time: 0, ref run, .. }
            if parameter == "tmp2m" && run == "gfs 20250115 00z"
    ));
}

#[test]
fn test_snapshot_of_another_run_is_read_error() {
    let dir = temp_test_dir();
    let stored = fixture_run();
    let requested = ForecastRun::parse("20250115", "06").unwrap();
    let source = SnapshotSource::new(dir.path());
    let path = source.store(&stored, &java_dataset(1, false)).unwrap();
    std::fs::copy(&path, source.path_for(&requested)).unwrap();

    let service = service_over(dir.path());
    let err = service
        .resolve_animation(&requested, "pratesfc", &[2, 3], &bbox(fixtures::bbox::SOEKARNO_HATTA))
        .unwrap_err();
    assert!(matches!(err, ForecastError::DatasetReadError { lead_time: 2, .. }), "{err}");
}

#[test]
fn test_unknown_parameter_does_not_open_run() {
    let dir = temp_test_dir();
    let service = service_over(dir.path());
    let err = service
        .resolve_animation(&fixture_run(), "apcpsfc", &[0], &bbox(fixtures::bbox::SOEKARNO_HATTA))
        .unwrap_err();
    assert!(matches!(err, ForecastError::UnknownParameter { .. }));
    assert_eq!(service.source().stats().misses, 0);
}

#[test]
fn test_resolved_field_serializes_nan_as_null() {
    let service = service_over(&testdata_dir());
    let field = service
        .resolve(&FieldRequest::new(
            fixture_run(),
            "tmp2m",
            1,
            bbox(fixtures::bbox::SOEKARNO_HATTA),
        ))
        .unwrap();

    let json = serde_json::to_value(&field).unwrap();
    let values = json["values"]["data"].as_array().unwrap();
    assert_eq!(values.iter().filter(|v| v.is_null()).count(), 1);
    assert_eq!(json["render_policy"]["range"]["mode"], "fixed");
    assert_eq!(json["render_policy"]["style"]["name"], "coolwarm");
    assert_eq!(json["run"]["cycle"], "00");
}

#[test]
fn test_service_is_shareable_across_threads() {
    let dir = temp_test_dir();
    let run = fixture_run();
    SnapshotSource::new(dir.path())
        .store(&run, &java_dataset(4, false))
        .unwrap();

    let service = Arc::new(service_over(dir.path()));
    let region = bbox(fixtures::bbox::SOEKARNO_HATTA);
    std::thread::scope(|s| {
        for parameter in fixtures::parameters::ALL {
            let service = Arc::clone(&service);
            s.spawn(move || {
                service
                    .resolve(&FieldRequest::new(run, parameter, 3, region))
                    .unwrap()
            });
        }
    });

    let stats = service.source().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 4);
    assert!(service.source().open_run(&run).is_ok());
}
