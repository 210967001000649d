//! End-to-end tests for the geotiff2mbtiles pipeline with a faked tiler.

mod common;

use common::fakes::FakeTileGenerator;
use common::staging::{list_dir, Staging};
use pretty_assertions::assert_eq;
use std::fs;

use adcirc_tiles::pipeline::MbtilesPipeline;
use adcirc_tiles::{Outcome, TilesError};

#[test]
fn test_archive_is_built_and_moved() {
    let staging = Staging::new();
    let input = staging.add_input("maxele.63.tif");
    let generator = FakeTileGenerator::default();

    let archive = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("maxele.63.tif", 0, 9, 4))
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(archive, staging.final_dir.join("maxele.63.0.9.mbtiles"));
    assert_eq!(fs::read(&archive).unwrap(), b"SQLite format 3");
    assert!(list_dir(&staging.output_dir).is_empty());

    let requests = generator.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].input, input);
    assert_eq!(
        requests[0].output,
        staging.output_dir.join("maxele.63.0.9.mbtiles")
    );
    assert_eq!(requests[0].zoom.arg(), "0-9");
    assert_eq!(requests[0].processes, 4);
}

#[test]
fn test_single_zoom_level() {
    let staging = Staging::new();
    staging.add_input("swan_HS_max.63.tif");
    let generator = FakeTileGenerator::default();

    let archive = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("swan_HS_max.63.tif", 7, 7, 1))
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(
        archive,
        staging.final_dir.join("swan_HS_max.63.7.7.mbtiles")
    );
    assert_eq!(generator.requests.borrow()[0].zoom.arg(), "7");
}

#[test]
fn test_stale_archive_is_removed_first() {
    let staging = Staging::new();
    staging.add_input("maxele.63.tif");
    fs::create_dir_all(&staging.output_dir).unwrap();
    fs::write(staging.output_dir.join("maxele.63.0.9.mbtiles"), b"stale").unwrap();
    let generator = FakeTileGenerator::default();

    let archive = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("maxele.63.tif", 0, 9, 2))
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(generator.output_existed.borrow().as_slice(), &[false]);
    assert_eq!(fs::read(&archive).unwrap(), b"SQLite format 3");
}

#[test]
fn test_missing_input_is_skipped() {
    let staging = Staging::new();
    let generator = FakeTileGenerator::default();

    let outcome = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("maxele.63.tif", 0, 9, 4))
        .unwrap();

    assert!(outcome.is_skipped());
    assert!(generator.requests.borrow().is_empty());
    assert!(!staging.output_dir.exists());
}

#[test]
fn test_missing_input_with_unsplittable_name_is_skipped() {
    let staging = Staging::new();
    let generator = FakeTileGenerator::default();

    let outcome = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("maxele", 0, 9, 4))
        .unwrap();

    assert!(outcome.is_skipped());
    assert!(generator.requests.borrow().is_empty());
}

#[test]
fn test_inverted_zoom_range_is_rejected() {
    let staging = Staging::new();
    staging.add_input("maxele.63.tif");
    let generator = FakeTileGenerator::default();

    let err = MbtilesPipeline::new(&generator)
        .run(&staging.mbtiles_args("maxele.63.tif", 9, 3, 4))
        .unwrap_err();

    assert!(matches!(err, TilesError::InvalidParameter { .. }));
    assert!(generator.requests.borrow().is_empty());
}

#[test]
fn test_generator_failure_aborts() {
    let staging = Staging::new();
    staging.add_input("maxele.63.tif");
    let generator = FakeTileGenerator::failing();

    let outcome = MbtilesPipeline::new(&generator).run(&staging.mbtiles_args("maxele.63.tif", 0, 9, 4));

    match outcome {
        Err(TilesError::ExternalTool { tool, .. }) => assert_eq!(tool, "python"),
        other => panic!("expected a tool failure, got {:?}", other.map(Outcome::completed)),
    }
    assert!(list_dir(&staging.final_dir).is_empty());
}
