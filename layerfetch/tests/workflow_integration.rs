//! Integration tests for the download → store → clip workflow.
//!
//! These tests verify the complete pipeline using a scripted FeatureServer
//! and temporary directories:
//! - Whole-service download into shapefile bundles
//! - Reloading stored layers
//! - Clipping a stored layer to a boundary loaded from a shapefile

mod common;

use std::path::Path;
use std::time::Duration;

use common::{ScriptedLayer, ScriptedService, SERVICE_URL};
use geo::{polygon, Geometry, MultiPolygon};
use layerfetch::clip::{clip, clip_with_report, load_boundary, ClipError};
use layerfetch::download::{DownloadOrchestrator, DownloadPlan, LayerFilter, OrchestratorError};
use layerfetch::feature::{AttributeValue, Feature, FeatureCollection, GeometryType};
use layerfetch::fetch::{FetchError, FetchOptions};
use layerfetch::store::{load_collection, write_collection, STAGING_SUFFIX};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

fn plan(dir: &Path) -> DownloadPlan {
    DownloadPlan::new(SERVICE_URL, dir)
        .with_options(FetchOptions::new(25))
        .with_retry_delay(Duration::ZERO)
}

/// Write a one-record polygon bundle usable as a boundary.
fn write_boundary(root: &Path, stem: &str, shape: MultiPolygon<f64>) -> std::path::PathBuf {
    let mut collection = FeatureCollection::new(GeometryType::Polygon).with_spatial_reference(Some(4326));
    collection.push(
        Feature::new(1, Some(Geometry::MultiPolygon(shape)))
            .with_attribute("NAME", AttributeValue::Text("county".to_string())),
    );
    write_collection(&collection, root, stem).unwrap().shp_path
}

fn square(min: f64, max: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: min, y: min),
        (x: min, y: max),
        (x: max, y: max),
        (x: max, y: min),
        (x: min, y: min),
    ]])
}

// =============================================================================
// Download
// =============================================================================

#[test]
fn test_download_service_writes_one_bundle_per_layer() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![
        ScriptedLayer::group(0, "Hydrography"),
        ScriptedLayer::wells(1, 60),
        ScriptedLayer::parcels(2, 4),
    ]);

    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();

    assert_eq!(report.downloaded.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.total_records(), 64);

    let wells_dir = temp.path().join("Water_Wells");
    assert!(wells_dir.join("Water_Wells.shp").exists());
    assert!(wells_dir.join("Water_Wells.shx").exists());
    assert!(wells_dir.join("Water_Wells.dbf").exists());
    assert!(wells_dir.join("Water_Wells.prj").exists());
    assert!(temp.path().join("Parcels").join("Parcels.shp").exists());
    assert!(!temp
        .path()
        .join(format!("Water_Wells{}", STAGING_SUFFIX))
        .exists());
}

#[test]
fn test_downloaded_layer_reloads_with_values() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::wells(1, 30)]);

    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();
    let loaded = load_collection(&report.downloaded[0].bundle.directory).unwrap();

    assert_eq!(loaded.geometry_type, GeometryType::Point);
    assert_eq!(loaded.ids(), (1..=30).collect::<Vec<u64>>());
    assert_eq!(loaded.spatial_reference, Some(4326));

    let names: Vec<&str> = loaded.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["OBJECTID", "NAME", "DEPTH"]);

    let well = &loaded.features[4];
    assert_eq!(
        well.attributes.get("NAME"),
        Some(&AttributeValue::Text("Well 5".to_string()))
    );
    assert_eq!(well.attributes.get("DEPTH"), Some(&AttributeValue::Float(5.5)));
}

#[test]
fn test_download_retries_failed_page() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::wells(1, 60).failing_once_at(25)]);

    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();

    assert_eq!(report.downloaded[0].retries, 1);
    assert_eq!(report.downloaded[0].bundle.records, 60);
    let offsets: Vec<usize> = service.page_requests(1).iter().map(|(o, _)| *o).collect();
    assert_eq!(offsets, vec![0, 25, 25, 50]);
}

#[test]
fn test_download_without_retries_fails_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::wells(1, 60).failing_once_at(25)]);

    let err = DownloadOrchestrator::new(&service, plan(temp.path()).with_max_retries(0))
        .run()
        .unwrap_err();

    match err {
        OrchestratorError::Fetch {
            layer_id, source, ..
        } => {
            assert_eq!(layer_id, 1);
            assert!(matches!(source, FetchError::Page { offset: 25, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!temp.path().join("Water_Wells").exists());
}

#[test]
fn test_download_selected_layers_only() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![
        ScriptedLayer::wells(1, 5),
        ScriptedLayer::parcels(2, 3),
    ]);

    let report = DownloadOrchestrator::new(
        &service,
        plan(temp.path()).with_filter(LayerFilter::only([2])),
    )
    .run()
    .unwrap();

    assert_eq!(report.downloaded.len(), 1);
    assert_eq!(report.downloaded[0].layer.name, "Parcels");
    assert!(service.page_requests(1).is_empty());
}

#[test]
fn test_colliding_layer_names_get_distinct_bundles() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![
        ScriptedLayer::wells(1, 3).named("Wells"),
        ScriptedLayer::wells(4, 2).named("wells"),
    ]);

    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();

    assert_eq!(report.downloaded[0].bundle.directory, temp.path().join("Wells"));
    assert_eq!(report.downloaded[1].bundle.directory, temp.path().join("wells_4"));
}

// =============================================================================
// Clip
// =============================================================================

#[test]
fn test_download_then_clip_to_boundary_shapefile() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::wells(1, 100)]);
    let report = DownloadOrchestrator::new(&service, plan(&temp.path().join("downloads")))
        .run()
        .unwrap();

    // wells sit on the integer grid 0..=9 x 0..=9
    let boundary_shp = write_boundary(&temp.path().join("boundaries"), "county", square(1.5, 4.5));
    let boundary = load_boundary(&boundary_shp).unwrap();
    let wells = load_collection(&report.downloaded[0].bundle.shp_path).unwrap();

    let (inside, stats) = clip_with_report(&wells, &boundary);

    assert_eq!(stats.input, 100);
    assert_eq!(stats.kept, 9);
    assert_eq!(stats.candidates, 9);
    // grid x,y in {2,3,4} → ids 10*y + x + 1
    let expected: Vec<u64> = [2u64, 3, 4]
        .iter()
        .flat_map(|y| [2u64, 3, 4].iter().map(move |x| 10 * y + x + 1))
        .collect();
    assert_eq!(inside.ids(), expected);
    assert_eq!(inside.fields, wells.fields);

    let written = write_collection(&inside, &temp.path().join("clipped"), "wells_in_county").unwrap();
    let reloaded = load_collection(&written.shp_path).unwrap();
    assert_eq!(reloaded.ids(), expected);
}

#[test]
fn test_clip_polygons_keeps_only_contained_parcels() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::parcels(2, 5)]);
    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();
    let parcels = load_collection(&report.downloaded[0].bundle.directory).unwrap();

    // parcels occupy [2i, 2i+1] x [0, 1]; the boundary holds parcels 1-3 and
    // only touches parcel 4 along x = 6
    let shape = MultiPolygon::new(vec![polygon![
        (x: -0.5, y: -0.5),
        (x: -0.5, y: 1.5),
        (x: 6.0, y: 1.5),
        (x: 6.0, y: -0.5),
        (x: -0.5, y: -0.5),
    ]]);
    let boundary_shp = write_boundary(temp.path(), "boundary", shape);
    let boundary = load_boundary(&boundary_shp).unwrap();

    let (inside, stats) = clip_with_report(&parcels, &boundary);

    assert_eq!(inside.ids(), vec![1, 2, 3]);
    assert_eq!(stats.candidates, 4);
    assert!(stats.kept <= stats.candidates);
}

#[test]
fn test_boundary_must_be_polygon() {
    let temp = TempDir::new().unwrap();
    let service = ScriptedService::new(vec![ScriptedLayer::wells(1, 3)]);
    let report = DownloadOrchestrator::new(&service, plan(temp.path()))
        .run()
        .unwrap();

    let err = load_boundary(&report.downloaded[0].bundle.shp_path).unwrap_err();

    assert!(matches!(err, ClipError::InvalidBoundary(_)));
}

#[test]
fn test_missing_boundary_file() {
    let temp = TempDir::new().unwrap();
    let err = load_boundary(&temp.path().join("nowhere.shp")).unwrap_err();
    assert!(matches!(err, ClipError::Source(_)));
}

#[test]
fn test_clip_of_empty_collection() {
    let boundary = layerfetch::clip::BoundaryPolygon::new(square(0.0, 10.0)).unwrap();
    let empty = FeatureCollection::new(GeometryType::Point);
    assert!(clip(&empty, &boundary).is_empty());
}
