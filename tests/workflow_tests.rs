// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for workflow loading and reference image lookup

use camera_qc::constants::workflow::FILE_PATH_KEY;
use camera_qc::{WorkflowError, WorkflowLoader, WorkflowType};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Station directory removed when the test ends
struct Station {
    base: PathBuf,
}

impl Station {
    fn new() -> Self {
        let base = std::env::temp_dir().join(format!("camera-qc-station-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&base).unwrap();
        Self { base }
    }

    fn loader(&self) -> WorkflowLoader {
        WorkflowLoader::new(&self.base)
    }

    fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Station {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.base).ok();
    }
}

#[test]
fn test_missing_directory_is_created() {
    let station = Station::new();
    let loader = station.loader();

    assert!(loader.qc_workflows().is_empty());
    assert!(station.base.join("workflows/qc_workflows").is_dir());
    assert!(!station.base.join("workflows/maintenance_workflows").exists());

    assert!(loader.maintenance_workflows().is_empty());
    assert!(station.base.join("workflows/maintenance_workflows").is_dir());
}

#[test]
fn test_loads_json_files_with_source_path() {
    let station = Station::new();
    let path = station.write(
        "workflows/qc_workflows/housing.json",
        r#"{"name": "Housing inspection", "steps": [{"title": "Seal"}, {"title": "Bolts"}]}"#,
    );
    station.write("workflows/qc_workflows/notes.txt", "not a workflow");

    let workflows = station.loader().qc_workflows();
    assert_eq!(workflows.len(), 1);

    let workflow = &workflows[0];
    assert_eq!(workflow.name(), "Housing inspection");
    assert_eq!(workflow.steps().map(Vec::len), Some(2));
    assert_eq!(workflow.kind(), Some(WorkflowType::Qc));
    assert_eq!(workflow.file_path(), path.as_path());
    assert_eq!(
        workflow.get(FILE_PATH_KEY),
        Some(&json!(path.to_string_lossy()))
    );
}

#[test]
fn test_invalid_and_empty_files_are_skipped() {
    let station = Station::new();
    station.write("workflows/maintenance_workflows/a_valid.json", r#"{"steps": []}"#);
    station.write("workflows/maintenance_workflows/b_broken.json", "{ not json");
    station.write("workflows/maintenance_workflows/c_empty.json", "{}");
    station.write("workflows/maintenance_workflows/d_list.json", "[1, 2, 3]");
    station.write("workflows/maintenance_workflows/e_valid.json", r#"{"name": "Lube"}"#);

    let workflows = station.loader().maintenance_workflows();
    let names: Vec<String> = workflows.iter().map(|w| w.name()).collect();
    assert_eq!(names, vec!["a_valid", "Lube"]);
}

#[test]
fn test_workflows_are_sorted_by_file_name() {
    let station = Station::new();
    for stem in ["zeta", "alpha", "mid"] {
        station.write(
            &format!("workflows/qc_workflows/{}.json", stem),
            &format!(r#"{{"id": "{}"}}"#, stem),
        );
    }

    let stems: Vec<String> = station
        .loader()
        .qc_workflows()
        .iter()
        .map(|w| w.file_stem())
        .collect();
    assert_eq!(stems, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_load_workflow_errors() {
    let station = Station::new();
    let loader = station.loader();

    let missing = station.base.join("nope.json");
    assert!(matches!(
        loader.load_workflow(&missing),
        Err(WorkflowError::Io { .. })
    ));

    let broken = station.write("broken.json", "{");
    assert!(matches!(
        loader.load_workflow(&broken),
        Err(WorkflowError::Parse { .. })
    ));

    let scalar = station.write("scalar.json", "42");
    assert_eq!(
        loader.load_workflow(&scalar),
        Err(WorkflowError::NotAnObject(scalar.clone()))
    );
}

#[test]
fn test_empty_object_loads_on_its_own() {
    let station = Station::new();
    let path = station.write("workflows/qc_workflows/blank.json", "{}");
    let loader = station.loader();

    let workflow = loader.load_workflow(&path).unwrap();
    assert!(workflow.is_empty());
    assert_eq!(workflow.name(), "blank");

    // Directory listings still leave it out
    assert!(loader.qc_workflows().is_empty());
}

#[test]
fn test_dot_files_are_loaded() {
    let station = Station::new();
    station.write("workflows/qc_workflows/.line3.json", r#"{"name": "Line 3"}"#);
    station.write("workflows/qc_workflows/line4.json", r#"{"name": "Line 4"}"#);

    let names: Vec<String> = station.loader().qc_workflows().iter().map(|w| w.name()).collect();
    assert_eq!(names, vec!["Line 3", "Line 4"]);
}

#[test]
fn test_find_workflow_by_name_or_stem() {
    let station = Station::new();
    station.write(
        "workflows/qc_workflows/pump_seal.json",
        r#"{"name": "Pump seal check"}"#,
    );

    let loader = station.loader();
    assert!(loader.find_workflow(WorkflowType::Qc, "Pump seal check").is_some());
    assert!(loader.find_workflow(WorkflowType::Qc, "pump_seal").is_some());
    assert!(loader.find_workflow(WorkflowType::Maintenance, "pump_seal").is_none());
}

#[test]
fn test_reference_image_lookup() {
    let station = Station::new();
    let qc_image = station.write("resources/qc_reference_images/seal.png", "png");
    let maintenance_image =
        station.write("resources/maintenance_reference_images/belt.jpg", "jpg");

    let loader = station.loader();
    assert_eq!(loader.reference_image_path("qc", "seal.png"), Some(qc_image));
    assert_eq!(
        loader.reference_image_path("maintenance", "belt.jpg"),
        Some(maintenance_image)
    );
    assert_eq!(loader.reference_image_path("qc", "belt.jpg"), None);
    assert_eq!(loader.reference_image_path("qc", "missing.png"), None);
    assert_eq!(loader.reference_image_path("audit", "seal.png"), None);
}

#[test]
fn test_workflow_round_trips_through_document() {
    let station = Station::new();
    let path = station.write(
        "workflows/qc_workflows/weld.json",
        r#"{"name": "Weld", "tolerance_mm": 0.5, "steps": [{"title": "Bead"}]}"#,
    );

    let workflow = station.loader().load_workflow(&path).unwrap();
    let value = serde_json::to_value(&workflow).unwrap();
    assert_eq!(value["tolerance_mm"], json!(0.5));
    assert_eq!(value[FILE_PATH_KEY], json!(path.to_string_lossy()));
    assert_eq!(workflow.into_document().len(), 4);
}

#[test]
fn test_loader_uses_configured_base() {
    let config = camera_qc::Config {
        base_path: Some(PathBuf::from("/srv/station")),
        ..Default::default()
    };
    let loader = WorkflowLoader::from_config(&config);
    assert_eq!(loader.base_path(), Path::new("/srv/station"));
}
