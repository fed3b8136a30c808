// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the inspection station
//!
//! This module provides command-line functionality for:
//! - Listing and probing cameras
//! - Capturing frames and scanning QR codes
//! - Browsing workflows and reference images
//! - Running the station self-check

use camera_qc::backends::camera::{
    Camera, CameraKind, CameraManager, CameraSession, ImageFileCamera, Resolution,
};
use camera_qc::config::{Config, PhotoOutputFormat};
use camera_qc::constants::{app_info, scanner::WATCH_INTERVAL_MS};
use camera_qc::diagnostics;
use camera_qc::scanner::QrScanner;
use camera_qc::storage;
use camera_qc::workflows::{Workflow, WorkflowLoader, WorkflowType};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Arguments of the `capture` command
pub struct CaptureArgs {
    pub camera: Option<u32>,
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
}

/// List cameras that open, or every device node with `all`
pub fn list_cameras(config: &Config, all: bool) -> CliResult {
    let manager = CameraManager::with_probe_limit(config.probe_limit);

    if all {
        let devices = manager.list_devices();
        if devices.is_empty() {
            println!("No video devices found.");
            return Ok(());
        }

        println!("Video devices:");
        for device in devices {
            println!(
                "  [{}] {} ({})",
                device.index,
                device.display_name(),
                device.path.display()
            );
        }
        return Ok(());
    }

    let cameras = manager.discover_cameras();
    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name());
        println!("      Id: {}", camera.id());
        println!("      Resolution: {}", camera.resolution());
    }

    Ok(())
}

/// Capture one frame and save it
pub fn capture(config: &mut Config, args: CaptureArgs) -> CliResult {
    let format = match args.format.as_deref() {
        Some(name) => name.parse::<PhotoOutputFormat>()?,
        None => config.output_format,
    };
    let resolution = match (args.width, args.height) {
        (Some(width), Some(height)) => Some(Resolution::new(width, height)),
        _ => config.capture_resolution(),
    };

    let camera_index = args.camera.or(config.last_camera_index).unwrap_or(0);
    let mut session = open_session(config, camera_index, args.source.as_deref())?;
    println!("Using camera: {}", session.name());

    let frame = session.capture_at(resolution)?;
    println!("Captured: {}", frame.resolution());

    let saved = match args.output {
        Some(path) if !path.is_dir() && path.extension().is_some() => {
            let format = output_format_for(&path).unwrap_or(format);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let image = camera_qc::media::frame_to_rgb(&frame)?;
            storage::write_image(&image, &path, format)?;
            path
        }
        Some(dir) => storage::save_frame(&frame, &dir, format, "capture")?,
        None => storage::save_frame(&frame, &config.output_dir(), format, "capture")?,
    };
    println!("Saved: {}", saved.display());

    // Release the device before touching the config file
    drop(session);

    if args.source.is_none() && config.last_camera_index != Some(camera_index) {
        config.last_camera_index = Some(camera_index);
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to remember camera index");
        }
    }

    Ok(())
}

/// Scan for QR codes once, or until one is found with `watch`
pub fn scan(config: &Config, camera: Option<u32>, source: Option<PathBuf>, watch: bool) -> CliResult {
    let camera_index = camera.or(config.last_camera_index).unwrap_or(0);
    let mut session = open_session(config, camera_index, source.as_deref())?;
    let resolution = config.capture_resolution();
    let scanner = QrScanner::new();

    let stop_flag = Arc::new(AtomicBool::new(false));
    if watch {
        let stop_flag_clone = stop_flag.clone();
        ctrlc::set_handler(move || {
            stop_flag_clone.store(true, Ordering::SeqCst);
        })?;
        println!("Scanning with {}... (press Ctrl+C to stop)", session.name());
    }

    loop {
        let frame = session.capture_at(resolution)?;
        let detections = scanner.scan(&frame)?;

        if !detections.is_empty() {
            for detection in &detections {
                println!("{}", detection.content);
            }
            return Ok(());
        }

        if !watch {
            println!("No QR code found.");
            return Ok(());
        }

        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopped.");
            return Ok(());
        }

        std::thread::sleep(Duration::from_millis(WATCH_INTERVAL_MS));
    }
}

/// List workflows of one or both types
pub fn list_workflows(config: &Config, workflow_type: Option<&str>) -> CliResult {
    let loader = WorkflowLoader::from_config(config);

    for kind in selected_types(workflow_type)? {
        let workflows = loader.workflows(kind);
        println!("{} workflows ({}):", kind, loader.workflows_dir(kind).display());

        if workflows.is_empty() {
            println!("  (none)");
        }
        for workflow in &workflows {
            print_workflow_line(workflow);
        }
        println!();
    }

    Ok(())
}

/// Print a workflow given as a file path, name, or file stem
pub fn show_workflow(config: &Config, workflow: &str, workflow_type: Option<&str>) -> CliResult {
    let loader = WorkflowLoader::from_config(config);

    let path = Path::new(workflow);
    let found = if path.is_file() {
        Some(loader.load_workflow(path)?)
    } else {
        selected_types(workflow_type)?
            .into_iter()
            .find_map(|kind| loader.find_workflow(kind, workflow))
    };

    let found = found.ok_or_else(|| format!("Workflow not found: {}", workflow))?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

/// Print the path of a reference image
pub fn reference_image(config: &Config, workflow_type: &str, image: &str) -> CliResult {
    let loader = WorkflowLoader::from_config(config);
    let path = loader
        .reference_image_path(workflow_type, image)
        .ok_or_else(|| format!("Reference image not found: {} ({})", image, workflow_type))?;
    println!("{}", path.display());
    Ok(())
}

/// Run the station self-check; fails when any check fails
pub fn system_check(config: &Config) -> CliResult {
    let manager = CameraManager::with_probe_limit(config.probe_limit);
    let base = config.base_dir();

    println!("{}", "=".repeat(50));
    println!("{} {} system check", app_info::APP_NAME, app_info::version());
    println!("Base: {}", base.display());
    println!("{}", "=".repeat(50));

    let report = diagnostics::run_system_check(&manager, &base);
    for section in &report.sections {
        println!();
        println!("{}:", section.title);
        for result in &section.results {
            println!("  {}", result);
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    for section in &report.sections {
        let status = if section.passed() { "PASS" } else { "FAIL" };
        println!("{:<20} {}", section.title, status);
    }
    println!("{}", "=".repeat(50));

    if report.passed() {
        println!("All checks passed.");
        Ok(())
    } else {
        Err("System check failed".into())
    }
}

fn open_session(
    config: &Config,
    camera_index: u32,
    source: Option<&Path>,
) -> Result<CameraSession, Box<dyn std::error::Error>> {
    let camera: Box<dyn Camera> = match source {
        Some(path) => Box::new(ImageFileCamera::new(path)),
        None => CameraManager::with_probe_limit(config.probe_limit)
            .get_camera_by_type(CameraKind::default(), camera_index),
    };
    Ok(CameraSession::open(camera)?)
}

fn selected_types(workflow_type: Option<&str>) -> Result<Vec<WorkflowType>, Box<dyn std::error::Error>> {
    match workflow_type {
        Some(name) => Ok(vec![name.parse::<WorkflowType>()?]),
        None => Ok(WorkflowType::ALL.to_vec()),
    }
}

fn print_workflow_line(workflow: &Workflow) {
    let steps = workflow
        .steps()
        .map(|steps| format!(" ({} steps)", steps.len()))
        .unwrap_or_default();
    println!("  [{}] {}{}", workflow.file_stem(), workflow.name(), steps);
}

/// Output format implied by a file extension
fn output_format_for(path: &Path) -> Option<PhotoOutputFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}
