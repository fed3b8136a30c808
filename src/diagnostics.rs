// SPDX-License-Identifier: GPL-3.0-only

//! Station self-check
//!
//! Runs the same checks an operator would do by hand before a shift:
//! cameras answer and deliver frames, the QR decoder runs, and the
//! directory layout is in place.

use crate::backends::camera::{CameraFrame, CameraManager, PixelFormat};
use crate::constants::layout;
use crate::scanner::QrScanner;
use crate::workflows::{WorkflowLoader, WorkflowType};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of a single check line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl CheckResult {
    fn pass(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: None,
        }
    }

    fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.passed { "✓" } else { "✗" };
        write!(f, "{} {}", mark, self.label)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// A named group of check lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSection {
    pub title: &'static str,
    pub results: Vec<CheckResult>,
}

impl CheckSection {
    /// A section passes when it has at least one line and every line passed
    pub fn passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.passed)
    }
}

/// Full system check report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemReport {
    pub sections: Vec<CheckSection>,
}

impl SystemReport {
    pub fn passed(&self) -> bool {
        self.sections.iter().all(CheckSection::passed)
    }
}

/// Run every check against the given manager and station directory
pub fn run_system_check(manager: &CameraManager, base_path: &Path) -> SystemReport {
    info!(base = %base_path.display(), "Running system check");

    let report = SystemReport {
        sections: vec![
            check_cameras(manager),
            check_qr_decoder(),
            check_file_structure(base_path),
        ],
    };

    for section in &report.sections {
        if !section.passed() {
            warn!(section = section.title, "System check section failed");
        }
    }
    report
}

/// Open each index until the first failure and grab one frame from each
///
/// Every camera that opens must also deliver a frame for the section to pass.
pub fn check_cameras(manager: &CameraManager) -> CheckSection {
    let mut results = Vec::new();

    for index in 0..manager.probe_limit() {
        let mut session = match manager.session(index) {
            Ok(session) => session,
            Err(e) => {
                debug!(index, error = %e, "Camera probe stopped");
                break;
            }
        };

        let label = format!("Camera {}", index);
        match session.capture_frame() {
            Ok(frame) => results.push(CheckResult::pass(format!(
                "{}: {}",
                label,
                frame.resolution()
            ))),
            Err(e) => results.push(CheckResult::fail(label, e.to_string())),
        }
    }

    if results.is_empty() {
        results.push(CheckResult::fail(
            "No cameras found",
            "check `ls /dev/video*`",
        ));
    }

    CheckSection {
        title: "Cameras",
        results,
    }
}

/// Run the decoder over a blank frame; any completed scan counts as working
pub fn check_qr_decoder() -> CheckSection {
    let blank = CameraFrame::from_packed(100, 100, PixelFormat::RGB24, vec![0; 100 * 100 * 3]);
    let result = match QrScanner::new().scan(&blank) {
        Ok(_) => CheckResult::pass("QR decoder functional"),
        Err(e) => CheckResult::fail("QR decoder error", e.to_string()),
    };

    CheckSection {
        title: "QR decoder",
        results: vec![result],
    }
}

/// Every directory the station expects below `base_path`
pub fn required_directories(base_path: &Path) -> Vec<PathBuf> {
    let loader = WorkflowLoader::new(base_path);
    let mut dirs = Vec::with_capacity(5);
    for kind in WorkflowType::ALL {
        dirs.push(loader.workflows_dir(kind).to_path_buf());
    }
    for kind in WorkflowType::ALL {
        dirs.push(loader.images_dir(kind).to_path_buf());
    }
    dirs.push(base_path.join(layout::OUTPUT_DIR));
    dirs
}

pub fn check_file_structure(base_path: &Path) -> CheckSection {
    let results = required_directories(base_path)
        .into_iter()
        .map(|dir| {
            let label = dir
                .strip_prefix(base_path)
                .unwrap_or(dir.as_path())
                .display()
                .to_string()
                + "/";
            if dir.is_dir() {
                CheckResult::pass(label)
            } else {
                CheckResult::fail(label, "missing")
            }
        })
        .collect();

    CheckSection {
        title: "File structure",
        results,
    }
}
