// SPDX-License-Identifier: GPL-3.0-only

//! Camera QC - camera access and inspection workflows for QC stations
//!
//! This library provides the building blocks of a quality-control and
//! maintenance inspection station: camera discovery and capture, QR code
//! scanning, and loading of JSON workflow definitions with their reference
//! images.
//!
//! # Architecture
//!
//! - [`backends`]: Camera abstraction, V4L2 and still-image sources, manager
//! - [`media`]: Pixel format conversion for captured frames
//! - [`scanner`]: QR code detection
//! - [`storage`]: Saving captures to disk
//! - [`workflows`]: QC and maintenance workflow loading
//! - [`diagnostics`]: Station self-check
//! - [`config`]: Station configuration
//!
//! # Example
//!
//! ```no_run
//! use camera_qc::{CameraManager, WorkflowLoader};
//!
//! let cameras = CameraManager::new().discover_cameras();
//! println!("{} camera(s) found", cameras.len());
//!
//! let loader = WorkflowLoader::new("/srv/station");
//! for workflow in loader.qc_workflows() {
//!     println!("{}", workflow.name());
//! }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod media;
pub mod scanner;
pub mod storage;
pub mod workflows;

// Re-export commonly used types
pub use backends::camera::{Camera, CameraManager, CameraSession};
pub use config::Config;
pub use errors::{AppError, AppResult, WorkflowError};
pub use scanner::{QrDetection, QrScanner};
pub use workflows::{Workflow, WorkflowLoader, WorkflowType};
