// SPDX-License-Identifier: GPL-3.0-only

//! Workflow loader for QC and maintenance processes

use super::types::{Workflow, WorkflowType};
use crate::config::Config;
use crate::constants::layout;
use crate::constants::workflow::FILE_EXTENSION;
use crate::errors::{WorkflowError, WorkflowResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads workflow definitions and resolves reference images
///
/// All paths hang off a single base directory:
///
/// ```text
/// <base>/workflows/qc_workflows/*.json
/// <base>/workflows/maintenance_workflows/*.json
/// <base>/resources/qc_reference_images/
/// <base>/resources/maintenance_reference_images/
/// ```
#[derive(Debug, Clone)]
pub struct WorkflowLoader {
    base_path: PathBuf,
    qc_workflows_path: PathBuf,
    maintenance_workflows_path: PathBuf,
    qc_images_path: PathBuf,
    maintenance_images_path: PathBuf,
}

impl WorkflowLoader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let workflows = base_path.join(layout::WORKFLOWS_DIR);
        let resources = base_path.join(layout::RESOURCES_DIR);

        Self {
            qc_workflows_path: workflows.join(layout::QC_WORKFLOWS_DIR),
            maintenance_workflows_path: workflows.join(layout::MAINTENANCE_WORKFLOWS_DIR),
            qc_images_path: resources.join(layout::QC_IMAGES_DIR),
            maintenance_images_path: resources.join(layout::MAINTENANCE_IMAGES_DIR),
            base_path,
        }
    }

    /// Loader rooted at the configured station directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_dir())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory holding workflow files of the given type
    pub fn workflows_dir(&self, kind: WorkflowType) -> &Path {
        match kind {
            WorkflowType::Qc => &self.qc_workflows_path,
            WorkflowType::Maintenance => &self.maintenance_workflows_path,
        }
    }

    /// Directory holding reference images of the given type
    pub fn images_dir(&self, kind: WorkflowType) -> &Path {
        match kind {
            WorkflowType::Qc => &self.qc_images_path,
            WorkflowType::Maintenance => &self.maintenance_images_path,
        }
    }

    /// Get all available QC workflows
    pub fn qc_workflows(&self) -> Vec<Workflow> {
        self.workflows(WorkflowType::Qc)
    }

    /// Get all available maintenance workflows
    pub fn maintenance_workflows(&self) -> Vec<Workflow> {
        self.workflows(WorkflowType::Maintenance)
    }

    /// Load every workflow of the given type
    ///
    /// A missing directory is created and yields an empty list. Files that
    /// cannot be loaded, or hold an empty object, are logged and left out.
    pub fn workflows(&self, kind: WorkflowType) -> Vec<Workflow> {
        let directory = self.workflows_dir(kind);
        self.load_workflows_from_directory(directory)
            .into_iter()
            .map(|workflow| workflow.with_kind(kind))
            .collect()
    }

    /// Load a single workflow file
    ///
    /// Any JSON object is accepted, including `{}`.
    pub fn load_workflow(&self, workflow_path: &Path) -> WorkflowResult<Workflow> {
        let contents = fs::read_to_string(workflow_path).map_err(|e| WorkflowError::Io {
            path: workflow_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|e| WorkflowError::Parse {
            path: workflow_path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(Workflow::new(map, workflow_path.to_path_buf())),
            _ => Err(WorkflowError::NotAnObject(workflow_path.to_path_buf())),
        }
    }

    /// Find a workflow by display name or file stem
    pub fn find_workflow(&self, kind: WorkflowType, name: &str) -> Option<Workflow> {
        self.workflows(kind)
            .into_iter()
            .find(|workflow| workflow.name() == name || workflow.file_stem() == name)
    }

    /// Get full path to a reference image
    ///
    /// Returns `None` for an unknown workflow type or a file that does not
    /// exist.
    pub fn reference_image_path(&self, workflow_type: &str, image_filename: &str) -> Option<PathBuf> {
        let kind = match workflow_type.parse::<WorkflowType>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!(error = %e, "No reference image directory");
                return None;
            }
        };

        let image_path = self.images_dir(kind).join(image_filename);
        if image_path.exists() {
            Some(image_path)
        } else {
            debug!(path = %image_path.display(), "Reference image not found");
            None
        }
    }

    fn load_workflows_from_directory(&self, directory: &Path) -> Vec<Workflow> {
        if !directory.exists() {
            match fs::create_dir_all(directory) {
                Ok(()) => info!(path = %directory.display(), "Created workflow directory"),
                Err(e) => {
                    warn!(path = %directory.display(), error = %e, "Failed to create workflow directory")
                }
            }
            return Vec::new();
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %directory.display(), error = %e, "Failed to read workflow directory");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_workflow_file(path))
            .collect();
        paths.sort();

        let mut workflows = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_workflow(&path) {
                Ok(workflow) if workflow.is_empty() => {
                    warn!(error = %WorkflowError::Empty(path), "Skipping workflow")
                }
                Ok(workflow) => workflows.push(workflow),
                Err(e) => warn!(error = %e, "Skipping workflow"),
            }
        }

        debug!(
            path = %directory.display(),
            count = workflows.len(),
            "Loaded workflows"
        );
        workflows
    }
}

/// Regular `*.json` files, dot-files included
fn is_workflow_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
}
