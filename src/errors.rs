// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the QC station

use crate::backends::camera::BackendError;
use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for workflow loading
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera backend errors
    Camera(BackendError),
    /// Workflow loading errors
    Workflow(WorkflowError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Workflow-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// File could not be read
    Io { path: PathBuf, message: String },
    /// File is not valid JSON
    Parse { path: PathBuf, message: String },
    /// Top-level JSON value is not an object
    NotAnObject(PathBuf),
    /// Top-level object has no keys
    Empty(PathBuf),
    /// Workflow type is neither "qc" nor "maintenance"
    UnknownType(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Workflow(e) => write!(f, "Workflow error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            WorkflowError::Parse { path, message } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), message)
            }
            WorkflowError::NotAnObject(path) => {
                write!(f, "{} does not contain a JSON object", path.display())
            }
            WorkflowError::Empty(path) => write!(f, "{} is an empty workflow", path.display()),
            WorkflowError::UnknownType(kind) => write!(f, "Unknown workflow type: {}", kind),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for WorkflowError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err)
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        AppError::Workflow(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
