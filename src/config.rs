// SPDX-License-Identifier: GPL-3.0-only

//! Station configuration
//!
//! Stored as JSON in `$XDG_CONFIG_HOME/camera-qc/config.json`. Every field
//! has a default, so partial files are accepted.

use crate::backends::camera::Resolution;
use crate::constants::{app_info, camera, file_formats, layout};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Image format for saved captures
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PhotoOutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl PhotoOutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            PhotoOutputFormat::Jpeg => "jpg",
            PhotoOutputFormat::Png => "png",
        }
    }

    /// JPEG quality (unused for PNG)
    pub fn jpeg_quality(&self) -> u8 {
        file_formats::JPEG_QUALITY
    }
}

impl std::str::FromStr for PhotoOutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(PhotoOutputFormat::Jpeg),
            "png" => Ok(PhotoOutputFormat::Png),
            other => Err(AppError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Station directory holding `workflows/`, `resources/` and `output/`
    /// (current directory when unset)
    pub base_path: Option<PathBuf>,
    /// Number of camera indices probed during discovery
    pub probe_limit: u32,
    /// Requested capture width (driver default when unset)
    pub capture_width: Option<u32>,
    /// Requested capture height (driver default when unset)
    pub capture_height: Option<u32>,
    /// Format for saved captures
    pub output_format: PhotoOutputFormat,
    /// Capture directory (`<base>/output` when unset)
    pub output_dir: Option<PathBuf>,
    /// Last camera index used for a capture
    pub last_camera_index: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: None,
            probe_limit: camera::DEFAULT_PROBE_LIMIT,
            capture_width: None,
            capture_height: None,
            output_format: PhotoOutputFormat::default(),
            output_dir: None,
            last_camera_index: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_NAME).join("config.json"))
    }

    /// Load the config from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load the config from a specific file
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Save to the default location
    pub fn save(&self) -> AppResult<()> {
        let path = Self::default_path()
            .ok_or_else(|| AppError::Config("No config directory available".to_string()))?;
        self.save_to(&path)
    }

    /// Station base directory
    pub fn base_dir(&self) -> PathBuf {
        self.base_path
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory captures are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join(layout::OUTPUT_DIR))
    }

    /// Requested capture resolution, only when both dimensions are set
    pub fn capture_resolution(&self) -> Option<Resolution> {
        match (self.capture_width, self.capture_height) {
            (Some(width), Some(height)) => Some(Resolution::new(width, height)),
            _ => None,
        }
    }
}
