// SPDX-License-Identifier: GPL-3.0-only

//! Still-image camera
//!
//! Serves a decoded image file as every frame. Used to inspect stored
//! photos offline and to run the capture path without hardware.

use super::Camera;
use super::types::*;
use crate::constants::file_formats;
use crate::media::frame_from_rgb;
use image::RgbImage;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Camera that replays a single image file
pub struct ImageFileCamera {
    path: PathBuf,
    id: String,
    image: Option<RgbImage>,
    /// Size frames are resized to, `None` for the native image size
    target: Option<Resolution>,
    sequence: u32,
}

impl ImageFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        Self {
            id: format!("file_{}", stem),
            path,
            image: None,
            target: None,
            sequence: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Camera for ImageFileCamera {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| format!("Image {}", n.to_string_lossy()))
            .unwrap_or_else(|| "Image file".to_string())
    }

    fn is_open(&self) -> bool {
        self.image.is_some()
    }

    fn open(&mut self) -> BackendResult<()> {
        if self.is_open() {
            return Ok(());
        }

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !file_formats::is_image_extension(extension) {
            return Err(BackendError::FormatNotSupported(format!(
                "Unsupported image file: {}",
                self.path.display()
            )));
        }

        let image = image::open(&self.path)
            .map_err(|e| BackendError::OpenFailed(format!("{}: {}", self.path.display(), e)))?
            .to_rgb8();

        info!(
            camera = %self.id,
            width = image.width(),
            height = image.height(),
            "Opened image file camera"
        );
        self.image = Some(image);
        Ok(())
    }

    fn close(&mut self) {
        if self.image.take().is_some() {
            debug!(camera = %self.id, "Closed image file camera");
        }
        self.sequence = 0;
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| BackendError::NotOpen(self.id.clone()))?;

        let rgb = match self.target {
            Some(target) if target != Resolution::new(image.width(), image.height()) => {
                image::imageops::resize(image, target.width, target.height, FilterType::Triangle)
            }
            _ => image.clone(),
        };

        let mut frame = frame_from_rgb(rgb);
        frame.sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }

    fn resolution(&self) -> Resolution {
        match (&self.image, self.target) {
            (Some(_), Some(target)) => target,
            (Some(image), None) => Resolution::new(image.width(), image.height()),
            (None, _) => Resolution::default(),
        }
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> BackendResult<Resolution> {
        if !self.is_open() {
            return Err(BackendError::NotOpen(self.id.clone()));
        }
        if width == 0 || height == 0 {
            return Err(BackendError::FormatNotSupported(format!(
                "{}x{}",
                width, height
            )));
        }

        let resolution = Resolution::new(width, height);
        self.target = Some(resolution);
        Ok(resolution)
    }
}
