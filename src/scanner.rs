// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection
//!
//! Frames are converted to grayscale, downscaled for speed, and handed to
//! `rqrr` for detection and decoding. Corner points are mapped back to
//! full-size frame coordinates.

use crate::backends::camera::{BackendResult, CameraFrame};
use crate::constants::scanner::DEFAULT_MAX_DIMENSION;
use crate::media::frame_to_luma;
use image::GrayImage;
use image::imageops::FilterType;
use tracing::{debug, trace, warn};

/// A decoded QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrDetection {
    /// Decoded payload
    pub content: String,
    /// Corner points in frame pixels, clockwise from top-left
    pub corners: [(i32, i32); 4],
}

/// QR code detector
pub struct QrScanner {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl QrScanner {
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Create a scanner with a custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Detect and decode all QR codes in a frame
    pub fn scan(&self, frame: &CameraFrame) -> BackendResult<Vec<QrDetection>> {
        let luma = frame_to_luma(frame)?;
        Ok(self.scan_luma(&luma))
    }

    /// Detect and decode all QR codes in a grayscale image
    pub fn scan_luma(&self, luma: &GrayImage) -> Vec<QrDetection> {
        let start = std::time::Instant::now();
        let (width, height) = luma.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let longest = width.max(height);
        let (prepared_source, scale) = if longest > self.max_dimension {
            let scale = longest as f32 / self.max_dimension as f32;
            let new_width = ((width as f32 / scale) as u32).max(1);
            let new_height = ((height as f32 / scale) as u32).max(1);
            let downscaled = image::imageops::resize(luma, new_width, new_height, FilterType::Triangle);
            (downscaled, scale)
        } else {
            (luma.clone(), 1.0)
        };

        trace!(
            width = prepared_source.width(),
            height = prepared_source.height(),
            scale,
            "Prepared grayscale image for detection"
        );

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            prepared_source.width() as usize,
            prepared_source.height() as usize,
            |x, y| prepared_source.get_pixel(x as u32, y as u32).0[0],
        );

        let grids = prepared.detect_grids();
        let mut detections = Vec::with_capacity(grids.len());

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => {
                    let corners = grid.bounds.map(|point| {
                        (
                            (point.x as f32 * scale).round() as i32,
                            (point.y as f32 * scale).round() as i32,
                        )
                    });
                    detections.push(QrDetection { content, corners });
                }
                Err(e) => warn!(error = ?e, "Found QR grid but failed to decode"),
            }
        }

        debug!(
            count = detections.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "QR scan complete"
        );
        detections
    }
}
