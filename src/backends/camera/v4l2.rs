// SPDX-License-Identifier: GPL-3.0-only

//! Index-addressed V4L2 camera (webcams and USB borescopes)
//!
//! Frames are read from a memory-mapped stream that is created on the first
//! capture and torn down before any format change. The device handle is
//! released on `close` and on drop.

use super::Camera;
use super::types::*;
use crate::constants::camera::{CAPTURE_BUFFER_COUNT, V4L2_DEVICE_PREFIX, usb_camera_name};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Camera backed by `/dev/video{index}`
pub struct V4l2Camera {
    index: u32,
    id: String,
    device: Option<Device>,
    stream: Option<MmapStream<'static>>,
    format: Option<v4l::Format>,
    card: Option<String>,
    driver: Option<String>,
}

impl V4l2Camera {
    /// Create a camera for the given device index without opening it
    pub fn new(index: u32) -> Self {
        Self {
            index,
            id: format!("v4l2_{}", index),
            device: None,
            stream: None,
            format: None,
            card: None,
            driver: None,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Device node this camera opens
    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", V4L2_DEVICE_PREFIX, self.index))
    }
}

impl Camera for V4l2Camera {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> String {
        usb_camera_name(self.index)
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn open(&mut self) -> BackendResult<()> {
        if self.is_open() {
            return Ok(());
        }

        let path = self.device_path();
        let device = Device::new(self.index as usize).map_err(|e| {
            debug!(path = %path.display(), error = %e, "Failed to open V4L2 device");
            BackendError::OpenFailed(format!("{}: {}", path.display(), e))
        })?;

        match device.query_caps() {
            Ok(caps) => {
                debug!(card = %caps.card, driver = %caps.driver, "Queried V4L2 capabilities");
                self.card = Some(caps.card);
                self.driver = Some(caps.driver);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Could not query capabilities"),
        }

        // Metadata-only nodes have no capture format; treat them as not openable
        let format = device.format().map_err(|e| {
            BackendError::OpenFailed(format!(
                "{} has no video capture format: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            camera = %self.id,
            width = format.width,
            height = format.height,
            fourcc = %format.fourcc,
            "Opened V4L2 camera"
        );

        self.format = Some(format);
        self.device = Some(device);
        Ok(())
    }

    fn close(&mut self) {
        // Stream first: it holds buffers mapped from the device
        self.stream = None;
        self.format = None;
        if self.device.take().is_some() {
            info!(camera = %self.id, "Released V4L2 camera");
        }
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let Some(device) = self.device.as_ref() else {
            return Err(BackendError::NotOpen(self.id.clone()));
        };
        let format = self
            .format
            .clone()
            .ok_or_else(|| BackendError::NotOpen(self.id.clone()))?;

        let pixel_format = PixelFormat::from_fourcc(&format.fourcc.repr).ok_or_else(|| {
            BackendError::FormatNotSupported(format!("Unsupported FourCC {}", format.fourcc))
        })?;

        if self.stream.is_none() {
            let stream = MmapStream::with_buffers(device, Type::VideoCapture, CAPTURE_BUFFER_COUNT)
                .map_err(|e| {
                    BackendError::CaptureFailed(format!("Failed to create buffer stream: {}", e))
                })?;
            debug!(camera = %self.id, buffers = CAPTURE_BUFFER_COUNT, "Capture stream created");
            self.stream = Some(stream);
        }

        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| BackendError::CaptureFailed("Capture stream unavailable".into()))?;

        let captured_at = Instant::now();
        let (buf, meta) = stream
            .next()
            .map_err(|e| BackendError::CaptureFailed(format!("Failed to read frame: {}", e)))?;

        let used = match meta.bytesused as usize {
            0 => buf.len(),
            n => n.min(buf.len()),
        };
        if used == 0 {
            return Err(BackendError::CaptureFailed("Driver returned an empty buffer".into()));
        }

        let stride = match pixel_format {
            PixelFormat::MJPEG => 0,
            _ => format.stride,
        };

        Ok(CameraFrame {
            width: format.width,
            height: format.height,
            data: Arc::from(&buf[..used]),
            format: pixel_format,
            stride,
            sequence: meta.sequence,
            captured_at,
        })
    }

    fn resolution(&self) -> Resolution {
        self.device
            .as_ref()
            .and_then(|device| device.format().ok())
            .map(|fmt| Resolution::new(fmt.width, fmt.height))
            .unwrap_or_default()
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> BackendResult<Resolution> {
        let Some(device) = self.device.as_ref() else {
            return Err(BackendError::NotOpen(self.id.clone()));
        };

        // The driver rejects format changes while buffers are mapped
        self.stream = None;

        let mut requested = device.format()?;
        requested.width = width;
        requested.height = height;

        let applied = device.set_format(&requested).map_err(|e| {
            BackendError::FormatNotSupported(format!("{}x{}: {}", width, height, e))
        })?;

        let resolution = Resolution::new(applied.width, applied.height);
        if applied.width != width || applied.height != height {
            warn!(
                camera = %self.id,
                requested = %Resolution::new(width, height),
                applied = %resolution,
                "Driver adjusted requested resolution"
            );
        } else {
            info!(camera = %self.id, resolution = %resolution, "Resolution applied");
        }

        self.format = Some(applied);
        Ok(resolution)
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .field("card", &self.card)
            .field("driver", &self.driver)
            .finish()
    }
}

/// Enumerate V4L2 device nodes without opening them
pub fn list_devices() -> Vec<CameraDevice> {
    let mut devices: Vec<CameraDevice> = v4l::context::enum_devices()
        .into_iter()
        .map(|node| CameraDevice {
            index: node.index() as u32,
            path: node.path().to_path_buf(),
            name: node.name(),
        })
        .collect();

    devices.sort_by_key(|device| device.index);
    debug!(count = devices.len(), "Enumerated V4L2 device nodes");
    devices
}
