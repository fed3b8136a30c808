// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Frame size in pixels
///
/// `0x0` is reported by cameras that have no open device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True for the `0x0` placeholder
    pub fn is_unknown(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Pixel layout of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 24-bit RGB (3 bytes per pixel)
    RGB24,
    /// 24-bit BGR (3 bytes per pixel), common from UVC bridges
    BGR24,
    /// 32-bit RGBA
    RGBA,
    /// 8-bit grayscale, used by IR and monochrome borescopes
    Gray8,
    /// Packed 4:2:2 (Y0 U Y1 V)
    YUYV,
    /// Motion JPEG, each buffer is a complete JPEG image
    MJPEG,
}

impl PixelFormat {
    /// Map a V4L2 FourCC code to a known pixel format
    pub fn from_fourcc(code: &[u8; 4]) -> Option<Self> {
        match code {
            b"RGB3" => Some(Self::RGB24),
            b"BGR3" => Some(Self::BGR24),
            b"AB24" | b"RGBA" => Some(Self::RGBA),
            b"GREY" | b"Y800" => Some(Self::Gray8),
            b"YUYV" | b"YUY2" => Some(Self::YUYV),
            b"MJPG" | b"JPEG" => Some(Self::MJPEG),
            _ => None,
        }
    }

    /// Bytes per pixel for uncompressed formats, `None` for MJPEG
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match self {
            Self::RGB24 | Self::BGR24 => Some(3),
            Self::RGBA => Some(4),
            Self::Gray8 => Some(1),
            Self::YUYV => Some(2),
            Self::MJPEG => None,
        }
    }

    /// Bytes in one unpadded row, `None` for MJPEG
    ///
    /// YUYV packs pixels in pairs, so an odd width still occupies a whole
    /// 4-byte macropixel at the end of the row.
    pub fn row_bytes(&self, width: u32) -> Option<u32> {
        match self {
            Self::YUYV => Some(width.div_ceil(2) * 4),
            other => other.bytes_per_pixel().map(|bpp| bpp * width),
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RGB24 => "RGB24",
            Self::BGR24 => "BGR24",
            Self::RGBA => "RGBA",
            Self::Gray8 => "GRAY8",
            Self::YUYV => "YUYV",
            Self::MJPEG => "MJPEG",
        };
        write!(f, "{}", name)
    }
}

/// A single frame from a camera
///
/// The frame owns its bytes; nothing borrows the driver's buffers once
/// `capture_frame` returns.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in `format` layout
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Bytes per row (may include padding), 0 for MJPEG
    pub stride: u32,
    /// Driver sequence number, 0 for sources without one
    pub sequence: u32,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed frame from owned bytes
    pub fn from_packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        let stride = format.row_bytes(width).unwrap_or(0);
        Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            format,
            stride,
            sequence: 0,
            captured_at: Instant::now(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Description of a video device node, used for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Index usable with `CameraManager::get_camera_by_type`
    pub index: u32,
    /// Device node, e.g. /dev/video0
    pub path: PathBuf,
    /// Name reported by the driver, if any
    pub name: Option<String>,
}

impl CameraDevice {
    /// Driver name, falling back to the generic index name
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| crate::constants::camera::usb_camera_name(self.index))
    }
}

/// Kind of camera requested by callers
///
/// Webcams and borescopes are both plain UVC devices, so every hardware
/// kind resolves to the V4L2 implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraKind {
    #[default]
    Usb,
    Webcam,
    Borescope,
}

impl FromStr for CameraKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usb" | "v4l2" | "opencv" => Ok(CameraKind::Usb),
            "webcam" => Ok(CameraKind::Webcam),
            "borescope" => Ok(CameraKind::Borescope),
            other => Err(BackendError::Other(format!("Unknown camera type: {}", other))),
        }
    }
}

impl std::fmt::Display for CameraKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraKind::Usb => write!(f, "usb"),
            CameraKind::Webcam => write!(f, "webcam"),
            CameraKind::Borescope => write!(f, "borescope"),
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Operation requires an open camera
    NotOpen(String),
    /// Device exists but could not be opened
    OpenFailed(String),
    /// Reading a frame failed
    CaptureFailed(String),
    /// Format not supported
    FormatNotSupported(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotOpen(id) => write!(f, "Camera {} is not open", id),
            BackendError::OpenFailed(msg) => write!(f, "Open failed: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}
