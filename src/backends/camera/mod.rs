// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │ CLI / diagnostics   │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CameraManager     │  ← Discovery probe, scoped sessions
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Camera trait     │  ← Common interface
//! └──────────┬──────────┘
//!            │
//!      ┌─────┴──────┐
//!      ▼            ▼
//! ┌────────┐  ┌───────────┐
//! │  V4L2  │  │Image file │
//! └────────┘  └───────────┘
//! ```

pub mod file_source;
pub mod manager;
pub mod types;
pub mod v4l2;

pub use file_source::ImageFileCamera;
pub use manager::{CameraManager, CameraSession};
pub use types::*;
pub use v4l2::V4l2Camera;

/// Capability contract shared by every camera source
///
/// Implementations own at most one native handle. `close` must be
/// idempotent, and dropping a camera must release its handle.
pub trait Camera {
    /// Stable identifier, e.g. `v4l2_0`
    fn id(&self) -> &str;

    /// Human-readable camera name
    fn name(&self) -> String;

    /// Check if the camera currently holds an open handle
    fn is_open(&self) -> bool;

    /// Open the camera connection
    ///
    /// # Returns
    /// * `Ok(())` - Camera opened, `is_open()` is now true
    /// * `Err(BackendError)` - Open failed, `is_open()` stays false
    fn open(&mut self) -> BackendResult<()>;

    /// Release the camera connection. Safe to call when not open.
    fn close(&mut self);

    /// Capture a single frame
    ///
    /// # Returns
    /// * `Ok(CameraFrame)` - Owned frame in the camera's native pixel format
    /// * `Err(BackendError::NotOpen)` - Camera has not been opened
    /// * `Err(BackendError)` - The read failed
    fn capture_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Current resolution, `0x0` when no device handle exists
    fn resolution(&self) -> Resolution;

    /// Request a new resolution
    ///
    /// Drivers may round to the nearest supported size; the returned value
    /// is the resolution actually applied.
    fn set_resolution(&mut self, width: u32, height: u32) -> BackendResult<Resolution>;
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn open(&mut self) -> BackendResult<()> {
        (**self).open()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        (**self).capture_frame()
    }

    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> BackendResult<Resolution> {
        (**self).set_resolution(width, height)
    }
}
