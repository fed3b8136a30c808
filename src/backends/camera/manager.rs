// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery and scoped access
//!
//! The manager provides:
//! - Bounded linear probing of camera indices
//! - Construction of cameras by kind
//! - Sessions that release the camera on every exit path

use super::types::*;
use super::{Camera, V4l2Camera, v4l2};
use crate::constants::camera::DEFAULT_PROBE_LIMIT;
use std::ops::{Deref, DerefMut};
use tracing::{debug, info};

/// Builds a (closed) camera for a device index
pub type CameraFactory = Box<dyn Fn(u32) -> Box<dyn Camera>>;

/// Camera manager
///
/// Discovery opens indices `0..probe_limit` in order and stops at the first
/// index that fails to open; there is no gap skipping.
pub struct CameraManager {
    probe_limit: u32,
    factory: CameraFactory,
}

impl CameraManager {
    /// Create a manager probing V4L2 devices with the default limit
    pub fn new() -> Self {
        Self::with_probe_limit(DEFAULT_PROBE_LIMIT)
    }

    /// Create a manager probing V4L2 devices `0..probe_limit`
    pub fn with_probe_limit(probe_limit: u32) -> Self {
        Self::with_factory(probe_limit, |index| -> Box<dyn Camera> {
            Box::new(V4l2Camera::new(index))
        })
    }

    /// Create a manager with a custom camera factory
    pub fn with_factory<F>(probe_limit: u32, factory: F) -> Self
    where
        F: Fn(u32) -> Box<dyn Camera> + 'static,
    {
        Self {
            probe_limit,
            factory: Box::new(factory),
        }
    }

    pub fn probe_limit(&self) -> u32 {
        self.probe_limit
    }

    /// Discover available cameras
    ///
    /// Returned cameras are already open. The first index that fails to
    /// open is closed again and ends the probe.
    pub fn discover_cameras(&self) -> Vec<Box<dyn Camera>> {
        let mut cameras = Vec::new();

        for index in 0..self.probe_limit {
            let mut camera = (self.factory)(index);
            match camera.open() {
                Ok(()) => {
                    debug!(index, camera = %camera.id(), "Camera found");
                    cameras.push(camera);
                }
                Err(e) => {
                    debug!(index, error = %e, "Probe stopped");
                    camera.close();
                    break;
                }
            }
        }

        info!(count = cameras.len(), limit = self.probe_limit, "Camera discovery complete");
        cameras
    }

    /// Get a camera of the given kind without opening it
    ///
    /// Every hardware kind is served by the same index-addressed backend.
    pub fn get_camera_by_type(&self, kind: CameraKind, index: u32) -> Box<dyn Camera> {
        debug!(%kind, index, "Creating camera");
        (self.factory)(index)
    }

    /// Open the camera at `index` inside a session that closes it on drop
    pub fn session(&self, index: u32) -> BackendResult<CameraSession> {
        CameraSession::open((self.factory)(index))
    }

    /// List V4L2 device nodes without opening them
    pub fn list_devices(&self) -> Vec<CameraDevice> {
        v4l2::list_devices()
    }
}

impl Default for CameraManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CameraManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraManager")
            .field("probe_limit", &self.probe_limit)
            .finish()
    }
}

/// An open camera that is closed when the session is dropped
pub struct CameraSession {
    camera: Box<dyn Camera>,
    /// Last size passed to `capture_at`, whatever the driver made of it
    requested: Option<Resolution>,
}

impl CameraSession {
    /// Open `camera` and take ownership of it
    pub fn open(mut camera: Box<dyn Camera>) -> BackendResult<Self> {
        camera.open()?;
        Ok(Self {
            camera,
            requested: None,
        })
    }

    /// Capture one frame, applying `resolution` first when it is a new request
    ///
    /// Drivers may round a request to a nearby size; repeating the same
    /// request does not renegotiate the format.
    pub fn capture_at(&mut self, resolution: Option<Resolution>) -> BackendResult<CameraFrame> {
        if let Some(res) = resolution
            && self.requested != Some(res)
        {
            if res != self.camera.resolution() {
                self.camera.set_resolution(res.width, res.height)?;
            }
            self.requested = Some(res);
        }
        self.camera.capture_frame()
    }
}

impl Deref for CameraSession {
    type Target = dyn Camera;

    fn deref(&self) -> &Self::Target {
        self.camera.as_ref()
    }
}

impl DerefMut for CameraSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.camera.as_mut()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        debug!(camera = %self.camera.id(), "Ending camera session");
        self.camera.close();
    }
}
