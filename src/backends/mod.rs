// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera capture
//!
//! # Modules
//!
//! - [`camera`]: Camera trait, V4L2 and still-image implementations, discovery

pub mod camera;
