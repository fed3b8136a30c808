// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format conversion for captured frames
//!
//! Cameras deliver YUYV, MJPEG, grayscale or packed RGB/BGR buffers. Every
//! consumer (saving, QR scanning) works on RGB, so the [`conversions`]
//! module turns any [`CameraFrame`](crate::backends::camera::CameraFrame)
//! into an [`image::RgbImage`] on the CPU.

pub mod conversions;

pub use conversions::{frame_from_rgb, frame_to_luma, frame_to_rgb};
