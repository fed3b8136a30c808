// SPDX-License-Identifier: GPL-3.0-only

//! CPU conversion of camera frames to RGB and grayscale images

use crate::backends::camera::types::{BackendError, BackendResult, CameraFrame, PixelFormat};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use tracing::trace;

/// Convert a frame of any supported format into a tightly packed RGB image
pub fn frame_to_rgb(frame: &CameraFrame) -> BackendResult<RgbImage> {
    trace!(
        width = frame.width,
        height = frame.height,
        format = %frame.format,
        bytes = frame.len(),
        "Converting frame to RGB"
    );

    if frame.format == PixelFormat::MJPEG {
        return decode_mjpeg(frame);
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let row_bytes = frame.format.row_bytes(frame.width).unwrap_or(0) as usize;
    let stride = if frame.stride == 0 {
        row_bytes
    } else {
        frame.stride as usize
    };

    if stride < row_bytes || frame.data.len() < stride * height.saturating_sub(1) + row_bytes {
        return Err(BackendError::FormatNotSupported(format!(
            "{} buffer of {} bytes is too small for {}x{} (stride {})",
            frame.format,
            frame.data.len(),
            frame.width,
            frame.height,
            stride
        )));
    }

    let mut rgb = vec![0u8; width * height * 3];

    for row in 0..height {
        let src = &frame.data[row * stride..row * stride + row_bytes];
        let dst = &mut rgb[row * width * 3..(row + 1) * width * 3];

        match frame.format {
            PixelFormat::RGB24 => dst.copy_from_slice(src),
            PixelFormat::BGR24 => {
                for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
                    d[0] = s[2];
                    d[1] = s[1];
                    d[2] = s[0];
                }
            }
            PixelFormat::RGBA => {
                for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
                    d.copy_from_slice(&s[..3]);
                }
            }
            PixelFormat::Gray8 => {
                for (d, &luma) in dst.chunks_exact_mut(3).zip(src.iter()) {
                    d.fill(luma);
                }
            }
            PixelFormat::YUYV => yuyv_row_to_rgb(src, dst, width),
            // Decoded as a whole image above
            PixelFormat::MJPEG => {}
        }
    }

    RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| BackendError::Other("Failed to create RGB image from buffer".to_string()))
}

/// Convert a frame to 8-bit grayscale
///
/// Gray8 frames are repacked without a color round trip.
pub fn frame_to_luma(frame: &CameraFrame) -> BackendResult<GrayImage> {
    if frame.format == PixelFormat::Gray8 {
        let width = frame.width as usize;
        let stride = if frame.stride == 0 {
            width
        } else {
            frame.stride as usize
        };
        let mut luma = Vec::with_capacity(width * frame.height as usize);
        for row in frame.data.chunks(stride.max(1)).take(frame.height as usize) {
            if row.len() < width {
                break;
            }
            luma.extend_from_slice(&row[..width]);
        }
        return GrayImage::from_raw(frame.width, frame.height, luma).ok_or_else(|| {
            BackendError::FormatNotSupported(format!(
                "GRAY8 buffer of {} bytes is too small for {}x{}",
                frame.data.len(),
                frame.width,
                frame.height
            ))
        });
    }

    let rgb = frame_to_rgb(frame)?;
    Ok(DynamicImage::ImageRgb8(rgb).to_luma8())
}

/// Wrap an RGB image as an RGB24 camera frame
pub fn frame_from_rgb(image: RgbImage) -> CameraFrame {
    let (width, height) = image.dimensions();
    CameraFrame::from_packed(width, height, PixelFormat::RGB24, image.into_raw())
}

fn decode_mjpeg(frame: &CameraFrame) -> BackendResult<RgbImage> {
    let decoded = image::load_from_memory_with_format(&frame.data, ImageFormat::Jpeg)
        .map_err(|e| BackendError::CaptureFailed(format!("MJPEG decode failed: {}", e)))?;
    Ok(decoded.to_rgb8())
}

/// Convert one packed YUYV row (Y0 U Y1 V) to RGB using BT.601 limited range
#[inline]
fn yuyv_row_to_rgb(src: &[u8], dst: &mut [u8], width: usize) {
    for (pair, macropixel) in src.chunks_exact(4).enumerate() {
        let u = macropixel[1] as i32 - 128;
        let v = macropixel[3] as i32 - 128;

        let r_v = (179 * v) >> 7;
        let g_u = (44 * u) >> 7;
        let g_v = (91 * v) >> 7;
        let b_u = (227 * u) >> 7;

        for (offset, y) in [macropixel[0], macropixel[2]].into_iter().enumerate() {
            let x = pair * 2 + offset;
            if x >= width {
                break;
            }
            let luma = ((y as i32 - 16) * 149) >> 7;
            let out = x * 3;
            dst[out] = (luma + r_v).clamp(0, 255) as u8;
            dst[out + 1] = (luma - g_u - g_v).clamp(0, 255) as u8;
            dst[out + 2] = (luma + b_u).clamp(0, 255) as u8;
        }
    }
}
