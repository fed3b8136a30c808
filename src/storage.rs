// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for captured frames

use crate::backends::camera::CameraFrame;
use crate::config::PhotoOutputFormat;
use crate::errors::{AppError, AppResult};
use crate::media::frame_to_rgb;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encode a frame and write it below `output_dir`
///
/// The file is named `{prefix}_{YYYYmmdd_HHMMSS}.{ext}`; a counter is
/// appended when that name is already taken.
pub fn save_frame(
    frame: &CameraFrame,
    output_dir: &Path,
    format: PhotoOutputFormat,
    prefix: &str,
) -> AppResult<PathBuf> {
    let image = frame_to_rgb(frame)?;
    std::fs::create_dir_all(output_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = unique_path(output_dir, &format!("{}_{}", prefix, timestamp), format.extension());

    write_image(&image, &path, format)?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "Capture saved");
    Ok(path)
}

/// Encode an RGB image to `path` in the given format
pub fn write_image(image: &RgbImage, path: &Path, format: PhotoOutputFormat) -> AppResult<()> {
    let data = encode(image, format)?;
    std::fs::write(path, &data)?;
    debug!(path = %path.display(), bytes = data.len(), "Image written");
    Ok(())
}

fn encode(image: &RgbImage, format: PhotoOutputFormat) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);

    match format {
        PhotoOutputFormat::Jpeg => {
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut cursor,
                format.jpeg_quality(),
            );
            encoder
                .encode(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| AppError::Storage(format!("JPEG encoding failed: {}", e)))?;
        }
        PhotoOutputFormat::Png => {
            image
                .write_to(&mut cursor, image::ImageFormat::Png)
                .map_err(|e| AppError::Storage(format!("PNG encoding failed: {}", e)))?;
        }
    }

    Ok(buffer)
}

/// First free `{stem}.{ext}`, `{stem}_1.{ext}`, ... in `dir`
fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, extension));
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = std::env::temp_dir().join(format!("camera-qc-unique-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let first = unique_path(&dir, "capture", "png");
        assert_eq!(first, dir.join("capture.png"));
        std::fs::write(&first, b"x").unwrap();

        let second = unique_path(&dir, "capture", "png");
        assert_eq!(second, dir.join("capture_1.png"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
