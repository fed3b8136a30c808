// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Camera probing and capture
pub mod camera {
    /// Number of device indices probed during discovery (indices 0..5)
    pub const DEFAULT_PROBE_LIMIT: u32 = 5;

    /// Memory-mapped buffers requested for a capture stream
    pub const CAPTURE_BUFFER_COUNT: u32 = 4;

    /// Prefix of V4L2 device nodes
    pub const V4L2_DEVICE_PREFIX: &str = "/dev/video";

    /// Display name used for index-addressed cameras
    pub fn usb_camera_name(index: u32) -> String {
        format!("USB Camera {}", index)
    }
}

/// On-disk layout below the station base directory
pub mod layout {
    /// Directory holding both workflow directories
    pub const WORKFLOWS_DIR: &str = "workflows";

    /// QC workflow definitions (below `workflows/`)
    pub const QC_WORKFLOWS_DIR: &str = "qc_workflows";

    /// Maintenance workflow definitions (below `workflows/`)
    pub const MAINTENANCE_WORKFLOWS_DIR: &str = "maintenance_workflows";

    /// Directory holding both reference image directories
    pub const RESOURCES_DIR: &str = "resources";

    /// QC reference images (below `resources/`)
    pub const QC_IMAGES_DIR: &str = "qc_reference_images";

    /// Maintenance reference images (below `resources/`)
    pub const MAINTENANCE_IMAGES_DIR: &str = "maintenance_reference_images";

    /// Captured frames and inspection artifacts
    pub const OUTPUT_DIR: &str = "output";
}

/// Workflow documents
pub mod workflow {
    /// Key inserted into every loaded workflow with its source path
    pub const FILE_PATH_KEY: &str = "_file_path";

    /// Optional key carrying a human-readable workflow name
    pub const NAME_KEY: &str = "name";

    /// Optional key carrying the ordered inspection steps
    pub const STEPS_KEY: &str = "steps";

    /// Extension of workflow definition files
    pub const FILE_EXTENSION: &str = "json";
}

/// QR scanning
pub mod scanner {
    /// Frames larger than this are downscaled before detection
    pub const DEFAULT_MAX_DIMENSION: u32 = 1280;

    /// Delay between captures in watch mode
    pub const WATCH_INTERVAL_MS: u64 = 100;
}

/// Supported file formats
pub mod file_formats {
    /// Image extensions accepted by the still-image camera
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }

    /// JPEG quality used when saving captures
    pub const JPEG_QUALITY: u8 = 92;
}

/// Application information utilities
pub mod app_info {
    /// Binary name, also used for the config directory
    pub const APP_NAME: &str = "camera-qc";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
