// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for camera discovery and sessions

use camera_qc::backends::camera::{
    BackendError, BackendResult, Camera, CameraFrame, CameraKind, CameraManager, CameraSession,
    ImageFileCamera, PixelFormat, Resolution,
};
use camera_qc::diagnostics;
use std::cell::RefCell;
use std::rc::Rc;

/// Open/close events recorded by fake cameras
type EventLog = Rc<RefCell<Vec<String>>>;

/// Camera that opens only for indices below `available`
struct FakeCamera {
    index: u32,
    id: String,
    available: u32,
    open: bool,
    resolution: Resolution,
    /// Size the "driver" applies regardless of the request
    rounds_to: Option<Resolution>,
    /// Opens fine but never delivers a frame
    broken: bool,
    log: EventLog,
}

impl FakeCamera {
    fn new(index: u32, available: u32, log: EventLog) -> Self {
        Self {
            index,
            id: format!("fake_{}", index),
            available,
            open: false,
            resolution: Resolution::new(640, 480),
            rounds_to: None,
            broken: false,
            log,
        }
    }
}

impl Camera for FakeCamera {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> String {
        format!("Fake Camera {}", self.index)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> BackendResult<()> {
        self.log.borrow_mut().push(format!("open {}", self.index));
        if self.index < self.available {
            self.open = true;
            Ok(())
        } else {
            Err(BackendError::OpenFailed(self.id.clone()))
        }
    }

    fn close(&mut self) {
        if self.open {
            self.log.borrow_mut().push(format!("close {}", self.index));
        }
        self.open = false;
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        if !self.open {
            return Err(BackendError::NotOpen(self.id.clone()));
        }
        if self.broken {
            return Err(BackendError::CaptureFailed(format!("{} timed out", self.id)));
        }
        let Resolution { width, height } = self.resolution;
        Ok(CameraFrame::from_packed(
            width,
            height,
            PixelFormat::Gray8,
            vec![128; (width * height) as usize],
        ))
    }

    fn resolution(&self) -> Resolution {
        if self.open {
            self.resolution
        } else {
            Resolution::default()
        }
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> BackendResult<Resolution> {
        self.log
            .borrow_mut()
            .push(format!("set {}x{}", width, height));
        self.resolution = self.rounds_to.unwrap_or(Resolution::new(width, height));
        Ok(self.resolution)
    }
}

fn fake_manager(probe_limit: u32, available: u32) -> (CameraManager, EventLog) {
    fake_manager_with(probe_limit, available, |_| {})
}

fn fake_manager_with(
    probe_limit: u32,
    available: u32,
    configure: fn(&mut FakeCamera),
) -> (CameraManager, EventLog) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let factory_log = log.clone();
    let manager = CameraManager::with_factory(probe_limit, move |index| -> Box<dyn Camera> {
        let mut camera = FakeCamera::new(index, available, factory_log.clone());
        configure(&mut camera);
        Box::new(camera)
    });
    (manager, log)
}

fn resolution_changes(log: &EventLog) -> usize {
    log.borrow().iter().filter(|event| event.starts_with("set ")).count()
}

#[test]
fn test_discovery_returns_open_cameras_in_order() {
    let (manager, _log) = fake_manager(5, 2);
    let cameras = manager.discover_cameras();

    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].id(), "fake_0");
    assert_eq!(cameras[1].id(), "fake_1");
    assert!(cameras.iter().all(|camera| camera.is_open()));
}

#[test]
fn test_discovery_stops_at_first_failure() {
    let (manager, log) = fake_manager(5, 1);
    let cameras = manager.discover_cameras();

    assert_eq!(cameras.len(), 1);
    // Index 2 is never tried once index 1 fails
    assert_eq!(*log.borrow(), vec!["open 0", "open 1"]);
}

#[test]
fn test_discovery_respects_probe_limit() {
    let (manager, log) = fake_manager(5, 10);
    let cameras = manager.discover_cameras();

    assert_eq!(cameras.len(), 5);
    assert_eq!(log.borrow().len(), 5);
}

#[test]
fn test_discovery_with_no_cameras() {
    let (manager, _log) = fake_manager(5, 0);
    assert!(manager.discover_cameras().is_empty());
}

#[test]
fn test_close_is_idempotent() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    {
        let mut camera = FakeCamera::new(0, 1, log.clone());
        camera.open().unwrap();
        let mut boxed: Box<dyn Camera> = Box::new(camera);
        boxed.close();
        boxed.close();
    }
    // Idempotent close records a single event
    assert_eq!(*log.borrow(), vec!["open 0", "close 0"]);
}

#[test]
fn test_get_camera_by_type_is_not_opened() {
    let (manager, log) = fake_manager(5, 5);
    let camera = manager.get_camera_by_type(CameraKind::Borescope, 3);

    assert_eq!(camera.id(), "fake_3");
    assert!(!camera.is_open());
    assert_eq!(camera.resolution(), Resolution::new(0, 0));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_camera_kind_parsing() {
    assert_eq!("usb".parse::<CameraKind>().unwrap(), CameraKind::Usb);
    assert_eq!("OpenCV".parse::<CameraKind>().unwrap(), CameraKind::Usb);
    assert_eq!("webcam".parse::<CameraKind>().unwrap(), CameraKind::Webcam);
    assert_eq!("borescope".parse::<CameraKind>().unwrap(), CameraKind::Borescope);
    assert!("thermal".parse::<CameraKind>().is_err());
}

#[test]
fn test_session_closes_camera_on_drop() {
    let (manager, log) = fake_manager(5, 1);
    {
        let mut session = manager.session(0).unwrap();
        assert!(session.is_open());
        let frame = session.capture_frame().unwrap();
        assert_eq!(frame.resolution(), Resolution::new(640, 480));
    }
    assert_eq!(*log.borrow(), vec!["open 0", "close 0"]);
}

#[test]
fn test_session_closes_camera_on_error_path() {
    let (manager, log) = fake_manager(5, 1);

    let result: Result<(), BackendError> = (|| {
        let mut session = manager.session(0)?;
        session.capture_frame()?;
        Err(BackendError::CaptureFailed("inspection aborted".to_string()))
    })();

    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec!["open 0", "close 0"]);
}

#[test]
fn test_session_open_failure() {
    let (manager, log) = fake_manager(5, 0);
    assert!(matches!(manager.session(0), Err(BackendError::OpenFailed(_))));
    assert_eq!(*log.borrow(), vec!["open 0"]);
}

#[test]
fn test_session_capture_applies_resolution() {
    let (manager, _log) = fake_manager(5, 1);
    let mut session = manager.session(0).unwrap();

    let frame = session.capture_at(Some(Resolution::new(320, 240))).unwrap();
    assert_eq!(frame.resolution(), Resolution::new(320, 240));
    assert_eq!(session.resolution(), Resolution::new(320, 240));
}

#[test]
fn test_rounded_resolution_is_negotiated_once() {
    let (manager, log) = fake_manager_with(5, 1, |camera| {
        camera.rounds_to = Some(Resolution::new(960, 720));
    });
    let mut session = manager.session(0).unwrap();

    for _ in 0..5 {
        let frame = session.capture_at(Some(Resolution::new(1000, 700))).unwrap();
        assert_eq!(frame.resolution(), Resolution::new(960, 720));
    }
    assert_eq!(resolution_changes(&log), 1);

    // A different request is negotiated again
    session.capture_at(Some(Resolution::new(640, 480))).unwrap();
    assert_eq!(resolution_changes(&log), 2);
}

#[test]
fn test_matching_resolution_is_not_renegotiated() {
    let (manager, log) = fake_manager(5, 1);
    let mut session = manager.session(0).unwrap();

    session.capture_at(Some(Resolution::new(640, 480))).unwrap();
    session.capture_at(None).unwrap();
    assert_eq!(resolution_changes(&log), 0);
}

#[test]
fn test_image_file_camera_session() {
    let dir = std::env::temp_dir().join(format!("camera-qc-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("part.png");
    image::RgbImage::from_pixel(64, 48, image::Rgb([10, 20, 30]))
        .save(&path)
        .unwrap();

    {
        let mut session = CameraSession::open(Box::new(ImageFileCamera::new(&path))).unwrap();
        assert_eq!(session.id(), "file_part");
        assert_eq!(session.resolution(), Resolution::new(64, 48));

        let frame = session.capture_at(Some(Resolution::new(32, 24))).unwrap();
        assert_eq!(frame.resolution(), Resolution::new(32, 24));
        assert_eq!(frame.format, PixelFormat::RGB24);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_camera_check_reports_resolutions() {
    let (manager, _log) = fake_manager(5, 2);
    let section = diagnostics::check_cameras(&manager);

    assert!(section.passed());
    assert_eq!(section.results.len(), 2);
    assert_eq!(section.results[0].label, "Camera 0: 640x480");
}

#[test]
fn test_camera_check_fails_without_cameras() {
    let (manager, _log) = fake_manager(5, 0);
    assert!(!diagnostics::check_cameras(&manager).passed());
}

#[test]
fn test_camera_check_fails_when_a_camera_gives_no_frame() {
    let (manager, _log) = fake_manager_with(5, 2, |camera| {
        camera.broken = camera.index == 1;
    });
    let section = diagnostics::check_cameras(&manager);

    assert!(!section.passed());
    assert_eq!(section.results.len(), 2);
    assert!(section.results[0].passed);
    assert_eq!(section.results[1].label, "Camera 1");
    assert!(!section.results[1].passed);
}
