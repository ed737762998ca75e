//! Tests for screen expectations against scripted screens

use crate::config::MatchConfig;
use crate::diagnostics::{COORD_LIST_FILE, FOUND_IMAGE_FILE, SCREEN_IMAGE_FILE, TEMPLATE_IMAGE_FILE};
use crate::error::{MatchError, RemoteError};
use crate::remote::{FrameSource, PointerInput};
use crate::screen_match::ScreenMatch;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const TEMPLATE_NAME: &str = "button.png";

/// Screen that plays back a fixed sequence of frames, repeating the last one
struct ScriptedScreen {
    frames: Vec<RgbImage>,
    captures: usize,
}

impl ScriptedScreen {
    fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            captures: 0,
        }
    }
}

impl FrameSource for ScriptedScreen {
    fn capture(&mut self) -> Result<RgbImage, RemoteError> {
        let idx = self.captures.min(self.frames.len() - 1);
        self.captures += 1;
        Ok(self.frames[idx].clone())
    }
}

#[derive(Default)]
struct RecordingPointer {
    events: Vec<String>,
}

impl PointerInput for RecordingPointer {
    fn move_to(&mut self, x: u32, y: u32) -> Result<(), RemoteError> {
        self.events.push(format!("move {x},{y}"));
        Ok(())
    }

    fn click(&mut self) -> Result<(), RemoteError> {
        self.events.push("click".to_string());
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), RemoteError> {
        self.events.push(format!("write {text}"));
        Ok(())
    }
}

fn white_square() -> RgbImage {
    RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]))
}

/// 10x10 black screen with the white square at the given positions
fn screen_with(positions: &[(u32, u32)]) -> RgbImage {
    let mut frame = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
    for &(x, y) in positions {
        image::imageops::replace(&mut frame, &white_square(), x as i64, y as i64);
    }
    frame
}

/// Temp workspace with `images/button.png` and a report root
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        white_square()
            .save(dir.path().join("images").join(TEMPLATE_NAME))
            .unwrap();
        Self { dir }
    }

    fn config(&self) -> MatchConfig {
        MatchConfig {
            report_root: self.report_root(),
            ..MatchConfig::with_images_dir(self.dir.path().join("images"))
        }
    }

    fn report_root(&self) -> PathBuf {
        self.dir.path().join("fails")
    }

    fn session(&self, frames: Vec<RgbImage>) -> ScreenMatch<ScriptedScreen> {
        ScreenMatch::with_config(ScriptedScreen::new(frames), self.config())
    }
}

fn report_dir_of(err: &MatchError) -> &Path {
    err.report_dir().expect("expected a TestFailed error with a report")
}

#[test]
fn test_zero_timeout_single_match_returns_immediately() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(3, 3)])]);

    let start = Instant::now();
    let center = screen.expect_single(TEMPLATE_NAME, Duration::ZERO).unwrap();

    assert_eq!(center, (3, 3));
    assert_eq!(screen.source().captures, 1);
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(!ws.report_root().exists());
}

#[test]
fn test_unbounded_timeout_returns_on_first_match() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(3, 3)])]);

    let center = screen.expect_single(TEMPLATE_NAME, Duration::MAX).unwrap();

    assert_eq!(center, (3, 3));
    assert_eq!(screen.source().captures, 1);
}

#[test]
fn test_unbounded_timeout_keeps_polling() {
    let ws = Workspace::new();
    let empty = screen_with(&[]);
    let mut screen = ScreenMatch::with_config(
        ScriptedScreen::new(vec![empty.clone(), empty, screen_with(&[(4, 1)])]),
        MatchConfig {
            poll_fraction: 0.0,
            ..ws.config()
        },
    );

    let center = screen.expect_single(TEMPLATE_NAME, Duration::MAX).unwrap();

    assert_eq!(center, (4, 1));
    assert_eq!(screen.source().captures, 3);
}

#[test]
fn test_unrepresentable_pause_is_config_error() {
    let ws = Workspace::new();
    for poll_fraction in [f64::INFINITY, f64::NAN, -0.5] {
        let mut screen = ScreenMatch::with_config(
            ScriptedScreen::new(vec![screen_with(&[(3, 3)])]),
            MatchConfig {
                poll_fraction,
                ..ws.config()
            },
        );

        let err = screen
            .expect_single(TEMPLATE_NAME, Duration::from_secs(1))
            .unwrap_err();

        assert!(
            matches!(err, MatchError::InvalidConfig { key: "poll_fraction", .. }),
            "{err:?}"
        );
        assert_eq!(screen.source().captures, 0);
    }
    assert!(!ws.report_root().exists());
}

#[test]
fn test_waits_for_image_to_appear() {
    let ws = Workspace::new();
    let empty = screen_with(&[]);
    let mut screen = ws.session(vec![
        empty.clone(),
        empty.clone(),
        empty,
        screen_with(&[(6, 2)]),
    ]);

    let start = Instant::now();
    let center = screen
        .expect_single(TEMPLATE_NAME, Duration::from_secs(2))
        .unwrap();

    assert_eq!(center, (6, 2));
    assert_eq!(screen.source().captures, 4);
    // Three pauses of 0.1 * 2s
    assert!(start.elapsed() >= Duration::from_millis(600));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_multiple_matches_fail_after_timeout_with_report() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(0, 0), (5, 5)])]);
    let timeout = Duration::from_millis(300);

    let start = Instant::now();
    let err = screen.expect_single(TEMPLATE_NAME, timeout).unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_test_failure());
    assert!(err.to_string().contains("multiple"), "{err}");
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout * 3, "took {elapsed:?}");
    assert!(screen.source().captures > 1);

    let dir = report_dir_of(&err);
    assert!(dir.starts_with(ws.report_root()));
    let name = dir.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("image_found_multiple_times_"), "{name}");
    for file in [
        TEMPLATE_IMAGE_FILE,
        SCREEN_IMAGE_FILE,
        COORD_LIST_FILE,
        FOUND_IMAGE_FILE,
    ] {
        assert!(dir.join(file).is_file(), "{file} missing");
    }
}

#[test]
fn test_not_found_single_attempt() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[])]);

    let err = screen
        .expect_single(TEMPLATE_NAME, Duration::ZERO)
        .unwrap_err();

    match &err {
        MatchError::TestFailed { message, .. } => assert_eq!(message, "image not found"),
        other => panic!("expected TestFailed, got {other:?}"),
    }
    assert_eq!(screen.source().captures, 1);
    let coords = std::fs::read_to_string(report_dir_of(&err).join(COORD_LIST_FILE)).unwrap();
    assert_eq!(coords, "[]");
}

#[test]
fn test_message_reflects_last_attempt_only() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![
        screen_with(&[(0, 0), (5, 5)]),
        screen_with(&[(0, 0), (5, 5)]),
        screen_with(&[]),
    ]);

    let err = screen
        .expect_single(TEMPLATE_NAME, Duration::from_millis(200))
        .unwrap_err();

    assert!(err.to_string().starts_with("image not found, see "), "{err}");
}

#[test]
fn test_missing_template_fails_before_capture() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(3, 3)])]);

    let err = screen
        .expect_single("no_such_button.png", Duration::from_secs(5))
        .unwrap_err();

    assert!(matches!(err, MatchError::TemplateMissing { .. }));
    assert!(!err.is_test_failure());
    assert_eq!(screen.source().captures, 0);
    assert!(!ws.report_root().exists());
}

#[test]
fn test_corrupt_template_is_load_error() {
    let ws = Workspace::new();
    std::fs::write(ws.dir.path().join("images").join("broken.png"), b"not a png").unwrap();
    let mut screen = ws.session(vec![screen_with(&[])]);

    let err = screen.find_by_name("broken.png").unwrap_err();
    assert!(matches!(err, MatchError::TemplateLoad { .. }));
}

#[test]
fn test_capture_error_propagates() {
    let ws = Workspace::new();
    let failing = || -> Result<RgbImage, RemoteError> { Err("connection reset".into()) };
    let mut screen = ScreenMatch::with_config(failing, ws.config());

    let err = screen
        .expect_single(TEMPLATE_NAME, Duration::from_secs(5))
        .unwrap_err();

    match err {
        MatchError::Capture(source) => assert_eq!(source.to_string(), "connection reset"),
        other => panic!("expected Capture, got {other:?}"),
    }
    assert!(!ws.report_root().exists());
}

#[test]
fn test_find_by_name_and_capture_only() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(3, 3)])]);

    let found = screen.find_by_name(TEMPLATE_NAME).unwrap();
    assert_eq!(found.boxes().len(), 1);
    assert_eq!(found.boxes()[0].centroid(), (3, 3));

    let capture = screen.find(None).unwrap();
    assert!(capture.boxes().is_empty());
    assert!(capture.mask().is_none());
    assert_eq!(capture.frame().dimensions(), (10, 10));
}

#[test]
fn test_click_single_moves_and_clicks() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[(6, 6)])]);
    let mut pointer = RecordingPointer::default();

    let center = screen
        .click_single(&mut pointer, TEMPLATE_NAME, Duration::ZERO)
        .unwrap();

    assert_eq!(center, (6, 6));
    assert_eq!(pointer.events, vec!["move 6,6", "click"]);
}

#[test]
fn test_click_single_does_not_click_on_failure() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![screen_with(&[])]);
    let mut pointer = RecordingPointer::default();

    let err = screen
        .click_single(&mut pointer, TEMPLATE_NAME, Duration::ZERO)
        .unwrap_err();

    assert!(err.is_test_failure());
    assert!(pointer.events.is_empty());
}

#[test]
fn test_click_then_type_then_expect_result() {
    let ws = Workspace::new();
    let mut screen = ws.session(vec![
        screen_with(&[(1, 1)]),
        screen_with(&[]),
        screen_with(&[(7, 7)]),
    ]);
    let mut pointer = RecordingPointer::default();

    {
        let input: &mut dyn PointerInput = &mut pointer;
        screen
            .click_single(&mut *input, TEMPLATE_NAME, Duration::ZERO)
            .unwrap();
        input.write("12345").unwrap();
    }
    let center = screen
        .expect_single(TEMPLATE_NAME, Duration::from_millis(500))
        .unwrap();

    assert_eq!(center, (7, 7));
    assert_eq!(screen.source().captures, 3);
    assert_eq!(pointer.events, vec!["move 1,1", "click", "write 12345"]);
}
