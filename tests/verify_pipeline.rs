//! File-level tests for the verification pipeline

use std::fs;
use std::path::PathBuf;

use image::{GrayImage, Luma};
use snapcheck::{verify_screenshot, VerifyConfig};

fn save_png(dir: &tempfile::TempDir, name: &str, img: &GrayImage) -> PathBuf {
    let path = dir.path().join(name);
    img.save(&path).expect("Failed to save test image");
    path
}

fn checkerboard(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[test]
fn test_valid_screenshot_passes() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_png(&dir, "shot.png", &checkerboard(64, 64));

    let verdict = verify_screenshot(&path, None, &VerifyConfig::default());
    assert!(verdict.passed, "unexpected verdict: {}", verdict.message);
    assert_eq!(verdict.message, "Screenshot looks valid");
    assert!(verdict.score.is_none());
}

#[test]
fn test_blank_screenshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blank = GrayImage::from_pixel(64, 64, Luma([255u8]));
    let path = save_png(&dir, "blank.png", &blank);

    let verdict = verify_screenshot(&path, None, &VerifyConfig::default());
    assert!(!verdict.passed);
    assert_eq!(verdict.message, "Image is blank (failed render)");
}

#[test]
fn test_undecodable_file_fails_with_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.png");
    fs::write(&path, b"this is not a png").unwrap();

    let verdict = verify_screenshot(&path, None, &VerifyConfig::default());
    assert!(!verdict.passed);
    assert!(
        verdict.message.starts_with("Cannot read image:"),
        "unexpected message: {}",
        verdict.message
    );
}

#[test]
fn test_missing_file_fails() {
    let verdict = verify_screenshot(
        std::path::Path::new("/nonexistent/shot.png"),
        None,
        &VerifyConfig::default(),
    );
    assert!(!verdict.passed);
}

#[test]
fn test_identical_baseline_passes_with_score() {
    let dir = tempfile::tempdir().unwrap();
    let img = checkerboard(64, 64);
    let shot = save_png(&dir, "shot.png", &img);
    let baseline = save_png(&dir, "baseline.png", &img);

    let verdict = verify_screenshot(&shot, Some(&baseline), &VerifyConfig::default());
    assert!(verdict.passed, "unexpected verdict: {}", verdict.message);
    assert_eq!(
        verdict.message,
        "Screenshot matches baseline (SSIM: 1.000)"
    );
    let score = verdict.score.expect("baseline comparison must report a score");
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn test_mismatched_baseline_fails_with_score() {
    let dir = tempfile::tempdir().unwrap();
    let shot = save_png(&dir, "shot.png", &checkerboard(64, 64));
    // Same geometry, inverted colors: structurally very different.
    let inverted = GrayImage::from_fn(64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });
    let baseline = save_png(&dir, "baseline.png", &inverted);

    let verdict = verify_screenshot(&shot, Some(&baseline), &VerifyConfig::default());
    assert!(!verdict.passed);
    assert!(
        verdict.message.contains("below threshold"),
        "unexpected message: {}",
        verdict.message
    );
    assert!(verdict.score.is_some());
}

#[test]
fn test_unreadable_baseline_fails() {
    let dir = tempfile::tempdir().unwrap();
    let shot = save_png(&dir, "shot.png", &checkerboard(64, 64));
    let baseline = dir.path().join("missing.png");

    let verdict = verify_screenshot(&shot, Some(&baseline), &VerifyConfig::default());
    assert!(!verdict.passed);
    assert!(
        verdict.message.starts_with("Cannot read baseline:"),
        "unexpected message: {}",
        verdict.message
    );
}

#[test]
fn test_thresholds_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_png(&dir, "shot.png", &checkerboard(64, 64));

    // An absurd edge-density demand fails even a busy image.
    let strict = VerifyConfig {
        edge_density_threshold: 0.99,
        ..Default::default()
    };
    let verdict = verify_screenshot(&path, None, &strict);
    assert!(!verdict.passed);
    assert_eq!(verdict.message, "No UI elements detected");
}
