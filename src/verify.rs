//! Heuristic screenshot classification.
//!
//! A screenshot passes verification when it decodes, is not blank (intensity
//! variance above a floor), and shows visible UI structure (enough pixels
//! with a strong intensity gradient). When a baseline is supplied, the
//! candidate must additionally score above an SSIM threshold against it.
//! The pipeline is pure and short-circuits on the first failing stage.

use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;
use image_compare::Algorithm;
use log::debug;

use crate::config::VerifyConfig;
use crate::{Error, Result};

/// Per-pixel gradient-magnitude threshold (0-1 normalized scale) above which
/// a pixel counts as an edge. Fixed; only the density threshold is tunable.
const EDGE_PIXEL_THRESHOLD: f32 = 0.1;

/// Outcome of classifying one screenshot
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Whether the screenshot was classified as a valid render
    pub passed: bool,
    /// Human-readable reason
    pub message: String,
    /// SSIM score, present whenever a baseline comparison was reached
    pub score: Option<f64>,
}

impl Verdict {
    fn pass(message: String, score: Option<f64>) -> Self {
        Self {
            passed: true,
            message,
            score,
        }
    }

    fn fail(message: String, score: Option<f64>) -> Self {
        Self {
            passed: false,
            message,
            score,
        }
    }
}

/// Classify the screenshot at `image_path`, optionally comparing it against
/// the baseline at `baseline_path`. I/O and decode problems are reported as
/// failing verdicts with the underlying error embedded, never as panics.
pub fn verify_screenshot(
    image_path: &Path,
    baseline_path: Option<&Path>,
    config: &VerifyConfig,
) -> Verdict {
    let img = match image::open(image_path) {
        Ok(img) => img.to_luma8(),
        Err(e) => return Verdict::fail(format!("Cannot read image: {}", e), None),
    };

    let stddev = intensity_stddev(&img);
    debug!("intensity std-dev {:.4}", stddev);
    if stddev < config.blank_threshold / 255.0 {
        return Verdict::fail("Image is blank (failed render)".to_string(), None);
    }

    let density = edge_density(&img);
    debug!("edge density {:.4}", density);
    if density <= config.edge_density_threshold {
        return Verdict::fail("No UI elements detected".to_string(), None);
    }

    if let Some(baseline_path) = baseline_path {
        let baseline = match image::open(baseline_path) {
            Ok(img) => img.to_luma8(),
            Err(e) => return Verdict::fail(format!("Cannot read baseline: {}", e), None),
        };

        let score = match ssim_score(&img, &baseline) {
            Ok(score) => score,
            Err(e) => return Verdict::fail(e.to_string(), None),
        };

        if score < config.ssim_threshold {
            return Verdict::fail(
                format!(
                    "SSIM {:.3} below threshold {}",
                    score, config.ssim_threshold
                ),
                Some(score),
            );
        }
        return Verdict::pass(
            format!("Screenshot matches baseline (SSIM: {:.3})", score),
            Some(score),
        );
    }

    Verdict::pass("Screenshot looks valid".to_string(), None)
}

/// Standard deviation of pixel intensity over the normalized 0-1 range.
/// Near-zero variance means an all-one-color (failed) render.
pub(crate) fn intensity_stddev(img: &GrayImage) -> f64 {
    let count = (img.width() as u64 * img.height() as u64) as f64;
    if count == 0.0 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for pixel in img.pixels() {
        let v = pixel[0] as f64 / 255.0;
        sum += v;
        sum_sq += v * v;
    }
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0).sqrt()
}

/// Fraction of pixels whose Sobel gradient magnitude exceeds
/// [`EDGE_PIXEL_THRESHOLD`]. Real interfaces have text/button/border edges;
/// a gradient background passes the blankness check but not this one.
pub(crate) fn edge_density(img: &GrayImage) -> f64 {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    // Border pixels sample with clamped coordinates so every pixel gets a
    // gradient response and the density denominator covers the whole image.
    let at = |x: i64, y: i64| {
        let x = x.clamp(0, width as i64 - 1) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        img.get_pixel(x, y)[0] as f32 / 255.0
    };

    let mut edge_pixels = 0u64;
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            // Sobel kernels normalized by 4, magnitude by sqrt(2), keeping
            // the response in 0-1 so the fixed pixel threshold is comparable
            // across images.
            let gx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2.0 * at(x - 1, y)
                - at(x - 1, y + 1))
                / 4.0;
            let gy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2.0 * at(x, y - 1)
                - at(x + 1, y - 1))
                / 4.0;
            let magnitude = (gx * gx + gy * gy).sqrt() / std::f32::consts::SQRT_2;
            if magnitude > EDGE_PIXEL_THRESHOLD {
                edge_pixels += 1;
            }
        }
    }

    edge_pixels as f64 / (width as u64 * height as u64) as f64
}

/// Structural similarity between a candidate and a baseline. The candidate's
/// dimensions are authoritative: a mismatched baseline is resized to them
/// with anti-aliased resampling before scoring.
pub(crate) fn ssim_score(candidate: &GrayImage, baseline: &GrayImage) -> Result<f64> {
    let resized;
    let baseline = if baseline.dimensions() != candidate.dimensions() {
        resized = image::imageops::resize(
            baseline,
            candidate.width(),
            candidate.height(),
            FilterType::Lanczos3,
        );
        &resized
    } else {
        baseline
    };

    let similarity =
        image_compare::gray_similarity_structure(&Algorithm::MSSIMSimple, candidate, baseline)
            .map_err(|e| Error::ImageError(format!("SSIM calculation failed: {:?}", e)))?;
    Ok(similarity.score)
}
