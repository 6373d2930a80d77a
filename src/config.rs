//! Environment-derived configuration for the capture and verify tools.
//!
//! Both configuration structs are built once at startup and passed into the
//! core routines; no environment lookups happen inside the capture or
//! verification logic itself.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SNAPCHECK_BROWSER_BIN` | Chrome/Chromium binary to launch | crate-discovered |
//! | `SNAPCHECK_DRIVER_BIN` | WebDriver binary (recognized, unused by the CDP backend) | unset |
//! | `SNAPCHECK_WINDOW_SIZE` | Viewport as `"<width>,<height>"` | `1920,1080` |
//! | `SNAPCHECK_BLANK_THRESHOLD` | Intensity std-dev floor, 0-255 scale | `3` |
//! | `SNAPCHECK_EDGE_THRESHOLD` | Minimum fraction of edge pixels | `0.005` |
//! | `SNAPCHECK_SSIM_THRESHOLD` | Minimum SSIM against a baseline, 0-1 | `0.95` |

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::Viewport;

/// Default intensity standard-deviation floor (0-255 scale)
pub const DEFAULT_BLANK_THRESHOLD: f64 = 3.0;

/// Default minimum fraction of pixels that must register as edges
pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.005;

/// Default minimum SSIM score against a baseline
pub const DEFAULT_SSIM_THRESHOLD: f64 = 0.95;

/// Environment variable for the browser binary path
pub const ENV_BROWSER_BIN: &str = "SNAPCHECK_BROWSER_BIN";

/// Environment variable for the WebDriver binary path
pub const ENV_DRIVER_BIN: &str = "SNAPCHECK_DRIVER_BIN";

/// Environment variable for the viewport size string
pub const ENV_WINDOW_SIZE: &str = "SNAPCHECK_WINDOW_SIZE";

/// Environment variable for the blankness threshold
pub const ENV_BLANK_THRESHOLD: &str = "SNAPCHECK_BLANK_THRESHOLD";

/// Environment variable for the edge-density threshold
pub const ENV_EDGE_THRESHOLD: &str = "SNAPCHECK_EDGE_THRESHOLD";

/// Environment variable for the SSIM threshold
pub const ENV_SSIM_THRESHOLD: &str = "SNAPCHECK_SSIM_THRESHOLD";

/// Configuration for the capture tool
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    /// Browser binary to launch; `None` lets the CDP crate discover one
    pub browser_bin: Option<PathBuf>,
    /// WebDriver binary; recognized for compatibility but unused, since the
    /// CDP backend drives the browser process directly
    pub driver_bin: Option<PathBuf>,
    /// Viewport dimensions for the headless window
    pub viewport: Viewport,
}

impl CaptureConfig {
    /// Build the capture configuration from the environment, falling back to
    /// built-in defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        let viewport = match env::var(ENV_WINDOW_SIZE) {
            Ok(raw) => parse_window_size(&raw).unwrap_or_else(|| {
                warn!(
                    "Ignoring malformed {} value '{}', using {}x{}",
                    ENV_WINDOW_SIZE,
                    raw,
                    Viewport::default().width,
                    Viewport::default().height
                );
                Viewport::default()
            }),
            Err(_) => Viewport::default(),
        };

        Self {
            browser_bin: env::var_os(ENV_BROWSER_BIN).map(PathBuf::from),
            driver_bin: env::var_os(ENV_DRIVER_BIN).map(PathBuf::from),
            viewport,
        }
    }
}

/// Configuration for the verification tool
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Intensity standard-deviation floor on the 0-255 scale; images below
    /// `blank_threshold / 255` normalized std-dev are classified as blank
    pub blank_threshold: f64,
    /// Minimum fraction of pixels whose gradient magnitude marks them as edges
    pub edge_density_threshold: f64,
    /// Minimum SSIM score for a baseline comparison to pass
    pub ssim_threshold: f64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            blank_threshold: DEFAULT_BLANK_THRESHOLD,
            edge_density_threshold: DEFAULT_EDGE_THRESHOLD,
            ssim_threshold: DEFAULT_SSIM_THRESHOLD,
        }
    }
}

impl VerifyConfig {
    /// Build the verification thresholds from the environment.
    pub fn from_env() -> Self {
        Self {
            blank_threshold: env_f64(ENV_BLANK_THRESHOLD, DEFAULT_BLANK_THRESHOLD),
            edge_density_threshold: env_f64(ENV_EDGE_THRESHOLD, DEFAULT_EDGE_THRESHOLD),
            ssim_threshold: env_f64(ENV_SSIM_THRESHOLD, DEFAULT_SSIM_THRESHOLD),
        }
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    match env::var(name) {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "Ignoring malformed {} value '{}', using default {}",
                    name, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a `"<width>,<height>"` viewport string.
fn parse_window_size(raw: &str) -> Option<Viewport> {
    let (width, height) = raw.split_once(',')?;
    let width: u32 = width.trim().parse().ok()?;
    let height: u32 = height.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Viewport { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_size() {
        let viewport = parse_window_size("1280,720").unwrap();
        assert_eq!(viewport.width, 1280);
        assert_eq!(viewport.height, 720);
    }

    #[test]
    fn test_parse_window_size_with_spaces() {
        let viewport = parse_window_size(" 800 , 600 ").unwrap();
        assert_eq!(viewport, Viewport { width: 800, height: 600 });
    }

    #[test]
    fn test_parse_window_size_rejects_garbage() {
        assert!(parse_window_size("1920x1080").is_none());
        assert!(parse_window_size("1920").is_none());
        assert!(parse_window_size("0,600").is_none());
        assert!(parse_window_size("wide,tall").is_none());
    }

    #[test]
    fn test_default_thresholds() {
        let config = VerifyConfig::default();
        assert_eq!(config.blank_threshold, 3.0);
        assert_eq!(config.edge_density_threshold, 0.005);
        assert_eq!(config.ssim_threshold, 0.95);
    }
}
