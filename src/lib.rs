//! snapcheck
//!
//! Capture a rendered web page as a PNG and judge whether the capture is a
//! plausible UI render. The crate backs two command-line tools that compose a
//! two-stage pipeline with the filesystem as the only integration point:
//!
//! - **capture**: drives a headless Chrome session to a URL, waits for the
//!   document to finish loading, waits for consecutive sampled frames to
//!   become identical (visual stability), and writes one screenshot.
//! - **verify**: classifies a screenshot as non-blank and UI-bearing, and
//!   optionally scores it against a baseline image with SSIM.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use snapcheck::{CaptureConfig, CaptureRequest};
//!
//! # fn main() -> snapcheck::Result<()> {
//! let request = CaptureRequest::new(
//!     "https://example.com".to_string(),
//!     PathBuf::from("shot.png"),
//!     30,
//!     0,
//! )?;
//! snapcheck::run_capture(&request, &CaptureConfig::from_env())?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod session;
pub mod stability;
pub mod verify;

pub use capture::{run_capture, CaptureRequest};
pub use config::{CaptureConfig, VerifyConfig};
pub use error::{Error, Result};
pub use verify::{verify_screenshot, Verdict};

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }
}
