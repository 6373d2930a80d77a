//! Error types for capture and verification

use thiserror::Error;

/// Result type alias for snapcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing or classifying a screenshot
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid CLI arguments or configuration values
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to launch the browser session
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    /// Failed to navigate to the target URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// The document never reported readyState == "complete"
    #[error("Page did not become ready within {0}s")]
    ReadyTimeout(u64),

    /// Failed to capture the current frame
    #[error("Frame capture failed: {0}")]
    CaptureError(String),

    /// Failed to persist the captured frame
    #[error("Failed to save screenshot: {0}")]
    SaveError(String),

    /// Failed to decode or process an image file
    #[error("{0}")]
    ImageError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
