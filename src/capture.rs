//! Capture orchestration: drive a page to visual stability and persist one frame.

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

use crate::config::CaptureConfig;
use crate::session::{CdpSession, RenderSession};
use crate::stability::{stability_window, wait_for_stability, Clock, Stability, SystemClock};
use crate::{Error, Result};

/// One capture invocation: where to go, where to write, and how long to wait
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Target URL
    pub url: String,
    /// Output path for the PNG screenshot
    pub output: PathBuf,
    /// Hard timeout covering navigation and the readiness wait
    pub timeout: Duration,
    /// Minimum dwell before stability is trusted
    pub min_wait: Duration,
}

impl CaptureRequest {
    /// Validate and build a capture request. The URL must be non-empty and
    /// the timeout positive; a minimum dwell of zero disables the dwell floor.
    pub fn new(
        url: String,
        output: PathBuf,
        timeout_secs: u64,
        min_wait_secs: u64,
    ) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(Error::ConfigError("URL must not be empty".into()));
        }
        if timeout_secs == 0 {
            return Err(Error::ConfigError(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(Self {
            url,
            output,
            timeout: Duration::from_secs(timeout_secs),
            min_wait: Duration::from_secs(min_wait_secs),
        })
    }
}

/// Capture a screenshot of `request.url` into `request.output`.
///
/// Launches an isolated headless browser, waits for the document to load and
/// for the rendered frame to stop changing, then writes one PNG. The browser
/// process is torn down on every exit path, including errors raised during
/// navigation or save.
pub fn run_capture(request: &CaptureRequest, config: &CaptureConfig) -> Result<()> {
    let mut session = CdpSession::launch(config, request.timeout)?;
    let mut clock = SystemClock::start();
    capture_with(&mut session, &mut clock, request)
}

/// Drive an already-launched session through the capture sequence, closing it
/// exactly once regardless of which step fails.
pub(crate) fn capture_with<S, C>(
    session: &mut S,
    clock: &mut C,
    request: &CaptureRequest,
) -> Result<()>
where
    S: RenderSession,
    C: Clock,
{
    let result = drive(session, clock, request);
    if let Err(e) = session.close() {
        warn!("Failed to shut down browser session: {}", e);
    }
    result
}

fn drive<S, C>(session: &mut S, clock: &mut C, request: &CaptureRequest) -> Result<()>
where
    S: RenderSession,
    C: Clock,
{
    session.navigate(&request.url)?;
    session.wait_ready(request.timeout)?;

    let window = stability_window(request.min_wait);
    info!("Waiting for UI stability (max {}s)...", window.as_secs());
    match wait_for_stability(session, clock, request.min_wait)? {
        Stability::Stable { after } => {
            info!("UI stabilized after {:.2}s", after.as_secs_f64());
        }
        Stability::TimedOut => {
            info!("UI did not stabilize (timeout reached), taking final screenshot");
        }
    }

    session.save_frame(&request.output)
}
