//! Browser session management over the Chrome DevTools Protocol.
//!
//! [`CdpSession`] launches an isolated headless Chrome (via the
//! `headless_chrome` crate), owns the browser/tab pair for one capture
//! invocation, and tears the process down when closed. The [`RenderSession`]
//! trait is the seam the capture routine drives, so failure handling and the
//! teardown invariant can be tested without a real browser.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};

use crate::config::{CaptureConfig, ENV_DRIVER_BIN};
use crate::stability::FrameSource;
use crate::{Error, Result};

/// A live rendering session for one capture invocation
pub trait RenderSession {
    /// Navigate to a URL and wait for structural navigation to complete
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Block until `document.readyState` reports "complete", bounded by `timeout`
    fn wait_ready(&mut self, timeout: Duration) -> Result<()>;

    /// Capture the current frame as encoded PNG bytes
    fn grab_frame(&mut self) -> Result<Vec<u8>>;

    /// Capture the current frame and persist it at `path`
    fn save_frame(&mut self, path: &Path) -> Result<()>;

    /// Release the session. Must be safe to call exactly once on every exit
    /// path; later calls are no-ops.
    fn close(&mut self) -> Result<()>;
}

// Every session doubles as the frame source for the stability loop.
impl<S: RenderSession> FrameSource for S {
    fn grab_frame(&mut self) -> Result<Vec<u8>> {
        RenderSession::grab_frame(self)
    }
}

/// CDP-backed session over a headless Chrome instance
pub struct CdpSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl CdpSession {
    /// Launch a headless browser configured for unattended capture: fixed
    /// viewport, GPU and sandbox disabled, insecure certificates accepted so
    /// self-signed test endpoints do not abort navigation.
    pub fn launch(config: &CaptureConfig, timeout: Duration) -> Result<Self> {
        if let Some(driver) = &config.driver_bin {
            warn!(
                "{} is set ({}) but the CDP backend drives the browser directly; ignoring it",
                ENV_DRIVER_BIN,
                driver.display()
            );
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .ignore_certificate_errors(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .path(config.browser_bin.clone())
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| Error::LaunchError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::LaunchError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::LaunchError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(timeout);

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }
}

impl RenderSession for CdpSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        Ok(())
    }

    fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let eval = self
                .tab
                .evaluate("document.readyState", false)
                .map_err(|e| Error::LoadError(format!("readyState query failed: {}", e)))?;

            if eval.value.as_ref().and_then(|v| v.as_str()) == Some("complete") {
                debug!("document ready after {:.2}s", start.elapsed().as_secs_f64());
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(Error::ReadyTimeout(timeout.as_secs()));
            }
            std::thread::sleep(Duration::from_millis(500));
        }
    }

    fn grab_frame(&mut self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))
    }

    fn save_frame(&mut self, path: &Path) -> Result<()> {
        let png = RenderSession::grab_frame(self)?;
        std::fs::write(path, &png)
            .map_err(|e| Error::SaveError(format!("{}: {}", path.display(), e)))
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the Browser terminates the child Chrome process and all
        // of its tabs.
        if let Some(browser) = self.browser.take() {
            drop(browser);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_session_launch() {
        let config = CaptureConfig {
            viewport: Viewport { width: 800, height: 600 },
            ..Default::default()
        };
        let mut session =
            CdpSession::launch(&config, Duration::from_secs(30)).expect("Failed to launch browser");
        session.close().unwrap();
    }
}
