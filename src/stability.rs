//! Visual stability detection.
//!
//! A page is considered "settled" once two consecutive sampled frames are
//! byte-identical. The polling loop is parameterized by a [`Clock`] and a
//! [`FrameSource`] so the timing semantics can be tested against a fake clock
//! without wall-clock sleeps.

use std::time::{Duration, Instant};

use crate::Result;

/// Cadence of the stability polling loop
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default ceiling on how long the loop waits for stability. A larger
/// minimum-dwell extends the window; nothing shrinks it below this floor.
pub const STABILITY_WINDOW: Duration = Duration::from_secs(10);

/// Time source for the polling loop
pub trait Clock {
    /// Reset the epoch; `elapsed` is measured from the last restart
    fn restart(&mut self);

    /// Time elapsed since the last restart
    fn elapsed(&self) -> Duration;

    /// Block for the given duration
    fn sleep(&mut self, dur: Duration);
}

/// Wall-clock implementation of [`Clock`]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn restart(&mut self) {
        self.start = Instant::now();
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Source of render samples. Samples are opaque encoded frames compared only
/// for byte equality against the immediately preceding sample.
pub trait FrameSource {
    fn grab_frame(&mut self) -> Result<Vec<u8>>;
}

/// Outcome of a stability wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// Two consecutive samples matched after the given elapsed time
    Stable { after: Duration },
    /// The window elapsed without consecutive matching samples
    TimedOut,
}

/// The window the loop is allowed to run for: `max(10s, min_wait)`.
pub fn stability_window(min_wait: Duration) -> Duration {
    STABILITY_WINDOW.max(min_wait)
}

/// Poll `source` every [`POLL_INTERVAL`] until two consecutive samples are
/// identical and at least `min_wait` has elapsed, or until the window from
/// [`stability_window`] runs out.
///
/// The minimum dwell guards against false-positive stability on pages that
/// briefly pause mid-animation: matching samples before `min_wait` keep the
/// loop going rather than declaring stability.
pub fn wait_for_stability<S, C>(
    source: &mut S,
    clock: &mut C,
    min_wait: Duration,
) -> Result<Stability>
where
    S: FrameSource + ?Sized,
    C: Clock,
{
    let window = stability_window(min_wait);
    let mut last_sample: Option<Vec<u8>> = None;

    clock.restart();
    loop {
        let elapsed = clock.elapsed();
        // The tick at the window boundary still samples: when the dwell
        // equals the window, a page that held steady the whole time gets to
        // be declared stable rather than timed out.
        let final_tick = elapsed >= window;

        let sample = source.grab_frame()?;
        match &last_sample {
            Some(previous) if *previous == sample => {
                if elapsed >= min_wait {
                    return Ok(Stability::Stable { after: elapsed });
                }
            }
            _ => last_sample = Some(sample),
        }

        if final_tick {
            return Ok(Stability::TimedOut);
        }
        clock.sleep(POLL_INTERVAL);
    }
}
