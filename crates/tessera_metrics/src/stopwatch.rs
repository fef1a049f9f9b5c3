//! High-resolution stopwatch used around system phase calls

use std::time::{Duration, Instant};

/// Measures a single span of wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Return the elapsed time and restart from now.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.start;
        self.start = now;
        elapsed
    }
}

/// Run `f` and return its result together with how long it took.
///
/// The elapsed time is returned even when `f` produces an error value,
/// so callers can record the cost of a failing call before propagating.
pub fn measure<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let watch = Stopwatch::start();
    let result = f();
    (result, watch.elapsed())
}
