//! Deterministic time system
//!
//! Fixed-rate simulation ticks with interpolation for rendering. The frame
//! loop feeds wall-clock frame durations into a [`FixedTimestep`] and runs
//! one `World::update(dt)` per step it hands back.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;

/// Default cap on steps per frame
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Fixed-step accumulator.
///
/// A slow frame can owe many ticks; anything beyond `max_steps` is dropped
/// so one stall does not snowball into ever longer frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
    tick_count: u64,
}

impl FixedTimestep {
    pub fn new(tick_rate_hz: u32, max_steps: u32) -> Self {
        let hz = tick_rate_hz.max(1);
        Self {
            step: Duration::from_nanos(1_000_000_000 / u64::from(hz)),
            max_steps: max_steps.max(1),
            accumulator: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Add a frame's worth of wall-clock time and return how many fixed
    /// steps to simulate this frame.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;

        let owed = self.accumulator.as_nanos() / self.step.as_nanos();
        let steps = owed.min(u128::from(self.max_steps)) as u32;
        self.accumulator -= self.step * steps;

        if owed > u128::from(steps) {
            tracing::warn!(owed = owed as u64, ran = steps, "dropping simulation ticks");
            // keep only the partial tick for interpolation
            let remainder = self.accumulator.as_nanos() % self.step.as_nanos();
            self.accumulator = Duration::from_nanos(remainder as u64);
        }

        self.tick_count += u64::from(steps);
        steps
    }

    /// Fixed step length in seconds, as passed to `update`.
    pub fn dt(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated time covered by all ticks so far.
    pub fn total_time(&self) -> Duration {
        Duration::from_nanos((self.step.as_nanos() as u64).saturating_mul(self.tick_count))
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ, MAX_STEPS_PER_FRAME)
    }
}
