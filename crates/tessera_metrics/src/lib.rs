//! Tessera Metrics - timing primitives for the frame loop
//!
//! The ECS runtime wraps every system phase call in a [`Stopwatch`] and
//! stores the result in that system's [`SystemTiming`]. The runtime binary
//! uses [`FrameTimer`] for a rolling fps readout.
//!
//! # Usage
//!
//! ```ignore
//! use tessera_metrics::{measure, SystemTiming};
//!
//! let mut timing = SystemTiming::default();
//! let (_, elapsed) = measure(|| heavy_work());
//! timing.record_update(elapsed);
//! println!("update: {:.3}ms", timing.update_ms());
//! ```

mod frame_timer;
mod ring_buffer;
mod stopwatch;
mod system_timing;

pub use frame_timer::FrameTimer;
pub use ring_buffer::RingBuffer;
pub use stopwatch::{measure, Stopwatch};
pub use system_timing::{SystemPerformance, SystemTiming};

/// Convert a duration to fractional milliseconds.
#[inline]
pub fn duration_ms(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn duration_ms_is_fractional() {
        assert!((duration_ms(Duration::from_micros(1500)) - 1.5).abs() < 1e-9);
        assert_eq!(duration_ms(Duration::ZERO), 0.0);
    }
}
