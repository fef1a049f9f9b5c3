//! Frame timing utilities

use super::ring_buffer::RingBuffer;
use crate::duration_ms;
use std::time::{Duration, Instant};

/// Rolling frame-time tracker for the main loop.
pub struct FrameTimer {
    frame_start: Instant,
    frame_times: RingBuffer,
    frames: u64,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_times: RingBuffer::new(window),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Close the current frame and return its duration.
    pub fn end(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        self.frame_times.push(elapsed);
        self.frames += 1;
        elapsed
    }

    /// Total frames closed with [`end`](Self::end).
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_times.average().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        duration_ms(self.frame_times.average())
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.frame_times.min_max();
        (duration_ms(min), duration_ms(max))
    }
}
