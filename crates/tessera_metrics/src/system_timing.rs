//! Per-system phase timings
//!
//! Unlike an accumulating profiler, a [`SystemTiming`] only ever holds the
//! most recent frame: each record call overwrites the previous value.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::duration_ms;

/// Last-frame cost of one system's update and render calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTiming {
    update: Duration,
    render: Duration,
}

impl SystemTiming {
    pub fn record_update(&mut self, elapsed: Duration) {
        self.update = elapsed;
    }

    pub fn record_render(&mut self, elapsed: Duration) {
        self.render = elapsed;
    }

    pub fn update(&self) -> Duration {
        self.update
    }

    pub fn render(&self) -> Duration {
        self.render
    }

    pub fn update_ms(&self) -> f64 {
        duration_ms(self.update)
    }

    pub fn render_ms(&self) -> f64 {
        duration_ms(self.render)
    }
}

/// Read-only performance row handed to observability tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPerformance {
    pub name: String,
    pub update_time_ms: f64,
    pub render_time_ms: f64,
}

impl SystemPerformance {
    pub fn new(name: impl Into<String>, timing: &SystemTiming) -> Self {
        Self {
            name: name.into(),
            update_time_ms: timing.update_ms(),
            render_time_ms: timing.render_ms(),
        }
    }

    pub fn total_time_ms(&self) -> f64 {
        self.update_time_ms + self.render_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_overwrite_previous_frame() {
        let mut timing = SystemTiming::default();
        timing.record_update(Duration::from_millis(8));
        timing.record_update(Duration::from_millis(3));
        assert_eq!(timing.update(), Duration::from_millis(3));
        assert_eq!(timing.render(), Duration::ZERO);
    }

    #[test]
    fn performance_row_converts_to_ms() {
        let mut timing = SystemTiming::default();
        timing.record_update(Duration::from_micros(2500));
        timing.record_render(Duration::from_micros(500));

        let row = SystemPerformance::new("physics", &timing);
        assert_eq!(row.name, "physics");
        assert!((row.update_time_ms - 2.5).abs() < 1e-9);
        assert!((row.render_time_ms - 0.5).abs() < 1e-9);
        assert!((row.total_time_ms() - 3.0).abs() < 1e-9);
    }
}
