//! Variable-step frame clock.
//!
//! The globe animates on wall-clock time, so each frame gets the real
//! elapsed time, clamped so a stall (window drag, breakpoint) does not
//! fling the camera or skip the pulse animation forward.

use std::time::{Duration, Instant};

use tracing::warn;

/// Longest step handed to the scene, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

#[derive(Debug)]
pub struct FrameClock {
    previous: Instant,
    frame_count: u64,
    total_time: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            frame_count: 0,
            total_time: 0.0,
        }
    }

    /// Measure the time since the last tick and return the clamped step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous);
        self.previous = now;
        self.advance(frame_time)
    }

    /// Account for one frame of `frame_time` and return the step to use.
    pub fn advance(&mut self, frame_time: Duration) -> f32 {
        let mut dt = frame_time.as_secs_f32();
        if dt > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            dt = MAX_FRAME_TIME;
        }
        self.frame_count += 1;
        self.total_time += dt as f64;
        dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of the clamped steps.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}

/// Time between frames for a target rate, or `None` when uncapped.
pub fn frame_interval(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / target_fps as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_passes_small_steps_through() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_advance_clamps_stalls() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(Duration::from_secs(3));
        assert_eq!(dt, MAX_FRAME_TIME);
        assert!((clock.total_time() - MAX_FRAME_TIME as f64).abs() < 1e-9);
    }

    #[test]
    fn test_total_time_accumulates() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            clock.advance(Duration::from_millis(100));
        }
        assert_eq!(clock.frame_count(), 10);
        assert!((clock.total_time() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_step_is_allowed() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(0), None);
        let interval = frame_interval(60).unwrap();
        assert!((interval.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }
}
