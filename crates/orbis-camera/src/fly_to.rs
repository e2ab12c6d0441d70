//! Timed camera flight between two orbit states.

use crate::easing::ease_in_out_cubic;
use crate::orbit::OrbitAngles;

/// A cubic-eased interpolation from one set of orbit angles to another.
///
/// Azimuth is expected to be unwrapped already (see
/// [`OrbitAngles::shortest_to`]), so plain interpolation takes the short way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyTo {
    pub from: OrbitAngles,
    pub to: OrbitAngles,
    /// Seconds; always positive.
    pub duration: f32,
    pub elapsed: f32,
}

impl FlyTo {
    /// Non-positive durations are clamped to a single instant.
    pub fn new(from: OrbitAngles, to: OrbitAngles, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Angles at the current progress. Exact at both ends.
    pub fn sample(&self) -> OrbitAngles {
        self.sample_at(self.progress())
    }

    /// Angles at linear progress `t`.
    pub fn sample_at(&self, t: f32) -> OrbitAngles {
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        let e = ease_in_out_cubic(t);
        let mix = |a: f32, b: f32| a * (1.0 - e) + b * e;
        OrbitAngles {
            azimuth: mix(self.from.azimuth, self.to.azimuth),
            polar: mix(self.from.polar, self.to.polar),
            distance: mix(self.from.distance, self.to.distance),
        }
    }
}
