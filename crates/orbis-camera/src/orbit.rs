//! Orbit controller: drag to rotate, wheel/pinch to zoom, fly-to targets.
//!
//! Input moves a goal; each frame the current angles approach the goal by
//! `1 - (1 - damping)^(dt * 60)`, which matches a fixed per-frame damping at
//! 60 Hz and stays frame-rate independent elsewhere. A running fly-to owns
//! the camera until it finishes or new input cancels it.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};
use orbis_config::CameraConfig;
use orbis_geo::{GeoCoordinate, spherical_direction};

use crate::fly_to::FlyTo;
use crate::projection::{PerspectiveProjection, screen_ray};
use crate::ray::Ray;

/// Multiplicative zoom per wheel line at `zoom_speed = 1`.
const ZOOM_BASE: f32 = 0.95;

/// Camera placement around the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitAngles {
    /// Radians about +Y; same role as `theta` in the surface projection.
    pub azimuth: f32,
    /// Radians from +Y.
    pub polar: f32,
    pub distance: f32,
}

impl OrbitAngles {
    pub const fn new(azimuth: f32, polar: f32, distance: f32) -> Self {
        Self {
            azimuth,
            polar,
            distance,
        }
    }

    /// Angles that put the camera straight above `coord` on a globe spun by
    /// `globe_spin` radians about +Y.
    pub fn above(coord: GeoCoordinate, globe_spin: f32, distance: f32) -> Self {
        Self {
            azimuth: (coord.longitude + 180.0).to_radians() + globe_spin,
            polar: (90.0 - coord.latitude).to_radians(),
            distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        spherical_direction(self.polar, self.azimuth) * self.distance
    }

    /// Copy of `target` whose azimuth is within half a turn of `self`.
    pub fn shortest_to(&self, target: OrbitAngles) -> OrbitAngles {
        let delta = (target.azimuth - self.azimuth + PI).rem_euclid(TAU) - PI;
        OrbitAngles {
            azimuth: self.azimuth + delta,
            ..target
        }
    }
}

/// Distance and polar clamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

impl OrbitLimits {
    pub fn clamp(&self, angles: OrbitAngles) -> OrbitAngles {
        let polar = if angles.polar.is_finite() {
            angles.polar.clamp(self.min_polar, self.max_polar)
        } else {
            self.min_polar
        };
        let distance = if angles.distance.is_finite() {
            angles.distance.clamp(self.min_distance, self.max_distance)
        } else {
            self.max_distance
        };
        let azimuth = if angles.azimuth.is_finite() {
            angles.azimuth
        } else {
            0.0
        };
        OrbitAngles {
            azimuth,
            polar,
            distance,
        }
    }
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 8.0,
            min_polar: 0.2 * PI,
            max_polar: 0.8 * PI,
        }
    }
}

/// Tunables for [`OrbitController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSettings {
    pub limits: OrbitLimits,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub fly_duration: f32,
    pub fly_distance: f32,
    pub projection: PerspectiveProjection,
    pub start: OrbitAngles,
}

impl From<&CameraConfig> for OrbitSettings {
    fn from(c: &CameraConfig) -> Self {
        Self {
            limits: OrbitLimits {
                min_distance: c.min_distance,
                max_distance: c.max_distance,
                min_polar: c.min_polar_frac * PI,
                max_polar: c.max_polar_frac * PI,
            },
            damping: c.damping,
            rotate_speed: c.rotate_speed,
            zoom_speed: c.zoom_speed,
            fly_duration: c.fly_duration,
            fly_distance: c.fly_distance,
            projection: PerspectiveProjection {
                fov_y: c.fov_y_deg.to_radians(),
                aspect_ratio: 16.0 / 10.0,
                near: c.near,
                far: c.far,
            },
            start: OrbitAngles::new(
                c.start_azimuth_deg.to_radians(),
                c.start_polar_deg.to_radians(),
                c.start_distance,
            ),
        }
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

/// Observable camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    /// Coordinate of the last fly-to, cleared by manual input.
    pub target: Option<GeoCoordinate>,
    /// Rate of change over the last update, per second.
    pub velocity: OrbitAngles,
    /// A fly-to is running.
    pub animating: bool,
}

impl CameraState {
    pub fn angles(&self) -> OrbitAngles {
        OrbitAngles::new(self.azimuth, self.polar, self.distance)
    }

    fn set_angles(&mut self, angles: OrbitAngles) {
        self.azimuth = angles.azimuth;
        self.polar = angles.polar;
        self.distance = angles.distance;
    }
}

/// Turns pointer input and fly-to requests into a view matrix.
#[derive(Clone, Debug)]
pub struct OrbitController {
    state: CameraState,
    goal: OrbitAngles,
    flight: Option<FlyTo>,
    settings: OrbitSettings,
}

/// Fraction of the remaining gap closed in `dt` seconds.
pub fn damping_factor(damping: f32, dt: f32) -> f32 {
    1.0 - (1.0 - damping.clamp(0.0, 1.0)).powf(dt * 60.0)
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        let start = settings.limits.clamp(settings.start);
        Self {
            state: CameraState {
                azimuth: start.azimuth,
                polar: start.polar,
                distance: start.distance,
                target: None,
                velocity: OrbitAngles::new(0.0, 0.0, 0.0),
                animating: false,
            },
            goal: start,
            flight: None,
            settings,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn goal(&self) -> OrbitAngles {
        self.goal
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.settings.projection.set_viewport(width, height);
    }

    /// Rotate by a pointer drag in pixels. A drag the full viewport height
    /// turns the camera by `2 * PI * rotate_speed`.
    pub fn orbit(&mut self, drag: Vec2, viewport_height: f32) {
        if drag == Vec2::ZERO || !drag.is_finite() {
            return;
        }
        self.cancel_flight();
        let k = TAU * self.settings.rotate_speed / viewport_height.max(1.0);
        self.goal.azimuth -= drag.x * k;
        self.goal.polar -= drag.y * k;
        self.goal = self.settings.limits.clamp(self.goal);
    }

    /// Zoom by wheel lines; positive moves toward the globe.
    pub fn zoom(&mut self, lines: f32) {
        if lines == 0.0 || !lines.is_finite() {
            return;
        }
        self.cancel_flight();
        self.goal.distance *= ZOOM_BASE.powf(self.settings.zoom_speed * lines);
        self.goal = self.settings.limits.clamp(self.goal);
    }

    /// Start flying to a point above `coord`. Restarts from the current
    /// (possibly mid-flight) state.
    pub fn fly_to(&mut self, coord: GeoCoordinate, globe_spin: f32) {
        let from = self.state.angles();
        let target = OrbitAngles::above(coord, globe_spin, self.settings.fly_distance);
        let to = from.shortest_to(self.settings.limits.clamp(target));

        tracing::debug!(
            lat = coord.latitude,
            lng = coord.longitude,
            azimuth = to.azimuth,
            polar = to.polar,
            "fly-to started"
        );
        self.flight = Some(FlyTo::new(from, to, self.settings.fly_duration));
        self.state.target = Some(coord);
        self.state.animating = true;
    }

    /// Abort a running flight, holding the current angles.
    pub fn cancel_flight(&mut self) {
        if self.flight.take().is_some() {
            tracing::debug!("fly-to cancelled by input");
        }
        self.goal = self.state.angles();
        self.state.animating = false;
        self.state.target = None;
    }

    pub fn flight(&self) -> Option<&FlyTo> {
        self.flight.as_ref()
    }

    /// Advance damping or the running flight by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let before = self.state.angles();

        let next = if let Some(flight) = &mut self.flight {
            flight.advance(dt);
            let angles = flight.sample();
            if flight.is_finished() {
                self.flight = None;
                self.state.animating = false;
            }
            self.goal = angles;
            angles
        } else {
            let f = damping_factor(self.settings.damping, dt);
            let approach = |cur: f32, goal: f32| cur + (goal - cur) * f;
            OrbitAngles {
                azimuth: approach(before.azimuth, self.goal.azimuth),
                polar: approach(before.polar, self.goal.polar),
                distance: approach(before.distance, self.goal.distance),
            }
        };

        let next = self.settings.limits.clamp(next);
        self.state.set_angles(next);
        if dt > 0.0 {
            self.state.velocity = OrbitAngles::new(
                (next.azimuth - before.azimuth) / dt,
                (next.polar - before.polar) / dt,
                (next.distance - before.distance) / dt,
            );
        }
    }

    pub fn position(&self) -> Vec3 {
        self.state.angles().position()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.settings.projection.matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray under a cursor position in pixels.
    pub fn pick_ray(&self, cursor: Vec2, viewport: Vec2) -> Ray {
        screen_ray(self.position(), self.view_projection(), cursor, viewport)
    }
}
