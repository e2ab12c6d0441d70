//! Orbit camera, fly-to animation and pointer picking.
//!
//! The camera circles the globe center at `(azimuth, polar, distance)` using
//! the same spherical convention as [`orbis_geo::project`], so flying to a
//! coordinate is a direct angle lookup.

pub mod easing;
pub mod fly_to;
pub mod orbit;
pub mod picking;
pub mod projection;
pub mod ray;

pub use fly_to::FlyTo;
pub use orbit::{CameraState, OrbitAngles, OrbitController, OrbitLimits, OrbitSettings};
pub use picking::pick_nearest;
pub use projection::PerspectiveProjection;
pub use ray::{Capsule, Ray, intersect_capsule, intersect_sphere};
