//! Geographic coordinates and their placement on a sphere.
//!
//! Latitude/longitude pairs are mapped onto a sphere of arbitrary radius
//! with [`project`]. The same convention drives the globe mesh UVs, the
//! camera orbit angles and the inverse mapping in [`unproject`], so a point
//! projected here lands on the matching texel of an equirectangular map.

mod coordinate;
mod projection;

pub use coordinate::GeoCoordinate;
pub use projection::{SurfacePlacement, UP, project, spherical_direction, unproject};
