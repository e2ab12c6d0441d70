//! Latitude/longitude to sphere-surface placement.
//!
//! With `phi = (90 - lat)` and `theta = (lng + 180)` in radians a point sits at
//! `(-r sin(phi) cos(theta), r cos(phi), r sin(phi) sin(theta))`. The globe
//! mesh is generated from the same mapping with `u = (lng + 180) / 360` and
//! `v = (90 - lat) / 180`.

use glam::{Mat4, Quat, Vec3};

use crate::GeoCoordinate;

/// Local "up" of anything placed on the surface.
pub const UP: Vec3 = Vec3::Y;

/// Where and how an object sits on the sphere.
///
/// Derived on demand from a [`GeoCoordinate`]; never stored as the source of
/// truth for a location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePlacement {
    pub position: Vec3,
    /// Outward unit normal, equal to `position.normalize()`.
    pub normal: Vec3,
    /// Rotates [`UP`] onto `normal` along the shortest arc.
    pub orientation: Quat,
}

impl SurfacePlacement {
    /// Local-to-parent transform for an object authored with +Y as up.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}

/// Unit direction for the spherical angles `phi` (polar, from +Y) and
/// `theta` (azimuth).
pub fn spherical_direction(phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(-sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Place `coord` on a sphere of `radius`, lifted `surface_offset` along the
/// outward normal.
pub fn project(coord: GeoCoordinate, radius: f32, surface_offset: f32) -> SurfacePlacement {
    let phi = (90.0 - coord.latitude).to_radians();
    let theta = (coord.longitude + 180.0).to_radians();

    let normal = spherical_direction(phi, theta).normalize();
    let position = normal * (radius + surface_offset);
    let orientation = Quat::from_rotation_arc(UP, normal);

    SurfacePlacement {
        position,
        normal,
        orientation,
    }
}

/// Recover the coordinate of a point relative to the sphere center.
///
/// Longitude is returned in `(-180, 180]`. At the poles longitude is
/// arbitrary and comes back as whatever `atan2` yields.
pub fn unproject(position: Vec3) -> GeoCoordinate {
    let dir = position.normalize_or(UP);
    let latitude = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
    let theta = dir.z.atan2(-dir.x).to_degrees();
    let mut longitude = theta - 180.0;
    if longitude <= -180.0 {
        longitude += 360.0;
    }
    GeoCoordinate::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_prime_meridian_equator_sits_on_positive_x() {
        let p = project(GeoCoordinate::new(0.0, 0.0), 2.0, 0.0);
        assert!(approx(p.position, Vec3::new(2.0, 0.0, 0.0)), "got {:?}", p.position);
    }

    #[test]
    fn test_antimeridian_equator_sits_on_negative_x() {
        let east = project(GeoCoordinate::new(0.0, 180.0), 2.0, 0.0);
        let west = project(GeoCoordinate::new(0.0, -180.0), 2.0, 0.0);
        assert!(approx(east.position, Vec3::new(-2.0, 0.0, 0.0)), "got {:?}", east.position);
        assert!(approx(west.position, Vec3::new(-2.0, 0.0, 0.0)), "got {:?}", west.position);
    }

    #[test]
    fn test_poles() {
        let north = project(GeoCoordinate::new(90.0, 33.0), 1.5, 0.0);
        let south = project(GeoCoordinate::new(-90.0, -71.0), 1.5, 0.0);
        assert!(approx(north.position, Vec3::new(0.0, 1.5, 0.0)));
        assert!(approx(south.position, Vec3::new(0.0, -1.5, 0.0)));
        assert!(approx(south.orientation * UP, Vec3::NEG_Y));
    }

    #[test]
    fn test_east_is_positive_longitude() {
        // 90 E on the equator: theta = 270 degrees.
        let p = project(GeoCoordinate::new(0.0, 90.0), 1.0, 0.0);
        assert!(approx(p.position, Vec3::new(0.0, 0.0, -1.0)), "got {:?}", p.position);
    }

    #[test]
    fn test_surface_offset_lifts_along_normal() {
        let base = project(GeoCoordinate::new(35.0, 139.0), 2.0, 0.0);
        let lifted = project(GeoCoordinate::new(35.0, 139.0), 2.0, 0.005);
        assert!((lifted.position.length() - 2.005).abs() < EPS);
        assert!(approx(lifted.position - base.position, base.normal * 0.005));
    }

    #[test]
    fn test_transform_maps_local_up_to_normal() {
        let p = project(GeoCoordinate::new(-12.0, 77.0), 2.0, 0.0);
        let tip = p.transform().transform_point3(Vec3::new(0.0, 0.25, 0.0));
        assert!(approx(tip, p.position + p.normal * 0.25));
    }

    #[test]
    fn test_unproject_matches_known_points() {
        let c = unproject(Vec3::new(2.0, 0.0, 0.0));
        assert!(c.latitude.abs() < EPS && c.longitude.abs() < EPS, "got {c:?}");
        let c = unproject(Vec3::new(-3.0, 0.0, 0.0));
        assert!((c.longitude - 180.0).abs() < EPS, "got {c:?}");
        let c = unproject(Vec3::new(0.0, 0.0, -1.0));
        assert!((c.longitude - 90.0).abs() < EPS, "got {c:?}");
    }

    fn coordinate() -> impl Strategy<Value = GeoCoordinate> {
        (-90.0f32..=90.0, -180.0f32..=180.0).prop_map(|(lat, lng)| GeoCoordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_position_has_requested_length(c in coordinate(), r in 0.1f32..100.0, off in 0.0f32..0.5) {
            let p = project(c, r, off);
            prop_assert!((p.position.length() - (r + off)).abs() < 1e-3 * (r + off));
        }

        #[test]
        fn prop_normal_is_normalized_position(c in coordinate(), r in 0.1f32..100.0) {
            let p = project(c, r, 0.0);
            prop_assert!((p.normal.length() - 1.0).abs() < EPS);
            prop_assert!(approx(p.normal, p.position.normalize()));
        }

        #[test]
        fn prop_orientation_maps_up_to_normal(c in coordinate()) {
            let p = project(c, 2.0, 0.0);
            prop_assert!(approx(p.orientation * UP, p.normal));
        }

        #[test]
        fn prop_dateline_is_seamless(lat in -90.0f32..=90.0) {
            let east = project(GeoCoordinate::new(lat, 180.0), 2.0, 0.0);
            let west = project(GeoCoordinate::new(lat, -180.0), 2.0, 0.0);
            prop_assert!(approx(east.position, west.position));
        }

        #[test]
        fn prop_small_steps_move_little(c in coordinate(), d_lat in -0.01f32..0.01, d_lng in -0.01f32..0.01) {
            let a = project(c, 2.0, 0.0);
            let b = project(GeoCoordinate::new(c.latitude + d_lat, c.longitude + d_lng), 2.0, 0.0);
            // 0.02 degrees of arc on a radius-2 sphere is under 1e-3 units.
            prop_assert!((a.position - b.position).length() < 1e-3);
        }

        #[test]
        fn prop_unproject_inverts_project(lat in -89.0f32..=89.0, lng in -179.9f32..=180.0) {
            let p = project(GeoCoordinate::new(lat, lng), 2.0, 0.0);
            let back = unproject(p.position);
            prop_assert!((back.latitude - lat).abs() < 1e-2, "lat {} vs {}", back.latitude, lat);
            prop_assert!((back.longitude - lng).abs() < 1e-2, "lng {} vs {}", back.longitude, lng);
        }
    }
}
