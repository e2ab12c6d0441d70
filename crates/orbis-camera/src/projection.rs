//! Perspective projection with reverse-Z.

use glam::{Mat4, Vec2, Vec3};

use crate::ray::Ray;

/// Perspective parameters for the orbit camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveProjection {
    /// Reverse-Z: the near plane maps to depth 1 and the far plane to 0.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Update the aspect ratio; zero-sized surfaces are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl Default for PerspectiveProjection {
    fn default() -> Self {
        Self {
            fov_y: 42.0_f32.to_radians(),
            aspect_ratio: 16.0 / 10.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Ray from `eye` through a pixel of a `viewport`-sized surface.
///
/// `cursor` is in pixels with the origin at the top-left corner.
pub fn screen_ray(eye: Vec3, view_proj: Mat4, cursor: Vec2, viewport: Vec2) -> Ray {
    let size = viewport.max(Vec2::ONE);
    let ndc = Vec2::new(2.0 * cursor.x / size.x - 1.0, 1.0 - 2.0 * cursor.y / size.y);
    // Depth 1 is the near plane under reverse-Z.
    let on_near = view_proj.inverse().project_point3(ndc.extend(1.0));
    Ray::new(eye, on_near - eye)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_z_depth_range() {
        let proj = PerspectiveProjection::default();
        let m = proj.matrix();
        let near = m.project_point3(Vec3::new(0.0, 0.0, -proj.near));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -proj.far));
        assert!((near.z - 1.0).abs() < 1e-4, "near depth {}", near.z);
        assert!(far.z.abs() < 1e-4, "far depth {}", far.z);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let eye = Vec3::new(0.0, 0.0, 5.5);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = PerspectiveProjection::default();
        let ray = screen_ray(eye, proj.matrix() * view, Vec2::new(640.0, 400.0), Vec2::new(1280.0, 800.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4, "{:?}", ray.direction);
        assert_eq!(ray.origin, eye);
    }

    #[test]
    fn test_top_left_ray_points_up_and_left() {
        let eye = Vec3::new(0.0, 0.0, 5.5);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = PerspectiveProjection::default();
        let ray = screen_ray(eye, proj.matrix() * view, Vec2::ZERO, Vec2::new(1280.0, 800.0));
        assert!(ray.direction.x < 0.0 && ray.direction.y > 0.0);
        let half_fov = (ray.direction.y / -ray.direction.z).atan();
        assert!((half_fov - proj.fov_y / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_viewport_ignored() {
        let mut proj = PerspectiveProjection::default();
        proj.set_viewport(0.0, 100.0);
        assert_eq!(proj.aspect_ratio, 16.0 / 10.0);
        proj.set_viewport(1920.0, 1080.0);
        assert!((proj.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
