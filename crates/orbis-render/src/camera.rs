//! Camera uniform shared by every globe pass (bind group 0).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use static_assertions::const_assert_eq;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position in world space.
    pub position: [f32; 4],
    /// xyz = camera right, yzw unused; used to face billboards.
    pub right: [f32; 4],
    /// xyz = camera up.
    pub up: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<CameraUniform>(), 112);

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4, eye: Vec3) -> Self {
        // Rows of the view rotation are the camera axes in world space.
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            position: eye.extend(1.0).to_array(),
            right: right.extend(0.0).to_array(),
            up: up.extend(0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_axes_from_view() {
        let eye = Vec3::new(0.0, 0.0, 5.5);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let u = CameraUniform::new(view, Mat4::IDENTITY, eye);
        assert!((Vec3::from_slice(&u.right[..3]) - Vec3::X).length() < 1e-6);
        assert!((Vec3::from_slice(&u.up[..3]) - Vec3::Y).length() < 1e-6);
        assert_eq!(u.position, [0.0, 0.0, 5.5, 1.0]);
    }

    #[test]
    fn test_axes_follow_orbit() {
        let eye = Vec3::new(5.5, 0.0, 0.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let u = CameraUniform::new(view, Mat4::IDENTITY, eye);
        // Looking down -X, right is -Z.
        assert!((Vec3::from_slice(&u.right[..3]) - Vec3::NEG_Z).length() < 1e-6);
    }
}
