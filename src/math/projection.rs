//! View and projection matrix builders.
//!
//! All builders are right-handed: the camera looks down its local `-Z`.

use crate::math::angle::Angle;
use crate::math::mat4::Mat4;
use crate::math::quat::Quat;
use crate::math::vec3::Vec3;

/// The clip-space depth range a projection maps the near and far planes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthRange {
    /// OpenGL convention: near plane at `-1`, far plane at `+1`.
    #[default]
    NegativeOneToOne,
    /// Direct3D / wgpu convention: near plane at `0`, far plane at `1`.
    ZeroToOne,
}

/// View matrix for an eye at `eye` looking at `target`.
///
/// `up` only needs to be roughly up; it must not be parallel to the view
/// direction.
#[rustfmt::skip]
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let up = up.normalised();
    let f = (target - eye).normalised();
    let s = f.cross(up).normalised();
    let u = s.cross(f);

    Mat4::new(
        s.x, s.y, s.z, -s.dot(eye),
        u.x, u.y, u.z, -u.dot(eye),
        -f.x, -f.y, -f.z, f.dot(eye),
        0.0, 0.0, 0.0, 1.0,
    )
}

/// View matrix from a world-space position and orientation, optionally
/// followed by a reflection (for mirrored views).
pub fn view_from_orientation(position: Vec3, orientation: Quat, reflect: Option<&Mat4>) -> Mat4 {
    let rot_t = orientation.to_rotation_matrix().transpose();
    let translation = -(rot_t * position);

    let mut view = Mat4::from_mat3(&rot_t);
    view.set_translation(translation);

    match reflect {
        Some(reflection) => view * *reflection,
        None => view,
    }
}

/// Right-handed perspective projection.
///
/// Inputs are not validated here; [`Lens`](crate::camera::Lens) does that.
pub fn perspective(
    vertical_fov: impl Angle,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    depth: DepthRange,
) -> Mat4 {
    let tan_half_fov = (vertical_fov.as_radians().value() * 0.5).tan();

    let mut out = Mat4::ZERO;
    out.m[0][0] = 1.0 / (aspect_ratio * tan_half_fov);
    out.m[1][1] = 1.0 / tan_half_fov;
    out.m[3][2] = -1.0;
    match depth {
        DepthRange::NegativeOneToOne => {
            out.m[2][2] = (far + near) / (near - far);
            out.m[2][3] = 2.0 * far * near / (near - far);
        }
        DepthRange::ZeroToOne => {
            out.m[2][2] = far / (near - far);
            out.m[2][3] = far * near / (near - far);
        }
    }
    out
}

/// Right-handed orthographic projection of the given view volume.
pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    depth: DepthRange,
) -> Mat4 {
    let inv_width = 1.0 / (right - left);
    let inv_height = 1.0 / (top - bottom);
    let inv_distance = 1.0 / (far - near);

    let mut out = Mat4::IDENTITY;
    out.m[0][0] = 2.0 * inv_width;
    out.m[0][3] = -(right + left) * inv_width;
    out.m[1][1] = 2.0 * inv_height;
    out.m[1][3] = -(top + bottom) * inv_height;
    match depth {
        DepthRange::NegativeOneToOne => {
            out.m[2][2] = -2.0 * inv_distance;
            out.m[2][3] = -(far + near) * inv_distance;
        }
        DepthRange::ZeroToOne => {
            out.m[2][2] = -inv_distance;
            out.m[2][3] = -near * inv_distance;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle::{Degree, Radian};
    use approx::assert_abs_diff_eq;

    fn depth_of(projection: &Mat4, view_z: f32) -> f32 {
        projection.transform_coord(Vec3::new(0.0, 0.0, view_z)).z
    }

    #[test]
    fn perspective_gl_maps_near_and_far() {
        let p = perspective(Degree(45.0), 4.0 / 3.0, 0.1, 100.0, DepthRange::NegativeOneToOne);
        assert_abs_diff_eq!(depth_of(&p, -0.1), -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(depth_of(&p, -100.0), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn perspective_sixty_degree_square_viewport() {
        let p = perspective(Degree(60.0), 1.0, 0.1, 100.0, DepthRange::NegativeOneToOne);
        assert_abs_diff_eq!(depth_of(&p, -0.1), -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(depth_of(&p, -100.0), 1.0, epsilon = 1e-4);

        let focal = 1.0 / (30.0f32).to_radians().tan();
        assert_abs_diff_eq!(p.m[0][0], focal, epsilon = 1e-5);
        assert_abs_diff_eq!(p.m[1][1], focal, epsilon = 1e-5);
        assert_eq!(p.m[3], [0.0, 0.0, -1.0, 0.0]);
    }

    #[test]
    fn perspective_zero_to_one_maps_near_and_far() {
        let p = perspective(Degree(60.0), 1.0, 0.5, 40.0, DepthRange::ZeroToOne);
        assert_abs_diff_eq!(depth_of(&p, -0.5), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(depth_of(&p, -40.0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_matches_glam() {
        let ours = perspective(Radian(0.8), 1.5, 0.01, 40.0, DepthRange::NegativeOneToOne);
        let theirs = glam::Mat4::perspective_rh_gl(0.8, 1.5, 0.01, 40.0);
        let ours = glam::Mat4::from_cols_array(&ours.to_cols_array());
        assert!(ours.abs_diff_eq(theirs, 1e-5));

        let ours = perspective(Radian(0.8), 1.5, 0.01, 40.0, DepthRange::ZeroToOne);
        let theirs = glam::Mat4::perspective_rh(0.8, 1.5, 0.01, 40.0);
        let ours = glam::Mat4::from_cols_array(&ours.to_cols_array());
        assert!(ours.abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn orthographic_maps_near_and_far() {
        let gl = orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 11.0, DepthRange::NegativeOneToOne);
        assert_abs_diff_eq!(depth_of(&gl, -1.0), -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(depth_of(&gl, -11.0), 1.0, epsilon = 1e-6);
        assert!(
            gl.transform_coord(Vec3::new(2.0, 1.0, -5.0))
                .abs_diff_eq(Vec3::new(1.0, 1.0, -0.2), 1e-6)
        );

        let dx = orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 11.0, DepthRange::ZeroToOne);
        assert_abs_diff_eq!(depth_of(&dx, -1.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(depth_of(&dx, -11.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let view = look_at(eye, Vec3::ZERO, Vec3::UNIT_Y);
        let target_in_view = view.transform_coord(Vec3::ZERO);
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -eye.length()), 1e-5));

        let theirs = glam::Mat4::look_at_rh(
            glam::Vec3::new(3.0, 4.0, 5.0),
            glam::Vec3::ZERO,
            glam::Vec3::Y,
        );
        let ours = glam::Mat4::from_cols_array(&view.to_cols_array());
        assert!(ours.abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn view_from_orientation_inverts_camera_pose() {
        let position = Vec3::new(1.0, -2.0, 4.0);
        let orientation = Quat::from_yaw_pitch(Degree(30.0), Degree(-10.0));
        let view = view_from_orientation(position, orientation, None);
        let camera_to_world = Mat4::from_transform(position, Vec3::ONE, orientation);
        assert!((view * camera_to_world).abs_diff_eq(&Mat4::IDENTITY, 1e-5));

        let mirror = Mat4::mirror(crate::math::vec4::Vec4::new(0.0, 1.0, 0.0, 0.0));
        let reflected = view_from_orientation(position, orientation, Some(&mirror));
        assert!(reflected.abs_diff_eq(&(view * mirror), 0.0));
    }
}
