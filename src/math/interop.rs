//! Conversions to and from [`glam`] types.
//!
//! glam stores matrices column-major, so matrix conversions transpose.
//! Everything else is a field-for-field copy.

use crate::math::mat3::Mat3;
use crate::math::mat4::Mat4;
use crate::math::quat::Quat;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

macro_rules! impl_vector_interop {
    ($ours:ident, $theirs:ty, $($f:ident),+) => {
        impl From<$theirs> for $ours {
            #[inline]
            fn from(v: $theirs) -> Self {
                $ours::new($(v.$f),+)
            }
        }

        impl From<$ours> for $theirs {
            #[inline]
            fn from(v: $ours) -> Self {
                <$theirs>::new($(v.$f),+)
            }
        }
    };
}

impl_vector_interop!(Vec2, glam::Vec2, x, y);
impl_vector_interop!(Vec3, glam::Vec3, x, y, z);
impl_vector_interop!(Vec4, glam::Vec4, x, y, z, w);

impl From<glam::Quat> for Quat {
    #[inline]
    fn from(q: glam::Quat) -> Self {
        Quat::new(q.x, q.y, q.z, q.w)
    }
}

impl From<Quat> for glam::Quat {
    #[inline]
    fn from(q: Quat) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<glam::Mat3> for Mat3 {
    fn from(m: glam::Mat3) -> Self {
        Mat3::from_cols(m.x_axis.into(), m.y_axis.into(), m.z_axis.into())
    }
}

impl From<Mat3> for glam::Mat3 {
    fn from(m: Mat3) -> Self {
        glam::Mat3::from_cols(m.col(0).into(), m.col(1).into(), m.col(2).into())
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_data(m.to_cols_array()).transpose()
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle::Radian;

    #[test]
    fn matrices_keep_their_meaning() {
        let ours = Mat4::from_transform(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(2.0, 1.0, 0.5),
            Quat::from_rotation_x(Radian(0.6)),
        );
        let theirs: glam::Mat4 = ours.into();
        let p = Vec3::new(-1.0, 4.0, 2.0);
        let by_glam: Vec3 = theirs.transform_point3(p.into()).into();
        assert!(by_glam.abs_diff_eq(ours.transform_coord(p), 1e-5));
        assert_eq!(Mat4::from(theirs), ours);
    }

    #[test]
    fn glam_transform_matches_ours() {
        let rotation = glam::Quat::from_rotation_y(0.9);
        let theirs = glam::Mat4::from_scale_rotation_translation(
            glam::Vec3::new(1.0, 2.0, 3.0),
            rotation,
            glam::Vec3::new(-5.0, 0.0, 2.0),
        );
        let ours = Mat4::from_transform(
            Vec3::new(-5.0, 0.0, 2.0),
            Vec3::new(1.0, 2.0, 3.0),
            rotation.into(),
        );
        assert!(ours.abs_diff_eq(&theirs.into(), 1e-6));
    }

    #[test]
    fn rotations_agree() {
        let q = Quat::from_rotation_y(Radian(1.3));
        let m3: glam::Mat3 = q.to_rotation_matrix().into();
        let glam_q: glam::Quat = q.into();
        assert!(m3.abs_diff_eq(glam::Mat3::from_quat(glam_q), 1e-6));
        assert_eq!(Mat3::from(m3), q.to_rotation_matrix());
    }
}
