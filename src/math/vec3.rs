use crate::math::angle::Radian;
use crate::math::quat::Quat;
use crate::math::scalar::{EPSILON, PI, max_element};

/// A three-component vector: positions, directions, scale factors and colors.
///
/// Equality (`==`) is exact. Use [`Vec3::approx_eq`] or
/// [`Vec3::abs_diff_eq`] to compare computed values.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const UNIT_X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    pub const NEGATIVE_UNIT_X: Vec3 = Vec3::new(-1.0, 0.0, 0.0);
    pub const NEGATIVE_UNIT_Y: Vec3 = Vec3::new(0.0, -1.0, 0.0);
    pub const NEGATIVE_UNIT_Z: Vec3 = Vec3::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Right-handed cross product: `UNIT_Y.cross(UNIT_Z) == UNIT_X`.
    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Unsigned angle between two vectors, in `[0, π]`.
    ///
    /// Evaluated as `atan2(|a × b|, a · b)`, which never leaves the domain of
    /// the inverse trig function and is exactly zero for parallel vectors,
    /// where `acos` of the rounded cosine can overshoot or undershoot one.
    /// When either vector is (near) zero-length the angle is a right angle.
    pub fn angle_between(self, rhs: Vec3) -> Radian {
        if self.length() * rhs.length() < EPSILON {
            return Radian(PI * 0.5);
        }
        Radian(self.cross(rhs).length().atan2(self.dot(rhs)))
    }

    /// Shortest-arc rotation taking `self` onto `dest`.
    ///
    /// When the vectors are opposite, the rotation is a half turn about
    /// `fallback_axis` if it is non-zero, otherwise about an axis
    /// perpendicular to `self`.
    pub fn rotation_to(self, dest: Vec3, fallback_axis: Vec3) -> Quat {
        let v0 = self.normalised();
        let v1 = dest.normalised();
        let d = v0.dot(v1);

        if d >= 1.0 {
            return Quat::IDENTITY;
        }

        if d < EPSILON - 1.0 {
            if fallback_axis != Vec3::ZERO {
                return Quat::from_angle_axis(Radian(PI), fallback_axis);
            }
            let mut axis = Vec3::UNIT_X.cross(self);
            if axis.is_zero_length() {
                axis = Vec3::UNIT_Y.cross(self);
            }
            axis.normalise();
            return Quat::from_angle_axis(Radian(PI), axis);
        }

        let s = ((1.0 + d) * 2.0).sqrt();
        let inv_s = 1.0 / s;
        let c = v0.cross(v1);
        Quat::new(c.x * inv_s, c.y * inv_s, c.z * inv_s, s * 0.5).normalised()
    }

    /// Reflects off a plane with the given unit normal.
    #[inline]
    pub fn reflect(self, normal: Vec3) -> Vec3 {
        self - 2.0 * self.dot(normal) * normal
    }

    /// Projects onto the plane with the given unit normal.
    #[inline]
    pub fn project(self, normal: Vec3) -> Vec3 {
        self - self.dot(normal) * normal
    }

    #[inline]
    pub fn abs(self) -> Vec3 {
        Vec3::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[inline]
    pub fn clamp(self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.x.clamp(min.x, max.x),
            self.y.clamp(min.y, max.y),
            self.z.clamp(min.z, max.z),
        )
    }

    #[inline]
    pub fn max_element(self) -> f32 {
        max_element(self.x, self.y, self.z)
    }

    #[inline]
    pub fn mid_point(self, rhs: Vec3) -> Vec3 {
        (self + rhs) * 0.5
    }

    #[inline]
    pub fn is_zero_length(self) -> bool {
        self.squared_length() < EPSILON * EPSILON
    }
}

impl_vector!(Vec3, 3, x, y, z);
