//! Orientation as a Hamilton quaternion.
//!
//! A [`Quat`] is only a pure rotation while it has unit length. Products
//! drift away from unit length over many compositions; nothing here
//! renormalises behind your back, so long-running accumulators should call
//! [`Quat::normalise`] every few steps:
//!
//! ```
//! use orrery::{Quat, Radian, Vec3};
//!
//! let step = Quat::from_angle_axis(Radian(0.01), Vec3::UNIT_Y);
//! let mut orientation = Quat::IDENTITY;
//! for frame in 0..1000 {
//!     orientation = step * orientation;
//!     if frame % 16 == 0 {
//!         orientation.normalise();
//!     }
//! }
//! assert!((orientation.norm() - 1.0).abs() < 1e-4);
//! ```

use std::ops::{Add, Mul, Neg, Sub};

use crate::math::angle::{Angle, Radian};
use crate::math::mat3::Mat3;
use crate::math::scalar::{EPSILON, acos_clamped, asin_clamped};
use crate::math::vec3::Vec3;

/// A quaternion `x·i + y·j + z·k + w`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);
    pub const ZERO: Quat = Quat::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` counter-clockwise about `axis`, which must be unit length.
    pub fn from_angle_axis(angle: impl Angle, axis: Vec3) -> Self {
        let half = angle.as_radians().value() * 0.5;
        let (sin, cos) = half.sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    #[inline]
    pub fn from_rotation_x(angle: impl Angle) -> Self {
        Self::from_angle_axis(angle, Vec3::UNIT_X)
    }

    #[inline]
    pub fn from_rotation_y(angle: impl Angle) -> Self {
        Self::from_angle_axis(angle, Vec3::UNIT_Y)
    }

    #[inline]
    pub fn from_rotation_z(angle: impl Angle) -> Self {
        Self::from_angle_axis(angle, Vec3::UNIT_Z)
    }

    /// Yaw about world Y, then pitch about the yawed X axis.
    ///
    /// With both angles zero the rotated `-Z` axis is the view direction.
    pub fn from_yaw_pitch(yaw: impl Angle, pitch: impl Angle) -> Self {
        Self::from_rotation_y(yaw) * Self::from_rotation_x(pitch)
    }

    /// Builds a quaternion from an orthonormal rotation matrix.
    ///
    /// Uses the trace method (Shoemake), picking the largest diagonal
    /// element when the trace is not positive to stay well conditioned.
    pub fn from_rotation_matrix(rot: &Mat3) -> Self {
        let m = &rot.m;
        let trace = m[0][0] + m[1][1] + m[2][2];

        if trace > 0.0 {
            let root = (trace + 1.0).sqrt();
            let w = 0.5 * root;
            let root = 0.5 / root;
            Self::new(
                (m[2][1] - m[1][2]) * root,
                (m[0][2] - m[2][0]) * root,
                (m[1][0] - m[0][1]) * root,
                w,
            )
        } else {
            const NEXT: [usize; 3] = [1, 2, 0];
            let mut i = 0;
            if m[1][1] > m[0][0] {
                i = 1;
            }
            if m[2][2] > m[i][i] {
                i = 2;
            }
            let j = NEXT[i];
            let k = NEXT[j];

            let root = (m[i][i] - m[j][j] - m[k][k] + 1.0).sqrt();
            let mut xyz = [0.0; 3];
            xyz[i] = 0.5 * root;
            let root = 0.5 / root;
            let w = (m[k][j] - m[j][k]) * root;
            xyz[j] = (m[j][i] + m[i][j]) * root;
            xyz[k] = (m[k][i] + m[i][k]) * root;
            Self::new(xyz[0], xyz[1], xyz[2], w)
        }
    }

    /// Builds a quaternion from three orthonormal axes (the matrix columns).
    pub fn from_axes(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self::from_rotation_matrix(&Mat3::from_cols(x_axis, y_axis, z_axis))
    }

    /// The rotation matrix acting on column vectors.
    pub fn to_rotation_matrix(self) -> Mat3 {
        let tx = self.x + self.x;
        let ty = self.y + self.y;
        let tz = self.z + self.z;
        let twx = tx * self.w;
        let twy = ty * self.w;
        let twz = tz * self.w;
        let txx = tx * self.x;
        let txy = ty * self.x;
        let txz = tz * self.x;
        let tyy = ty * self.y;
        let tyz = tz * self.y;
        let tzz = tz * self.z;

        Mat3::new(
            1.0 - (tyy + tzz),
            txy - twz,
            txz + twy,
            txy + twz,
            1.0 - (txx + tzz),
            tyz - twx,
            txz - twy,
            tyz + twx,
            1.0 - (txx + tyy),
        )
    }

    /// Angle and unit axis of this rotation. The identity reports the X axis.
    pub fn to_angle_axis(self) -> (Radian, Vec3) {
        let sqr_length = self.x * self.x + self.y * self.y + self.z * self.z;
        if sqr_length > 0.0 {
            let angle = acos_clamped(self.w) * 2.0;
            let inv_length = 1.0 / sqr_length.sqrt();
            (
                angle,
                Vec3::new(self.x * inv_length, self.y * inv_length, self.z * inv_length),
            )
        } else {
            (Radian(0.0), Vec3::UNIT_X)
        }
    }

    /// The local X axis after rotation.
    pub fn x_axis(self) -> Vec3 {
        self * Vec3::UNIT_X
    }

    /// The local Y axis after rotation.
    pub fn y_axis(self) -> Vec3 {
        self * Vec3::UNIT_Y
    }

    /// The local Z axis after rotation.
    pub fn z_axis(self) -> Vec3 {
        self * Vec3::UNIT_Z
    }

    #[inline]
    pub fn dot(self, rhs: Quat) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    /// Squared length.
    #[inline]
    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn norm(self) -> f32 {
        self.norm_squared().sqrt()
    }

    /// Normalises in place and returns the previous length.
    /// A zero quaternion is left unchanged.
    pub fn normalise(&mut self) -> f32 {
        let len = self.norm();
        if len >= EPSILON {
            let inv = 1.0 / len;
            self.x *= inv;
            self.y *= inv;
            self.z *= inv;
            self.w *= inv;
        }
        len
    }

    #[inline]
    pub fn normalised(self) -> Quat {
        let mut q = self;
        q.normalise();
        q
    }

    /// Multiplicative inverse, valid for any non-zero quaternion.
    pub fn inverse(self) -> Quat {
        let norm = self.norm_squared();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            Quat::new(-self.x * inv, -self.y * inv, -self.z * inv, self.w * inv)
        } else {
            Quat::ZERO
        }
    }

    /// Inverse of a unit quaternion (its conjugate).
    #[inline]
    pub fn unit_inverse(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotation about the Z axis.
    pub fn roll(self) -> Radian {
        Radian(
            (2.0 * (self.x * self.y + self.w * self.z))
                .atan2(self.w * self.w + self.x * self.x - self.y * self.y - self.z * self.z),
        )
    }

    /// Rotation about the X axis.
    pub fn pitch(self) -> Radian {
        Radian(
            (2.0 * (self.y * self.z + self.w * self.x))
                .atan2(self.w * self.w - self.x * self.x - self.y * self.y + self.z * self.z),
        )
    }

    /// Rotation about the Y axis. Near `±90°` the other two angles become
    /// ambiguous (gimbal lock).
    pub fn yaw(self) -> Radian {
        asin_clamped(-2.0 * (self.x * self.z - self.w * self.y))
    }

    /// Spherical linear interpolation along the shortest path.
    pub fn slerp(t: f32, from: Quat, to: Quat) -> Quat {
        let mut cos = from.dot(to);
        let mut to = to;
        if cos < 0.0 {
            cos = -cos;
            to = -to;
        }

        if cos.abs() < 1.0 - 1e-3 {
            let sin = (1.0 - cos * cos).sqrt();
            let angle = sin.atan2(cos);
            let inv_sin = 1.0 / sin;
            let coeff0 = ((1.0 - t) * angle).sin() * inv_sin;
            let coeff1 = (t * angle).sin() * inv_sin;
            from * coeff0 + to * coeff1
        } else {
            // Nearly parallel: fall back to a normalised lerp.
            Quat::nlerp(t, from, to)
        }
    }

    /// Normalised linear interpolation along the shortest path.
    pub fn nlerp(t: f32, from: Quat, to: Quat) -> Quat {
        let to = if from.dot(to) < 0.0 { -to } else { to };
        (from + (to - from) * t).normalised()
    }

    /// True if both describe the same orientation within `tolerance`,
    /// treating `q` and `-q` as equal.
    pub fn equals(self, rhs: Quat, tolerance: Radian) -> bool {
        let d = self.dot(rhs).abs().min(1.0);
        let angle = acos_clamped(d) * 2.0;
        angle.value().abs() <= tolerance.value()
    }

    #[inline]
    pub fn abs_diff_eq(self, rhs: Quat, max_abs_diff: f32) -> bool {
        (self.x - rhs.x).abs() <= max_abs_diff
            && (self.y - rhs.y).abs() <= max_abs_diff
            && (self.z - rhs.z).abs() <= max_abs_diff
            && (self.w - rhs.w).abs() <= max_abs_diff
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan() || self.w.is_nan()
    }
}

/// Hamilton product: `a * b` rotates by `b` first, then by `a`.
impl Mul for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Quat {
        Quat::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// Rotates a vector.
impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let qvec = Vec3::new(self.x, self.y, self.z);
        let uv = qvec.cross(v) * (2.0 * self.w);
        let uuv = qvec.cross(qvec.cross(v)) * 2.0;
        v + uv + uuv
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, s: f32) -> Quat {
        Quat::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Add for Quat {
    type Output = Quat;

    fn add(self, rhs: Quat) -> Quat {
        Quat::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Quat {
    type Output = Quat;

    fn sub(self, rhs: Quat) -> Quat {
        Quat::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}
