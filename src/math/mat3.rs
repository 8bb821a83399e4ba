use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use crate::math::angle::{Angle, Radian};
use crate::math::scalar::{EPSILON, PI, acos_clamped};
use crate::math::vec3::Vec3;

/// A 3×3 matrix stored row-major, `m[row][col]`.
///
/// Acts on column vectors: `m * v`. The columns of a rotation matrix are the
/// rotated basis axes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const ZERO: Mat3 = Mat3 { m: [[0.0; 3]; 3] };
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Entries in row-major reading order.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m20: f32,
        m21: f32,
        m22: f32,
    ) -> Self {
        Self {
            m: [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]],
        }
    }

    #[inline]
    pub const fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self::new(r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z)
    }

    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::new(c0.x, c1.x, c2.x, c0.y, c1.y, c2.y, c0.z, c1.z, c2.z)
    }

    /// Same as [`from_cols`](Self::from_cols): each axis becomes a column.
    #[inline]
    pub const fn from_axes(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self::from_cols(x_axis, y_axis, z_axis)
    }

    /// Row-major flat array.
    #[inline]
    pub fn from_data(data: [f32; 9]) -> Self {
        bytemuck::cast(data)
    }

    #[inline]
    pub fn to_data(self) -> [f32; 9] {
        bytemuck::cast(self)
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::new(scale.x, 0.0, 0.0, 0.0, scale.y, 0.0, 0.0, 0.0, scale.z)
    }

    /// Rotation of `angle` about the unit vector `axis`.
    pub fn from_angle_axis(angle: impl Angle, axis: Vec3) -> Self {
        let (sin, cos) = angle.as_radians().value().sin_cos();
        let one_minus_cos = 1.0 - cos;
        let (x2, y2, z2) = (axis.x * axis.x, axis.y * axis.y, axis.z * axis.z);
        let xym = axis.x * axis.y * one_minus_cos;
        let xzm = axis.x * axis.z * one_minus_cos;
        let yzm = axis.y * axis.z * one_minus_cos;
        let x_sin = axis.x * sin;
        let y_sin = axis.y * sin;
        let z_sin = axis.z * sin;

        Self::new(
            x2 * one_minus_cos + cos,
            xym - z_sin,
            xzm + y_sin,
            xym + z_sin,
            y2 * one_minus_cos + cos,
            yzm - x_sin,
            xzm - y_sin,
            yzm + x_sin,
            z2 * one_minus_cos + cos,
        )
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vec3 {
        Vec3::new(self.m[0][index], self.m[1][index], self.m[2][index])
    }

    #[inline]
    pub fn set_col(&mut self, index: usize, v: Vec3) {
        self.m[0][index] = v.x;
        self.m[1][index] = v.y;
        self.m[2][index] = v.z;
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        Vec3::from(self.m[index])
    }

    pub fn transpose(&self) -> Mat3 {
        Mat3::from_cols(self.row(0), self.row(1), self.row(2))
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        let cofactor00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let cofactor10 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let cofactor20 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        m[0][0] * cofactor00 + m[0][1] * cofactor10 + m[0][2] * cofactor20
    }

    /// Inverse by cofactors, or `None` when `|det| <= tolerance`.
    pub fn inverse(&self, tolerance: f32) -> Option<Mat3> {
        let m = &self.m;
        let mut inv = Mat3::new(
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        );

        let det = m[0][0] * inv.m[0][0] + m[0][1] * inv.m[1][0] + m[0][2] * inv.m[2][0];
        if det.abs() <= tolerance {
            return None;
        }

        let inv_det = 1.0 / det;
        for row in &mut inv.m {
            for value in row {
                *value *= inv_det;
            }
        }
        Some(inv)
    }

    /// Gram-Schmidt orthonormalisation of the columns.
    pub fn orthonormalised(&self) -> Mat3 {
        let q0 = self.col(0).normalised();
        let mut q1 = self.col(1);
        q1 -= q0.dot(q1) * q0;
        q1.normalise();
        let mut q2 = self.col(2);
        q2 -= q0.dot(q2) * q0 + q1.dot(q2) * q1;
        q2.normalise();
        Mat3::from_cols(q0, q1, q2)
    }

    /// Splits the matrix into `Q * D * U`.
    ///
    /// `Q` is a proper rotation (det +1), `D` the diagonal scale and `U` the
    /// upper unit-triangular shear, returned as `(U01, U02, U12)`. A
    /// reflection shows up as a negative scale. A zero-length or dependent
    /// column gets a zero scale and `Q` is completed to a rotation.
    pub fn qdu_decomposition(&self) -> (Mat3, Vec3, Vec3) {
        let q = self.rotation_basis();

        let r = q.transpose() * *self;
        let scale = Vec3::new(r.m[0][0], r.m[1][1], r.m[2][2]);

        let inv_d0 = if scale.x.abs() >= EPSILON { 1.0 / scale.x } else { 0.0 };
        let inv_d1 = if scale.y.abs() >= EPSILON { 1.0 / scale.y } else { 0.0 };
        let shear = Vec3::new(r.m[0][1] * inv_d0, r.m[0][2] * inv_d0, r.m[1][2] * inv_d1);

        (q, scale, shear)
    }

    /// Gram-Schmidt on the columns, completed to a proper rotation when a
    /// column has nothing left after removing the earlier ones.
    fn rotation_basis(&self) -> Mat3 {
        let mut cols = [Vec3::ZERO; 3];
        let mut missing = Vec::with_capacity(3);
        for i in 0..3 {
            let mut v = self.col(i);
            for basis in &cols[..i] {
                v -= basis.dot(v) * *basis;
            }
            if v.normalise() >= EPSILON {
                cols[i] = v;
            } else {
                missing.push(i);
            }
        }

        match missing[..] {
            [] => {
                let q = Mat3::from_cols(cols[0], cols[1], cols[2]);
                if q.determinant() < 0.0 { -q } else { q }
            }
            [k] => {
                cols[k] = cols[(k + 1) % 3].cross(cols[(k + 2) % 3]);
                Mat3::from_cols(cols[0], cols[1], cols[2])
            }
            [a, b] => {
                let kept = cols[3 - a - b];
                let mut perpendicular = Vec3::UNIT_X.cross(kept);
                if perpendicular.is_zero_length() {
                    perpendicular = Vec3::UNIT_Y.cross(kept);
                }
                cols[a] = perpendicular.normalised();
                cols[b] = cols[(b + 1) % 3].cross(cols[(b + 2) % 3]);
                Mat3::from_cols(cols[0], cols[1], cols[2])
            }
            _ => Mat3::IDENTITY,
        }
    }

    /// Angle and axis of an orthonormal rotation matrix.
    pub fn to_angle_axis(&self) -> (Radian, Vec3) {
        let m = &self.m;
        let trace = m[0][0] + m[1][1] + m[2][2];
        let angle = acos_clamped(0.5 * (trace - 1.0));

        if angle.value() <= 0.0 {
            // Any axis works for the identity.
            return (angle, Vec3::UNIT_X);
        }

        if angle.value() < PI {
            let axis = Vec3::new(m[2][1] - m[1][2], m[0][2] - m[2][0], m[1][0] - m[0][1]);
            return (angle, axis.normalised());
        }

        // Half turn: recover the axis from the symmetric part.
        let mut axis = if m[0][0] >= m[1][1] && m[0][0] >= m[2][2] {
            let x = (0.5 * (m[0][0] - m[1][1] - m[2][2] + 1.0)).sqrt();
            let half_inv = 0.5 / x;
            Vec3::new(x, half_inv * m[0][1], half_inv * m[0][2])
        } else if m[1][1] >= m[2][2] {
            let y = (0.5 * (m[1][1] - m[0][0] - m[2][2] + 1.0)).sqrt();
            let half_inv = 0.5 / y;
            Vec3::new(half_inv * m[0][1], y, half_inv * m[1][2])
        } else {
            let z = (0.5 * (m[2][2] - m[0][0] - m[1][1] + 1.0)).sqrt();
            let half_inv = 0.5 / z;
            Vec3::new(half_inv * m[0][2], half_inv * m[1][2], z)
        };
        axis.normalise();
        (angle, axis)
    }

    #[inline]
    pub fn abs_diff_eq(&self, rhs: &Mat3, max_abs_diff: f32) -> bool {
        self.to_data()
            .iter()
            .zip(rhs.to_data().iter())
            .all(|(a, b)| (a - b).abs() <= max_abs_diff)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 3] {
        &self.m[row]
    }
}

impl IndexMut<usize> for Mat3 {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f32; 3] {
        &mut self.m[row]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = Mat3::ZERO;
        for r in 0..3 {
            for c in 0..3 {
                out.m[r][c] = self.m[r][0] * rhs.m[0][c]
                    + self.m[r][1] * rhs.m[1][c]
                    + self.m[r][2] * rhs.m[2][c];
            }
        }
        out
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

/// Row vector times matrix, equivalent to `m.transpose() * v`.
impl Mul<Mat3> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, m: Mat3) -> Vec3 {
        Vec3::new(m.col(0).dot(self), m.col(1).dot(self), m.col(2).dot(self))
    }
}

impl Mul<f32> for Mat3 {
    type Output = Mat3;

    fn mul(self, s: f32) -> Mat3 {
        Mat3::from_data(self.to_data().map(|v| v * s))
    }
}

impl Mul<Mat3> for f32 {
    type Output = Mat3;

    #[inline]
    fn mul(self, m: Mat3) -> Mat3 {
        m * self
    }
}

impl Add for Mat3 {
    type Output = Mat3;

    fn add(self, rhs: Mat3) -> Mat3 {
        let (a, b) = (self.to_data(), rhs.to_data());
        Mat3::from_data(std::array::from_fn(|i| a[i] + b[i]))
    }
}

impl Sub for Mat3 {
    type Output = Mat3;

    fn sub(self, rhs: Mat3) -> Mat3 {
        let (a, b) = (self.to_data(), rhs.to_data());
        Mat3::from_data(std::array::from_fn(|i| a[i] - b[i]))
    }
}

impl Neg for Mat3 {
    type Output = Mat3;

    fn neg(self) -> Mat3 {
        self * -1.0
    }
}
