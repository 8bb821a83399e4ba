//! 4×4 homogeneous matrices.
//!
//! Storage is row-major (`m[row][col]`) and the matrix multiplies column
//! vectors, so the translation lives in the last column. GPU upload wants
//! the column-major order instead, see [`Mat4::to_cols_array`].

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::MathError;
use crate::math::mat3::Mat3;
use crate::math::quat::Quat;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

/// The parts recovered from an affine matrix by [`Mat4::decompose`].
///
/// `shear` holds the off-diagonal terms `(U01, U02, U12)` of the QDU split.
/// A [`Transform`](crate::transform::Transform) has nowhere to store it, so
/// shear is dropped when a matrix is written back into one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposition {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
    pub shear: Vec3,
}

impl Mat4 {
    pub const ZERO: Mat4 = Mat4 { m: [[0.0; 4]; 4] };
    /// Zero everywhere except `m[3][3] = 1`, the smallest affine matrix.
    pub const ZERO_AFFINE: Mat4 = Mat4 {
        m: [[0.0; 4], [0.0; 4], [0.0; 4], [0.0, 0.0, 0.0, 1.0]],
    };
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Entries in row-major reading order.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32,
        m01: f32,
        m02: f32,
        m03: f32,
        m10: f32,
        m11: f32,
        m12: f32,
        m13: f32,
        m20: f32,
        m21: f32,
        m22: f32,
        m23: f32,
        m30: f32,
        m31: f32,
        m32: f32,
        m33: f32,
    ) -> Self {
        Self {
            m: [
                [m00, m01, m02, m03],
                [m10, m11, m12, m13],
                [m20, m21, m22, m23],
                [m30, m31, m32, m33],
            ],
        }
    }

    #[inline]
    pub const fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            m: [
                [r0.x, r0.y, r0.z, r0.w],
                [r1.x, r1.y, r1.z, r1.w],
                [r2.x, r2.y, r2.z, r2.w],
                [r3.x, r3.y, r3.z, r3.w],
            ],
        }
    }

    /// Embeds a 3×3 matrix with no translation.
    pub fn from_mat3(m3: &Mat3) -> Self {
        let mut out = Mat4::IDENTITY;
        out.set_mat3(m3);
        out
    }

    #[inline]
    pub fn from_quat(rotation: Quat) -> Self {
        Self::from_mat3(&rotation.to_rotation_matrix())
    }

    pub fn from_translation(v: Vec3) -> Self {
        let mut out = Mat4::IDENTITY;
        out.set_translation(v);
        out
    }

    pub fn from_scale(v: Vec3) -> Self {
        let mut out = Mat4::IDENTITY;
        out.set_scale(v);
        out
    }

    /// Scale, then rotate, then translate: `T * R * S`.
    pub fn from_transform(position: Vec3, scale: Vec3, orientation: Quat) -> Self {
        let rot = orientation.to_rotation_matrix();
        let mut out = Mat4::IDENTITY;
        for r in 0..3 {
            out.m[r][0] = scale.x * rot.m[r][0];
            out.m[r][1] = scale.y * rot.m[r][1];
            out.m[r][2] = scale.z * rot.m[r][2];
        }
        out.set_translation(position);
        out
    }

    /// Inverse of [`from_transform`](Self::from_transform), built directly.
    /// A zero scale component yields non-finite entries.
    pub fn from_inverse_transform(position: Vec3, scale: Vec3, orientation: Quat) -> Self {
        let inv_rot = orientation.unit_inverse();
        let inv_scale = Vec3::ONE / scale;
        let inv_translate = (inv_rot * -position) * inv_scale;

        let rot = inv_rot.to_rotation_matrix();
        let mut out = Mat4::IDENTITY;
        for c in 0..3 {
            out.m[0][c] = inv_scale.x * rot.m[0][c];
            out.m[1][c] = inv_scale.y * rot.m[1][c];
            out.m[2][c] = inv_scale.z * rot.m[2][c];
        }
        out.set_translation(inv_translate);
        out
    }

    /// Row-major flat array.
    #[inline]
    pub fn from_data(data: [f32; 16]) -> Self {
        bytemuck::cast(data)
    }

    /// Row-major flat array.
    #[inline]
    pub fn to_data(self) -> [f32; 16] {
        bytemuck::cast(self)
    }

    /// The 16 floats in storage (row-major) order, without copying.
    #[inline]
    pub fn as_slice(&self) -> &[f32; 16] {
        bytemuck::cast_ref(self)
    }

    /// Column-major flat array, the layout shader uniforms expect.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.transpose().to_data()
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        Vec4::from(self.m[index])
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vec4 {
        Vec4::new(self.m[0][index], self.m[1][index], self.m[2][index], self.m[3][index])
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.m[c][r] = self.m[r][c];
            }
        }
        out
    }

    /// Same as `self * rhs`.
    #[inline]
    pub fn concatenate(&self, rhs: &Mat4) -> Mat4 {
        *self * *rhs
    }

    /// Determinant of the 3×3 submatrix picked by the given rows and columns.
    pub fn minor(&self, r0: usize, r1: usize, r2: usize, c0: usize, c1: usize, c2: usize) -> f32 {
        let m = &self.m;
        m[r0][c0] * (m[r1][c1] * m[r2][c2] - m[r2][c1] * m[r1][c2])
            - m[r0][c1] * (m[r1][c0] * m[r2][c2] - m[r2][c0] * m[r1][c2])
            + m[r0][c2] * (m[r1][c0] * m[r2][c1] - m[r2][c0] * m[r1][c1])
    }

    /// Transposed cofactor matrix.
    pub fn adjoint(&self) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.m[c][r] = self.cofactor(r, c);
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        (0..4).map(|c| self.m[0][c] * self.cofactor(0, c)).sum()
    }

    /// General inverse by cofactors.
    ///
    /// Unchecked: a singular matrix produces non-finite entries. Use
    /// [`try_inverse`](Self::try_inverse) when that can happen.
    pub fn inverse(&self) -> Mat4 {
        self.adjoint() * (1.0 / self.determinant())
    }

    pub fn try_inverse(&self) -> Result<Mat4, MathError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(MathError::Singular);
        }
        let inv = self.adjoint() * (1.0 / det);
        if inv.m.iter().flatten().all(|v| v.is_finite()) {
            Ok(inv)
        } else {
            Err(MathError::Singular)
        }
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    #[inline]
    pub fn set_translation(&mut self, v: Vec3) {
        self.m[0][3] = v.x;
        self.m[1][3] = v.y;
        self.m[2][3] = v.z;
    }

    /// Overwrites the diagonal of the upper 3×3.
    #[inline]
    pub fn set_scale(&mut self, v: Vec3) {
        self.m[0][0] = v.x;
        self.m[1][1] = v.y;
        self.m[2][2] = v.z;
    }

    /// The upper-left 3×3 block.
    pub fn mat3(&self) -> Mat3 {
        let m = &self.m;
        Mat3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        )
    }

    pub fn set_mat3(&mut self, m3: &Mat3) {
        for r in 0..3 {
            self.m[r][..3].copy_from_slice(&m3.m[r]);
        }
    }

    /// The normalised basis axes (the first three columns).
    pub fn axes(&self) -> (Vec3, Vec3, Vec3) {
        let m3 = self.mat3();
        (m3.col(0).normalised(), m3.col(1).normalised(), m3.col(2).normalised())
    }

    /// True if any basis column is noticeably longer or shorter than one.
    pub fn has_scale(&self) -> bool {
        let m3 = self.mat3();
        (0..3).any(|c| (m3.col(c).squared_length() - 1.0).abs() > 1e-4)
    }

    #[inline]
    pub fn has_negative_scale(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Rotation of the upper 3×3. Assumes it holds no scale.
    #[inline]
    pub fn to_quat(&self) -> Quat {
        Quat::from_rotation_matrix(&self.mat3())
    }

    /// True if the bottom row is exactly `(0, 0, 0, 1)`.
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.m[3] == [0.0, 0.0, 0.0, 1.0]
    }

    fn ensure_affine(&self) -> Result<(), MathError> {
        if self.is_affine() {
            Ok(())
        } else {
            Err(MathError::NotAffine)
        }
    }

    /// Cheaper inverse for affine matrices.
    pub fn inverse_affine(&self) -> Result<Mat4, MathError> {
        self.ensure_affine()?;
        let inv3 = self.mat3().inverse(0.0).ok_or(MathError::Singular)?;
        let translation = -(inv3 * self.translation());

        let mut out = Mat4::from_mat3(&inv3);
        out.set_translation(translation);
        Ok(out)
    }

    /// `self * rhs` for two affine matrices, skipping the bottom row.
    pub fn concatenate_affine(&self, rhs: &Mat4) -> Result<Mat4, MathError> {
        self.ensure_affine()?;
        rhs.ensure_affine()?;

        let mut out = Mat4::IDENTITY;
        for r in 0..3 {
            for c in 0..4 {
                out.m[r][c] = self.m[r][0] * rhs.m[0][c]
                    + self.m[r][1] * rhs.m[1][c]
                    + self.m[r][2] * rhs.m[2][c];
            }
            out.m[r][3] += self.m[r][3];
        }
        Ok(out)
    }

    pub fn transform_affine_point(&self, v: Vec3) -> Result<Vec3, MathError> {
        self.ensure_affine()?;
        Ok(self.mat3() * v + self.translation())
    }

    pub fn transform_affine(&self, v: Vec4) -> Result<Vec4, MathError> {
        self.ensure_affine()?;
        Ok(Vec4::from_vec3(self.mat3() * v.truncate() + self.translation() * v.w, v.w))
    }

    /// Transforms a point and divides by the resulting `w`.
    /// A zero `w` gives [`Vec3::ZERO`].
    pub fn transform_coord(&self, v: Vec3) -> Vec3 {
        let h = *self * Vec4::from_vec3(v, 1.0);
        if h.w == 0.0 {
            Vec3::ZERO
        } else {
            h.truncate() / h.w
        }
    }

    /// Maps normalised device coordinates onto a `width × height` window
    /// with the origin in the top-left corner.
    #[rustfmt::skip]
    pub fn viewport(width: u32, height: u32) -> Mat4 {
        let (w, h) = (width as f32, height as f32);
        Mat4::new(
            0.5 * w, 0.0, 0.0, 0.5 * w,
            0.0, -0.5 * h, 0.0, 0.5 * h,
            0.0, 0.0, -1.0, 1.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Reflection through the plane `xyz · p + w = 0`, with unit normal `xyz`.
    pub fn mirror(plane: Vec4) -> Mat4 {
        let n = plane.truncate();
        let mut out = Mat4::IDENTITY;
        for r in 0..3 {
            for c in 0..3 {
                out.m[r][c] -= 2.0 * n[r] * n[c];
            }
            out.m[r][3] = -2.0 * plane.w * n[r];
        }
        out
    }

    /// A rotation taking `+Z` onto the unit vector `normal`.
    pub fn rotation_from_normal(normal: Vec3) -> Mat4 {
        let mut up = Vec3::UNIT_Z;
        if normal.z.abs() > 0.999 {
            up = Vec3::UNIT_Y;
        }
        let left = up.cross(normal).normalised();
        let up = normal.cross(left).normalised();
        Mat4::from_mat3(&Mat3::from_cols(left, up, normal))
    }

    /// Splits an affine matrix into position, QDU scale, rotation and shear.
    ///
    /// ```
    /// use orrery::{Mat4, Quat, Radian, Vec3};
    ///
    /// let rotation = Quat::from_rotation_z(Radian(0.5));
    /// let m = Mat4::from_transform(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0), rotation);
    /// let parts = m.decompose().unwrap();
    /// assert!(parts.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    /// assert!(parts.scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
    /// assert!(parts.rotation.equals(rotation, Radian(1e-3)));
    /// ```
    pub fn decompose(&self) -> Result<Decomposition, MathError> {
        self.ensure_affine()?;
        let (q, scale, shear) = self.mat3().qdu_decomposition();
        Ok(Decomposition {
            position: self.translation(),
            scale,
            rotation: Quat::from_rotation_matrix(&q),
            shear,
        })
    }

    /// Position and rotation of an affine matrix, ignoring scale.
    pub fn decompose_without_scale(&self) -> Result<(Vec3, Quat), MathError> {
        let parts = self.decompose()?;
        Ok((parts.position, parts.rotation))
    }

    pub fn abs_diff_eq(&self, rhs: &Mat4, max_abs_diff: f32) -> bool {
        self.as_slice()
            .iter()
            .zip(rhs.as_slice().iter())
            .all(|(a, b)| (a - b).abs() <= max_abs_diff)
    }

    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let [r0, r1, r2] = OTHERS[row];
        let [c0, c1, c2] = OTHERS[col];
        let minor = self.minor(r0, r1, r2, c0, c1, c2);
        if (row + col) % 2 == 0 { minor } else { -minor }
    }
}

/// For each index, the three remaining ones.
const OTHERS: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 4] {
        &self.m[row]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f32; 4] {
        &mut self.m[row]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.m[r][c] = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v), self.row(3).dot(v))
    }
}

/// Row vector times matrix.
impl Mul<Mat4> for Vec4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, m: Mat4) -> Vec4 {
        Vec4::new(m.col(0).dot(self), m.col(1).dot(self), m.col(2).dot(self), m.col(3).dot(self))
    }
}

/// Projective point transform, see [`Mat4::transform_coord`].
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform_coord(v)
    }
}

impl Mul<f32> for Mat4 {
    type Output = Mat4;

    fn mul(self, s: f32) -> Mat4 {
        Mat4::from_data(self.to_data().map(|v| v * s))
    }
}

impl Add for Mat4 {
    type Output = Mat4;

    fn add(self, rhs: Mat4) -> Mat4 {
        let (a, b) = (self.to_data(), rhs.to_data());
        Mat4::from_data(std::array::from_fn(|i| a[i] + b[i]))
    }
}

impl Sub for Mat4 {
    type Output = Mat4;

    fn sub(self, rhs: Mat4) -> Mat4 {
        let (a, b) = (self.to_data(), rhs.to_data());
        Mat4::from_data(std::array::from_fn(|i| a[i] - b[i]))
    }
}
