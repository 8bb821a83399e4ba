//! Position, rotation and scale of a scene object.
//!
//! A [`Transform`] is the editable source of truth for where a mesh sits in
//! the world. Its model matrix is derived on demand, and a matrix edited
//! elsewhere (for example by a manipulation gizmo) can be written back with
//! [`Transform::set_from_matrix`].

use crate::error::MathError;
use crate::math::{Mat4, Quat, Vec3};

/// Position, rotation and scale of an object in 3D space.
///
/// Transforms combine three components applied in **Scale → Rotate →
/// Translate** order:
///
/// 1. **Scale**: stretches the object along its local axes
/// 2. **Rotation**: orients the object (as a quaternion)
/// 3. **Position**: moves the object to its world location
///
/// # Builder Pattern
///
/// ```
/// use orrery::{Degree, Quat, Transform, Vec3};
///
/// let transform = Transform::new()
///     .with_position(Vec3::new(1.0, 2.0, 3.0))
///     .with_rotation(Quat::from_rotation_y(Degree(90.0)))
///     .with_uniform_scale(2.0);
///
/// // The local X axis is scaled, turned onto -Z, then moved.
/// let p = transform.transform_point(Vec3::UNIT_X);
/// assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-5));
/// ```
///
/// The fields are public and can be edited directly; nothing is cached, so
/// the next [`matrix`](Self::matrix) call sees the change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position (translation).
    pub position: Vec3,
    /// Scale factors for each local axis.
    pub scale: Vec3,
    /// Rotation. Keep it unit length; see [`Quat::normalise`].
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates a new identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    ///
    /// ```
    /// use orrery::{Transform, Vec3};
    ///
    /// let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(transform.scale, Vec3::ONE);
    /// ```
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the position (translation) component.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation component.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets non-uniform scale factors for each axis.
    ///
    /// For uniform scaling, prefer [`Transform::with_uniform_scale()`].
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets uniform scale on all axes.
    ///
    /// ```
    /// use orrery::{Transform, Vec3};
    ///
    /// let transform = Transform::new().with_uniform_scale(2.0);
    /// assert_eq!(transform.scale, Vec3::new(2.0, 2.0, 2.0));
    /// ```
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The model matrix, `T * R * S`.
    ///
    /// Pure: calling it twice without touching the fields gives identical
    /// matrices.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_transform(self.position, self.scale, self.rotation)
    }

    /// The inverse of [`matrix`](Self::matrix), built without a general
    /// inversion. A zero scale component gives non-finite entries.
    pub fn inverse_matrix(&self) -> Mat4 {
        Mat4::from_inverse_transform(self.position, self.scale, self.rotation)
    }

    /// Maps a point from local to world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.position
    }

    /// Decomposes an affine matrix into a transform.
    ///
    /// Shear cannot be represented and is dropped. A reflection comes back
    /// as negative scale, and the rotation may be the negated quaternion of
    /// the one the matrix was built from (same orientation).
    pub fn from_matrix(matrix: &Mat4) -> Result<Self, MathError> {
        let parts = matrix.decompose()?;
        Ok(Self {
            position: parts.position,
            scale: parts.scale,
            rotation: parts.rotation,
        })
    }

    /// Overwrites the fields from a matrix, see [`from_matrix`](Self::from_matrix).
    ///
    /// On error the transform is left untouched.
    pub fn set_from_matrix(&mut self, matrix: &Mat4) -> Result<(), MathError> {
        *self = Self::from_matrix(matrix)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Degree, Radian};

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
        assert_eq!(Transform::new().inverse_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_rotate_translate_order() {
        let transform = Transform::new()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_uniform_scale(2.0)
            .with_rotation(Quat::from_rotation_y(Degree(90.0)));

        let by_matrix = transform.matrix().transform_coord(Vec3::UNIT_X);
        assert!(by_matrix.abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), 1e-5), "{by_matrix:?}");
        assert!(transform.transform_point(Vec3::UNIT_X).abs_diff_eq(by_matrix, 1e-5));
    }

    #[test]
    fn matrix_is_pure() {
        let transform = Transform::new()
            .with_position(Vec3::new(-3.0, 0.5, 8.0))
            .with_scale(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_x(Radian(0.3)));
        assert_eq!(transform.matrix(), transform.matrix());
    }

    #[test]
    fn inverse_matrix_undoes_matrix() {
        let transform = Transform::new()
            .with_position(Vec3::new(4.0, -1.0, 2.0))
            .with_scale(Vec3::new(0.5, 2.0, 4.0))
            .with_rotation(Quat::from_angle_axis(
                Radian(1.0),
                Vec3::new(1.0, 1.0, 0.0).normalised(),
            ));
        let product = transform.inverse_matrix() * transform.matrix();
        assert!(product.abs_diff_eq(&Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn matrix_round_trip() {
        let original = Transform::new()
            .with_position(Vec3::new(0.5, 9.0, -2.0))
            .with_scale(Vec3::new(3.0, 1.0, 0.25))
            .with_rotation(
                Quat::from_rotation_z(Degree(-60.0)) * Quat::from_rotation_x(Degree(15.0)),
            );

        let back = Transform::from_matrix(&original.matrix()).expect("affine");
        assert!(back.position.abs_diff_eq(original.position, 1e-4));
        assert!(back.scale.abs_diff_eq(original.scale, 1e-4));
        assert!(
            back.rotation.abs_diff_eq(original.rotation, 1e-4)
                || back.rotation.abs_diff_eq(-original.rotation, 1e-4)
        );
    }

    #[test]
    fn set_from_matrix_leaves_fields_on_error() {
        let mut transform = Transform::from_position(Vec3::ONE);
        let mut projective = Mat4::IDENTITY;
        projective.m[3][0] = 0.5;
        assert_eq!(transform.set_from_matrix(&projective), Err(MathError::NotAffine));
        assert_eq!(transform, Transform::from_position(Vec3::ONE));

        transform
            .set_from_matrix(&Mat4::from_translation(Vec3::new(7.0, 0.0, 0.0)))
            .expect("affine");
        assert_eq!(transform.position, Vec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn flattened_axis_keeps_unit_rotation() {
        let flattened = Mat4::from_transform(
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 1.0),
            Quat::from_rotation_y(Degree(90.0)),
        );
        let back = Transform::from_matrix(&flattened).expect("affine");

        assert!((back.rotation.norm() - 1.0).abs() < 1e-5, "{:?}", back.rotation);
        assert!(back.scale.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), 1e-5));
        assert!(back.matrix().abs_diff_eq(&flattened, 1e-5));
    }
}
