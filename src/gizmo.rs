//! Round-tripping a [`Transform`] through a manipulation gizmo.
//!
//! Immediate-mode gizmo widgets edit a model matrix as 16 column-major
//! floats. The editor recomposes the matrix from the transform, lets the
//! widget change it in place, then decomposes the result back into
//! position, scale and rotation. Shear the widget introduces cannot be
//! stored and is dropped.
//!
//! ```
//! use orrery::gizmo;
//! use orrery::{Transform, Vec3};
//!
//! let mut transform = Transform::new();
//! gizmo::edit_transform(&mut transform, |data| {
//!     // Translation sits in the last column.
//!     data[12] = 4.0;
//!     data[14] = -1.0;
//! })?;
//! assert!(transform.position.abs_diff_eq(Vec3::new(4.0, 0.0, -1.0), 1e-6));
//! # Ok::<(), orrery::MathError>(())
//! ```

use log::warn;

use crate::error::MathError;
use crate::math::Mat4;
use crate::transform::Transform;

/// The transform's model matrix as 16 column-major floats.
pub fn transform_to_gizmo_data(transform: &Transform) -> [f32; 16] {
    transform.matrix().transpose().to_data()
}

/// Decomposes 16 column-major floats back into a transform.
///
/// Fails with [`MathError::NotAffine`] if the bottom row is not `0 0 0 1`.
pub fn transform_from_gizmo_data(data: &[f32; 16]) -> Result<Transform, MathError> {
    Transform::from_matrix(&Mat4::from_data(*data).transpose())
}

/// Lets `edit` change the transform's matrix in place, then writes the
/// result back. On error the transform is left untouched.
pub fn edit_transform(
    transform: &mut Transform,
    edit: impl FnOnce(&mut [f32; 16]),
) -> Result<(), MathError> {
    let mut data = transform_to_gizmo_data(transform);
    edit(&mut data);
    match transform_from_gizmo_data(&data) {
        Ok(edited) => {
            *transform = edited;
            Ok(())
        }
        Err(err) => {
            warn!("gizmo: discarded edit, {err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Degree, Quat, Radian, Vec3};

    fn sample() -> Transform {
        Transform::new()
            .with_position(Vec3::new(1.0, -2.0, 3.0))
            .with_rotation(Quat::from_angle_axis(
                Degree(40.0),
                Vec3::new(1.0, 1.0, 0.0).normalised(),
            ))
            .with_scale(Vec3::new(2.0, 0.5, 1.5))
    }

    #[test]
    fn data_is_column_major() {
        let data = transform_to_gizmo_data(&sample());
        assert_eq!(data, sample().matrix().to_cols_array());
        assert_eq!(&data[12..15], &[1.0f32, -2.0, 3.0]);
    }

    #[test]
    fn untouched_edit_round_trips() {
        let original = sample();
        let mut transform = original;
        edit_transform(&mut transform, |_| {}).expect("affine");

        assert!(transform.position.abs_diff_eq(original.position, 1e-4));
        assert!(transform.scale.abs_diff_eq(original.scale, 1e-4));
        assert!(transform.rotation.equals(original.rotation, Radian(1e-3)));
        assert!(transform.matrix().abs_diff_eq(&original.matrix(), 1e-4));
    }

    #[test]
    fn uniform_scale_edit() {
        let mut transform = Transform::new();
        edit_transform(&mut transform, |data| {
            data[0] *= 3.0;
            data[5] *= 3.0;
            data[10] *= 3.0;
        })
        .expect("affine");
        assert!(transform.scale.abs_diff_eq(Vec3::splat(3.0), 1e-6));
        assert!(transform.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn flattening_an_axis_keeps_a_rotation() {
        let mut transform = sample();
        let mut expected = transform_to_gizmo_data(&transform);
        expected[..3].fill(0.0);
        edit_transform(&mut transform, |data| data[..3].fill(0.0)).expect("affine");

        assert!((transform.rotation.norm() - 1.0).abs() < 1e-5);
        assert!(transform.scale.x.abs() < 1e-5);
        let rebuilt = Mat4::from_data(transform_to_gizmo_data(&transform));
        assert!(rebuilt.abs_diff_eq(&Mat4::from_data(expected), 1e-4), "{rebuilt:?}");
    }

    #[test]
    fn projective_edit_is_rejected() {
        let original = sample();
        let mut transform = original;
        assert_eq!(
            edit_transform(&mut transform, |data| data[3] = 0.5),
            Err(MathError::NotAffine)
        );
        assert_eq!(transform, original);
    }

    #[test]
    fn from_data_rejects_non_affine() {
        let mut data = transform_to_gizmo_data(&Transform::new());
        data[15] = 2.0;
        assert_eq!(transform_from_gizmo_data(&data), Err(MathError::NotAffine));
    }
}
