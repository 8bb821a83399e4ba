use crate::error::CameraError;
use crate::math::projection::{self, DepthRange};
use crate::math::{Degree, Mat4, Vec3};

/// Projection parameters shared by every camera.
///
/// All setters validate, so a `Lens` always describes a usable frustum:
///
/// ```
/// use orrery::{CameraError, Degree, Lens};
///
/// let mut lens = Lens::default();
/// assert_eq!(
///     lens.set_clip_planes(1.0, 0.5),
///     Err(CameraError::InvalidFarPlane { near: 1.0, far: 0.5 })
/// );
/// assert!(lens.set_vertical_fov(Degree(60.0)).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    near: f32,
    far: f32,
    aspect_ratio: f32,
    vertical_fov: Degree,
    depth_range: DepthRange,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            near: 0.01,
            far: 40.0,
            aspect_ratio: 1200.0 / 900.0,
            vertical_fov: Degree(45.0),
            depth_range: DepthRange::NegativeOneToOne,
        }
    }
}

impl Lens {
    pub fn new(
        near: f32,
        far: f32,
        aspect_ratio: f32,
        vertical_fov: Degree,
    ) -> Result<Self, CameraError> {
        validate_clip_planes(near, far)?;
        validate_aspect_ratio(aspect_ratio)?;
        validate_fov(vertical_fov)?;
        Ok(Self {
            near,
            far,
            aspect_ratio,
            vertical_fov,
            depth_range: DepthRange::default(),
        })
    }

    /// Selects the clip-space depth convention.
    pub fn with_depth_range(mut self, depth_range: DepthRange) -> Self {
        self.depth_range = depth_range;
        self
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn vertical_fov(&self) -> Degree {
        self.vertical_fov
    }

    pub fn depth_range(&self) -> DepthRange {
        self.depth_range
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<(), CameraError> {
        validate_clip_planes(near, far)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<(), CameraError> {
        validate_aspect_ratio(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    pub fn set_vertical_fov(&mut self, vertical_fov: Degree) -> Result<(), CameraError> {
        validate_fov(vertical_fov)?;
        self.vertical_fov = vertical_fov;
        Ok(())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        projection::perspective(
            self.vertical_fov,
            self.aspect_ratio,
            self.near,
            self.far,
            self.depth_range,
        )
    }
}

fn validate_clip_planes(near: f32, far: f32) -> Result<(), CameraError> {
    if !(near.is_finite() && near > 0.0) {
        return Err(CameraError::InvalidNearPlane(near));
    }
    if !(far.is_finite() && far > near) {
        return Err(CameraError::InvalidFarPlane { near, far });
    }
    Ok(())
}

fn validate_aspect_ratio(aspect_ratio: f32) -> Result<(), CameraError> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidAspectRatio(aspect_ratio))
    }
}

fn validate_fov(fov: Degree) -> Result<(), CameraError> {
    let degrees = fov.value();
    if degrees > 0.0 && degrees < 180.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidFieldOfView(degrees))
    }
}

/// A snapshot of where a camera is and where it looks.
///
/// Camera controllers ([`OrbitCamera`](crate::OrbitCamera),
/// [`FreelookCamera`](crate::FreelookCamera)) produce one every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub lens: Lens,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEGATIVE_UNIT_Z,
            up: Vec3::UNIT_Y,
            lens: Lens::default(),
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.forward = (target - self.position).normalised();
        self
    }

    pub fn with_lens(mut self, lens: Lens) -> Self {
        self.lens = lens;
        self
    }

    /// Compute the right vector from forward and up.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalised()
    }

    /// Recompute up to be orthogonal to forward and right.
    pub fn orthogonal_up(&self) -> Vec3 {
        self.right().cross(self.forward).normalised()
    }

    pub fn view_matrix(&self) -> Mat4 {
        projection::look_at(self.position, self.position + self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.lens.projection_matrix()
    }

    /// `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_rejects_bad_planes() {
        assert_eq!(
            Lens::new(0.0, 10.0, 1.0, Degree(45.0)),
            Err(CameraError::InvalidNearPlane(0.0))
        );
        assert_eq!(
            Lens::new(-1.0, 10.0, 1.0, Degree(45.0)),
            Err(CameraError::InvalidNearPlane(-1.0))
        );
        assert_eq!(
            Lens::new(5.0, 5.0, 1.0, Degree(45.0)),
            Err(CameraError::InvalidFarPlane { near: 5.0, far: 5.0 })
        );
        assert!(matches!(
            Lens::new(0.1, f32::INFINITY, 1.0, Degree(45.0)),
            Err(CameraError::InvalidFarPlane { .. })
        ));
    }

    #[test]
    fn lens_rejects_bad_aspect_and_fov() {
        assert_eq!(
            Lens::new(0.1, 10.0, 0.0, Degree(45.0)),
            Err(CameraError::InvalidAspectRatio(0.0))
        );
        assert!(matches!(
            Lens::new(0.1, 10.0, f32::NAN, Degree(45.0)),
            Err(CameraError::InvalidAspectRatio(_))
        ));
        assert_eq!(
            Lens::new(0.1, 10.0, 1.0, Degree(180.0)),
            Err(CameraError::InvalidFieldOfView(180.0))
        );
        assert_eq!(
            Lens::new(0.1, 10.0, 1.0, Degree(0.0)),
            Err(CameraError::InvalidFieldOfView(0.0))
        );
    }

    #[test]
    fn failed_setter_keeps_previous_value() {
        let mut lens = Lens::default();
        assert!(lens.set_aspect_ratio(-2.0).is_err());
        assert_eq!(lens.aspect_ratio(), 1200.0 / 900.0);
        lens.set_aspect_ratio(2.0).expect("valid aspect");
        assert_eq!(lens.aspect_ratio(), 2.0);
    }

    #[test]
    fn snapshot_view_looks_at_target() {
        let camera = Camera::new().at(Vec3::new(0.0, 0.0, 10.0)).looking_at(Vec3::ZERO);
        assert_eq!(camera.forward, Vec3::NEGATIVE_UNIT_Z);
        assert!(camera.right().abs_diff_eq(Vec3::UNIT_X, 1e-6));
        assert!(camera.orthogonal_up().abs_diff_eq(Vec3::UNIT_Y, 1e-6));

        let in_view = camera.view_matrix().transform_coord(Vec3::ZERO);
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn view_projection_is_projection_after_view() {
        let camera = Camera::new().at(Vec3::new(1.0, 2.0, 3.0)).looking_at(Vec3::ZERO);
        assert_eq!(
            camera.view_projection_matrix(),
            camera.projection_matrix() * camera.view_matrix()
        );
    }
}
