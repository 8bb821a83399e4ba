use log::debug;

use crate::camera::{Camera, Lens};
use crate::error::CameraError;
use crate::freelook_camera::FreelookCamera;
use crate::input::Input;
use crate::math::{Mat4, Vec3};
use crate::orbit_camera::{MIN_ORBIT_RADIUS, OrbitCamera};

/// Which navigation style the editor camera uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Orbit,
    Freelook,
}

/// The editor's viewport camera, in one of the two navigation styles.
///
/// Switching modes keeps the eye position and view direction, so the
/// picture does not jump. Each mode starts with its own default mouse
/// sensitivity.
///
/// ```
/// use orrery::{CameraMode, EditorCamera, Lens, OrbitCamera, Vec3};
///
/// let orbit = OrbitCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Lens::default());
/// let mut camera = EditorCamera::Orbit(orbit);
/// let view = camera.view_matrix();
///
/// camera.switch_to_freelook();
/// assert_eq!(camera.mode(), CameraMode::Freelook);
/// assert!(camera.view_matrix().abs_diff_eq(&view, 1e-5));
/// ```
#[derive(Clone, Debug)]
pub enum EditorCamera {
    Orbit(OrbitCamera),
    Freelook(FreelookCamera),
}

impl Default for EditorCamera {
    fn default() -> Self {
        EditorCamera::Orbit(OrbitCamera::default())
    }
}

impl EditorCamera {
    /// A camera of the given mode at `position`, looking at `target`.
    pub fn new(mode: CameraMode, position: Vec3, target: Vec3, lens: Lens) -> Self {
        match mode {
            CameraMode::Orbit => EditorCamera::Orbit(OrbitCamera::new(position, target, lens)),
            CameraMode::Freelook => {
                let mut camera = FreelookCamera::new(position, lens);
                camera.look_at(target);
                EditorCamera::Freelook(camera)
            }
        }
    }

    pub fn mode(&self) -> CameraMode {
        match self {
            EditorCamera::Orbit(_) => CameraMode::Orbit,
            EditorCamera::Freelook(_) => CameraMode::Freelook,
        }
    }

    /// Get the current camera state.
    pub fn camera(&self) -> Camera {
        match self {
            EditorCamera::Orbit(camera) => camera.camera(),
            EditorCamera::Freelook(camera) => camera.camera(),
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        match self {
            EditorCamera::Orbit(camera) => camera.position(),
            EditorCamera::Freelook(camera) => camera.position(),
        }
    }

    pub fn lens(&self) -> &Lens {
        match self {
            EditorCamera::Orbit(camera) => camera.lens(),
            EditorCamera::Freelook(camera) => camera.lens(),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        match self {
            EditorCamera::Orbit(camera) => camera.view_matrix(),
            EditorCamera::Freelook(camera) => camera.view_matrix(),
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.lens().projection_matrix()
    }

    /// `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<(), CameraError> {
        match self {
            EditorCamera::Orbit(camera) => camera.update_aspect_ratio(aspect_ratio),
            EditorCamera::Freelook(camera) => camera.update_aspect_ratio(aspect_ratio),
        }
    }

    pub fn update(&mut self, input: &Input, dt: f32) {
        match self {
            EditorCamera::Orbit(camera) => camera.update(input, dt),
            EditorCamera::Freelook(camera) => camera.update(input, dt),
        }
    }

    /// Sets the mouse sensitivity (degrees per pixel) of the active mode.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        match self {
            EditorCamera::Orbit(camera) => camera.sensitivity = sensitivity,
            EditorCamera::Freelook(camera) => camera.sensitivity = sensitivity,
        }
    }

    /// Switches to orbiting a point `target_distance` ahead of the eye.
    /// Does nothing if already orbiting.
    pub fn switch_to_orbit(&mut self, target_distance: f32) {
        let EditorCamera::Freelook(freelook) = self else {
            return;
        };

        let distance = target_distance.max(MIN_ORBIT_RADIUS);
        let position = freelook.position();
        let target = position + freelook.front() * distance;
        let orbit =
            OrbitCamera::new(position, target, *freelook.lens()).with_pitch(freelook.pitch());
        debug!("camera: freelook -> orbit, target {target:?}");
        *self = EditorCamera::Orbit(orbit);
    }

    /// Switches to freelook, facing the orbit target.
    /// Does nothing if already in freelook.
    ///
    /// Roll cannot be expressed by yaw and pitch, so an orbit camera that
    /// went over the pole comes out upright.
    pub fn switch_to_freelook(&mut self) {
        let EditorCamera::Orbit(orbit) = self else {
            return;
        };

        let mut freelook = FreelookCamera::new(orbit.position(), *orbit.lens());
        freelook.look_at(orbit.target());
        debug!(
            "camera: orbit -> freelook, yaw {:?} pitch {:?}",
            freelook.yaw(),
            freelook.pitch()
        );
        *self = EditorCamera::Freelook(freelook);
    }

    /// Flips between the two modes, see [`switch_to_orbit`](Self::switch_to_orbit)
    /// and [`switch_to_freelook`](Self::switch_to_freelook).
    pub fn toggle_mode(&mut self, target_distance: f32) {
        match self.mode() {
            CameraMode::Orbit => self.switch_to_freelook(),
            CameraMode::Freelook => self.switch_to_orbit(target_distance),
        }
    }
}

impl From<OrbitCamera> for EditorCamera {
    fn from(camera: OrbitCamera) -> Self {
        EditorCamera::Orbit(camera)
    }
}

impl From<FreelookCamera> for EditorCamera {
    fn from(camera: FreelookCamera) -> Self {
        EditorCamera::Freelook(camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Degree;
    use approx::assert_abs_diff_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn new_respects_mode() {
        let camera = EditorCamera::new(
            CameraMode::Freelook,
            Vec3::new(0.0, 0.0, 15.0),
            Vec3::ZERO,
            Lens::default(),
        );
        assert_eq!(camera.mode(), CameraMode::Freelook);
        assert!(camera.camera().forward.abs_diff_eq(Vec3::NEGATIVE_UNIT_Z, 1e-6));
    }

    #[test]
    fn switching_keeps_the_view() {
        init_logger();
        let mut orbit = OrbitCamera::new(
            Vec3::new(3.0, 4.0, 12.0),
            Vec3::new(0.0, 1.0, 0.0),
            Lens::default(),
        );
        orbit.rotate_around_vertically(Degree(-25.0));
        let mut camera = EditorCamera::from(orbit);
        let before = camera.camera();

        camera.switch_to_freelook();
        let after = camera.camera();
        assert_eq!(camera.mode(), CameraMode::Freelook);
        assert!(after.position.abs_diff_eq(before.position, 1e-6));
        assert!(after.forward.abs_diff_eq(before.forward, 1e-5));

        camera.switch_to_orbit(5.0);
        let back = camera.camera();
        assert_eq!(camera.mode(), CameraMode::Orbit);
        assert!(back.position.abs_diff_eq(before.position, 1e-5));
        assert!(back.forward.abs_diff_eq(before.forward, 1e-4));
        let EditorCamera::Orbit(orbit) = &camera else {
            unreachable!()
        };
        assert_abs_diff_eq!(orbit.radius(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn switching_to_current_mode_is_a_no_op() {
        let mut camera = EditorCamera::default();
        let before = camera.view_matrix();
        camera.switch_to_orbit(3.0);
        assert_eq!(camera.view_matrix(), before);
    }

    #[test]
    fn toggle_cycles_modes() {
        let mut camera = EditorCamera::default();
        camera.toggle_mode(10.0);
        assert_eq!(camera.mode(), CameraMode::Freelook);
        camera.toggle_mode(10.0);
        assert_eq!(camera.mode(), CameraMode::Orbit);
    }

    #[test]
    fn aspect_ratio_is_validated() {
        let mut camera = EditorCamera::default();
        assert_eq!(
            camera.update_aspect_ratio(0.0),
            Err(CameraError::InvalidAspectRatio(0.0))
        );
        camera.update_aspect_ratio(2.0).expect("valid aspect");
        assert_eq!(camera.lens().aspect_ratio(), 2.0);
    }
}
