//! A first-person yaw/pitch camera for flying through the scene.
//!
//! # Controls
//!
//! - **W/S**: Move forward/backward
//! - **A/D**: Strafe left/right
//! - **Shift** (either): Double movement speed
//! - **Right mouse drag**: Look around
//!
//! # Example
//!
//! ```
//! use orrery::{Degree, FreelookCamera, Input, Lens, Vec3};
//!
//! let mut camera = FreelookCamera::new(Vec3::new(0.0, 1.8, 5.0), Lens::default()).with_speed(4.0);
//! assert!(camera.front().abs_diff_eq(Vec3::NEGATIVE_UNIT_Z, 1e-6));
//!
//! // Looking straight up is clamped short of the pole.
//! camera.move_yaw_and_pitch(Degree(0.0), Degree(1000.0));
//! assert_eq!(camera.pitch(), Degree(89.0));
//!
//! // In the frame loop:
//! let input = Input::new();
//! camera.update(&input, 1.0 / 60.0);
//! ```

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::camera::{Camera, Lens};
use crate::error::CameraError;
use crate::input::Input;
use crate::math::scalar::RAD_TO_DEG;
use crate::math::{Degree, Mat4, Quat, Vec2, Vec3, projection};

/// Pitch is kept strictly inside this many degrees of the horizon.
pub const MAX_PITCH: f32 = 89.0;

/// A first-person camera driven by yaw and pitch angles.
///
/// Yaw turns about world Y (positive turns left), pitch about the camera's
/// own X axis (positive looks up). With both at zero the camera looks down
/// `-Z`. The basis is recomputed whenever either angle changes.
#[derive(Clone, Debug)]
pub struct FreelookCamera {
    position: Vec3,
    /// Degrees.
    yaw: f32,
    /// Degrees, within `±MAX_PITCH`.
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    lens: Lens,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Degrees of turn per pixel of mouse drag.
    pub sensitivity: f32,
}

impl Default for FreelookCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Lens::default())
    }
}

impl FreelookCamera {
    /// Create a new freelook camera looking down `-Z`.
    pub fn new(position: Vec3, lens: Lens) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            front: Vec3::NEGATIVE_UNIT_Z,
            right: Vec3::UNIT_X,
            up: Vec3::UNIT_Y,
            lens,
            speed: 5.0,
            sensitivity: 0.05,
        }
    }

    /// Set movement speed in units per second.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set mouse sensitivity in degrees per pixel.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the initial look angles.
    pub fn with_yaw_pitch(mut self, yaw: Degree, pitch: Degree) -> Self {
        self.set_yaw_pitch(yaw, pitch);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> Degree {
        Degree(self.yaw)
    }

    pub fn pitch(&self) -> Degree {
        Degree(self.pitch)
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    pub fn lens_mut(&mut self) -> &mut Lens {
        &mut self.lens
    }

    /// The orientation as a quaternion: yaw about world Y, then pitch.
    pub fn orientation(&self) -> Quat {
        Quat::from_yaw_pitch(Degree(self.yaw), Degree(self.pitch))
    }

    pub fn set_yaw_pitch(&mut self, yaw: Degree, pitch: Degree) {
        self.yaw = yaw.value();
        self.pitch = pitch.value().clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Turns by the given amounts; the resulting pitch is clamped.
    pub fn move_yaw_and_pitch(&mut self, delta_yaw: Degree, delta_pitch: Degree) {
        self.set_yaw_pitch(
            Degree(self.yaw + delta_yaw.value()),
            Degree(self.pitch + delta_pitch.value()),
        );
    }

    /// Turns to face `target`. A target at the eye position is ignored.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        if direction.is_zero_length() {
            return;
        }
        let d = direction.normalised();
        let yaw = (-d.x).atan2(-d.z) * RAD_TO_DEG;
        let pitch = d.y.clamp(-1.0, 1.0).asin() * RAD_TO_DEG;
        self.set_yaw_pitch(Degree(yaw), Degree(pitch));
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up * distance;
    }

    pub fn move_front(&mut self, distance: f32) {
        self.position += self.front * distance;
    }

    fn update_vectors(&mut self) {
        let orientation = self.orientation();
        self.front = orientation * Vec3::NEGATIVE_UNIT_Z;
        self.right = orientation * Vec3::UNIT_X;
        self.up = orientation * Vec3::UNIT_Y;
    }

    pub fn view_matrix(&self) -> Mat4 {
        projection::look_at(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.lens.projection_matrix()
    }

    /// `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<(), CameraError> {
        self.lens.set_aspect_ratio(aspect_ratio)
    }

    /// Update the camera based on input and delta time.
    pub fn update(&mut self, input: &Input, dt: f32) {
        let mut distance = self.speed * dt;
        if input.shift_down() {
            distance *= 2.0;
        }
        if input.key_down(KeyCode::KeyW) {
            self.move_front(distance);
        }
        if input.key_down(KeyCode::KeyS) {
            self.move_front(-distance);
        }
        if input.key_down(KeyCode::KeyA) {
            self.move_right(-distance);
        }
        if input.key_down(KeyCode::KeyD) {
            self.move_right(distance);
        }

        if input.mouse_down(MouseButton::Right) {
            let delta = input.mouse_delta();
            if delta != Vec2::ZERO {
                // Dragging right turns right, dragging down looks down.
                self.move_yaw_and_pitch(
                    Degree(-delta.x * self.sensitivity),
                    Degree(-delta.y * self.sensitivity),
                );
            }
        }
    }

    /// Get the current camera state.
    pub fn camera(&self) -> Camera {
        Camera {
            position: self.position,
            forward: self.front,
            up: self.up,
            lens: self.lens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera() -> FreelookCamera {
        FreelookCamera::new(Vec3::ZERO, Lens::default())
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        camera.move_yaw_and_pitch(Degree(0.0), Degree(1000.0));
        assert!(camera.pitch().value() <= MAX_PITCH);
        camera.move_yaw_and_pitch(Degree(0.0), Degree(-5000.0));
        assert!(camera.pitch().value() >= -MAX_PITCH);
        assert!(!camera.view_matrix().as_slice().iter().any(|v| v.is_nan()));
    }

    #[test]
    fn yaw_turns_left() {
        let mut camera = camera();
        camera.move_yaw_and_pitch(Degree(90.0), Degree(0.0));
        assert!(camera.front().abs_diff_eq(Vec3::NEGATIVE_UNIT_X, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::NEGATIVE_UNIT_Z, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::UNIT_Y, 1e-6));
    }

    #[test]
    fn pitch_looks_up() {
        let mut camera = camera();
        camera.move_yaw_and_pitch(Degree(0.0), Degree(45.0));
        assert!(camera.front().y > 0.0);
        assert_abs_diff_eq!(camera.front().dot(camera.up()), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.right().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_faces_target() {
        let mut camera = camera();
        camera.set_position(Vec3::new(1.0, 0.0, 1.0));
        camera.look_at(Vec3::new(4.0, 2.0, -5.0));
        let expected = (Vec3::new(4.0, 2.0, -5.0) - camera.position()).normalised();
        assert!(camera.front().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn wasd_moves_along_basis_and_shift_doubles() {
        let mut camera = camera();
        let mut input = Input::new();
        input.press_key(KeyCode::KeyW);
        camera.update(&input, 0.5);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, -2.5), 1e-6));

        input.release_key(KeyCode::KeyW);
        input.press_key(KeyCode::KeyD);
        input.press_key(KeyCode::ShiftLeft);
        camera.update(&input, 0.5);
        assert!(camera.position().abs_diff_eq(Vec3::new(5.0, 0.0, -2.5), 1e-6));
    }

    #[test]
    fn right_drag_turns() {
        let mut camera = camera();
        let mut input = Input::new();
        input.move_mouse(Vec2::new(100.0, 0.0));
        camera.update(&input, 0.0);
        assert_eq!(camera.yaw(), Degree(0.0), "no turning without the right button");

        input.press_mouse(MouseButton::Right);
        camera.update(&input, 0.0);
        // 100 px to the right at 0.05 deg/px.
        assert_abs_diff_eq!(camera.yaw().value(), -5.0, epsilon = 1e-5);
        assert!(camera.front().x > 0.0, "dragging right turns right");
    }

    #[test]
    fn view_matrix_matches_orientation() {
        let mut camera = camera();
        camera.set_position(Vec3::new(2.0, 3.0, 4.0));
        camera.set_yaw_pitch(Degree(30.0), Degree(-20.0));
        let from_orientation =
            projection::view_from_orientation(camera.position(), camera.orientation(), None);
        assert!(camera.view_matrix().abs_diff_eq(&from_orientation, 1e-5));
    }
}
