use winit::event::MouseButton;

use crate::camera::{Camera, Lens};
use crate::error::CameraError;
use crate::input::Input;
use crate::math::scalar::EPSILON;
use crate::math::{Degree, Mat4, Quat, Vec3, projection};

/// The orbit radius never shrinks below this.
pub const MIN_ORBIT_RADIUS: f32 = 0.1;

/// A camera that orbits a target point, editor style.
///
/// Horizontal orbiting turns the eye about world Y through the target.
/// Vertical orbiting turns it about the camera's own right vector and is
/// allowed to go over the top: the accumulated pitch is tracked, and once
/// it passes ±90° the basis is built against `-Y` so the view does not
/// snap around.
///
/// The basis (`front`, `right`, `up`) is cached and re-derived by every
/// method that moves the eye or the target.
///
/// ```
/// use orrery::{Degree, Lens, OrbitCamera, Vec3};
///
/// let mut orbit = OrbitCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Lens::default());
/// orbit.rotate_around_horizontally(Degree(90.0));
/// assert!(orbit.position().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
///
/// orbit.zoom(-1e9);
/// assert!(orbit.radius() >= 0.1);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    position: Vec3,
    target: Vec3,
    /// Accumulated vertical orbit in degrees, wrapped into [-180, 180].
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    lens: Lens,
    /// Degrees of orbit per pixel of mouse drag.
    pub sensitivity: f32,
    /// Units of zoom per scroll line.
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Lens::default())
    }
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3, lens: Lens) -> Self {
        let mut camera = Self {
            position,
            target,
            pitch: 0.0,
            front: Vec3::NEGATIVE_UNIT_Z,
            right: Vec3::UNIT_X,
            up: Vec3::UNIT_Y,
            lens,
            sensitivity: 0.25,
            zoom_speed: 1.0,
        };
        camera.update_orientation();
        camera
    }

    /// Set mouse sensitivity in degrees per pixel.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Seeds the tracked pitch for an eye that starts above or below the
    /// target. Positive means the eye is below it, looking up.
    pub fn with_pitch(mut self, pitch: Degree) -> Self {
        self.pitch = wrap_degrees(pitch.value());
        self.update_orientation();
        self
    }

    /// Set scroll zoom speed in units per line.
    pub fn with_zoom_speed(mut self, zoom_speed: f32) -> Self {
        self.zoom_speed = zoom_speed;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Accumulated vertical orbit angle.
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

    /// Distance from the eye to the target.
    pub fn radius(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_orientation();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_orientation();
    }

    /// Moves eye and target together along the right vector.
    pub fn move_right(&mut self, distance: f32) {
        self.translate(self.right * distance);
    }

    /// Moves eye and target together along the up vector.
    pub fn move_up(&mut self, distance: f32) {
        self.translate(self.up * distance);
    }

    /// Moves eye and target together along the view direction.
    pub fn move_front(&mut self, distance: f32) {
        self.translate(self.front * distance);
    }

    fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.target += offset;
    }

    /// Orbits about the world Y axis through the target.
    pub fn rotate_around_horizontally(&mut self, angle: Degree) {
        let rotation = Quat::from_angle_axis(angle, Vec3::UNIT_Y);
        self.position = self.target + rotation * (self.position - self.target);
        self.update_orientation();
    }

    /// Orbits about the camera's right vector through the target.
    ///
    /// Positive angles move the eye downwards.
    pub fn rotate_around_vertically(&mut self, angle: Degree) {
        self.pitch = wrap_degrees(self.pitch + angle.value());

        let rotation = Quat::from_angle_axis(angle, self.right);
        self.position = self.target + rotation * (self.position - self.target);
        self.update_orientation();
    }

    /// Moves the eye towards (negative) or away from (positive) the target.
    /// The radius is floored at [`MIN_ORBIT_RADIUS`].
    pub fn zoom(&mut self, distance: f32) {
        let mut direction = self.position - self.target;
        let radius = direction.normalise();
        if radius < EPSILON {
            direction = -self.front;
        }

        let radius = (radius + distance).max(MIN_ORBIT_RADIUS);
        self.position = self.target + direction * radius;
        self.update_orientation();
    }

    /// Back to the default pose: eye at `(0, 0, 10)` looking at the origin.
    pub fn reset_pose(&mut self) {
        self.position = Vec3::new(0.0, 0.0, 10.0);
        self.target = Vec3::ZERO;
        self.pitch = 0.0;
        self.update_orientation();
    }

    /// Re-derives `front`, `right` and `up` from the eye, the target and the
    /// tracked pitch. Degenerate directions keep their previous value.
    pub fn update_orientation(&mut self) {
        let front = self.target - self.position;
        if !front.is_zero_length() {
            self.front = front.normalised();
        }

        let world_up = if self.pitch.abs() < 90.0 {
            Vec3::UNIT_Y
        } else {
            Vec3::NEGATIVE_UNIT_Y
        };
        let right = self.front.cross(world_up);
        if !right.is_zero_length() {
            self.right = right.normalised();
        }

        self.up = self.right.cross(self.front).normalised();
    }

    pub fn view_matrix(&self) -> Mat4 {
        projection::look_at(self.position, self.target, self.up)
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

    /// Left drag orbits, the scroll wheel zooms.
    pub fn update(&mut self, input: &Input, _dt: f32) {
        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            if delta.x != 0.0 {
                self.rotate_around_horizontally(Degree(-delta.x * self.sensitivity));
            }
            if delta.y != 0.0 {
                self.rotate_around_vertically(Degree(-delta.y * self.sensitivity));
            }
        }

        let scroll = input.scroll_delta();
        if scroll.y != 0.0 {
            self.zoom(-scroll.y * self.zoom_speed);
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

/// Wraps an angle in degrees into `[-180, 180]`.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}
