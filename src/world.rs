//! The editor's state container.
//!
//! A [`World`] owns the viewport camera, the mesh scene, the lights and the
//! input state. The host application feeds it window events, calls
//! [`World::update`] once per frame and hands [`World::frame`] to its
//! renderer.
//!
//! ```
//! use orrery::world::{EditorConfig, World};
//!
//! let mut world = World::new(EditorConfig::default())?;
//! assert!(world.scene.has_mesh("Triangle"));
//!
//! // In the frame loop:
//! world.update(1.0 / 60.0);
//! let frame = world.frame();
//! assert_eq!(frame.draws.len(), 1);
//! # Ok::<(), orrery::EditorError>(())
//! ```

use log::{debug, warn};
use winit::event::WindowEvent;

use crate::camera::Lens;
use crate::editor_camera::{CameraMode, EditorCamera};
use crate::error::EditorError;
use crate::gizmo;
use crate::input::Input;
use crate::math::{Degree, Mat4, Vec3};
use crate::picking::{Collider, Ray, RayHit};
use crate::scene::{DrawCommand, LightUniform, LightingEnvironment, MeshId, Scene, SceneLights};
use crate::transform::Transform;

/// Half length of each world-axis line.
pub const AXIS_EXTENT: f32 = 10_000.0;
/// Brightness of the world-axis colours.
pub const AXIS_INTENSITY: f32 = 0.4;

/// A vertex of the world-axis line list.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

const fn axis_vertex(axis: usize, sign: f32) -> LineVertex {
    let mut position = [0.0; 3];
    let mut normal = [0.0; 3];
    let mut color = [0.0; 3];
    position[axis] = sign * AXIS_EXTENT;
    normal[axis] = 1.0;
    color[axis] = AXIS_INTENSITY;
    LineVertex {
        position,
        normal,
        color,
    }
}

/// X (red), Y (green) and Z (blue) axis lines, two vertices each, drawn
/// with an identity model matrix and no lights.
pub const WORLD_AXIS: [LineVertex; 6] = [
    axis_vertex(0, -1.0),
    axis_vertex(0, 1.0),
    axis_vertex(1, -1.0),
    axis_vertex(1, 1.0),
    axis_vertex(2, -1.0),
    axis_vertex(2, 1.0),
];

/// Startup settings for a [`World`].
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Viewport size in pixels.
    pub width: u32,
    pub height: u32,
    pub camera_mode: CameraMode,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub near: f32,
    pub far: f32,
    pub vertical_fov: Degree,
    /// Freelook movement in units per second.
    pub move_speed: f32,
    /// Degrees of turn per pixel of mouse drag. `None` keeps each camera
    /// mode's own default.
    pub mouse_sensitivity: Option<f32>,
    /// Spawn a "Triangle" mesh so a fresh editor has something to show.
    pub default_mesh: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            camera_mode: CameraMode::Orbit,
            camera_position: Vec3::new(0.0, 0.0, 15.0),
            camera_target: Vec3::ZERO,
            near: 0.01,
            far: 40.0,
            vertical_fov: Degree(45.0),
            move_speed: 5.0,
            mouse_sensitivity: None,
            default_mesh: true,
        }
    }
}

impl EditorConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_camera_mode(mut self, mode: CameraMode) -> Self {
        self.camera_mode = mode;
        self
    }

    /// Places the camera at `position`, looking at `target`.
    pub fn with_camera(mut self, position: Vec3, target: Vec3) -> Self {
        self.camera_position = position;
        self.camera_target = target;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_vertical_fov(mut self, fov: Degree) -> Self {
        self.vertical_fov = fov;
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = Some(sensitivity);
        self
    }

    pub fn without_default_mesh(mut self) -> Self {
        self.default_mesh = false;
        self
    }

    fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Per-frame camera data for the shaders.
///
/// Matrices are column-major.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// `projection * view`.
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Eye position in world space, for specular lighting.
    pub camera_pos: [f32; 3],
    /// How many entries of the light array are in use.
    pub light_count: u32,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameData {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye_position: Vec3,
    pub camera: CameraUniforms,
    pub draws: Vec<DrawCommand>,
    pub lights: Vec<LightUniform>,
    pub lighting: LightingEnvironment,
}

/// The editor's state: camera, scene, lights and input.
#[derive(Debug)]
pub struct World {
    pub camera: EditorCamera,
    pub scene: Scene,
    pub lights: SceneLights,
    pub input: Input,
    pub lighting: LightingEnvironment,
    width: u32,
    height: u32,
    move_speed: f32,
    mouse_sensitivity: Option<f32>,
}

impl World {
    /// Builds a world from `config`, validating the lens.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        let lens = Lens::new(
            config.near,
            config.far,
            config.aspect_ratio(),
            config.vertical_fov,
        )?;
        let camera = EditorCamera::new(
            config.camera_mode,
            config.camera_position,
            config.camera_target,
            lens,
        );

        let mut scene = Scene::new();
        if config.default_mesh {
            // A 10×10 triangle in the z = 0 plane.
            scene.add(
                "Triangle",
                Transform::new(),
                MeshId(0),
                Collider::box_collider(Vec3::new(10.0, 10.0, 0.1)),
            )?;
        }

        let mut world = Self {
            camera,
            scene,
            lights: SceneLights::new(),
            input: Input::new(),
            lighting: LightingEnvironment::default(),
            width: config.width,
            height: config.height,
            move_speed: config.move_speed,
            mouse_sensitivity: config.mouse_sensitivity,
        };
        world.apply_controls();
        debug!(
            "world: {}x{} viewport, {:?} camera",
            world.width,
            world.height,
            world.camera.mode()
        );
        Ok(world)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Feeds a window event to the input state. Resizes reach the camera.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
        }
        self.input.handle_event(event);
    }

    /// Advances the camera by one frame, then clears the frame's input edges.
    pub fn update(&mut self, dt: f32) {
        self.camera.update(&self.input, dt);
        self.input.begin_frame();
    }

    /// Tracks a new viewport size. A zero-sized (minimised) window is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        if let Err(err) = self.camera.update_aspect_ratio(width as f32 / height as f32) {
            warn!("world: resize to {width}x{height} rejected, {err}");
        }
    }

    /// Flips between orbit and freelook, keeping the view.
    ///
    /// A new orbit target is placed at the distance of the scene origin.
    pub fn toggle_camera_mode(&mut self) {
        let distance = self.camera.eye_position().length();
        self.camera.toggle_mode(distance);
        self.apply_controls();
    }

    fn apply_controls(&mut self) {
        if let EditorCamera::Freelook(camera) = &mut self.camera {
            camera.speed = self.move_speed;
        }
        if let Some(sensitivity) = self.mouse_sensitivity {
            self.camera.set_sensitivity(sensitivity);
        }
    }

    /// Collects the matrices and light blocks for the current frame.
    pub fn frame(&self) -> FrameData {
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();
        let eye_position = self.camera.eye_position();
        let lights = self.lights.uniforms();

        let camera = CameraUniforms {
            view_proj: bytemuck::cast((projection * view).to_cols_array()),
            view: bytemuck::cast(view.to_cols_array()),
            proj: bytemuck::cast(projection.to_cols_array()),
            camera_pos: eye_position.to_array(),
            light_count: lights.len() as u32,
        };

        FrameData {
            view,
            projection,
            eye_position,
            camera,
            draws: self.scene.draw_list(&view, &projection),
            lights,
            lighting: self.lighting,
        }
    }

    /// Picks the mesh under a viewport position and makes it active.
    /// Clicking empty space clears the selection.
    pub fn pick_at(&mut self, screen_x: f32, screen_y: f32) -> Result<Option<RayHit>, EditorError> {
        let ray = Ray::from_screen(
            screen_x,
            screen_y,
            self.width as f32,
            self.height as f32,
            &self.camera.view_matrix(),
            &self.camera.projection_matrix(),
        )?;

        let hit = self.scene.pick(&ray);
        match hit.as_ref().and_then(|hit| hit.name.as_deref()) {
            Some(name) => {
                self.scene.set_active_mesh(name)?;
                debug!("world: picked `{name}`");
            }
            None => self.scene.clear_active_mesh(),
        }
        Ok(hit)
    }

    /// [`pick_at`](Self::pick_at) the current cursor position.
    pub fn pick_at_cursor(&mut self) -> Result<Option<RayHit>, EditorError> {
        let cursor = self.input.mouse_position();
        self.pick_at(cursor.x, cursor.y)
    }

    /// Runs a gizmo edit on the active mesh's transform.
    pub fn edit_active(&mut self, edit: impl FnOnce(&mut [f32; 16])) -> Result<(), EditorError> {
        let transform = self
            .scene
            .active_transform_mut()
            .ok_or(EditorError::NoActiveMesh)?;
        gizmo::edit_transform(transform, edit)?;
        Ok(())
    }
}
