//! # Orrery
//!
//! **The math, transform and camera core of an interactive 3D scene editor.**
//!
//! Typed angles, vectors, row-major matrices and quaternions; a
//! position/scale/rotation [`Transform`] that round-trips through a matrix;
//! orbit and freelook cameras; and the editor model built on them: a named
//! mesh [`Scene`], a light registry, ray picking and gizmo editing.
//!
//! ## Quick Start
//!
//! ```
//! use orrery::*;
//!
//! let mut world = World::new(EditorConfig::default())?;
//!
//! // Select the default mesh and rotate it with a gizmo-style edit.
//! world.scene.set_active_mesh("Triangle")?;
//! if let Some(transform) = world.scene.active_transform_mut() {
//!     transform.rotation = Quat::from_rotation_y(Degree(90.0));
//! }
//!
//! world.input.press_key(KeyCode::KeyW);
//! world.update(1.0 / 60.0);
//!
//! let frame = world.frame();
//! let mvp = frame.projection * frame.view * frame.draws[0].model;
//! assert_eq!(frame.draws[0].mvp, mvp);
//! # Ok::<(), EditorError>(())
//! ```
//!
//! ## Conventions
//!
//! - Right-handed, counter-clockwise positive. A +90° turn about Y takes
//!   `+X` to `-Z`.
//! - Matrices are row-major and act on column vectors: `a * b` applies `b`
//!   first, and a model-view-projection matrix is `projection * view * model`.
//! - `==` on vectors and matrices is exact. Use `abs_diff_eq` or
//!   `approx_eq` for tolerance comparisons.

mod camera;
mod editor_camera;
mod error;
mod freelook_camera;
pub mod gizmo;
mod input;
pub mod math;
mod orbit_camera;
pub mod picking;
pub mod scene;
mod transform;
pub mod world;

pub use camera::{Camera, Lens};
pub use editor_camera::{CameraMode, EditorCamera};
pub use error::{CameraError, EditorError, MathError, SceneError};
pub use freelook_camera::{FreelookCamera, MAX_PITCH};
pub use input::Input;
pub use math::{
    Angle, Decomposition, Degree, DepthRange, Mat3, Mat4, Quat, Radian, Vec2, Vec3, Vec4,
};
pub use orbit_camera::{MIN_ORBIT_RADIUS, OrbitCamera};
pub use transform::Transform;

// Editor model
pub use picking::{Collider, Ray, RayHit};
pub use scene::{
    DrawCommand, LightKind, LightSource, LightUniform, LightingEnvironment, MeshId, Scene,
    SceneLights,
};
pub use world::{EditorConfig, FrameData, World};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

pub use hecs::Entity;
