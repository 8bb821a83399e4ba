//! The editable scene: named mesh entities and the light registry.
//!
//! Both registries are keyed by unique names and track one "active" entry,
//! the one the editor's gizmo and property panels operate on.

mod lights;
mod meshes;

pub use lights::{
    LightKind, LightSource, LightUniform, LightingEnvironment, MAX_LIGHTS, SceneLights,
};
pub use meshes::{DrawCommand, MeshId, MeshName, Scene};
