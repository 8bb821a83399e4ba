use thiserror::Error;

/// Violated preconditions of the matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("matrix is not affine (bottom row must be 0 0 0 1)")]
    NotAffine,
    #[error("matrix is singular")]
    Singular,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("near plane must be positive and finite, got {0}")]
    InvalidNearPlane(f32),
    #[error("far plane {far} must be finite and beyond the near plane {near}")]
    InvalidFarPlane { near: f32, far: f32 },
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),
    #[error("vertical field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("a mesh named `{0}` already exists")]
    DuplicateMesh(String),
    #[error("no mesh named `{0}`")]
    UnknownMesh(String),
    #[error("a light named `{0}` already exists")]
    DuplicateLight(String),
    #[error("light capacity of {capacity} reached")]
    LightCapacity { capacity: usize },
    #[error("no light named `{0}`")]
    UnknownLight(String),
    #[error("no light is active")]
    NoActiveLight,
}

/// Any error surfaced by the editor [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("no mesh is active")]
    NoActiveMesh,
}
