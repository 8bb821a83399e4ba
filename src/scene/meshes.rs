use std::collections::HashMap;

use log::{debug, warn};

use crate::error::SceneError;
use crate::math::Mat4;
use crate::picking::{self, Collider, Ray, RayHit};
use crate::transform::Transform;

/// Type-safe handle to mesh geometry owned by the renderer.
///
/// The scene never looks inside a mesh; it only hands the handle back in
/// its [`DrawCommand`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Component holding the unique name of a scene entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshName(pub String);

/// One mesh to draw this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub name: String,
    pub mesh: MeshId,
    /// Object to world.
    pub model: Mat4,
    /// Inverse transpose of `model`, for transforming normals.
    pub normal_matrix: Mat4,
    /// `projection * view * model`.
    pub mvp: Mat4,
}

/// The named mesh entities of the editor.
///
/// Every entity carries a [`MeshName`], a [`Transform`], a [`MeshId`] and a
/// [`Collider`]. Names are unique; at most one entity is active.
///
/// ```
/// use orrery::picking::Collider;
/// use orrery::scene::{MeshId, Scene};
/// use orrery::{Transform, Vec3};
///
/// let mut scene = Scene::new();
/// scene.add("Cube", Transform::new(), MeshId(0), Collider::unit_box())?;
/// scene.set_active_mesh("Cube")?;
///
/// if let Some(transform) = scene.active_transform_mut() {
///     transform.position = Vec3::new(0.0, 1.0, 0.0);
/// }
/// assert_eq!(scene.transform("Cube").map(|t| t.position), Some(Vec3::new(0.0, 1.0, 0.0)));
/// # Ok::<(), orrery::SceneError>(())
/// ```
#[derive(Default)]
pub struct Scene {
    world: hecs::World,
    entities: HashMap<String, hecs::Entity>,
    active: Option<String>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("meshes", &self.names())
            .field("active", &self.active)
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh entity under a new, unique name.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        mesh: MeshId,
        collider: Collider,
    ) -> Result<hecs::Entity, SceneError> {
        let name = name.into();
        if self.entities.contains_key(&name) {
            warn!("scene: rejected duplicate mesh `{name}`");
            return Err(SceneError::DuplicateMesh(name));
        }

        let entity = self
            .world
            .spawn((MeshName(name.clone()), transform, mesh, collider));
        debug!("scene: added mesh `{name}` ({mesh:?})");
        self.entities.insert(name, entity);
        Ok(entity)
    }

    /// Removes a mesh. Removing the active mesh leaves no mesh active.
    pub fn remove(&mut self, name: &str) -> Result<(), SceneError> {
        let entity = self
            .entities
            .remove(name)
            .ok_or_else(|| SceneError::UnknownMesh(name.to_owned()))?;
        if let Err(err) = self.world.despawn(entity) {
            warn!("scene: mesh `{name}` had no live entity, {err}");
        }
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        debug!("scene: removed mesh `{name}`");
        Ok(())
    }

    /// Removes every mesh.
    pub fn clear(&mut self) {
        self.world.clear();
        self.entities.clear();
        self.active = None;
        debug!("scene: cleared");
    }

    pub fn has_mesh(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn entity(&self, name: &str) -> Option<hecs::Entity> {
        self.entities.get(name).copied()
    }

    /// A copy of the named mesh's transform.
    pub fn transform(&self, name: &str) -> Option<Transform> {
        let entity = self.entity(name)?;
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    pub fn transform_mut(&mut self, name: &str) -> Option<&mut Transform> {
        let entity = self.entity(name)?;
        self.world.query_one_mut::<&mut Transform>(entity).ok()
    }

    pub fn set_active_mesh(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.has_mesh(name) {
            warn!("scene: cannot activate unknown mesh `{name}`");
            return Err(SceneError::UnknownMesh(name.to_owned()));
        }
        self.active = Some(name.to_owned());
        Ok(())
    }

    pub fn clear_active_mesh(&mut self) {
        self.active = None;
    }

    pub fn has_active_mesh(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_mesh_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The transform the editor's gizmo currently manipulates.
    pub fn active_transform_mut(&mut self) -> Option<&mut Transform> {
        let entity = self.entity(self.active.as_deref()?)?;
        self.world.query_one_mut::<&mut Transform>(entity).ok()
    }

    /// Mesh names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The underlying entity store, for systems that query components.
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Model and MVP matrices of every mesh, ordered by name.
    pub fn draw_list(&self, view: &Mat4, projection: &Mat4) -> Vec<DrawCommand> {
        let view_projection = *projection * *view;
        let mut draws: Vec<DrawCommand> = self
            .world
            .query::<(&MeshName, &Transform, &MeshId)>()
            .iter()
            .map(|(_, (name, transform, mesh))| {
                let model = transform.matrix();
                DrawCommand {
                    name: name.0.clone(),
                    mesh: *mesh,
                    model,
                    normal_matrix: transform.inverse_matrix().transpose(),
                    mvp: view_projection * model,
                }
            })
            .collect();
        draws.sort_by(|a, b| a.name.cmp(&b.name));
        draws
    }

    /// The closest mesh under `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<RayHit> {
        picking::raycast(&self.world, ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Degree, Quat, Vec3};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scene_with(names: &[&str]) -> Scene {
        let mut scene = Scene::new();
        for (i, name) in names.iter().enumerate() {
            scene
                .add(*name, Transform::new(), MeshId(i), Collider::unit_box())
                .expect("unique name");
        }
        scene
    }

    #[test]
    fn duplicate_names_are_rejected() {
        init_logger();
        let mut scene = scene_with(&["Triangle"]);
        assert_eq!(
            scene.add("Triangle", Transform::new(), MeshId(7), Collider::unit_box()),
            Err(SceneError::DuplicateMesh("Triangle".to_owned()))
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn removing_the_active_mesh_clears_the_selection() {
        init_logger();
        let mut scene = scene_with(&["a", "b"]);
        scene.set_active_mesh("a").expect("known mesh");
        assert!(scene.has_active_mesh());

        scene.remove("b").expect("known mesh");
        assert_eq!(scene.active_mesh_name(), Some("a"));
        scene.remove("a").expect("known mesh");
        assert!(!scene.has_active_mesh());
        assert!(scene.is_empty());

        assert_eq!(scene.remove("a"), Err(SceneError::UnknownMesh("a".to_owned())));
    }

    #[test]
    fn removing_a_mesh_whose_entity_is_gone_still_unregisters_it() {
        init_logger();
        let mut scene = scene_with(&["a"]);
        let entity = scene.entity("a").expect("known mesh");
        scene.world.despawn(entity).expect("live entity");

        assert_eq!(scene.remove("a"), Ok(()));
        assert!(!scene.has_mesh("a"));
        assert_eq!(scene.world().len(), 0);
    }

    #[test]
    fn activating_an_unknown_mesh_fails() {
        let mut scene = scene_with(&["a"]);
        assert_eq!(
            scene.set_active_mesh("nope"),
            Err(SceneError::UnknownMesh("nope".to_owned()))
        );
        assert!(!scene.has_active_mesh());
        assert!(scene.active_transform_mut().is_none());
    }

    #[test]
    fn transforms_are_edited_in_place() {
        let mut scene = scene_with(&["a"]);
        if let Some(transform) = scene.transform_mut("a") {
            transform.scale = Vec3::splat(3.0);
        }
        assert_eq!(scene.transform("a").map(|t| t.scale), Some(Vec3::splat(3.0)));
        assert!(scene.transform_mut("missing").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let scene = scene_with(&["delta", "alpha", "charlie"]);
        assert_eq!(scene.names(), vec!["alpha", "charlie", "delta"]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut scene = scene_with(&["a", "b"]);
        scene.set_active_mesh("b").expect("known mesh");
        scene.clear();
        assert!(scene.is_empty());
        assert!(!scene.has_mesh("a"));
        assert!(!scene.has_active_mesh());
        assert_eq!(scene.world().len(), 0);
    }

    #[test]
    fn draw_list_composes_matrices() {
        let mut scene = scene_with(&["b", "a"]);
        let moved = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(Degree(30.0)));
        if let Some(transform) = scene.transform_mut("a") {
            *transform = moved;
        }

        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let projection = Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0));
        let draws = scene.draw_list(&view, &projection);

        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].name, "a");
        assert_eq!(draws[0].mesh, MeshId(1));
        assert_eq!(draws[0].model, moved.matrix());
        assert_eq!(draws[0].mvp, projection * view * moved.matrix());
        assert!(draws[0]
            .normal_matrix
            .abs_diff_eq(&moved.matrix().inverse().transpose(), 1e-5));
        assert_eq!(draws[1].name, "b");
        assert_eq!(draws[1].model, Mat4::IDENTITY);
    }

    #[test]
    fn pick_reports_the_mesh_name() {
        let mut scene = scene_with(&["near", "far"]);
        if let Some(transform) = scene.transform_mut("far") {
            transform.position = Vec3::new(0.0, 0.0, -5.0);
        }
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEGATIVE_UNIT_Z);
        let hit = scene.pick(&ray).expect("something is hit");
        assert_eq!(hit.name.as_deref(), Some("near"));
        assert_eq!(Some(hit.entity), scene.entity("near"));
    }
}
