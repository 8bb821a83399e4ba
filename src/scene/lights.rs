use std::collections::HashMap;

use log::{debug, warn};

use crate::error::SceneError;
use crate::math::Vec3;

/// Most lights the shading model accepts at once.
pub const MAX_LIGHTS: usize = 16;

/// The variant-specific part of a light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Parallel rays, like sunlight.
    Directional { direction: Vec3 },
    /// Emits in every direction from a position.
    Point {
        position: Vec3,
        /// Constant, linear and quadratic falloff coefficients.
        attenuation: Vec3,
    },
    /// A cone of light.
    Spot {
        position: Vec3,
        attenuation: Vec3,
        direction: Vec3,
        /// Cosine of the cone's half angle.
        cutoff_cos_angle: f32,
        /// Exponent shaping the edge of the cone.
        falloff: f32,
    },
}

impl LightKind {
    /// The type tag the shaders switch on.
    pub fn tag(&self) -> u32 {
        match self {
            LightKind::Directional { .. } => LightUniform::DIRECTIONAL,
            LightKind::Point { .. } => LightUniform::POINT,
            LightKind::Spot { .. } => LightUniform::SPOT,
        }
    }
}

/// A light in the scene: its intensities and its kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub kind: LightKind,
}

impl LightSource {
    pub fn directional(diffuse: Vec3, specular: Vec3, direction: Vec3) -> Self {
        Self {
            diffuse,
            specular,
            kind: LightKind::Directional { direction },
        }
    }

    pub fn point(diffuse: Vec3, specular: Vec3, position: Vec3, attenuation: Vec3) -> Self {
        Self {
            diffuse,
            specular,
            kind: LightKind::Point {
                position,
                attenuation,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn spot(
        diffuse: Vec3,
        specular: Vec3,
        position: Vec3,
        attenuation: Vec3,
        direction: Vec3,
        cutoff_cos_angle: f32,
        falloff: f32,
    ) -> Self {
        Self {
            diffuse,
            specular,
            kind: LightKind::Spot {
                position,
                attenuation,
                direction,
                cutoff_cos_angle,
                falloff,
            },
        }
    }

    /// Packs the light for upload. Fields the kind does not use are zero.
    pub fn to_uniform(&self) -> LightUniform {
        let mut uniform = LightUniform {
            diffuse: self.diffuse.to_array(),
            light_type: self.kind.tag(),
            specular: self.specular.to_array(),
            ..LightUniform::default()
        };
        match self.kind {
            LightKind::Directional { direction } => {
                uniform.direction = direction.to_array();
            }
            LightKind::Point {
                position,
                attenuation,
            } => {
                uniform.position = position.to_array();
                uniform.attenuation = attenuation.to_array();
            }
            LightKind::Spot {
                position,
                attenuation,
                direction,
                cutoff_cos_angle,
                falloff,
            } => {
                uniform.position = position.to_array();
                uniform.attenuation = attenuation.to_array();
                uniform.direction = direction.to_array();
                uniform.cutoff_cos_angle = cutoff_cos_angle;
                uniform.falloff = falloff;
            }
        }
        uniform
    }
}

/// One entry of the shader's light array.
///
/// Every `vec3` is followed by a scalar so the struct matches std140 and
/// WGSL uniform layout without hidden padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub diffuse: [f32; 3],
    /// One of [`DIRECTIONAL`](Self::DIRECTIONAL), [`POINT`](Self::POINT)
    /// or [`SPOT`](Self::SPOT).
    pub light_type: u32,
    pub specular: [f32; 3],
    pub cutoff_cos_angle: f32,
    pub position: [f32; 3],
    pub falloff: f32,
    pub direction: [f32; 3],
    /// Padding for 16-byte alignment.
    pub _padding0: f32,
    pub attenuation: [f32; 3],
    /// Padding for 16-byte alignment.
    pub _padding1: f32,
}

impl LightUniform {
    pub const DIRECTIONAL: u32 = 0;
    pub const POINT: u32 = 1;
    pub const SPOT: u32 = 2;
}

/// Material and ambient terms shared by every lit mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingEnvironment {
    pub ambient_intensity: Vec3,
    pub ambient_reflection: Vec3,
    pub diffuse_reflection: Vec3,
    pub specular_reflection: Vec3,
    pub specular_power: f32,
    pub emissive_intensity: Vec3,
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self {
            ambient_intensity: Vec3::splat(0.9),
            ambient_reflection: Vec3::splat(0.5),
            diffuse_reflection: Vec3::splat(0.8),
            specular_reflection: Vec3::ONE,
            specular_power: 32.0,
            emissive_intensity: Vec3::ZERO,
        }
    }
}

/// The named lights of the editor, at most [`MAX_LIGHTS`] of them.
///
/// ```
/// use orrery::scene::{LightSource, SceneLights};
/// use orrery::Vec3;
///
/// let mut lights = SceneLights::new();
/// let sun = LightSource::directional(Vec3::ONE, Vec3::ONE, Vec3::NEGATIVE_UNIT_Y);
/// lights.add("sun", sun)?;
/// lights.set_active("sun")?;
/// lights.rename_active("key light")?;
///
/// assert_eq!(lights.names(), vec!["key light"]);
/// assert_eq!(lights.active_name(), Some("key light"));
/// # Ok::<(), orrery::SceneError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SceneLights {
    lights: HashMap<String, LightSource>,
    active: Option<String>,
}

impl SceneLights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light under a new, unique name.
    pub fn add(&mut self, name: impl Into<String>, light: LightSource) -> Result<(), SceneError> {
        let name = name.into();
        if self.lights.contains_key(&name) {
            warn!("lights: rejected duplicate light `{name}`");
            return Err(SceneError::DuplicateLight(name));
        }
        if self.lights.len() >= MAX_LIGHTS {
            warn!("lights: cannot add `{name}`, {MAX_LIGHTS} lights already");
            return Err(SceneError::LightCapacity {
                capacity: MAX_LIGHTS,
            });
        }
        debug!("lights: added `{name}` (type {})", light.kind.tag());
        self.lights.insert(name, light);
        Ok(())
    }

    /// Removes a light. Removing the active light leaves none active.
    pub fn remove(&mut self, name: &str) -> Result<LightSource, SceneError> {
        let light = self
            .lights
            .remove(name)
            .ok_or_else(|| SceneError::UnknownLight(name.to_owned()))?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        debug!("lights: removed `{name}`");
        Ok(light)
    }

    pub fn clear(&mut self) {
        self.lights.clear();
        self.active = None;
    }

    pub fn has_light(&self, name: &str) -> bool {
        self.lights.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&LightSource> {
        self.lights.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LightSource> {
        self.lights.get_mut(name)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.has_light(name) {
            return Err(SceneError::UnknownLight(name.to_owned()));
        }
        self.active = Some(name.to_owned());
        Ok(())
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&LightSource> {
        self.lights.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut LightSource> {
        self.lights.get_mut(self.active.as_deref()?)
    }

    /// Moves the active light to a new name and keeps it active.
    ///
    /// Renaming to the current name is a no-op. Renaming onto another
    /// light's name fails and changes nothing.
    pub fn rename_active(&mut self, new_name: impl Into<String>) -> Result<(), SceneError> {
        let new_name = new_name.into();
        let Some(old_name) = self.active.clone() else {
            return Err(SceneError::NoActiveLight);
        };
        if old_name == new_name {
            return Ok(());
        }
        if self.lights.contains_key(&new_name) {
            return Err(SceneError::DuplicateLight(new_name));
        }

        let light = self.remove(&old_name)?;
        debug!("lights: renamed `{old_name}` to `{new_name}`");
        self.lights.insert(new_name.clone(), light);
        self.active = Some(new_name);
        Ok(())
    }

    /// Light names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.lights.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Upload blocks for every light, in name order.
    pub fn uniforms(&self) -> Vec<LightUniform> {
        self.names()
            .into_iter()
            .filter_map(|name| self.lights.get(name))
            .map(LightSource::to_uniform)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sun() -> LightSource {
        LightSource::directional(Vec3::ONE, Vec3::splat(0.5), Vec3::NEGATIVE_UNIT_Y)
    }

    #[test]
    fn capacity_is_enforced() {
        init_logger();
        let mut lights = SceneLights::new();
        for i in 0..MAX_LIGHTS {
            lights.add(format!("light {i}"), sun()).expect("below capacity");
        }
        assert_eq!(
            lights.add("one too many", sun()),
            Err(SceneError::LightCapacity { capacity: 16 })
        );
        assert_eq!(lights.len(), MAX_LIGHTS);

        lights.remove("light 3").expect("known light");
        assert!(lights.add("one too many", sun()).is_ok());
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut lights = SceneLights::new();
        lights.add("sun", sun()).expect("first");
        assert_eq!(
            lights.add("sun", sun()),
            Err(SceneError::DuplicateLight("sun".to_owned()))
        );
    }

    #[test]
    fn removing_the_active_light_clears_it() {
        let mut lights = SceneLights::new();
        lights.add("sun", sun()).expect("first");
        lights.set_active("sun").expect("known light");
        assert!(lights.has_active());
        assert_eq!(lights.remove("sun"), Ok(sun()));
        assert!(!lights.has_active());
        assert_eq!(lights.active(), None);
        assert_eq!(lights.remove("sun"), Err(SceneError::UnknownLight("sun".to_owned())));
    }

    #[test]
    fn rename_requires_an_active_light() {
        let mut lights = SceneLights::new();
        lights.add("sun", sun()).expect("first");
        assert_eq!(lights.rename_active("moon"), Err(SceneError::NoActiveLight));
        assert_eq!(
            lights.set_active("moon"),
            Err(SceneError::UnknownLight("moon".to_owned()))
        );
    }

    #[test]
    fn rename_keeps_the_light_and_selection() {
        let mut lights = SceneLights::new();
        lights.add("sun", sun()).expect("first");
        lights.add("lamp", LightSource::point(Vec3::ONE, Vec3::ONE, Vec3::UNIT_Y, Vec3::UNIT_X))
            .expect("second");
        lights.set_active("sun").expect("known light");

        assert_eq!(
            lights.rename_active("lamp"),
            Err(SceneError::DuplicateLight("lamp".to_owned()))
        );
        assert_eq!(lights.active_name(), Some("sun"));

        lights.rename_active("key").expect("free name");
        assert_eq!(lights.names(), vec!["key", "lamp"]);
        assert_eq!(lights.active(), Some(&sun()));

        lights.rename_active("key").expect("same name");
        assert_eq!(lights.active_name(), Some("key"));
    }

    #[test]
    fn active_light_is_editable() {
        let mut lights = SceneLights::new();
        lights.add("sun", sun()).expect("first");
        lights.set_active("sun").expect("known light");
        if let Some(light) = lights.active_mut() {
            light.diffuse = Vec3::splat(0.25);
        }
        assert_eq!(lights.get("sun").map(|l| l.diffuse), Some(Vec3::splat(0.25)));
    }

    #[test]
    fn uniforms_carry_type_tags_in_name_order() {
        let mut lights = SceneLights::new();
        let spot = LightSource::spot(
            Vec3::ONE,
            Vec3::ONE,
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(1.0, 0.1, 0.01),
            Vec3::NEGATIVE_UNIT_Y,
            0.9,
            8.0,
        );
        lights.add("c spot", spot).expect("first");
        lights.add("a sun", sun()).expect("second");
        lights
            .add("b lamp", LightSource::point(Vec3::ONE, Vec3::ONE, Vec3::UNIT_Y, Vec3::UNIT_X))
            .expect("third");

        let uniforms = lights.uniforms();
        let tags: Vec<u32> = uniforms.iter().map(|u| u.light_type).collect();
        assert_eq!(tags, vec![0, 1, 2]);

        assert_eq!(uniforms[0].direction, [0.0, -1.0, 0.0]);
        assert_eq!(uniforms[0].position, [0.0; 3]);
        assert_eq!(uniforms[2].position, [0.0, 5.0, 0.0]);
        assert_eq!(uniforms[2].cutoff_cos_angle, 0.9);
        assert_eq!(uniforms[2].falloff, 8.0);
    }

    #[test]
    fn uniform_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        let uniforms = [sun().to_uniform(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&uniforms);
        assert_eq!(bytes.len(), 160);
    }

    #[test]
    fn lighting_defaults() {
        let env = LightingEnvironment::default();
        assert_eq!(env.ambient_intensity, Vec3::splat(0.9));
        assert_eq!(env.specular_power, 32.0);
        assert_eq!(env.emissive_intensity, Vec3::ZERO);
    }
}
