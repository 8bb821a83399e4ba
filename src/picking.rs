//! Ray picking of scene objects from the mouse position.
//!
//! - [`Ray`]: an origin and a unit direction, usually built with
//!   [`Ray::from_screen`]
//! - [`Collider`]: the cheap shape (box or sphere) a mesh entity is picked by
//! - [`RayHit`]: what a ray struck, and where
//!
//! # Example
//!
//! ```
//! use orrery::picking::{Collider, Ray};
//! use orrery::{Transform, Vec3};
//!
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
//! let cube = Transform::from_position(Vec3::new(0.0, 0.0, -2.0));
//!
//! let distance = Collider::unit_box().intersect(&ray, &cube);
//! assert_eq!(distance, Some(11.5));
//! ```

use crate::error::MathError;
use crate::math::{Mat4, Vec3};
use crate::scene::MeshName;
use crate::transform::Transform;

/// A ray in 3D space with a normalised direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalised.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalised(),
        }
    }

    /// Unprojects a window position into a world-space ray.
    ///
    /// `screen_x`/`screen_y` are pixels from the top-left corner. The
    /// projection must use [`DepthRange::NegativeOneToOne`](crate::DepthRange),
    /// which is what [`Lens`](crate::Lens) produces by default. The ray
    /// starts on the near plane.
    ///
    /// Fails with [`MathError::Singular`] if `projection * view` has no
    /// inverse.
    pub fn from_screen(
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
        view: &Mat4,
        projection: &Mat4,
    ) -> Result<Self, MathError> {
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height); // Y is flipped

        let inv_view_proj = (*projection * *view).try_inverse()?;
        let near_point = inv_view_proj.transform_coord(Vec3::new(ndc_x, ndc_y, -1.0));
        let far_point = inv_view_proj.transform_coord(Vec3::new(ndc_x, ndc_y, 1.0));

        Ok(Self::new(near_point, far_point - near_point))
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the nearest crossing of an axis-aligned box in front of
    /// the origin. A ray starting inside the box reports the exit point.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for i in 0..3 {
            let origin = self.origin[i];
            let dir = self.direction[i];

            if dir.abs() < f32::EPSILON {
                // Parallel to this slab.
                if origin < min[i] || origin > max[i] {
                    return None;
                }
            } else {
                let inv_dir = 1.0 / dir;
                let mut t1 = (min[i] - origin) * inv_dir;
                let mut t2 = (max[i] - origin) * inv_dir;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }

                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        if t_min > 0.0 {
            Some(t_min)
        } else if t_max > 0.0 {
            Some(t_max)
        } else {
            None
        }
    }

    /// Distance to the nearest crossing of a sphere in front of the origin.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.direction.dot(self.direction);
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// The shape a mesh entity is picked by.
///
/// Colliders follow the entity's position and scale but not its rotation:
/// a box stays axis-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    /// A box spanning `-half_extents..half_extents` around the position.
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    /// A box collider from full dimensions.
    pub fn box_collider(size: Vec3) -> Self {
        Self::Box {
            half_extents: size * 0.5,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// A 1×1×1 box.
    pub fn unit_box() -> Self {
        Self::box_collider(Vec3::ONE)
    }

    /// Distance along `ray` to this collider placed by `transform`, if hit.
    pub fn intersect(&self, ray: &Ray, transform: &Transform) -> Option<f32> {
        match self {
            Collider::Box { half_extents } => {
                let scaled_half = (*half_extents * transform.scale).abs();
                ray.intersect_aabb(
                    transform.position - scaled_half,
                    transform.position + scaled_half,
                )
            }
            Collider::Sphere { radius } => {
                let scale = transform.scale.abs();
                let avg_scale = (scale.x + scale.y + scale.z) / 3.0;
                ray.intersect_sphere(transform.position, radius * avg_scale)
            }
        }
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::unit_box()
    }
}

/// A ray/collider intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct RayHit {
    pub entity: hecs::Entity,
    /// The mesh name, for entities that carry one.
    pub name: Option<String>,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Casts `ray` against every entity with a [`Transform`] and a
/// [`Collider`]. Hits come back closest first.
pub fn raycast_all(world: &hecs::World, ray: &Ray) -> Vec<RayHit> {
    let mut hits = Vec::new();

    for (entity, (transform, collider, name)) in world
        .query::<(&Transform, &Collider, Option<&MeshName>)>()
        .iter()
    {
        if let Some(distance) = collider.intersect(ray, transform) {
            hits.push(RayHit {
                entity,
                name: name.map(|n| n.0.clone()),
                distance,
                point: ray.point_at(distance),
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// The closest hit, if any.
pub fn raycast(world: &hecs::World, ray: &Ray) -> Option<RayHit> {
    raycast_all(world, ray).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use approx::assert_abs_diff_eq;

    #[test]
    fn box_hit_from_outside_and_inside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.direction, Vec3::NEGATIVE_UNIT_Z);
        assert_eq!(ray.intersect_aabb(-Vec3::ONE, Vec3::ONE), Some(4.0));

        let inside = Ray::new(Vec3::ZERO, Vec3::UNIT_X);
        assert_eq!(inside.intersect_aabb(-Vec3::ONE, Vec3::ONE), Some(1.0));

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::UNIT_Z);
        assert_eq!(behind.intersect_aabb(-Vec3::ONE, Vec3::ONE), None);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::NEGATIVE_UNIT_Z);
        assert_eq!(ray.intersect_aabb(-Vec3::ONE, Vec3::ONE), None);
    }

    #[test]
    fn sphere_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEGATIVE_UNIT_Z);
        assert_abs_diff_eq!(
            ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap_or_default(),
            4.0,
            epsilon = 1e-5
        );
        assert_eq!(ray.intersect_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0), None);
    }

    #[test]
    fn collider_follows_position_and_scale() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEGATIVE_UNIT_Z);
        let transform = Transform::from_position(Vec3::new(0.0, 0.0, 2.0)).with_uniform_scale(4.0);
        assert_eq!(Collider::unit_box().intersect(&ray, &transform), Some(6.0));

        let shifted = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(Collider::sphere(1.0).intersect(&ray, &shifted), None);
    }

    #[test]
    fn screen_center_ray_runs_down_the_view_axis() {
        let camera = Camera::new().at(Vec3::new(0.0, 0.0, 10.0)).looking_at(Vec3::ZERO);
        let ray = Ray::from_screen(
            600.0,
            450.0,
            1200.0,
            900.0,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        )
        .expect("invertible");

        assert!(ray.direction.abs_diff_eq(Vec3::NEGATIVE_UNIT_Z, 1e-4));
        let near = camera.lens.near();
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0 - near), 1e-3));
    }

    #[test]
    fn screen_ray_leans_towards_the_clicked_side() {
        let camera = Camera::new().at(Vec3::new(0.0, 0.0, 10.0)).looking_at(Vec3::ZERO);
        let ray = Ray::from_screen(
            0.0,
            0.0,
            1200.0,
            900.0,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        )
        .expect("invertible");
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn singular_view_projection_is_an_error() {
        assert_eq!(
            Ray::from_screen(0.0, 0.0, 10.0, 10.0, &Mat4::ZERO, &Mat4::IDENTITY),
            Err(MathError::Singular)
        );
    }

    #[test]
    fn raycast_sorts_and_names_hits() {
        let mut world = hecs::World::new();
        let far = world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.0, -5.0)),
            Collider::unit_box(),
            MeshName("far".to_owned()),
        ));
        let near = world.spawn((Transform::new(), Collider::sphere(0.5)));
        world.spawn((Transform::from_position(Vec3::new(9.0, 0.0, 0.0)), Collider::unit_box()));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEGATIVE_UNIT_Z);
        let hits = raycast_all(&world, &ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, near);
        assert_eq!(hits[0].name, None);
        assert_eq!(hits[1].entity, far);
        assert_eq!(hits[1].name.as_deref(), Some("far"));
        assert!(hits[1].point.abs_diff_eq(Vec3::new(0.0, 0.0, -4.5), 1e-5));

        assert_eq!(raycast(&world, &ray).map(|hit| hit.entity), Some(near));
    }
}
