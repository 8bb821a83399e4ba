use crate::math::angle::Radian;
use crate::math::scalar::{EPSILON, PI};

/// A two-component vector, used for screen-space positions and deltas.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const ONE: Vec2 = Vec2::new(1.0, 1.0);
    pub const UNIT_X: Vec2 = Vec2::new(1.0, 0.0);
    pub const UNIT_Y: Vec2 = Vec2::new(0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The z component of the 3D cross product of `(self, 0)` and `(rhs, 0)`.
    #[inline]
    pub fn cross(self, rhs: Vec2) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// The vector rotated a quarter turn counter-clockwise.
    #[inline]
    pub fn perpendicular(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    pub fn mid_point(self, rhs: Vec2) -> Vec2 {
        Vec2::new((self.x + rhs.x) * 0.5, (self.y + rhs.y) * 0.5)
    }

    /// Unsigned angle between two vectors, in `[0, π]`. A right angle when
    /// either vector is (near) zero-length.
    pub fn angle_between(self, rhs: Vec2) -> Radian {
        if self.length() * rhs.length() < EPSILON {
            return Radian(PI * 0.5);
        }
        Radian(self.cross(rhs).abs().atan2(self.dot(rhs)))
    }
}

impl_vector!(Vec2, 2, x, y);
