use crate::math::vec3::Vec3;

/// A four-component vector, mostly homogeneous points `(x, y, z, w)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drops `w` without dividing by it.
    #[inline]
    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl_vector!(Vec4, 4, x, y, z, w);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_round_trip() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let h = Vec4::from_vec3(p, 1.0);
        assert_eq!(h.truncate(), p);
        assert_eq!(h.dot(Vec4::ONE), 7.0);
    }

    #[test]
    fn nan_detection() {
        assert!(Vec4::new(0.0, f32::NAN, 0.0, 1.0).is_nan());
        assert!(!Vec4::ONE.is_nan());
    }
}
