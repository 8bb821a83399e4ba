//! Scalar constants and domain-safe trigonometry shared by the math types.

use crate::math::angle::Radian;

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = 2.0 * PI;
pub const HALF_PI: f32 = 0.5 * PI;
pub const DEG_TO_RAD: f32 = PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / PI;

/// Lengths below this are treated as zero by normalisation and angle code.
pub const EPSILON: f32 = 1e-6;

/// Arc cosine that saturates instead of returning NaN outside `[-1, 1]`.
pub fn acos_clamped(value: f32) -> Radian {
    if value <= -1.0 {
        Radian(PI)
    } else if value >= 1.0 {
        Radian(0.0)
    } else {
        Radian(value.acos())
    }
}

/// Arc sine that saturates to `±π/2` outside `[-1, 1]`.
pub fn asin_clamped(value: f32) -> Radian {
    if value <= -1.0 {
        Radian(-HALF_PI)
    } else if value >= 1.0 {
        Radian(HALF_PI)
    } else {
        Radian(value.asin())
    }
}

/// Returns true if `a` and `b` differ by at most `tolerance`.
#[inline]
pub fn real_equal(a: f32, b: f32, tolerance: f32) -> bool {
    (b - a).abs() <= tolerance
}

#[inline]
pub fn max_element(x: f32, y: f32, z: f32) -> f32 {
    x.max(y).max(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acos_saturates_outside_domain() {
        assert_eq!(acos_clamped(1.0000001).value(), 0.0);
        assert_eq!(acos_clamped(-3.0).value(), PI);
        assert!((acos_clamped(0.0).value() - HALF_PI).abs() < 1e-6);
    }

    #[test]
    fn asin_saturates_outside_domain() {
        assert_eq!(asin_clamped(2.0).value(), HALF_PI);
        assert_eq!(asin_clamped(-2.0).value(), -HALF_PI);
    }

    #[test]
    fn real_equal_is_inclusive() {
        assert!(real_equal(1.0, 1.5, 0.5));
        assert!(!real_equal(1.0, 1.6, 0.5));
    }
}
