//! Unit-tagged angles.
//!
//! [`Radian`] and [`Degree`] wrap a bare `f32` so that the unit travels with
//! the value. Arithmetic is only defined between angles of the same unit;
//! mixing units requires an explicit `From` conversion:
//!
//! ```
//! use orrery::{Degree, Radian};
//!
//! let quarter = Radian::from(Degree(90.0));
//! let total = quarter + Radian(0.5);
//! assert!((total.value() - (std::f32::consts::FRAC_PI_2 + 0.5)).abs() < 1e-6);
//! ```

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::math::scalar::{DEG_TO_RAD, PI, RAD_TO_DEG};

/// Functionality shared by [`Radian`] and [`Degree`].
pub trait Angle: Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self> {
    /// An angle of zero.
    const ZERO: Self;
    /// A right angle.
    const QUARTER: Self;
    /// A straight angle.
    const HALF: Self;
    /// A full turn.
    const FULL: Self;

    /// Raw value in this angle's own unit.
    fn value(self) -> f32;

    fn as_radians(self) -> Radian;

    fn as_degrees(self) -> Degree;

    #[inline]
    fn sin(self) -> f32 {
        self.as_radians().0.sin()
    }

    #[inline]
    fn cos(self) -> f32 {
        self.as_radians().0.cos()
    }

    #[inline]
    fn tan(self) -> f32 {
        self.as_radians().0.tan()
    }
}

/// An angle measured in radians.
///
/// Angles add to and subtract from angles of the same unit and scale by
/// plain numbers. Multiplying two angles does not compile:
///
/// ```compile_fail
/// use orrery::Radian;
///
/// let _ = Radian(1.0) * Radian(2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Radian(pub f32);

/// An angle measured in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Degree(pub f32);

impl Radian {
    #[inline]
    pub const fn new(radians: f32) -> Self {
        Self(radians)
    }

    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn to_degrees(self) -> Degree {
        Degree(self.0 * RAD_TO_DEG)
    }
}

impl Degree {
    #[inline]
    pub const fn new(degrees: f32) -> Self {
        Self(degrees)
    }

    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn to_radians(self) -> Radian {
        Radian(self.0 * DEG_TO_RAD)
    }
}

impl From<Degree> for Radian {
    fn from(degrees: Degree) -> Self {
        degrees.to_radians()
    }
}

impl From<Radian> for Degree {
    fn from(radians: Radian) -> Self {
        radians.to_degrees()
    }
}

impl Angle for Radian {
    const ZERO: Self = Radian(0.0);
    const QUARTER: Self = Radian(PI * 0.5);
    const HALF: Self = Radian(PI);
    const FULL: Self = Radian(PI * 2.0);

    fn value(self) -> f32 {
        self.0
    }

    fn as_radians(self) -> Radian {
        self
    }

    fn as_degrees(self) -> Degree {
        self.to_degrees()
    }
}

impl Angle for Degree {
    const ZERO: Self = Degree(0.0);
    const QUARTER: Self = Degree(90.0);
    const HALF: Self = Degree(180.0);
    const FULL: Self = Degree(360.0);

    fn value(self) -> f32 {
        self.0
    }

    fn as_radians(self) -> Radian {
        self.to_radians()
    }

    fn as_degrees(self) -> Degree {
        self
    }
}

macro_rules! impl_angle_ops {
    ($t:ident) => {
        impl Add for $t {
            type Output = $t;
            #[inline]
            fn add(self, rhs: $t) -> $t {
                $t(self.0 + rhs.0)
            }
        }

        impl AddAssign for $t {
            #[inline]
            fn add_assign(&mut self, rhs: $t) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $t {
            type Output = $t;
            #[inline]
            fn sub(self, rhs: $t) -> $t {
                $t(self.0 - rhs.0)
            }
        }

        impl SubAssign for $t {
            #[inline]
            fn sub_assign(&mut self, rhs: $t) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $t {
            type Output = $t;
            #[inline]
            fn neg(self) -> $t {
                $t(-self.0)
            }
        }

        impl Mul<f32> for $t {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: f32) -> $t {
                $t(self.0 * rhs)
            }
        }

        impl Mul<$t> for f32 {
            type Output = $t;
            #[inline]
            fn mul(self, rhs: $t) -> $t {
                $t(self * rhs.0)
            }
        }

        impl MulAssign<f32> for $t {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                self.0 *= rhs;
            }
        }

        impl Div<f32> for $t {
            type Output = $t;
            #[inline]
            fn div(self, rhs: f32) -> $t {
                $t(self.0 / rhs)
            }
        }

        impl DivAssign<f32> for $t {
            #[inline]
            fn div_assign(&mut self, rhs: f32) {
                self.0 /= rhs;
            }
        }
    };
}

impl_angle_ops!(Radian);
impl_angle_ops!(Degree);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn conversion_uses_pi_over_180() {
        assert_abs_diff_eq!(Radian::from(Degree(180.0)).value(), PI, epsilon = 1e-6);
        assert_abs_diff_eq!(Degree::from(Radian(PI * 0.5)).value(), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn arithmetic_preserves_unit() {
        let mut a = Degree(30.0) + Degree(15.0);
        a *= 2.0;
        a -= Degree(10.0);
        assert_eq!(a, Degree(80.0));
        assert_eq!(-a / 4.0, Degree(-20.0));
        assert_eq!(2.0 * Radian(1.5), Radian(3.0));
    }

    #[test]
    fn ordering_is_exact() {
        assert!(Radian(0.1) < Radian(0.2));
        assert!(Degree(90.0) >= Degree::QUARTER);
    }

    #[test]
    fn trig_goes_through_radians() {
        assert_abs_diff_eq!(Degree(90.0).sin(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Radian::HALF.cos(), -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Degree(45.0).tan(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn nan_propagates() {
        assert!((Radian(f32::NAN) + Radian(1.0)).value().is_nan());
    }
}
