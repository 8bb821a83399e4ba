//! The geometric core: angles, vectors, matrices, quaternions and the
//! projection builders the cameras use.
//!
//! Conventions used throughout:
//!
//! - Right-handed coordinates, counter-clockwise positive rotation.
//! - Matrices are stored row-major (`m[row][col]`) and act on column
//!   vectors, so `a * b` applies `b` first.
//! - Nothing renormalises implicitly. Code that composes many rotations
//!   calls [`Quat::normalise`] itself.

/// Component-wise operators and the metric helpers shared by every vector type.
macro_rules! impl_vector {
    ($t:ident, $n:literal, $($f:ident),+) => {
        impl $t {
            /// Dot (scalar) product.
            #[inline]
            pub fn dot(self, rhs: $t) -> f32 {
                0.0 $(+ self.$f * rhs.$f)+
            }

            /// Squared length. Prefer this over [`length`](Self::length) when only comparing.
            #[inline]
            pub fn squared_length(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.squared_length().sqrt()
            }

            #[inline]
            pub fn distance(self, rhs: $t) -> f32 {
                (self - rhs).length()
            }

            #[inline]
            pub fn squared_distance(self, rhs: $t) -> f32 {
                (self - rhs).squared_length()
            }

            /// Normalises in place and returns the previous length.
            ///
            /// Vectors shorter than [`EPSILON`](crate::math::scalar::EPSILON)
            /// are left unchanged.
            pub fn normalise(&mut self) -> f32 {
                let length = self.length();
                if length >= crate::math::scalar::EPSILON {
                    let inv = 1.0 / length;
                    $(self.$f *= inv;)+
                }
                length
            }

            /// Returns a normalised copy, see [`normalise`](Self::normalise).
            #[inline]
            pub fn normalised(self) -> $t {
                let mut copy = self;
                copy.normalise();
                copy
            }

            /// Linear interpolation. `alpha` is not clamped.
            #[inline]
            pub fn lerp(from: $t, to: $t, alpha: f32) -> $t {
                from + (to - from) * alpha
            }

            /// Keeps the component-wise minimum of `self` and `cmp`.
            pub fn make_floor(&mut self, cmp: $t) {
                $(if cmp.$f < self.$f { self.$f = cmp.$f; })+
            }

            /// Keeps the component-wise maximum of `self` and `cmp`.
            pub fn make_ceil(&mut self, cmp: $t) {
                $(if cmp.$f > self.$f { self.$f = cmp.$f; })+
            }

            #[inline]
            pub fn is_nan(self) -> bool {
                false $(|| self.$f.is_nan())+
            }

            /// True if every component differs by at most `max_abs_diff`.
            #[inline]
            pub fn abs_diff_eq(self, rhs: $t, max_abs_diff: f32) -> bool {
                true $(&& (self.$f - rhs.$f).abs() <= max_abs_diff)+
            }

            /// Tolerance comparison with [`EPSILON`](crate::math::scalar::EPSILON).
            #[inline]
            pub fn approx_eq(self, rhs: $t) -> bool {
                self.abs_diff_eq(rhs, crate::math::scalar::EPSILON)
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$f),+]
            }

            #[inline]
            pub fn splat(value: f32) -> $t {
                $t { $($f: value),+ }
            }
        }

        impl From<[f32; $n]> for $t {
            #[inline]
            fn from(array: [f32; $n]) -> $t {
                bytemuck::cast(array)
            }
        }

        impl From<$t> for [f32; $n] {
            #[inline]
            fn from(v: $t) -> [f32; $n] {
                v.to_array()
            }
        }

        impl std::ops::Index<usize> for $t {
            type Output = f32;
            #[inline]
            fn index(&self, index: usize) -> &f32 {
                &bytemuck::cast_ref::<$t, [f32; $n]>(self)[index]
            }
        }

        impl std::ops::IndexMut<usize> for $t {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                &mut bytemuck::cast_mut::<$t, [f32; $n]>(self)[index]
            }
        }

        impl std::ops::Neg for $t {
            type Output = $t;
            #[inline]
            fn neg(self) -> $t {
                $t { $($f: -self.$f),+ }
            }
        }

        impl_vector!(@binop $t, Add, add, AddAssign, add_assign, +, $($f),+);
        impl_vector!(@binop $t, Sub, sub, SubAssign, sub_assign, -, $($f),+);
        impl_vector!(@binop $t, Mul, mul, MulAssign, mul_assign, *, $($f),+);
        impl_vector!(@binop $t, Div, div, DivAssign, div_assign, /, $($f),+);
    };

    (@binop $t:ident, $tr:ident, $m:ident, $tra:ident, $ma:ident, $op:tt, $($f:ident),+) => {
        impl std::ops::$tr for $t {
            type Output = $t;
            #[inline]
            fn $m(self, rhs: $t) -> $t {
                $t { $($f: self.$f $op rhs.$f),+ }
            }
        }

        impl std::ops::$tr<f32> for $t {
            type Output = $t;
            #[inline]
            fn $m(self, rhs: f32) -> $t {
                $t { $($f: self.$f $op rhs),+ }
            }
        }

        impl std::ops::$tr<$t> for f32 {
            type Output = $t;
            #[inline]
            fn $m(self, rhs: $t) -> $t {
                $t { $($f: self $op rhs.$f),+ }
            }
        }

        impl std::ops::$tra for $t {
            #[inline]
            fn $ma(&mut self, rhs: $t) {
                $(self.$f = self.$f $op rhs.$f;)+
            }
        }

        impl std::ops::$tra<f32> for $t {
            #[inline]
            fn $ma(&mut self, rhs: f32) {
                $(self.$f = self.$f $op rhs;)+
            }
        }
    };
}

pub mod angle;
pub mod interop;
pub mod mat3;
pub mod mat4;
pub mod projection;
pub mod quat;
pub mod scalar;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use angle::{Angle, Degree, Radian};
pub use mat3::Mat3;
pub use mat4::{Decomposition, Mat4};
pub use projection::DepthRange;
pub use quat::Quat;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
