// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `imagy` developers
//! Numeric traits for summing and scaling pixels.
//!
//! Interpolation and convolution compute weighted sums of pixels. Doing so in the stored channel
//! type would overflow or lose precision, so each pixel is first widened into an *accumulator*,
//! summed and scaled there, and finally converted back with clamping. The accumulator arithmetic
//! is written once for every scalar type; the only per-pixel-type surface is the pair of
//! conversions in [`Accumulate`].
use core::fmt;
use core::ops::{Add, Mul};

use crate::math;

/// A numeric type that pixels are summed and scaled in.
///
/// Implemented for `i32`, `i64`, `f32` and `f64`. Integer scalars round when constructed from a
/// float, so they are best used with integral weights such as the usual convolution kernels.
/// Their arithmetic in accumulators saturates at the bounds of the type.
pub trait Scalar:
    Copy + PartialOrd + fmt::Debug + Add<Output = Self> + Mul<Output = Self> + 'static
{
    const ZERO: Self;
    const ONE: Self;

    /// Convert from a float, rounding and saturating for integer scalars.
    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    /// Convert from an integer, saturating for integer scalars.
    fn from_i64(value: i64) -> Self;

    /// The exact integral value, `None` for float scalars.
    fn to_i64(self) -> Option<i64>;

    fn saturating_add(self, other: Self) -> Self;

    fn saturating_mul(self, other: Self) -> Self;
}

/// A single stored channel of a pixel.
pub trait Channel: Copy + PartialEq + fmt::Debug + 'static {
    /// Widen the channel value into an accumulator scalar.
    fn to_scalar<S: Scalar>(self) -> S;

    /// Narrow an accumulated value back into the channel.
    ///
    /// Values outside the representable range are clamped, never wrapped. Integer channels round
    /// to the nearest value and map `NaN` to zero.
    fn from_scalar<S: Scalar>(value: S) -> Self;
}

/// A pixel-shaped sum of scalars.
pub trait Accumulator<S: Scalar>: Copy + Add<Output = Self> + Mul<S, Output = Self> {
    /// An accumulator with every component set to `value`.
    fn splat(value: S) -> Self;

    /// Add `value * weight` to every component, saturating for integer scalars.
    fn add_weighted(self, value: Self, weight: S) -> Self;

    fn zero() -> Self {
        Self::splat(S::ZERO)
    }
}

/// A pixel that can be converted into and out of an accumulator over `S`.
///
/// ```
/// use imagy_texel::{Accumulate, Rgba};
///
/// let pixel = Rgba::new(200u8, 0, 0, 255);
/// let acc: Rgba<f32> = Accumulate::<f32>::accumulate(pixel);
/// // The sum exceeds the channel range and saturates on the way back.
/// let back: Rgba<u8> = Accumulate::<f32>::from_accumulated(acc + acc);
/// assert_eq!(back, Rgba::new(255, 0, 0, 255));
/// ```
pub trait Accumulate<S: Scalar>: Copy {
    type Acc: Accumulator<S>;

    fn accumulate(self) -> Self::Acc;

    fn from_accumulated(acc: Self::Acc) -> Self;
}

macro_rules! int_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn from_f64(value: f64) -> Self {
                    // Float to int casts saturate.
                    math::round(value) as $t
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_i64(value: i64) -> Self {
                    value.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
                }

                #[inline]
                fn to_i64(self) -> Option<i64> {
                    Some(self as i64)
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    <$t>::saturating_add(self, other)
                }

                #[inline]
                fn saturating_mul(self, other: Self) -> Self {
                    <$t>::saturating_mul(self, other)
                }
            }
        )*
    };
}

macro_rules! float_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_i64(value: i64) -> Self {
                    value as $t
                }

                #[inline]
                fn to_i64(self) -> Option<i64> {
                    None
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    self + other
                }

                #[inline]
                fn saturating_mul(self, other: Self) -> Self {
                    self * other
                }
            }
        )*
    };
}

macro_rules! int_channel {
    ($($t:ty),*) => {
        $(
            impl Channel for $t {
                #[inline]
                fn to_scalar<S: Scalar>(self) -> S {
                    // Every integer channel fits an `i64` exactly.
                    S::from_i64(self as i64)
                }

                #[inline]
                fn from_scalar<S: Scalar>(value: S) -> Self {
                    match value.to_i64() {
                        Some(value) => value.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t,
                        None => math::round(value.to_f64()) as $t,
                    }
                }
            }
        )*
    };
}

macro_rules! float_channel {
    ($($t:ty),*) => {
        $(
            impl Channel for $t {
                #[inline]
                fn to_scalar<S: Scalar>(self) -> S {
                    S::from_f64(self as f64)
                }

                #[inline]
                fn from_scalar<S: Scalar>(value: S) -> Self {
                    value.to_f64() as $t
                }
            }
        )*
    };
}

/// Scalars are their own accumulators, channels are single-channel (gray) pixels.
macro_rules! gray_pixel {
    ($($t:ty),*) => {
        $(
            impl<S: Scalar> Accumulate<S> for $t {
                type Acc = S;

                #[inline]
                fn accumulate(self) -> S {
                    self.to_scalar()
                }

                #[inline]
                fn from_accumulated(acc: S) -> Self {
                    Self::from_scalar(acc)
                }
            }
        )*
    };
}

impl<S: Scalar> Accumulator<S> for S {
    #[inline]
    fn splat(value: S) -> Self {
        value
    }

    #[inline]
    fn add_weighted(self, value: S, weight: S) -> Self {
        self.saturating_add(value.saturating_mul(weight))
    }
}

int_scalar!(i32, i64);
float_scalar!(f32, f64);
int_channel!(u8, u16, i32, i64);
float_channel!(f32, f64);
gray_pixel!(u8, u16, i32, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_conversion_clamps() {
        assert_eq!(u8::from_scalar(300.0f32), 255);
        assert_eq!(u8::from_scalar(-4.0f64), 0);
        assert_eq!(u8::from_scalar(f64::NAN), 0);
        assert_eq!(u8::from_scalar(1000i32), 255);
        assert_eq!(u16::from_scalar(70_000i64), u16::MAX);
        assert_eq!(i32::from_scalar(-1e12f64), i32::MIN);
    }

    #[test]
    fn channel_conversion_rounds() {
        assert_eq!(u8::from_scalar(127.5f64), 128);
        assert_eq!(u8::from_scalar(127.49f32), 127);
        assert_eq!(f32::from_scalar(0.25f64), 0.25);
    }

    #[test]
    fn gray_accumulation() {
        let sum = <u8 as Accumulate<i32>>::accumulate(250) + <u8 as Accumulate<i32>>::accumulate(10);
        assert_eq!(sum, 260);
        assert_eq!(<u8 as Accumulate<i32>>::from_accumulated(sum), 255);

        let half: f64 = <u8 as Accumulate<f64>>::accumulate(255) * 0.5;
        assert_eq!(<u8 as Accumulate<f64>>::from_accumulated(half), 128);
    }

    #[test]
    fn integer_scalar_rounds_weights() {
        assert_eq!(i32::from_f64(2.5), 3);
        assert_eq!(i32::from_f64(-2.5), -3);
        assert_eq!(<i64 as Accumulator<i64>>::zero(), 0);
    }

    #[test]
    fn integer_accumulation_saturates() {
        let sum = <i32 as Accumulator<i32>>::add_weighted(i32::MAX - 10, i32::MAX - 10, 1);
        assert_eq!(sum, i32::MAX);
        let product = <i64 as Accumulator<i64>>::add_weighted(0, i64::MIN, 2);
        assert_eq!(product, i64::MIN);
        assert_eq!(<f64 as Accumulator<f64>>::add_weighted(1.0, 3.0, 0.5), 2.5);
    }

    #[test]
    fn integers_convert_exactly() {
        let large = (1i64 << 53) + 1;
        let acc = <i64 as Accumulate<i64>>::accumulate(large);
        assert_eq!(acc, large);
        assert_eq!(<i64 as Accumulate<i64>>::from_accumulated(acc), large);

        assert_eq!(i32::from_scalar(i64::MAX), i32::MAX);
        assert_eq!(u8::from_scalar(-3i32), 0);
        assert_eq!(<i64 as Channel>::to_scalar::<i32>(i64::MIN), i32::MIN);
        assert_eq!(<u16 as Channel>::to_scalar::<f32>(65535), 65535.0);
    }
}
