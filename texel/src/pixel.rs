// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2024 The `imagy` developers
use core::fmt;
use core::ops::{Add, Mul};

use crate::numeric::{Accumulate, Accumulator, Channel, Scalar};

/// A straight (non-premultiplied) color with alpha.
///
/// The channel layout is `#[repr(C)]` in the order red, green, blue, alpha so that a slice of
/// `Rgba<u8>` is byte-compatible with the usual RGBA8 encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rgba<C> {
    pub red: C,
    pub green: C,
    pub blue: C,
    pub alpha: C,
}

/// A color whose color channels are pre-scaled by alpha.
///
/// Every color channel must be at most `alpha`. Constructors do not correct violations; it is the
/// caller's responsibility to uphold the invariant. Blending and interpolating premultiplied
/// values is exact, which is why sampling prefers this representation when alpha varies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct PremultipliedRgba<C> {
    pub red: C,
    pub green: C,
    pub blue: C,
    pub alpha: C,
}

impl<C> Rgba<C> {
    pub const fn new(red: C, green: C, blue: C, alpha: C) -> Self {
        Rgba {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Apply a function to every channel, alpha included.
    pub fn map<D>(self, mut f: impl FnMut(C) -> D) -> Rgba<D> {
        Rgba {
            red: f(self.red),
            green: f(self.green),
            blue: f(self.blue),
            alpha: f(self.alpha),
        }
    }

    pub fn into_array(self) -> [C; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl Rgba<u8> {
    pub const TRANSPARENT: Self = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Self = Rgba::opaque(0, 0, 0);
    pub const WHITE: Self = Rgba::opaque(255, 255, 255);
    pub const RED: Self = Rgba::opaque(255, 0, 0);
    pub const GREEN: Self = Rgba::opaque(0, 255, 0);
    pub const BLUE: Self = Rgba::opaque(0, 0, 255);
    pub const YELLOW: Self = Rgba::opaque(255, 255, 0);
    pub const CYAN: Self = Rgba::opaque(0, 255, 255);
    pub const MAGENTA: Self = Rgba::opaque(255, 0, 255);

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Rgba::new(red, green, blue, 255)
    }

    /// The integer mean of the color channels, ignoring alpha.
    pub fn gray(self) -> u8 {
        let sum = u16::from(self.red) + u16::from(self.green) + u16::from(self.blue);
        // At most 765 / 3, always fits.
        (sum / 3) as u8
    }
}

impl<C> PremultipliedRgba<C> {
    pub const fn new(red: C, green: C, blue: C, alpha: C) -> Self {
        PremultipliedRgba {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl PremultipliedRgba<u8> {
    pub const TRANSPARENT: Self = PremultipliedRgba::new(0, 0, 0, 0);
}

impl From<u8> for Rgba<u8> {
    /// An opaque gray.
    fn from(gray: u8) -> Self {
        Rgba::opaque(gray, gray, gray)
    }
}

impl<C> From<[C; 4]> for Rgba<C> {
    fn from([red, green, blue, alpha]: [C; 4]) -> Self {
        Rgba::new(red, green, blue, alpha)
    }
}

impl<C> From<Rgba<C>> for [C; 4] {
    fn from(rgba: Rgba<C>) -> Self {
        rgba.into_array()
    }
}

impl From<Rgba<u8>> for PremultipliedRgba<u8> {
    fn from(rgba: Rgba<u8>) -> Self {
        let alpha = u32::from(rgba.alpha);
        // Round half up, the result is at most `alpha`.
        let scale = |c: u8| ((u32::from(c) * alpha + 127) / 255) as u8;
        PremultipliedRgba::new(
            scale(rgba.red),
            scale(rgba.green),
            scale(rgba.blue),
            rgba.alpha,
        )
    }
}

impl From<PremultipliedRgba<u8>> for Rgba<u8> {
    fn from(premultiplied: PremultipliedRgba<u8>) -> Self {
        let alpha = u32::from(premultiplied.alpha);
        if alpha == 0 {
            return Rgba::TRANSPARENT;
        }

        let scale = |c: u8| ((u32::from(c) * 255 + alpha / 2) / alpha).min(255) as u8;
        Rgba::new(
            scale(premultiplied.red),
            scale(premultiplied.green),
            scale(premultiplied.blue),
            premultiplied.alpha,
        )
    }
}

impl From<Rgba<f32>> for PremultipliedRgba<f32> {
    fn from(rgba: Rgba<f32>) -> Self {
        PremultipliedRgba::new(
            rgba.red * rgba.alpha,
            rgba.green * rgba.alpha,
            rgba.blue * rgba.alpha,
            rgba.alpha,
        )
    }
}

impl From<PremultipliedRgba<f32>> for Rgba<f32> {
    fn from(premultiplied: PremultipliedRgba<f32>) -> Self {
        let alpha = premultiplied.alpha;
        if alpha == 0.0 {
            return Rgba::new(0.0, 0.0, 0.0, 0.0);
        }

        Rgba::new(
            premultiplied.red / alpha,
            premultiplied.green / alpha,
            premultiplied.blue / alpha,
            alpha,
        )
    }
}

impl fmt::Display for Rgba<u8> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl<S: Scalar> Add for Rgba<S> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Rgba::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
            self.alpha + rhs.alpha,
        )
    }
}

impl<S: Scalar> Mul<S> for Rgba<S> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: S) -> Self {
        self.map(|c| c * rhs)
    }
}

impl<S: Scalar> Accumulator<S> for Rgba<S> {
    #[inline]
    fn splat(value: S) -> Self {
        Rgba::new(value, value, value, value)
    }

    #[inline]
    fn add_weighted(self, value: Self, weight: S) -> Self {
        let channel = |sum: S, c: S| sum.saturating_add(c.saturating_mul(weight));
        Rgba::new(
            channel(self.red, value.red),
            channel(self.green, value.green),
            channel(self.blue, value.blue),
            channel(self.alpha, value.alpha),
        )
    }
}

impl<C: Channel, S: Scalar> Accumulate<S> for Rgba<C> {
    type Acc = Rgba<S>;

    #[inline]
    fn accumulate(self) -> Rgba<S> {
        self.map(C::to_scalar)
    }

    #[inline]
    fn from_accumulated(acc: Rgba<S>) -> Self {
        acc.map(C::from_scalar)
    }
}

impl<C: Channel + PartialOrd, S: Scalar> Accumulate<S> for PremultipliedRgba<C> {
    type Acc = Rgba<S>;

    #[inline]
    fn accumulate(self) -> Rgba<S> {
        Rgba::new(self.red, self.green, self.blue, self.alpha).map(C::to_scalar)
    }

    /// Clamps color channels to alpha, rounding may otherwise overshoot it by one step.
    #[inline]
    fn from_accumulated(acc: Rgba<S>) -> Self {
        let Rgba {
            red,
            green,
            blue,
            alpha,
        } = acc.map(C::from_scalar);
        let bound = |c: C| if c > alpha { alpha } else { c };
        PremultipliedRgba::new(bound(red), bound(green), bound(blue), alpha)
    }
}

// Four fields of the same type under `repr(C)` leave no padding.
#[allow(unsafe_code)]
unsafe impl<C: bytemuck::Zeroable> bytemuck::Zeroable for Rgba<C> {}
#[allow(unsafe_code)]
unsafe impl<C: bytemuck::Pod> bytemuck::Pod for Rgba<C> {}
#[allow(unsafe_code)]
unsafe impl<C: bytemuck::Zeroable> bytemuck::Zeroable for PremultipliedRgba<C> {}
#[allow(unsafe_code)]
unsafe impl<C: bytemuck::Pod> bytemuck::Pod for PremultipliedRgba<C> {}
