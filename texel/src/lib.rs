// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2024 The `imagy` developers
//! # Texel
//!
//! Pixel values and the shared storage they live in.
//!
//! This crate is the leaf of the `imagy` image library. It offers:
//!
//! - Pixel value types: [`Rgba`], [`PremultipliedRgba`] and plain numeric gray values.
//! - The numeric model used to interpolate and convolve pixels: pixels are widened into an
//!   [`Accumulator`] over some [`Scalar`], summed and scaled, then clamped back.
//! - [`PixelBuffer`], a row-major matrix of pixels with copy-on-write sharing.
//!
//! ## Usage
//!
//! ```
//! use imagy_texel::{PixelBuffer, Rgba};
//!
//! let mut buffer = PixelBuffer::new(400, 400, Rgba::TRANSPARENT);
//!
//! // Draw a bright red line.
//! for i in 0..400 {
//!     buffer.set(i, i, Rgba::RED)?;
//! }
//!
//! // Hand the raw RGBA8 bytes to an encoder.
//! assert_eq!(buffer.as_bytes().len(), 400 * 400 * 4);
//! # Ok::<(), imagy_texel::BufferError>(())
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
// The only unsafe code are the `Pod` impls of the pixel types.
#![deny(unsafe_code)]
extern crate alloc;

mod buf;
mod error;
pub mod layout;
mod math;
mod numeric;
mod pixel;

pub use self::buf::PixelBuffer;
pub use self::error::BufferError;
pub use self::layout::Layout;
pub use self::numeric::{Accumulate, Accumulator, Channel, Scalar};
pub use self::pixel::{PremultipliedRgba, Rgba};
