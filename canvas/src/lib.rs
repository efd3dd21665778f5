//! Generic images with value semantics.
//!
//! An [`Image`] is a rectangle of pixels of any type. Cloning it is cheap: clones share their
//! pixels until one of them is written to, and only then is the storage copied. An
//! [`ImageSlice`] is a window onto part of an image that shares its pixels as well.
//!
//! Both implement [`ImageView`], which provides the algorithms:
//!
//! - mapping over pixels, with or without their coordinate,
//! - flipping, transposing and rotating by quarter turns,
//! - sampling at fractional coordinates and resizing, see [`Interpolation`] and [`Extrapolation`],
//! - convolution with a [`Kernel`].
//!
//! Every algorithm returns a new image. Reading a single pixel is lenient: coordinates outside of
//! the image yield `None` and writes to them are ignored, so code walking over neighbourhoods does
//! not need to treat the edges specially. Operations describing whole regions or shapes report an
//! [`Error`] instead.
//!
//! # Usage
//!
//! ```
//! use imagy::{Extrapolation, Image, ImageView, ImageViewMut, Interpolation, Rgba};
//!
//! // A horizontal red gradient.
//! let mut image = Image::from_fn(64, 32, |x, _| Rgba::new(4 * x as u8, 0, 0, 255));
//! image.set_pixel(0, 0, Rgba::WHITE);
//!
//! let thumbnail = image.resized(16, 8, Interpolation::Bilinear)?;
//! assert_eq!(thumbnail.pixel(0, 0), Some(Rgba::WHITE));
//!
//! // Turn the top left corner on its side.
//! let corner = image.slice(..4, ..2)?.rotated(1);
//! assert_eq!((corner.width(), corner.height()), (2, 4));
//! assert_eq!(corner.pixel(1, 0), Some(Rgba::WHITE));
//!
//! // Read around the image, beyond its edges.
//! let edge = image.sample(-3.5, 1.0, Interpolation::Nearest, &Extrapolation::ClampToEdge);
//! assert_eq!(edge, Some(Rgba::new(0, 0, 0, 255)));
//! # Ok::<(), imagy::Error>(())
//! ```
//!
//! The pixel types and the numeric traits used to blend them live in the `imagy-texel` crate and
//! are re-exported here.
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod convolve;
mod error;
mod image;
mod math;
mod ops;
mod sample;
mod slice;
mod transform;
mod view;


pub use self::convolve::Kernel;
pub use self::error::Error;
pub use self::image::Image;
pub use self::sample::{Extrapolation, Interpolation};
pub use self::slice::ImageSlice;
pub use self::view::{ImageView, ImageViewMut, Pixels};

pub use imagy_texel::{
    Accumulate, Accumulator, BufferError, Channel, Layout, PixelBuffer, PremultipliedRgba, Rgba,
    Scalar,
};
