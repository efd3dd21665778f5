use core::ops::Range;

use imagy_texel::BufferError;
use thiserror::Error;

/// The ways an image operation can be rejected.
///
/// Reading or writing single pixels through [`ImageView::pixel`] and
/// [`ImageViewMut::set_pixel`] never fails; coordinates near and beyond the edges are ordinary
/// there. Everything that describes a whole region or shape is validated instead.
///
/// [`ImageView::pixel`]: crate::ImageView::pixel
/// [`ImageViewMut::set_pixel`]: crate::ImageViewMut::set_pixel
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A region is not contained in the image.
    #[error("region {x:?} x {y:?} is not within the {width}x{height} image")]
    OutOfBounds {
        x: Range<usize>,
        y: Range<usize>,
        width: usize,
        height: usize,
    },
    /// The number of pixels or weights disagrees with the declared dimensions.
    #[error("expected {expected} values but {actual} were provided")]
    SizeMismatch { expected: usize, actual: usize },
    /// A convolution kernel without a center pixel.
    #[error("a {width}x{height} kernel has no center, both dimensions must be odd")]
    InvalidKernel { width: usize, height: usize },
    /// Resizing needs at least one source pixel.
    #[error("can not resize a {width}x{height} image")]
    DegenerateResize { width: usize, height: usize },
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => Error::OutOfBounds {
                x: x..x.saturating_add(1),
                y: y..y.saturating_add(1),
                width,
                height,
            },
            BufferError::SizeMismatch { expected, actual } => {
                Error::SizeMismatch { expected, actual }
            }
        }
    }
}
