// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `imagy` developers
use thiserror::Error;

/// A failed strict access or construction of a [`PixelBuffer`].
///
/// [`PixelBuffer`]: crate::PixelBuffer
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("coordinate ({x}, {y}) is outside of the {width}x{height} buffer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// The number of pixels disagrees with the dimensions, or the dimensions overflow.
    #[error("buffer requires {expected} pixels but {actual} were provided")]
    SizeMismatch { expected: usize, actual: usize },
}
