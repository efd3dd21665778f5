// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2024 The `imagy` developers
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;

use log::trace;

use crate::error::BufferError;
use crate::layout::Layout;

/// Shared, copy-on-write storage of a row-major pixel matrix.
///
/// Cloning a buffer is cheap: both clones refer to the same allocation. The first mutation through
/// any of the clones copies the pixels into an allocation owned by that clone alone; subsequent
/// mutations of the now unshared buffer write in place.
///
/// The buffer never synchronizes writes. It is `Send` and `Sync` when the pixel type is, and since
/// a shared allocation is never written to, clones may be read from several threads at once.
///
/// ```
/// use imagy_texel::PixelBuffer;
///
/// let original = PixelBuffer::new(2, 2, 0u8);
/// let mut copy = original.clone();
/// assert!(copy.ptr_eq(&original));
///
/// copy.set(1, 1, 7).unwrap();
/// assert!(!copy.ptr_eq(&original));
/// assert_eq!(original.get(1, 1), Ok(&0));
/// assert_eq!(copy.get(1, 1), Ok(&7));
/// ```
pub struct PixelBuffer<P> {
    layout: Layout,
    /// Invariant: holds exactly `layout.len()` pixels.
    pixels: Arc<Vec<P>>,
}

impl<P> PixelBuffer<P> {
    /// Allocate a buffer with every pixel set to `fill`.
    ///
    /// # Panics
    /// When the number of pixels overflows a `usize` or the allocation fails.
    pub fn new(width: usize, height: usize, fill: P) -> Self
    where
        P: Clone,
    {
        let layout = Self::layout_for(width, height);
        let pixels = alloc::vec![fill; layout.len()];
        Self::new_raw(layout, pixels)
    }

    /// Allocate a buffer by producing each pixel from its coordinate.
    ///
    /// The producer is called in row-major order.
    ///
    /// # Panics
    /// When the number of pixels overflows a `usize` or the allocation fails.
    pub fn from_fn(width: usize, height: usize, mut producer: impl FnMut(usize, usize) -> P) -> Self {
        match Self::try_from_fn(width, height, |x, y| Ok::<_, Infallible>(producer(x, y))) {
            Ok(buffer) => buffer,
            Err(never) => match never {},
        }
    }

    /// Like [`PixelBuffer::from_fn`] but stops at the first pixel the producer fails on.
    ///
    /// # Panics
    /// When the number of pixels overflows a `usize` or the allocation fails.
    pub fn try_from_fn<E>(
        width: usize,
        height: usize,
        mut producer: impl FnMut(usize, usize) -> Result<P, E>,
    ) -> Result<Self, E> {
        let layout = Self::layout_for(width, height);
        let mut pixels = Vec::with_capacity(layout.len());
        for y in 0..height {
            for x in 0..width {
                pixels.push(producer(x, y)?);
            }
        }
        Ok(Self::new_raw(layout, pixels))
    }

    /// Interpret a row-major sequence of pixels as a buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>) -> Result<Self, BufferError> {
        let mismatch = BufferError::SizeMismatch {
            expected: width.saturating_mul(height),
            actual: pixels.len(),
        };

        match Layout::width_and_height(width, height) {
            Some(layout) if layout.len() == pixels.len() => Ok(Self::new_raw(layout, pixels)),
            _ => Err(mismatch),
        }
    }

    fn layout_for(width: usize, height: usize) -> Layout {
        match Layout::width_and_height(width, height) {
            Some(layout) => layout,
            None => panic!("Pixel layout {}x{} can not fit into memory", width, height),
        }
    }

    fn new_raw(layout: Layout, pixels: Vec<P>) -> Self {
        assert_eq!(layout.len(), pixels.len(), "Pixel count agrees with layout");
        PixelBuffer {
            layout,
            pixels: Arc::new(pixels),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn height(&self) -> usize {
        self.layout.height()
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// The pixels in row-major order.
    pub fn as_slice(&self) -> &[P] {
        &self.pixels
    }

    /// The raw bytes of all pixels, in row-major order.
    pub fn as_bytes(&self) -> &[u8]
    where
        P: bytemuck::Pod,
    {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Read a pixel, failing outside of the buffer.
    pub fn get(&self, x: usize, y: usize) -> Result<&P, BufferError> {
        match self.layout.index_of(x, y) {
            Some(index) => Ok(&self.pixels[index]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Write a pixel, failing outside of the buffer.
    ///
    /// Copies the pixels first if the allocation is currently shared.
    pub fn set(&mut self, x: usize, y: usize, pixel: P) -> Result<(), BufferError>
    where
        P: Clone,
    {
        let index = match self.layout.index_of(x, y) {
            Some(index) => index,
            None => return Err(self.out_of_bounds(x, y)),
        };

        self.make_mut()[index] = pixel;
        Ok(())
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> BufferError {
        BufferError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Query if two buffers share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Whether no other buffer shares this allocation.
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.pixels) == 1
    }

    /// Get the pixels mutably if there are no copies.
    ///
    /// ```
    /// use imagy_texel::PixelBuffer;
    ///
    /// let mut buffer = PixelBuffer::new(4, 1, 0u8);
    /// assert!(buffer.get_mut().is_some());
    /// let alias = buffer.clone();
    /// assert!(buffer.get_mut().is_none());
    /// # drop(alias);
    /// ```
    pub fn get_mut(&mut self) -> Option<&mut [P]> {
        Arc::get_mut(&mut self.pixels).map(Vec::as_mut_slice)
    }

    /// Ensure this buffer is its own copy and get its pixels mutably.
    ///
    /// Costs a full copy of the pixels once after the buffer was shared and nothing afterwards.
    pub fn make_mut(&mut self) -> &mut [P]
    where
        P: Clone,
    {
        if !self.is_unique() {
            trace!(
                "Unsharing {}x{} pixel buffer before write",
                self.width(),
                self.height()
            );
        }

        Arc::make_mut(&mut self.pixels).as_mut_slice()
    }

    /// Create a copy that never shares memory with this buffer.
    ///
    /// Useful before handing a buffer to another thread that will mutate it.
    pub fn to_unshared(&self) -> Self
    where
        P: Clone,
    {
        Self::new_raw(self.layout, self.pixels.as_ref().clone())
    }

    /// Unwrap the pixels, copying them only if the allocation is shared.
    pub fn into_vec(self) -> Vec<P>
    where
        P: Clone,
    {
        Arc::unwrap_or_clone(self.pixels)
    }
}

/// Shares the allocation, pixels are not cloned.
impl<P> Clone for PixelBuffer<P> {
    fn clone(&self) -> Self {
        PixelBuffer {
            layout: self.layout,
            pixels: Arc::clone(&self.pixels),
        }
    }
}

impl<P> Default for PixelBuffer<P> {
    fn default() -> Self {
        Self::new_raw(Layout::empty(), Vec::new())
    }
}

/// Buffers are equal when their layout and all their pixels are.
impl<P: PartialEq> PartialEq for PixelBuffer<P> {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout && self.pixels == other.pixels
    }
}

impl<P: Eq> Eq for PixelBuffer<P> {}

impl<P: fmt::Debug> fmt::Debug for PixelBuffer<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("layout", &self.layout)
            .field("content", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn strict_access() {
        let mut buffer = PixelBuffer::from_fn(3, 2, |x, y| (x + 10 * y) as u8);
        assert_eq!(buffer.as_slice(), [0, 1, 2, 10, 11, 12]);
        assert_eq!(buffer.get(2, 1), Ok(&12));
        assert_eq!(
            buffer.get(3, 0),
            Err(BufferError::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            })
        );
        assert!(buffer.set(0, 2, 0).is_err());
        assert_eq!(buffer.as_slice(), [0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn copy_on_write() {
        let original = PixelBuffer::new(8, 8, 0u16);
        let mut copy = original.clone();
        assert!(!copy.is_unique());

        copy.set(0, 0, 1).unwrap();
        assert!(copy.is_unique());
        assert!(original.is_unique());
        let allocation = copy.as_slice().as_ptr();

        copy.set(1, 0, 2).unwrap();
        assert_eq!(copy.as_slice().as_ptr(), allocation);
        assert_eq!(original.get(0, 0), Ok(&0));
        assert_eq!(original.get(1, 0), Ok(&0));
    }

    #[test]
    fn raw_construction() {
        assert!(PixelBuffer::from_pixels(2, 2, vec![0u8; 4]).is_ok());
        assert_eq!(
            PixelBuffer::from_pixels(2, 2, vec![0u8; 3]),
            Err(BufferError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );

        let empty = PixelBuffer::from_pixels(0, 5, Vec::<u8>::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.height(), 5);
    }

    #[test]
    fn fallible_production() {
        let buffer = PixelBuffer::try_from_fn(2, 2, |x, y| Ok::<_, ()>(x * y));
        assert_eq!(buffer.map(|b| b.into_vec()), Ok(vec![0, 0, 0, 1]));

        let mut calls = 0;
        let failed = PixelBuffer::try_from_fn(4, 4, |x, _| {
            calls += 1;
            if x == 2 {
                Err(x)
            } else {
                Ok(0u8)
            }
        });
        assert_eq!(failed, Err(2));
        assert_eq!(calls, 3);
    }

    #[test]
    fn unshared_copy() {
        let buffer = PixelBuffer::new(2, 1, 3u8);
        let copy = buffer.to_unshared();
        assert!(!copy.ptr_eq(&buffer));
        assert_eq!(copy, buffer);
        assert_eq!(copy.into_vec(), vec![3, 3]);
    }
}
