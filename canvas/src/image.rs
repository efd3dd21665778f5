use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut, RangeBounds};
use core::slice;

use imagy_texel::{Layout, PixelBuffer};

use crate::view::{bounded_range, ImageView, ImageViewMut};
use crate::{Error, ImageSlice};

/// A rectangle of pixels with value semantics.
///
/// Cloning an image is cheap and never copies pixels. The clones share their storage until one
/// of them is written to, at which point the writer copies the pixels into storage of its own.
/// Afterwards it writes in place again. From the outside an image therefore behaves exactly like
/// an owned `Vec` of pixels with a width and a height attached.
///
/// Pixels are addressed by `(x, y)` with `x` running along a row. Reading a single pixel with
/// [`ImageView::pixel`] accepts any coordinate and returns `None` outside of the image, and
/// writing with [`ImageViewMut::set_pixel`] ignores such coordinates. Use the `Index` operator for
/// access that treats a coordinate outside the image as a bug.
///
/// ```
/// use imagy::{Image, ImageView, ImageViewMut, Rgba};
///
/// let mut image = Image::new(4, 3, Rgba::BLACK);
/// let snapshot = image.clone();
///
/// image.set_pixel(1, 2, Rgba::RED);
/// assert_eq!(image.pixel(1, 2), Some(Rgba::RED));
/// assert_eq!(snapshot.pixel(1, 2), Some(Rgba::BLACK));
/// assert_eq!(image.pixel(-1, 2), None);
/// ```
pub struct Image<P> {
    buffer: PixelBuffer<P>,
}

impl<P> Image<P> {
    /// An image with every pixel set to `fill`.
    ///
    /// # Panics
    /// When the number of pixels overflows a `usize` or the allocation fails.
    pub fn new(width: usize, height: usize, fill: P) -> Self
    where
        P: Clone,
    {
        Image {
            buffer: PixelBuffer::new(width, height, fill),
        }
    }

    /// An image whose pixels are computed from their coordinate, in row-major order.
    ///
    /// # Panics
    /// When the number of pixels overflows a `usize` or the allocation fails.
    pub fn from_fn(width: usize, height: usize, producer: impl FnMut(usize, usize) -> P) -> Self {
        Image {
            buffer: PixelBuffer::from_fn(width, height, producer),
        }
    }

    /// Like [`Image::from_fn`], returning the first error of the producer.
    pub fn try_from_fn<E>(
        width: usize,
        height: usize,
        producer: impl FnMut(usize, usize) -> Result<P, E>,
    ) -> Result<Self, E> {
        PixelBuffer::try_from_fn(width, height, producer).map(Image::from_buffer)
    }

    /// Wrap a row-major sequence of pixels.
    ///
    /// Fails with [`Error::SizeMismatch`] unless there are exactly `width * height` pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>) -> Result<Self, Error> {
        let buffer = PixelBuffer::from_pixels(width, height, pixels)?;
        Ok(Image::from_buffer(buffer))
    }

    pub fn from_buffer(buffer: PixelBuffer<P>) -> Self {
        Image { buffer }
    }

    /// An image without any pixels.
    pub fn empty() -> Self {
        Image::from_buffer(PixelBuffer::default())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// All pixels in row-major order.
    pub fn as_slice(&self) -> &[P] {
        self.buffer.as_slice()
    }

    /// All pixels in row-major order, mutably.
    ///
    /// Copies the pixels first if they are shared with another image.
    pub fn as_mut_slice(&mut self) -> &mut [P]
    where
        P: Clone,
    {
        self.buffer.make_mut()
    }

    /// The pixels as raw bytes, for example to hand them to an encoder.
    pub fn as_bytes(&self) -> &[u8]
    where
        P: bytemuck::Pod,
    {
        self.buffer.as_bytes()
    }

    pub fn iter(&self) -> slice::Iter<'_, P> {
        self.as_slice().iter()
    }

    pub fn buffer(&self) -> &PixelBuffer<P> {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer<P> {
        self.buffer
    }

    /// Unwrap the row-major pixels, copying them only if they are shared.
    pub fn into_pixels(self) -> Vec<P>
    where
        P: Clone,
    {
        self.buffer.into_vec()
    }

    /// Whether another image currently shares the pixel storage.
    pub fn is_shared(&self) -> bool {
        !self.buffer.is_unique()
    }

    /// Whether both images share the same pixel storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.buffer.ptr_eq(&other.buffer)
    }

    /// A copy of this image that does not share storage with it.
    ///
    /// Hand such a copy to another thread that needs to write to it.
    pub fn to_unshared(&self) -> Self
    where
        P: Clone,
    {
        Image::from_buffer(self.buffer.to_unshared())
    }

    /// A window onto a region of this image, sharing its pixels.
    ///
    /// Both ranges must lie within the image, otherwise this fails with [`Error::OutOfBounds`].
    /// Empty ranges are fine, they produce an empty slice.
    ///
    /// ```
    /// use imagy::{Image, ImageView};
    ///
    /// let image = Image::from_fn(4, 4, |x, y| x + 4 * y);
    /// let slice = image.slice(1..=2, 2..)?;
    /// assert_eq!((slice.width(), slice.height()), (2, 2));
    /// assert_eq!(slice.get(0, 0), Some(9));
    ///
    /// assert!(image.slice(3..5, ..).is_err());
    /// # Ok::<(), imagy::Error>(())
    /// ```
    pub fn slice(
        &self,
        x: impl RangeBounds<usize>,
        y: impl RangeBounds<usize>,
    ) -> Result<ImageSlice<P>, Error> {
        self.clone().into_slice(x, y)
    }

    /// Turn this image into a window onto one of its regions.
    ///
    /// Unlike [`Image::slice`] the image is not kept alive elsewhere, so writing through the slice
    /// does not copy. Recover the modified image with [`ImageSlice::into_inner`].
    pub fn into_slice(
        self,
        x: impl RangeBounds<usize>,
        y: impl RangeBounds<usize>,
    ) -> Result<ImageSlice<P>, Error> {
        let layout = self.buffer.layout();
        match (
            bounded_range(&x, layout.width()),
            bounded_range(&y, layout.height()),
        ) {
            (Ok(x), Ok(y)) => Ok(ImageSlice::new(self, x, y)),
            (Ok(x), Err(y)) | (Err(x), Ok(y)) | (Err(x), Err(y)) => Err(Error::OutOfBounds {
                x,
                y,
                width: layout.width(),
                height: layout.height(),
            }),
        }
    }

    /// Combine two images of equal dimensions pixel by pixel.
    ///
    /// # Panics
    /// When the dimensions differ.
    pub(crate) fn zip_map<Q, R>(&self, other: &Image<Q>, mut f: impl FnMut(&P, &Q) -> R) -> Image<R> {
        let layout = self.buffer.layout();
        assert_same_layout(layout, other.buffer.layout());
        Image::from_fn(layout.width(), layout.height(), |x, y| {
            f(&self[(x, y)], &other[(x, y)])
        })
    }

    /// Modify this image in place from the pixels of another of equal dimensions.
    ///
    /// # Panics
    /// When the dimensions differ.
    pub(crate) fn zip_update<Q>(&mut self, other: &Image<Q>, mut f: impl FnMut(&mut P, &Q))
    where
        P: Clone,
    {
        assert_same_layout(self.buffer.layout(), other.buffer.layout());
        self.as_mut_slice()
            .iter_mut()
            .zip(other.iter())
            .for_each(|(p, q)| f(p, q));
    }

    fn index_of(&self, (x, y): (usize, usize)) -> usize {
        let layout = self.buffer.layout();
        match layout.index_of(x, y) {
            Some(index) => index,
            None => panic!(
                "pixel ({}, {}) is out of bounds of the {}x{} image",
                x,
                y,
                layout.width(),
                layout.height()
            ),
        }
    }
}

fn assert_same_layout(lhs: Layout, rhs: Layout) {
    assert!(
        lhs == rhs,
        "images of different dimensions: {}x{} and {}x{}",
        lhs.width(),
        lhs.height(),
        rhs.width(),
        rhs.height()
    );
}

impl<P: Copy> ImageView for Image<P> {
    type Pixel = P;

    fn layout(&self) -> Layout {
        self.buffer.layout()
    }

    fn row(&self, y: usize) -> &[P] {
        let layout = self.buffer.layout();
        assert!(y < layout.height(), "row {} of {:?}", y, layout);
        let width = layout.width();
        &self.as_slice()[y * width..][..width]
    }

    fn to_image(&self) -> Image<P> {
        self.clone()
    }
}

impl<P: Copy> ImageViewMut for Image<P> {
    fn row_mut(&mut self, y: usize) -> &mut [P] {
        let layout = self.buffer.layout();
        assert!(y < layout.height(), "row {} of {:?}", y, layout);
        let width = layout.width();
        &mut self.as_mut_slice()[y * width..][..width]
    }

    fn update(&mut self, f: impl FnMut(&mut P)) {
        self.as_mut_slice().iter_mut().for_each(f);
    }
}

impl<P> Clone for Image<P> {
    fn clone(&self) -> Self {
        Image {
            buffer: self.buffer.clone(),
        }
    }
}

impl<P> Default for Image<P> {
    fn default() -> Self {
        Image::empty()
    }
}

impl<P> From<PixelBuffer<P>> for Image<P> {
    fn from(buffer: PixelBuffer<P>) -> Self {
        Image::from_buffer(buffer)
    }
}

/// # Panics
/// When the coordinate is outside of the image.
impl<P> Index<(usize, usize)> for Image<P> {
    type Output = P;

    fn index(&self, coordinate: (usize, usize)) -> &P {
        let index = self.index_of(coordinate);
        &self.as_slice()[index]
    }
}

/// Unshares the pixels before handing out the reference.
///
/// # Panics
/// When the coordinate is outside of the image.
impl<P: Clone> IndexMut<(usize, usize)> for Image<P> {
    fn index_mut(&mut self, coordinate: (usize, usize)) -> &mut P {
        let index = self.index_of(coordinate);
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, P> IntoIterator for &'a Image<P> {
    type Item = &'a P;
    type IntoIter = slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Images are equal when their dimensions and all their pixels are.
impl<P: PartialEq> PartialEq for Image<P> {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl<P: Eq> Eq for Image<P> {}

impl<P: fmt::Debug> fmt::Debug for Image<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.buffer.width())
            .field("height", &self.buffer.height())
            .field("pixels", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use imagy_texel::Rgba;

    #[test]
    fn construction() {
        let image = Image::from_fn(3, 2, |x, y| (x, y));
        assert_eq!(image.len(), 6);
        assert_eq!(image[(2, 1)], (2, 1));
        assert_eq!(image.as_slice()[3], (0, 1));

        let filled = Image::new(2, 2, Rgba::WHITE);
        assert!(filled.iter().all(|&p| p == Rgba::WHITE));

        assert_eq!(
            Image::from_pixels(2, 2, vec![0u8; 5]),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 5
            })
        );

        let empty = Image::<u8>::default();
        assert!(empty.is_empty());
        assert_eq!(empty, Image::from_pixels(0, 0, vec![]).unwrap());
    }

    #[test]
    fn fallible_construction_stops_early() {
        let result = Image::try_from_fn(3, 3, |x, y| if y == 1 { Err((x, y)) } else { Ok(0u8) });
        assert_eq!(result, Err((0, 1)));
    }

    #[test]
    fn indexing_writes_unshare() {
        let mut image = Image::new(2, 2, 0u8);
        let shared = image.clone();
        assert!(image.is_shared());

        image[(1, 0)] = 5;
        assert!(!image.is_shared());
        assert!(!shared.is_shared());
        assert_eq!(shared[(1, 0)], 0);
        assert_eq!(image.as_slice(), [0, 5, 0, 0]);
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_bounds_panics() {
        let image = Image::new(2, 2, 0u8);
        let _ = image[(2, 0)];
    }

    #[test]
    fn rows() {
        let image = Image::from_fn(3, 2, |x, y| (x + 3 * y) as u8);
        assert_eq!(image.row(0), [0, 1, 2]);
        assert_eq!(image.row(1), [3, 4, 5]);

        let mut image = image;
        image.row_mut(1)[0] = 9;
        assert_eq!(image.as_slice(), [0, 1, 2, 9, 4, 5]);
    }

    #[test]
    fn slicing_bounds() {
        let image = Image::new(4, 3, 0u8);
        assert!(image.slice(0..4, 0..3).is_ok());
        assert!(image.slice(4..4, 3..3).is_ok());
        assert_eq!(
            image.slice(1..=4, 0..1).unwrap_err(),
            Error::OutOfBounds {
                x: 1..5,
                y: 0..1,
                width: 4,
                height: 3,
            }
        );
        assert!(image.slice(.., 2..4).is_err());
    }

    #[test]
    fn bytes_and_pixels() {
        let image = Image::from_pixels(2, 1, vec![Rgba::new(1u8, 2, 3, 4), Rgba::WHITE]).unwrap();
        assert_eq!(image.as_bytes(), [1, 2, 3, 4, 255, 255, 255, 255]);

        let alias = image.clone();
        let pixels = image.into_pixels();
        assert_eq!(pixels, alias.as_slice());
    }

    #[test]
    fn update_in_place() {
        let mut image = Image::from_fn(2, 2, |x, y| (x + y) as u8);
        let allocation = {
            image.update(|p| *p *= 2);
            image.as_slice().as_ptr()
        };
        image.update(|p| *p += 1);
        assert_eq!(image.as_slice(), [1, 3, 3, 5]);
        assert_eq!(image.as_slice().as_ptr(), allocation);
    }

    #[test]
    fn unshared_copy_for_threads() {
        let image = Image::new(3, 3, 1u16);
        let copy = image.to_unshared();
        assert!(!copy.ptr_eq(&image));
        assert!(!image.is_shared());
        assert_eq!(copy, image);
    }
}
