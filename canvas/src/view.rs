//! The capability shared by images and their slices.
//!
//! Algorithms are written once against [`ImageView`] and always produce a new, tightly packed
//! [`Image`]. Both [`Image`] and [`ImageSlice`] implement it, so every transform works on a
//! window of an image just as on the whole.
//!
//! [`ImageSlice`]: crate::ImageSlice
use core::ops::{Bound, Range, RangeBounds};
use core::slice;

use imagy_texel::{Accumulate, Accumulator, Layout, Scalar};

use crate::convolve::{self, Kernel};
use crate::sample::{self, Extrapolation, Interpolation};
use crate::{transform, Error, Image};

/// Read access to a rectangle of pixels.
pub trait ImageView {
    type Pixel: Copy;

    fn layout(&self) -> Layout;

    /// The pixels of row `y`, from left to right.
    ///
    /// # Panics
    /// When `y` is not smaller than the height.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn width(&self) -> usize {
        self.layout().width()
    }

    fn height(&self) -> usize {
        self.layout().height()
    }

    fn x_range(&self) -> Range<usize> {
        0..self.width()
    }

    fn y_range(&self) -> Range<usize> {
        0..self.height()
    }

    /// The pixel at a coordinate, `None` outside of the view.
    fn get(&self, x: usize, y: usize) -> Option<Self::Pixel> {
        if y < self.height() {
            self.row(y).get(x).copied()
        } else {
            None
        }
    }

    /// The pixel at a coordinate that may lie anywhere, including negative coordinates.
    ///
    /// Returns `None` outside of the view. Use [`ImageView::get_extrapolated`] to decide what
    /// those coordinates should resolve to instead.
    fn pixel(&self, x: isize, y: isize) -> Option<Self::Pixel> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y),
            _ => None,
        }
    }

    /// Resolve a coordinate through an extrapolation policy.
    fn get_extrapolated(
        &self,
        x: isize,
        y: isize,
        extrapolation: &Extrapolation<Self::Pixel>,
    ) -> Option<Self::Pixel> {
        extrapolation.resolve(self, x, y)
    }

    /// All pixels in row-major order.
    ///
    /// Pair them with their linear index with `enumerate`.
    fn pixels(&self) -> Pixels<'_, Self> {
        Pixels::new(self)
    }

    /// Copy the pixels into a new, independent image.
    fn to_image(&self) -> Image<Self::Pixel> {
        Image::from_fn(self.width(), self.height(), |x, y| self.row(y)[x])
    }

    /// Apply a function to every pixel.
    fn map<Q>(&self, mut f: impl FnMut(Self::Pixel) -> Q) -> Image<Q> {
        Image::from_fn(self.width(), self.height(), |x, y| f(self.row(y)[x]))
    }

    /// Apply a function to every pixel together with its coordinate.
    fn map_with_coordinates<Q>(
        &self,
        mut f: impl FnMut(usize, usize, Self::Pixel) -> Q,
    ) -> Image<Q> {
        Image::from_fn(self.width(), self.height(), |x, y| f(x, y, self.row(y)[x]))
    }

    /// Mirror left to right.
    fn flip_x(&self) -> Image<Self::Pixel> {
        transform::flip_x(self)
    }

    /// Mirror top to bottom.
    fn flip_y(&self) -> Image<Self::Pixel> {
        transform::flip_y(self)
    }

    /// Swap rows and columns.
    fn transposed(&self) -> Image<Self::Pixel> {
        transform::transpose(self)
    }

    /// Rotate clockwise by `times` quarter turns, negative values turn counter-clockwise.
    fn rotated(&self, times: isize) -> Image<Self::Pixel> {
        transform::rotate(self, times)
    }

    /// Sample at a fractional coordinate.
    fn sample(
        &self,
        x: f64,
        y: f64,
        interpolation: Interpolation,
        extrapolation: &Extrapolation<Self::Pixel>,
    ) -> Option<Self::Pixel>
    where
        Self::Pixel: Accumulate<f64>,
    {
        sample::sample(self, x, y, interpolation, extrapolation)
    }

    /// Scale to new dimensions by nearest neighbour.
    ///
    /// Equal to [`ImageView::resized`] with [`Interpolation::Nearest`] but without requiring
    /// the pixels to be numeric.
    fn resized_nearest(&self, width: usize, height: usize) -> Result<Image<Self::Pixel>, Error> {
        sample::resize_nearest(self, width, height)
    }

    /// Scale to new dimensions.
    fn resized(
        &self,
        width: usize,
        height: usize,
        interpolation: Interpolation,
    ) -> Result<Image<Self::Pixel>, Error>
    where
        Self::Pixel: Accumulate<f64>,
    {
        sample::resize(self, width, height, interpolation)
    }

    /// Copy a region that may extend beyond the view, filling it through a policy.
    ///
    /// Fails with [`Error::OutOfBounds`] if some coordinate of the region can not be resolved.
    fn crop_extrapolated(
        &self,
        x_range: Range<isize>,
        y_range: Range<isize>,
        extrapolation: &Extrapolation<Self::Pixel>,
    ) -> Result<Image<Self::Pixel>, Error> {
        sample::crop(self, x_range, y_range, extrapolation)
    }

    /// Convolve with a kernel centered on each pixel.
    fn convoluted<S: Scalar>(
        &self,
        kernel: &Kernel<S>,
        extrapolation: &Extrapolation<Self::Pixel>,
    ) -> Image<Self::Pixel>
    where
        Self::Pixel: Accumulate<S>,
    {
        let bias = <<Self::Pixel as Accumulate<S>>::Acc as Accumulator<S>>::zero();
        convolve::convolve(self, kernel, bias, extrapolation)
    }

    /// Convolve with a kernel and add a constant to every sum.
    fn convoluted_with_bias<S: Scalar>(
        &self,
        kernel: &Kernel<S>,
        bias: <Self::Pixel as Accumulate<S>>::Acc,
        extrapolation: &Extrapolation<Self::Pixel>,
    ) -> Image<Self::Pixel>
    where
        Self::Pixel: Accumulate<S>,
    {
        convolve::convolve(self, kernel, bias, extrapolation)
    }
}

/// Write access to a rectangle of pixels.
///
/// Writing to pixels that share their storage with other images copies the storage first.
pub trait ImageViewMut: ImageView {
    /// The pixels of row `y`, mutably.
    ///
    /// # Panics
    /// When `y` is not smaller than the height.
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Self::Pixel> {
        if self.layout().in_bounds(x, y) {
            Some(&mut self.row_mut(y)[x])
        } else {
            None
        }
    }

    /// Overwrite the pixel at a coordinate.
    ///
    /// Coordinates outside of the view are ignored, and then the storage is not copied either.
    fn set_pixel(&mut self, x: isize, y: isize, pixel: Self::Pixel) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            if let Some(slot) = self.get_mut(x, y) {
                *slot = pixel;
            }
        }
    }

    /// Modify every pixel in place, in row-major order.
    fn update(&mut self, mut f: impl FnMut(&mut Self::Pixel)) {
        for y in 0..self.height() {
            self.row_mut(y).iter_mut().for_each(&mut f);
        }
    }
}

/// Iterator over the pixels of a view in row-major order.
pub struct Pixels<'a, V: ImageView + ?Sized> {
    view: &'a V,
    next_row: usize,
    row: slice::Iter<'a, V::Pixel>,
    remaining: usize,
}

impl<'a, V: ImageView + ?Sized> Pixels<'a, V> {
    fn new(view: &'a V) -> Self {
        Pixels {
            view,
            next_row: 0,
            row: [].iter(),
            remaining: view.layout().len(),
        }
    }
}

impl<V: ImageView + ?Sized> Clone for Pixels<'_, V> {
    fn clone(&self) -> Self {
        Pixels {
            view: self.view,
            next_row: self.next_row,
            row: self.row.clone(),
            remaining: self.remaining,
        }
    }
}

impl<V: ImageView + ?Sized> Iterator for Pixels<'_, V> {
    type Item = V::Pixel;

    fn next(&mut self) -> Option<V::Pixel> {
        loop {
            if let Some(pixel) = self.row.next() {
                self.remaining -= 1;
                return Some(*pixel);
            }

            if self.next_row >= self.view.height() {
                return None;
            }

            self.row = self.view.row(self.next_row).iter();
            self.next_row += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V: ImageView + ?Sized> ExactSizeIterator for Pixels<'_, V> {}

/// Turn a range into `start..end` within `0..extent`.
pub(crate) fn bounded_range(
    range: &impl RangeBounds<usize>,
    extent: usize,
) -> Result<Range<usize>, Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => extent,
    };

    if start <= end && end <= extent {
        Ok(start..end)
    } else {
        Err(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert_eq!(bounded_range(&(1..=2), 4), Ok(1..3));
        assert_eq!(bounded_range(&(..), 4), Ok(0..4));
        assert_eq!(bounded_range(&(2..2), 4), Ok(2..2));
        assert_eq!(bounded_range(&(3..=4), 4), Err(3..5));
        assert_eq!(bounded_range(&(3..1), 4), Err(3..1));
        assert_eq!(bounded_range(&(..=usize::MAX), 4), Err(0..usize::MAX));
    }

    #[test]
    fn pixels_restart_and_count() {
        let image = Image::from_fn(3, 2, |x, y| (x, y));
        let pixels = image.pixels();
        assert_eq!(pixels.len(), 6);
        assert_eq!(
            pixels.clone().collect::<alloc::vec::Vec<_>>(),
            [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(pixels.enumerate().nth(4), Some((4, (1, 1))));
    }

    #[test]
    fn lenient_access() {
        let mut image = Image::new(2, 2, 1u8);
        assert_eq!(image.pixel(-1, 0), None);
        assert_eq!(image.pixel(0, 2), None);
        assert_eq!(image.pixel(1, 1), Some(1));

        let shared = image.clone();
        image.set_pixel(-1, 0, 9);
        image.set_pixel(2, 0, 9);
        assert_eq!(image, shared);
        assert!(image.ptr_eq(&shared), "ignored writes do not unshare");
    }

    #[test]
    fn empty_view_has_no_pixels() {
        let image = Image::new(0, 3, 0u8);
        assert_eq!(image.pixels().count(), 0);
        assert_eq!(image.get(0, 0), None);
    }
}
