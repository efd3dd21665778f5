use alloc::vec::Vec;
use core::fmt;

use imagy_texel::{Accumulate, Accumulator, Scalar};
use log::debug;

use crate::sample::Extrapolation;
use crate::{Error, Image, ImageView};

/// A rectangular matrix of weights with a center pixel.
///
/// Both dimensions are odd, which is checked on construction, so the center is unambiguous.
///
/// ```
/// use imagy::{Extrapolation, Image, ImageView, Kernel};
///
/// let sharpen = Kernel::from_rows(&[[0, -1, 0], [-1, 5, -1], [0, -1, 0]])?;
/// let image = Image::from_fn(3, 3, |x, y| if (x, y) == (1, 1) { 100u8 } else { 50 });
/// let sharp = image.convoluted(&sharpen, &Extrapolation::ClampToEdge);
/// assert_eq!(sharp.get(1, 1), Some(255));
/// assert_eq!(sharp.get(0, 1), Some(0));
/// # Ok::<(), imagy::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Kernel<S> {
    width: usize,
    height: usize,
    weights: Vec<S>,
}

impl<S: Scalar> Kernel<S> {
    /// A kernel from its weights in row-major order.
    pub fn new(width: usize, height: usize, weights: Vec<S>) -> Result<Self, Error> {
        let expected = width.saturating_mul(height);
        if weights.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: weights.len(),
            });
        }

        if width % 2 == 0 || height % 2 == 0 {
            return Err(Error::InvalidKernel { width, height });
        }

        Ok(Kernel {
            width,
            height,
            weights,
        })
    }

    /// A kernel from its rows, which must all be of the same length.
    pub fn from_rows<R: AsRef<[S]>>(rows: &[R]) -> Result<Self, Error> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut weights = Vec::with_capacity(width.saturating_mul(rows.len()));
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::SizeMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            weights.extend_from_slice(row);
        }

        Kernel::new(width, rows.len(), weights)
    }

    /// A normalized `size` by `size` kernel of equal weights.
    ///
    /// Fails with [`Error::InvalidKernel`] if `size` is even, or if the weight is not
    /// representable in `S`, as for integer scalars and any `size` above one.
    pub fn box_blur(size: usize) -> Result<Self, Error> {
        let count = size.saturating_mul(size);
        let weight = S::from_f64(1.0 / count as f64);
        if weight == S::ZERO {
            return Err(Error::InvalidKernel {
                width: size,
                height: size,
            });
        }

        Kernel::new(size, size, alloc::vec![weight; count])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The position of the center weight.
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// The weights in row-major order.
    pub fn weights(&self) -> &[S] {
        &self.weights
    }

    fn rows(&self) -> impl Iterator<Item = &[S]> {
        self.weights.chunks_exact(self.width)
    }
}

impl<S: fmt::Debug> fmt::Debug for Kernel<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("weights", &self.weights)
            .finish()
    }
}

/// Sum the weighted neighbourhood of every pixel, starting from `bias`.
///
/// Neighbours outside of the view are resolved through the extrapolation. Those that it can not
/// resolve, all of them for [`Extrapolation::Reject`], do not contribute to the sum.
pub(crate) fn convolve<V, S>(
    view: &V,
    kernel: &Kernel<S>,
    bias: <V::Pixel as Accumulate<S>>::Acc,
    extrapolation: &Extrapolation<V::Pixel>,
) -> Image<V::Pixel>
where
    V: ImageView + ?Sized,
    V::Pixel: Accumulate<S>,
    S: Scalar,
{
    debug!(
        "Convolving {}x{} with a {}x{} kernel",
        view.width(),
        view.height(),
        kernel.width(),
        kernel.height()
    );

    let (cx, cy) = kernel.center();
    // Pixel counts are bounded by the allocation size, which fits an `isize`.
    let (cx, cy) = (cx as isize, cy as isize);

    Image::from_fn(view.width(), view.height(), |x, y| {
        let mut sum = bias;
        for (j, row) in kernel.rows().enumerate() {
            let sy = y as isize + j as isize - cy;
            for (i, &weight) in row.iter().enumerate() {
                let sx = x as isize + i as isize - cx;
                if let Some(pixel) = extrapolation.resolve(view, sx, sy) {
                    sum = sum.add_weighted(Accumulate::<S>::accumulate(pixel), weight);
                }
            }
        }

        <V::Pixel as Accumulate<S>>::from_accumulated(sum)
    })
}
