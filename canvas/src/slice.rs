use core::fmt;
use core::ops::{Index, Range, RangeBounds};

use imagy_texel::Layout;
use log::debug;

use crate::view::{bounded_range, ImageView, ImageViewMut};
use crate::{Error, Image};

/// A window onto a rectangular region of an [`Image`].
///
/// The slice keeps the image alive and shares its pixels. Coordinates are local: `(0, 0)` is the
/// top left pixel of the window. Slicing a slice again produces another window onto the same
/// image, with the offsets added up.
///
/// Writing through a slice behaves like writing to any other clone of the image: if the pixels
/// are still shared they are copied first, and the images the slice was made from stay
/// unchanged. Retrieve the written image with [`ImageSlice::into_inner`].
///
/// ```
/// use imagy::{Image, ImageView, ImageViewMut};
///
/// let image = Image::new(4, 4, 0u8);
/// let mut window = image.clone().into_slice(1..3, 1..3)?;
/// window.update(|p| *p = 1);
///
/// let image = window.into_inner();
/// assert_eq!(image.pixel(0, 0), Some(0));
/// assert_eq!(image.pixel(1, 1), Some(1));
/// assert_eq!(image.pixel(2, 2), Some(1));
/// assert_eq!(image.pixel(3, 3), Some(0));
/// # Ok::<(), imagy::Error>(())
/// ```
pub struct ImageSlice<P> {
    image: Image<P>,
    x0: usize,
    y0: usize,
    layout: Layout,
}

impl<P> ImageSlice<P> {
    /// The caller validated both ranges against the image.
    pub(crate) fn new(image: Image<P>, x: Range<usize>, y: Range<usize>) -> Self {
        let layout = match Layout::width_and_height(x.len(), y.len()) {
            Some(layout) => layout,
            None => unreachable!("a window is never larger than its image"),
        };

        ImageSlice {
            image,
            x0: x.start,
            y0: y.start,
            layout,
        }
    }

    /// The position of the top left pixel in the underlying image.
    pub fn origin(&self) -> (usize, usize) {
        (self.x0, self.y0)
    }

    /// The whole image this window is onto.
    pub fn image(&self) -> &Image<P> {
        &self.image
    }

    /// Unwrap the whole underlying image, including any writes made through the slice.
    pub fn into_inner(self) -> Image<P> {
        self.image
    }

    /// A window onto a region of this slice, in local coordinates.
    ///
    /// Fails with [`Error::OutOfBounds`] unless both ranges lie within the slice.
    pub fn slice(
        &self,
        x: impl RangeBounds<usize>,
        y: impl RangeBounds<usize>,
    ) -> Result<ImageSlice<P>, Error> {
        let (width, height) = (self.layout.width(), self.layout.height());
        let (x, y) = match (bounded_range(&x, width), bounded_range(&y, height)) {
            (Ok(x), Ok(y)) => (x, y),
            (Ok(x), Err(y)) | (Err(x), Ok(y)) | (Err(x), Err(y)) => {
                return Err(Error::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                })
            }
        };

        Ok(ImageSlice::new(
            self.image.clone(),
            self.x0 + x.start..self.x0 + x.end,
            self.y0 + y.start..self.y0 + y.end,
        ))
    }

    fn columns(&self) -> Range<usize> {
        self.x0..self.x0 + self.layout.width()
    }
}

impl<P: Copy> ImageView for ImageSlice<P> {
    type Pixel = P;

    fn layout(&self) -> Layout {
        self.layout
    }

    fn row(&self, y: usize) -> &[P] {
        assert!(y < self.layout.height(), "row {} of {:?}", y, self.layout);
        &self.image.row(self.y0 + y)[self.columns()]
    }

    fn to_image(&self) -> Image<P> {
        debug!(
            "Copying {}x{} window at ({}, {}) into a new image",
            self.layout.width(),
            self.layout.height(),
            self.x0,
            self.y0
        );
        Image::from_fn(self.layout.width(), self.layout.height(), |x, y| {
            self.row(y)[x]
        })
    }
}

impl<P: Copy> ImageViewMut for ImageSlice<P> {
    fn row_mut(&mut self, y: usize) -> &mut [P] {
        assert!(y < self.layout.height(), "row {} of {:?}", y, self.layout);
        let columns = self.columns();
        &mut self.image.row_mut(self.y0 + y)[columns]
    }
}

impl<P> Clone for ImageSlice<P> {
    fn clone(&self) -> Self {
        ImageSlice {
            image: self.image.clone(),
            x0: self.x0,
            y0: self.y0,
            layout: self.layout,
        }
    }
}

/// Copies the windowed pixels into a new, tightly packed image.
impl<P: Copy> From<&ImageSlice<P>> for Image<P> {
    fn from(slice: &ImageSlice<P>) -> Self {
        slice.to_image()
    }
}

impl<P: Copy> From<ImageSlice<P>> for Image<P> {
    fn from(slice: ImageSlice<P>) -> Self {
        slice.to_image()
    }
}

/// # Panics
/// When the coordinate is outside of the slice.
impl<P: Copy> Index<(usize, usize)> for ImageSlice<P> {
    type Output = P;

    fn index(&self, (x, y): (usize, usize)) -> &P {
        assert!(
            self.layout.in_bounds(x, y),
            "pixel ({}, {}) is out of bounds of the {}x{} slice",
            x,
            y,
            self.layout.width(),
            self.layout.height()
        );
        &self.row(y)[x]
    }
}

/// Slices are equal when their dimensions and pixels are, regardless of where they are located.
impl<P: Copy + PartialEq> PartialEq for ImageSlice<P> {
    fn eq(&self, other: &Self) -> bool {
        same_pixels(self, other)
    }
}

impl<P: Copy + Eq> Eq for ImageSlice<P> {}

impl<P: Copy + PartialEq> PartialEq<Image<P>> for ImageSlice<P> {
    fn eq(&self, other: &Image<P>) -> bool {
        same_pixels(self, other)
    }
}

impl<P: Copy + PartialEq> PartialEq<ImageSlice<P>> for Image<P> {
    fn eq(&self, other: &ImageSlice<P>) -> bool {
        same_pixels(self, other)
    }
}

fn same_pixels<P: PartialEq>(
    lhs: &impl ImageView<Pixel = P>,
    rhs: &impl ImageView<Pixel = P>,
) -> bool {
    lhs.layout() == rhs.layout() && lhs.y_range().all(|y| lhs.row(y) == rhs.row(y))
}

impl<P: Copy + fmt::Debug> fmt::Debug for ImageSlice<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct Rows<'a, P>(&'a ImageSlice<P>);

        impl<P: Copy + fmt::Debug> fmt::Debug for Rows<'_, P> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_list()
                    .entries(self.0.y_range().map(|y| self.0.row(y)))
                    .finish()
            }
        }

        f.debug_struct("ImageSlice")
            .field("origin", &self.origin())
            .field("width", &self.layout.width())
            .field("height", &self.layout.height())
            .field("rows", &Rows(self))
            .finish()
    }
}
