//! Reading between and beyond pixels.
//!
//! Sampling is parameterized by two independent policies. [`Interpolation`] decides how a
//! fractional coordinate turns into pixels, [`Extrapolation`] decides what coordinates outside of
//! the image resolve to. Resizing samples every destination pixel from the source image.
use core::ops::Range;

use imagy_texel::{Accumulate, Accumulator};
use log::debug;

use crate::{math, Error, Image, ImageView};

/// How to combine pixels at a fractional coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Use the single closest pixel.
    #[default]
    Nearest,
    /// Blend the four surrounding pixels by their distance.
    Bilinear,
}

/// What coordinates outside of an image resolve to.
///
/// ```
/// use imagy::{Extrapolation, Image, ImageView};
///
/// let image = Image::from_fn(3, 1, |x, _| x as u8);
/// assert_eq!(image.get_extrapolated(-1, 0, &Extrapolation::Reject), None);
/// assert_eq!(image.get_extrapolated(-1, 0, &Extrapolation::ClampToEdge), Some(0));
/// assert_eq!(image.get_extrapolated(-1, 0, &Extrapolation::Repeat), Some(2));
/// assert_eq!(image.get_extrapolated(-1, 0, &Extrapolation::Reflect), Some(0));
/// assert_eq!(image.get_extrapolated(-1, 0, &Extrapolation::Constant(9)), Some(9));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation<P> {
    /// There is nothing outside of the image, reading there fails.
    Reject,
    /// Use the closest pixel on the edge.
    ClampToEdge,
    /// Tile the image, wrapping around in both directions.
    Repeat,
    /// Tile the image with every other copy mirrored, so edges meet themselves.
    Reflect,
    /// Everything outside is the given pixel.
    Constant(P),
}

impl<P> Default for Extrapolation<P> {
    fn default() -> Self {
        Extrapolation::Reject
    }
}

impl<P: Copy> Extrapolation<P> {
    /// Read the pixel at a coordinate, resolving coordinates outside of the view by the policy.
    ///
    /// Fails for [`Extrapolation::Reject`] outside of the view and for every policy except
    /// [`Extrapolation::Constant`] if the view is empty.
    pub fn resolve<V>(&self, view: &V, x: isize, y: isize) -> Option<P>
    where
        V: ImageView<Pixel = P> + ?Sized,
    {
        if let Some(pixel) = view.pixel(x, y) {
            return Some(pixel);
        }

        let (width, height) = (view.width(), view.height());
        let (x, y) = match self {
            Extrapolation::Reject => return None,
            Extrapolation::Constant(pixel) => return Some(*pixel),
            Extrapolation::ClampToEdge => (clamp(x, width)?, clamp(y, height)?),
            Extrapolation::Repeat => (repeat(x, width)?, repeat(y, height)?),
            Extrapolation::Reflect => (reflect(x, width)?, reflect(y, height)?),
        };

        view.get(x, y)
    }
}

fn clamp(coordinate: isize, extent: usize) -> Option<usize> {
    let last = extent.checked_sub(1)?;
    Some(usize::try_from(coordinate).map_or(0, |c| c.min(last)))
}

fn repeat(coordinate: isize, extent: usize) -> Option<usize> {
    let extent = isize::try_from(extent).ok().filter(|&e| e > 0)?;
    usize::try_from(coordinate.rem_euclid(extent)).ok()
}

fn reflect(coordinate: isize, extent: usize) -> Option<usize> {
    let extent = isize::try_from(extent).ok().filter(|&e| e > 0)?;
    let period = extent.checked_mul(2)?;
    let phase = coordinate.rem_euclid(period);
    let mirrored = if phase < extent {
        phase
    } else {
        period - 1 - phase
    };
    usize::try_from(mirrored).ok()
}

/// An integral coordinate, if representable.
fn coordinate(value: f64) -> Option<isize> {
    // The upper bound is not representable itself; `as` would saturate silently.
    if value.is_finite() && value >= isize::MIN as f64 && value < isize::MAX as f64 {
        Some(value as isize)
    } else {
        None
    }
}

pub(crate) fn sample<V>(
    view: &V,
    x: f64,
    y: f64,
    interpolation: Interpolation,
    extrapolation: &Extrapolation<V::Pixel>,
) -> Option<V::Pixel>
where
    V: ImageView + ?Sized,
    V::Pixel: Accumulate<f64>,
{
    match interpolation {
        Interpolation::Nearest => nearest(view, x, y, extrapolation),
        Interpolation::Bilinear => bilinear(view, x, y, extrapolation),
    }
}

fn nearest<V>(
    view: &V,
    x: f64,
    y: f64,
    extrapolation: &Extrapolation<V::Pixel>,
) -> Option<V::Pixel>
where
    V: ImageView + ?Sized,
{
    let x = coordinate(math::round(x))?;
    let y = coordinate(math::round(y))?;
    extrapolation.resolve(view, x, y)
}

/// Blend the four pixels around the coordinate.
///
/// Neighbours whose weight is exactly zero are not read at all. Sampling precisely on the last
/// row or column therefore does not need anything beyond the image, even when rejecting.
fn bilinear<V>(
    view: &V,
    x: f64,
    y: f64,
    extrapolation: &Extrapolation<V::Pixel>,
) -> Option<V::Pixel>
where
    V: ImageView + ?Sized,
    V::Pixel: Accumulate<f64>,
{
    let (left, top) = (math::floor(x), math::floor(y));
    let (dx, dy) = (x - left, y - top);
    let (x0, y0) = (coordinate(left)?, coordinate(top)?);

    let taps = [
        (0, 0, (1.0 - dx) * (1.0 - dy)),
        (1, 0, dx * (1.0 - dy)),
        (0, 1, (1.0 - dx) * dy),
        (1, 1, dx * dy),
    ];

    let mut sum = <<V::Pixel as Accumulate<f64>>::Acc as Accumulator<f64>>::zero();
    for (ox, oy, weight) in taps {
        if weight == 0.0 {
            continue;
        }

        let pixel = extrapolation.resolve(view, x0.checked_add(ox)?, y0.checked_add(oy)?)?;
        sum = sum.add_weighted(Accumulate::<f64>::accumulate(pixel), weight);
    }

    Some(<V::Pixel as Accumulate<f64>>::from_accumulated(sum))
}

/// Scale a view to new dimensions.
///
/// Destination pixel `(dx, dy)` is sampled at `(dx * width / new_width, dy * height /
/// new_height)` with edge clamping. The top left pixels of both images correspond exactly and
/// there is no half-pixel shift. Nearest neighbour takes the pixel the coordinate falls into, so
/// enlarging by an integral factor `k` repeats each pixel in a `k` by `k` block.
pub(crate) fn resize<V>(
    view: &V,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Result<Image<V::Pixel>, Error>
where
    V: ImageView + ?Sized,
    V::Pixel: Accumulate<f64>,
{
    let degenerate = check_resize(view, width, height, interpolation)?;
    match interpolation {
        Interpolation::Nearest => Ok(nearest_scaled(view, width, height)),
        Interpolation::Bilinear => {
            let x_ratio = view.width() as f64 / width as f64;
            let y_ratio = view.height() as f64 / height as f64;
            let edges = Extrapolation::ClampToEdge;
            Image::try_from_fn(width, height, |dx, dy| {
                bilinear(view, dx as f64 * x_ratio, dy as f64 * y_ratio, &edges)
                    .ok_or_else(|| degenerate.clone())
            })
        }
    }
}

/// Scale a view by nearest neighbour, for pixels of any type.
pub(crate) fn resize_nearest<V>(
    view: &V,
    width: usize,
    height: usize,
) -> Result<Image<V::Pixel>, Error>
where
    V: ImageView + ?Sized,
{
    check_resize(view, width, height, Interpolation::Nearest)?;
    Ok(nearest_scaled(view, width, height))
}

/// Reject empty sources, returning the error that describes them.
fn check_resize<V>(
    view: &V,
    width: usize,
    height: usize,
    interpolation: Interpolation,
) -> Result<Error, Error>
where
    V: ImageView + ?Sized,
{
    let (source_width, source_height) = (view.width(), view.height());
    let degenerate = Error::DegenerateResize {
        width: source_width,
        height: source_height,
    };

    if source_width == 0 || source_height == 0 {
        return Err(degenerate);
    }

    debug!(
        "Resizing {}x{} to {}x{} ({:?})",
        source_width, source_height, width, height, interpolation
    );
    Ok(degenerate)
}

/// Requires a view that is not empty.
fn nearest_scaled<V>(view: &V, width: usize, height: usize) -> Image<V::Pixel>
where
    V: ImageView + ?Sized,
{
    let (source_width, source_height) = (view.width(), view.height());
    Image::from_fn(width, height, |dx, dy| {
        // Scaled indices stay inside the view, where edge clamping reads them unchanged.
        view.row(scale(dy, source_height, height))[scale(dx, source_width, width)]
    })
}

/// Map a destination index to its source index, rounding down.
///
/// Requires `index < target`, then the result is below `source`.
fn scale(index: usize, source: usize, target: usize) -> usize {
    // The product of two `usize` always fits.
    let scaled = index as u128 * source as u128 / target as u128;
    scaled as usize
}

/// Copy a region that may reach outside of the view.
pub(crate) fn crop<V>(
    view: &V,
    x: Range<isize>,
    y: Range<isize>,
    extrapolation: &Extrapolation<V::Pixel>,
) -> Result<Image<V::Pixel>, Error>
where
    V: ImageView + ?Sized,
{
    let out_of_bounds = || Error::OutOfBounds {
        x: clip(&x, view.width()),
        y: clip(&y, view.height()),
        width: view.width(),
        height: view.height(),
    };

    let width = x.end.checked_sub(x.start).and_then(|w| usize::try_from(w).ok());
    let height = y.end.checked_sub(y.start).and_then(|h| usize::try_from(h).ok());
    let (width, height) = match (width, height) {
        (Some(width), Some(height)) => (width, height),
        _ => return Err(out_of_bounds()),
    };

    Image::try_from_fn(width, height, |cx, cy| {
        // Both offsets are below a width or height that fits an `isize`.
        let (px, py) = (x.start + cx as isize, y.start + cy as isize);
        extrapolation.resolve(view, px, py).ok_or_else(out_of_bounds)
    })
}

/// The part of a signed range that lies within `0..extent`.
fn clip(range: &Range<isize>, extent: usize) -> Range<usize> {
    let start = usize::try_from(range.start).unwrap_or(0).min(extent);
    let end = usize::try_from(range.end).unwrap_or(0);
    start..end.clamp(start, extent)
}
