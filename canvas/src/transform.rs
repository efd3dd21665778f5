//! Mirroring and quarter turns.
//!
//! Each transform computes the source coordinate of every destination pixel and copies it, so
//! the result is always a new, tightly packed image.
use crate::{Image, ImageView};

pub(crate) fn flip_x<V: ImageView + ?Sized>(view: &V) -> Image<V::Pixel> {
    let width = view.width();
    Image::from_fn(width, view.height(), |x, y| view.row(y)[width - 1 - x])
}

pub(crate) fn flip_y<V: ImageView + ?Sized>(view: &V) -> Image<V::Pixel> {
    let height = view.height();
    Image::from_fn(view.width(), height, |x, y| view.row(height - 1 - y)[x])
}

pub(crate) fn transpose<V: ImageView + ?Sized>(view: &V) -> Image<V::Pixel> {
    Image::from_fn(view.height(), view.width(), |x, y| view.row(x)[y])
}

/// Rotate clockwise, any number of quarter turns is reduced to `0..4` first.
pub(crate) fn rotate<V: ImageView + ?Sized>(view: &V, times: isize) -> Image<V::Pixel> {
    let (width, height) = (view.width(), view.height());
    match times.rem_euclid(4) {
        0 => view.to_image(),
        1 => Image::from_fn(height, width, |x, y| view.row(height - 1 - x)[y]),
        2 => Image::from_fn(width, height, |x, y| {
            view.row(height - 1 - y)[width - 1 - x]
        }),
        _ => Image::from_fn(height, width, |x, y| view.row(x)[width - 1 - y]),
    }
}
