// Distributed under The MIT License (MIT)
//
// Copyright (c) 2019, 2024 The `imagy` developers
//! The row-major placement of pixels in a buffer.
use core::{cmp, fmt};

/// Width and height of a tightly packed, row-major matrix of pixels.
///
/// The pixel at `(x, y)` is stored at index `y * width + x`. A layout can only be constructed if
/// the number of pixels fits into a `usize`, so none of the index computations below overflow.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Layout {
    width: usize,
    height: usize,
}

impl Layout {
    pub const fn empty() -> Self {
        Layout {
            width: 0,
            height: 0,
        }
    }

    /// A layout for the given dimensions, if its pixel count is representable.
    pub fn width_and_height(width: usize, height: usize) -> Option<Self> {
        let _ = width.checked_mul(height)?;
        Some(Layout { width, height })
    }

    pub fn width(self) -> usize {
        self.width
    }

    pub fn height(self) -> usize {
        self.height
    }

    /// The number of pixels in this layout.
    pub fn len(self) -> usize {
        // Checked on construction.
        self.width * self.height
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn in_bounds(self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Like `in_bounds` but for coordinates that may be negative.
    pub fn contains(self, x: isize, y: isize) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.in_bounds(x, y),
            _ => false,
        }
    }

    /// The linear index of a coordinate, `None` when it is outside the layout.
    pub fn index_of(self, x: usize, y: usize) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// The coordinate of a linear index.
    ///
    /// # Panics
    /// When the index is not smaller than `len`.
    pub fn coordinate_of(self, index: usize) -> (usize, usize) {
        assert!(index < self.len(), "index {} out of {} pixels", index, self.len());
        (index % self.width, index / self.width)
    }

    /// The layout with width and height swapped.
    pub fn transposed(self) -> Self {
        Layout {
            width: self.height,
            height: self.width,
        }
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Layout")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Layouts are ordered by containment: one is smaller if it fits inside the other.
impl cmp::PartialOrd for Layout {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        match (
            self.width.cmp(&other.width),
            self.height.cmp(&other.height),
        ) {
            (cmp::Ordering::Equal, cmp::Ordering::Equal) => Some(cmp::Ordering::Equal),
            (w, h) if w != cmp::Ordering::Greater && h != cmp::Ordering::Greater => {
                Some(cmp::Ordering::Less)
            }
            (w, h) if w != cmp::Ordering::Less && h != cmp::Ordering::Less => {
                Some(cmp::Ordering::Greater)
            }
            _ => None,
        }
    }
}
