//! Pixel-wise arithmetic between images.
//!
//! Binary operators combine the pixels at equal coordinates and require both images to have the
//! same dimensions; they panic otherwise, like indexing out of bounds does. Operators on owned
//! images reuse the storage of the left operand when it is not shared.
use core::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, Neg, Not, Sub, SubAssign,
};

use crate::{Image, ImageView, ImageViewMut};

macro_rules! binary_op {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident;)*) => {$(
        impl<P: Copy + $op<Output = P>> $op<&Image<P>> for &Image<P> {
            type Output = Image<P>;

            fn $method(self, rhs: &Image<P>) -> Image<P> {
                self.zip_map(rhs, |&p, &q| p.$method(q))
            }
        }

        impl<P: Copy + $op<Output = P>> $op for Image<P> {
            type Output = Image<P>;

            fn $method(mut self, rhs: Image<P>) -> Image<P> {
                self.$assign_method(&rhs);
                self
            }
        }

        impl<P: Copy + $op<Output = P>> $assign<&Image<P>> for Image<P> {
            fn $assign_method(&mut self, rhs: &Image<P>) {
                self.zip_update(rhs, |p, &q| *p = (*p).$method(q));
            }
        }

        impl<P: Copy + $op<Output = P>> $assign for Image<P> {
            fn $assign_method(&mut self, rhs: Image<P>) {
                self.$assign_method(&rhs);
            }
        }
    )*};
}

macro_rules! unary_op {
    ($($op:ident::$method:ident;)*) => {$(
        impl<P: Copy + $op<Output = P>> $op for &Image<P> {
            type Output = Image<P>;

            fn $method(self) -> Image<P> {
                self.map(|p| p.$method())
            }
        }

        impl<P: Copy + $op<Output = P>> $op for Image<P> {
            type Output = Image<P>;

            fn $method(mut self) -> Image<P> {
                self.update(|p| *p = (*p).$method());
                self
            }
        }
    )*};
}

binary_op! {
    Add::add, AddAssign::add_assign;
    Sub::sub, SubAssign::sub_assign;
    BitAnd::bitand, BitAndAssign::bitand_assign;
    BitOr::bitor, BitOrAssign::bitor_assign;
}

unary_op! {
    Neg::neg;
    Not::not;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn arithmetic() {
        let a = Image::from_pixels(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = Image::from_pixels(2, 2, vec![10, 20, 30, 40]).unwrap();

        assert_eq!((&a + &b).as_slice(), [11, 22, 33, 44]);
        assert_eq!((&b - &a).as_slice(), [9, 18, 27, 36]);
        assert_eq!((-&a).as_slice(), [-1, -2, -3, -4]);

        let mut c = a.clone();
        c += &b;
        c -= a.clone();
        assert_eq!(c, b);
    }

    #[test]
    fn masks() {
        let a = Image::from_pixels(3, 1, vec![true, true, false]).unwrap();
        let b = Image::from_pixels(3, 1, vec![true, false, false]).unwrap();

        assert_eq!((&a & &b).as_slice(), [true, false, false]);
        assert_eq!((&a | &b).as_slice(), [true, true, false]);
        assert_eq!((!a.clone()).as_slice(), [false, false, true]);

        let mut c = b.clone();
        c |= &a;
        c &= b;
        assert_eq!(c.as_slice(), [true, false, false]);
    }

    #[test]
    fn owned_operands_reuse_storage() {
        let a = Image::new(4, 4, 1.5f32);
        let allocation = a.as_slice().as_ptr();
        let sum = a + Image::new(4, 4, 0.5);
        assert_eq!(sum.as_slice().as_ptr(), allocation);
        assert!(sum.iter().all(|&p| p == 2.0));
    }

    #[test]
    fn shared_operands_stay_unchanged() {
        let a = Image::new(2, 1, 1i32);
        let alias = a.clone();
        let sum = a + alias.clone();
        assert_eq!(sum.as_slice(), [2, 2]);
        assert_eq!(alias.as_slice(), [1, 1]);
    }

    #[test]
    #[should_panic]
    fn mismatched_dimensions_panic() {
        let _ = &Image::new(2, 1, 0i32) + &Image::new(1, 2, 0i32);
    }
}
