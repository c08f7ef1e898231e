//! Null-propagating arithmetic.
//!
//! An absent operand makes the result absent. Integer division by zero also
//! yields an absent result instead of panicking; float division follows
//! IEEE-754 and produces a signed infinity.

use std::ops::{Add, Div, Mul, Sub};

use crate::numeric::Numeric;
use crate::value::Nullable;

impl<T: Numeric> Nullable<T> {
    fn zip_with(self, rhs: Self, op: impl FnOnce(T, T) -> Option<T>) -> Self {
        if !self.valid || !rhs.valid {
            return Self::null();
        }
        Self::from_option(op(self.value, rhs.value))
    }

    pub fn plus(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| Some(a.plus(b)))
    }

    pub fn minus(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| Some(a.minus(b)))
    }

    pub fn times(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| Some(a.times(b)))
    }

    pub fn divided_by(self, rhs: Self) -> Self {
        self.zip_with(rhs, T::divided_by)
    }
}

impl<T: Numeric> Add for Nullable<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(rhs)
    }
}

impl<T: Numeric> Sub for Nullable<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.minus(rhs)
    }
}

impl<T: Numeric> Mul for Nullable<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.times(rhs)
    }
}

impl<T: Numeric> Div for Nullable<T> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.divided_by(rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::value::{Float, Int};

    #[test]
    fn float_ops() {
        let a = Float::new(1.2345, true);
        let b = Float::new(5.2, true);
        let c = Float::new(0.0, false);

        assert_eq!(a.plus(b).value_or_zero(), 1.2345 + 5.2);
        assert_eq!(b.plus(a).value_or_zero(), 5.2 + 1.2345);
        assert_eq!(a.minus(b).value_or_zero(), 1.2345 - 5.2);
        assert_eq!(b.minus(a).value_or_zero(), 5.2 - 1.2345);
        assert_eq!(a.times(b).value_or_zero(), 1.2345 * 5.2);
        for r in [a.plus(c), c.minus(a), c.times(c), a.divided_by(c), c.divided_by(a)] {
            assert!(!r.valid);
        }
    }

    #[test]
    fn float_division() {
        let a = Float::new(10.0, true);
        let b = Float::new(4.0, true);
        assert_eq!(a.divided_by(b).value_or_zero(), 2.5);
        assert_eq!(b.divided_by(a).value_or_zero(), 0.4);
        assert_eq!(
            a.divided_by(Float::new(0.0, true)),
            Float::from_value(f64::INFINITY)
        );
        assert_eq!(
            Float::from_value(-1.0).divided_by(Float::from_value(0.0)),
            Float::from_value(f64::NEG_INFINITY)
        );
        let nan = Float::from_value(0.0).divided_by(Float::from_value(0.0));
        assert!(nan.valid && nan.value.is_nan());
    }

    #[test]
    fn int_ops() {
        let a = Int::new(1, true);
        let b = Int::new(5, true);
        let c = Int::new(0, false);
        let d = Int::new(0, true);

        assert_eq!(a.plus(b).value_or_zero(), 6);
        assert_eq!(a.minus(b).value_or_zero(), -4);
        assert_eq!(b.minus(a).value_or_zero(), 4);
        assert_eq!(a.divided_by(b).value_or_zero(), 0);
        assert_eq!(b.divided_by(a).value_or_zero(), 5);
        assert_eq!(Int::from_value(2).times(b), Int::from_value(10));
        assert_eq!(Int::from_value(2).times(d), Int::from_value(0));
        for r in [a.plus(c), c.plus(a), c.minus(c), a.times(c), a.divided_by(c), c.divided_by(c)] {
            assert!(!r.valid);
        }
    }

    #[test]
    fn int_division_by_zero_is_absent() {
        let r = Int::from_value(1).divided_by(Int::from_value(0));
        assert!(!r.valid);
        assert_eq!(r.value, 0);
    }

    #[test]
    fn int_overflow_wraps() {
        assert_eq!(
            Int::from_value(i64::MAX).plus(Int::from_value(1)),
            Int::from_value(i64::MIN)
        );
    }

    #[test]
    fn operators() {
        let a = Int::from_value(6);
        let b = Int::from_value(3);
        assert_eq!(a + b, Int::from_value(9));
        assert_eq!(a - b, Int::from_value(3));
        assert_eq!(a * b, Int::from_value(18));
        assert_eq!(a / b, Int::from_value(2));
        assert!(!(a / Int::from_value(0)).valid);
        assert!(!(Float::from_value(1.0) + Float::null()).valid);
    }

    #[test]
    fn operands_are_untouched() {
        let a = Float::from_value(2.0);
        let b = Float::from_value(3.0);
        let _ = a.times(b);
        assert_eq!(a, Float::from_value(2.0));
        assert_eq!(b, Float::from_value(3.0));
    }
}
