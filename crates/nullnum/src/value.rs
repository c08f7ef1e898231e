//! The `(value, valid)` pair at the heart of the crate.

use crate::numeric::Numeric;

/// A numeric value that may be absent.
///
/// When `valid` is false the raw `value` carries no meaning; use
/// [`value_or_zero`](Self::value_or_zero) or [`as_option`](Self::as_option)
/// rather than reading the field directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nullable<T> {
    /// Raw value, meaningful only when `valid` is set.
    pub value: T,
    /// Whether a value is present.
    pub valid: bool,
}

/// Nullable `f64`.
pub type Float = Nullable<f64>;

/// Nullable `i64`.
pub type Int = Nullable<i64>;

impl<T: Numeric> Nullable<T> {
    /// Exact pair as given.
    pub const fn new(value: T, valid: bool) -> Self {
        Self { value, valid }
    }

    /// The absent value.
    pub const fn null() -> Self {
        Self::new(T::ZERO, false)
    }

    /// Always-valid wrapper around `value`.
    pub const fn from_value(value: T) -> Self {
        Self::new(value, true)
    }

    /// Valid iff `value` is `Some`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::from_value(v),
            None => Self::null(),
        }
    }

    pub fn value_or_zero(&self) -> T {
        if self.valid {
            self.value
        } else {
            T::ZERO
        }
    }

    pub fn as_option(&self) -> Option<T> {
        self.valid.then_some(self.value)
    }

    /// True when absent, or present and equal to zero.
    pub fn is_zero(&self) -> bool {
        !self.valid || self.value.is_zero()
    }

    /// Overwrite the value and mark it present.
    pub fn set_valid(&mut self, value: T) {
        self.value = value;
        self.valid = true;
    }
}

impl<T: Numeric> PartialEq for Nullable<T> {
    /// Present values compare by value; all absent values are the same null.
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl<T: Numeric> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::from_value(value)
    }
}

impl<T: Numeric> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T: Numeric> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        value.as_option()
    }
}
