//! Per-kind strategy behind [`Nullable`](crate::Nullable).
//!
//! Every codec in the crate is written once against [`Numeric`]; the
//! implementations for `f64` and `i64` supply literal parsing and formatting,
//! the zero value, the storage coercions and the arithmetic. The float
//! strategy also carries the sentinel table used for NaN and the infinities.

use std::fmt;
use std::num::IntErrorKind;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::sql::SqlValue;

mod private {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for i64 {}
}

/// Name of the validity key in the `{<raw>, Valid}` record form.
pub const VALID_FIELD: &str = "Valid";

/// A fixed-width numeric primitive that can be wrapped in a
/// [`Nullable`](crate::Nullable).
pub trait Numeric:
    Copy
    + PartialEq
    + Default
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
    + private::Sealed
{
    /// Short type name used in error messages.
    const NAME: &'static str;
    /// Key holding the raw value in the record form.
    const RAW_FIELD: &'static str;
    /// `[RAW_FIELD, VALID_FIELD]`.
    const RECORD_FIELDS: &'static [&'static str];
    /// The kind's zero.
    const ZERO: Self;
    /// Reserved string tokens and the values they stand for.
    const SENTINELS: &'static [(&'static str, Self)];

    /// Parse a bare JSON number literal. `fractional` is set when the literal
    /// has a fraction or an exponent.
    fn from_json_number(literal: &str, fractional: bool) -> Result<Self>;

    /// Parse the non-empty content of a quoted JSON string.
    fn from_json_string(s: &str) -> Result<Self> {
        Self::parse_text(s)
    }

    /// Parse plain text (sentinels included).
    fn parse_text(text: &str) -> Result<Self>;

    /// Literal text for the value. For finite values this is also a valid
    /// JSON number.
    fn to_text(self) -> String;

    /// Sentinel token standing in for this value, if any.
    fn sentinel_name(self) -> Option<&'static str> {
        None
    }

    /// Look a sentinel token up in the table.
    fn sentinel(name: &str) -> Option<Self> {
        Self::SENTINELS
            .iter()
            .find(|(token, _)| *token == name)
            .map(|(_, value)| *value)
    }

    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Coerce a non-null storage value.
    fn from_sql(src: &SqlValue) -> Result<Self>;

    /// Bindable storage value.
    fn into_sql(self) -> SqlValue;

    fn plus(self, rhs: Self) -> Self;
    fn minus(self, rhs: Self) -> Self;
    fn times(self, rhs: Self) -> Self;
    /// `None` when the kind has no result for the division.
    fn divided_by(self, rhs: Self) -> Option<Self>;
}

impl Numeric for f64 {
    const NAME: &'static str = "f64";
    const RAW_FIELD: &'static str = "Float64";
    const RECORD_FIELDS: &'static [&'static str] = &["Float64", VALID_FIELD];
    const ZERO: Self = 0.0;
    const SENTINELS: &'static [(&'static str, Self)] = &[
        ("NaN", f64::NAN),
        ("+Inf", f64::INFINITY),
        ("-Inf", f64::NEG_INFINITY),
    ];

    fn from_json_number(literal: &str, _fractional: bool) -> Result<Self> {
        parse_decimal_f64(literal)
    }

    fn parse_text(text: &str) -> Result<Self> {
        match Self::sentinel(text) {
            Some(value) => Ok(value),
            None => parse_decimal_f64(text),
        }
    }

    fn to_text(self) -> String {
        match self.sentinel_name() {
            Some(name) => name.to_owned(),
            None => format_float(self),
        }
    }

    fn sentinel_name(self) -> Option<&'static str> {
        if self.is_nan() {
            Some("NaN")
        } else if self == f64::INFINITY {
            Some("+Inf")
        } else if self == f64::NEG_INFINITY {
            Some("-Inf")
        } else {
            None
        }
    }

    fn from_sql(src: &SqlValue) -> Result<Self> {
        match src {
            SqlValue::Float(f) => Ok(*f),
            SqlValue::Int(i) => Ok(*i as f64),
            SqlValue::Text(s) => Self::parse_text(s),
            SqlValue::Bytes(b) => Self::parse_text(bytes_as_str(b, Self::NAME)?),
            other => Err(Error::type_mismatch(Self::NAME, other.type_name())),
        }
    }

    fn into_sql(self) -> SqlValue {
        SqlValue::Float(self)
    }

    fn plus(self, rhs: Self) -> Self {
        self + rhs
    }

    fn minus(self, rhs: Self) -> Self {
        self - rhs
    }

    fn times(self, rhs: Self) -> Self {
        self * rhs
    }

    fn divided_by(self, rhs: Self) -> Option<Self> {
        Some(self / rhs)
    }
}

impl Numeric for i64 {
    const NAME: &'static str = "i64";
    const RAW_FIELD: &'static str = "Int64";
    const RECORD_FIELDS: &'static [&'static str] = &["Int64", VALID_FIELD];
    const ZERO: Self = 0;
    const SENTINELS: &'static [(&'static str, Self)] = &[];

    fn from_json_number(literal: &str, fractional: bool) -> Result<Self> {
        if fractional {
            return Err(Error::type_mismatch(Self::NAME, "non-integer number"));
        }
        parse_decimal_i64(literal)
    }

    fn parse_text(text: &str) -> Result<Self> {
        parse_decimal_i64(text)
    }

    fn to_text(self) -> String {
        self.to_string()
    }

    fn from_sql(src: &SqlValue) -> Result<Self> {
        match src {
            SqlValue::Int(i) => Ok(*i),
            SqlValue::Float(f) => float_to_i64(*f),
            SqlValue::Text(s) => Self::parse_text(s),
            SqlValue::Bytes(b) => Self::parse_text(bytes_as_str(b, Self::NAME)?),
            other => Err(Error::type_mismatch(Self::NAME, other.type_name())),
        }
    }

    fn into_sql(self) -> SqlValue {
        SqlValue::Int(self)
    }

    fn plus(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn minus(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    fn times(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn divided_by(self, rhs: Self) -> Option<Self> {
        if rhs == 0 {
            return None;
        }
        Some(self.wrapping_div(rhs))
    }
}

/// Strict decimal float parse: no `inf`/`nan` spellings, and literals that
/// overflow to infinity are rejected.
fn parse_decimal_f64(s: &str) -> Result<f64> {
    let is_decimal = !s.is_empty()
        && s.bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'));
    if !is_decimal {
        return Err(Error::format(f64::NAME, s));
    }
    let value: f64 = s.parse().map_err(|_| Error::format(f64::NAME, s))?;
    if value.is_infinite() {
        return Err(Error::range(f64::NAME, s));
    }
    Ok(value)
}

fn parse_decimal_i64(s: &str) -> Result<i64> {
    s.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Error::range(i64::NAME, s),
        _ => Error::format(i64::NAME, s),
    })
}

fn float_to_i64(f: f64) -> Result<i64> {
    if f.is_nan() || (f.is_finite() && f.fract() != 0.0) {
        return Err(Error::type_mismatch(i64::NAME, "non-integer float"));
    }
    // i64::MIN is exactly representable, i64::MAX + 1 is the first float past the end.
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) {
        return Err(Error::range(i64::NAME, f));
    }
    Ok(f as i64)
}

fn bytes_as_str<'a>(bytes: &'a [u8], expected: &'static str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| Error::format(expected, &String::from_utf8_lossy(bytes)))
}

/// Shortest round-trip representation of a finite float, switching to
/// exponent notation at the same thresholds JavaScript does.
pub(crate) fn format_float(f: f64) -> String {
    let abs = f.abs();
    if f == 0.0 && f.is_sign_negative() {
        String::from("-0")
    } else if f.fract() == 0.0 && abs < 1e15 {
        format!("{}", f as i64)
    } else if abs >= 1e21 || abs < 1e-6 {
        format!("{:e}", f)
    } else {
        format!("{}", f)
    }
}
