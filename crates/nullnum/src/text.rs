//! Plain-text codec, used for form fields and text columns.
//!
//! Absent values are written as an empty string. On the way in both `""` and
//! the literal `null` are read as absent.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::numeric::Numeric;
use crate::value::Nullable;

impl<T: Numeric> Nullable<T> {
    /// Decode `text` in place. On error the value is left absent.
    pub fn decode_text(&mut self, text: &str) -> Result<()> {
        *self = Self::null();
        if text.is_empty() || text == "null" {
            return Ok(());
        }
        self.set_valid(T::parse_text(text)?);
        Ok(())
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut out = Self::null();
        out.decode_text(text)?;
        Ok(out)
    }

    /// Literal text when present, `""` otherwise.
    pub fn to_text(&self) -> String {
        if self.valid {
            self.value.to_text()
        } else {
            String::new()
        }
    }
}

impl<T: Numeric> FromStr for Nullable<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl<T: Numeric> fmt::Display for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::{Float, Int};

    #[test]
    fn decode_float_text() {
        assert_eq!(Float::from_text("1.2345").unwrap(), Float::from_value(1.2345));
        assert!(!Float::from_text("").unwrap().valid);
        assert!(!Float::from_text("null").unwrap().valid);
        assert!(Float::from_text("NaN").unwrap().value.is_nan());
        assert_eq!(Float::from_text("-Inf").unwrap().value, f64::NEG_INFINITY);
    }

    #[test]
    fn decode_int_text() {
        assert_eq!(Int::from_text("12345").unwrap(), Int::from_value(12345));
        assert!(!Int::from_text("").unwrap().valid);
        assert!(!Int::from_text("null").unwrap().valid);
    }

    #[test]
    fn null_token_is_case_sensitive() {
        assert_eq!(Int::from_text("NULL").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(Float::from_text("Null").unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn failed_decode_leaves_value_absent() {
        let mut i = Int::from_value(5);
        let err = i.decode_text("12a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(!i.valid);
        assert_eq!(i.value, 0);

        let mut i = Int::from_value(5);
        let err = i.decode_text("9223372036854775808").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(!i.valid);
    }

    #[test]
    fn encode_text() {
        assert_eq!(Float::from_value(1.2345).to_text(), "1.2345");
        assert_eq!(Int::from_value(12345).to_text(), "12345");
        assert_eq!(Float::new(0.0, false).to_text(), "");
        assert_eq!(Int::new(9, false).to_string(), "");
        assert_eq!(Float::from_value(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(Int::from_value(0).to_string(), "0");
    }

    #[test]
    fn from_str() {
        let f: Float = "2.5".parse().unwrap();
        assert_eq!(f.value, 2.5);
        assert!("x".parse::<Int>().is_err());
    }
}
