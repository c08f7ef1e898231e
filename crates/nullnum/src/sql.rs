//! Scan/bind bridge to an SQL-style storage driver.
//!
//! A driver hands rows over as [`SqlValue`]s and takes bind parameters back
//! in the same form; [`SqlValue::Null`] is the absent-marker.

use crate::error::Result;
use crate::numeric::Numeric;
use crate::value::Nullable;

/// Dynamically typed storage value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Int(_) => "INTEGER",
            SqlValue::Float(_) => "REAL",
            SqlValue::Bool(_) => "BOOLEAN",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Bytes(_) => "BLOB",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl<V: Into<SqlValue>> From<Option<V>> for SqlValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Read a value out of a result row.
pub trait Scanner {
    fn scan(&mut self, src: &SqlValue) -> Result<()>;
}

/// Produce a bind parameter.
pub trait Valuer {
    fn value(&self) -> SqlValue;
}

impl<T: Numeric> Scanner for Nullable<T> {
    /// On error the value is left absent.
    fn scan(&mut self, src: &SqlValue) -> Result<()> {
        *self = Self::null();
        if src.is_null() {
            return Ok(());
        }
        self.set_valid(T::from_sql(src)?);
        Ok(())
    }
}

impl<T: Numeric> Valuer for Nullable<T> {
    fn value(&self) -> SqlValue {
        if self.valid {
            self.value.into_sql()
        } else {
            SqlValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::{Float, Int};

    fn scanned<T: Numeric>(src: impl Into<SqlValue>) -> Result<Nullable<T>> {
        let mut out = Nullable::<T>::from_value(T::ZERO);
        out.scan(&src.into())?;
        Ok(out)
    }

    #[test]
    fn scan_float() {
        assert_eq!(scanned::<f64>(1.2345).unwrap(), Float::from_value(1.2345));
        assert_eq!(scanned::<f64>("1.2345").unwrap(), Float::from_value(1.2345));
        assert_eq!(
            scanned::<f64>(b"1.2345".to_vec()).unwrap(),
            Float::from_value(1.2345)
        );
        assert_eq!(scanned::<f64>(3i64).unwrap(), Float::from_value(3.0));
        assert!(!scanned::<f64>(SqlValue::Null).unwrap().valid);
        assert!(!scanned::<f64>(None::<f64>).unwrap().valid);
    }

    #[test]
    fn scan_int() {
        assert_eq!(scanned::<i64>(12345i64).unwrap(), Int::from_value(12345));
        assert_eq!(scanned::<i64>("12345").unwrap(), Int::from_value(12345));
        assert_eq!(scanned::<i64>(12345.0).unwrap(), Int::from_value(12345));
        assert!(!scanned::<i64>(SqlValue::Null).unwrap().valid);
    }

    #[test]
    fn scan_errors() {
        assert_eq!(scanned::<f64>(true).unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(scanned::<i64>(true).unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(scanned::<i64>(1.5).unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(scanned::<i64>(1e19).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(scanned::<i64>("abc").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(scanned::<f64>("abc").unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(
            scanned::<i64>(vec![0xffu8, 0xfe]).unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn failed_scan_leaves_value_absent() {
        let mut i = Int::from_value(9);
        assert!(i.scan(&SqlValue::Text("x".into())).is_err());
        assert!(!i.valid);
        assert_eq!(i.value, 0);
    }

    #[test]
    fn bind_values() {
        assert_eq!(Float::from_value(1.5).value(), SqlValue::Float(1.5));
        assert_eq!(Int::from_value(12345).value(), SqlValue::Int(12345));
        assert_eq!(Float::new(1.5, false).value(), SqlValue::Null);
        assert_eq!(Int::null().value(), SqlValue::Null);
    }

    #[test]
    fn scan_bind_round_trip() {
        for v in [Int::from_value(-3), Int::null()] {
            let mut back = Int::from_value(1);
            back.scan(&v.value()).unwrap();
            assert_eq!(back, v);
        }
    }
}
