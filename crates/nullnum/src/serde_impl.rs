//! `serde` integration, so nullable values can sit inside any derived struct.
//!
//! Serialization follows the direct JSON path: absent values become `none`
//! and non-finite floats are an error. Deserialization accepts the same
//! shapes as [`Nullable::from_json`].

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{self, Serialize, Serializer};

use crate::error::Error;
use crate::numeric::{Numeric, VALID_FIELD};
use crate::value::Nullable;

impl<T: Numeric> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.valid {
            return serializer.serialize_none();
        }
        if let Some(name) = self.value.sentinel_name() {
            return Err(ser::Error::custom(Error::range(T::NAME, name)));
        }
        self.value.serialize(serializer)
    }
}

impl<'de, T: Numeric> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NullableVisitor(PhantomData))
    }
}

struct NullableVisitor<T>(PhantomData<T>);

impl<T: Numeric> NullableVisitor<T> {
    fn number<E: de::Error>(literal: &str, fractional: bool) -> Result<Nullable<T>, E> {
        T::from_json_number(literal, fractional)
            .map(Nullable::from_value)
            .map_err(E::custom)
    }
}

impl<'de, T: Numeric> Visitor<'de> for NullableVisitor<T> {
    type Value = Nullable<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "null, a number, a numeric string or a {{\"{}\", \"{}\"}} record",
            T::RAW_FIELD,
            VALID_FIELD
        )
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Nullable::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Nullable::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::number(&v.to_string(), false)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Self::number(&v.to_string(), false)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // Display of a finite f64 round-trips exactly.
        Self::number(&v.to_string(), true)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Ok(Nullable::null());
        }
        T::from_json_string(v)
            .map(Nullable::from_value)
            .map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut out = Nullable::null();
        while let Some(key) = map.next_key::<String>()? {
            if key == T::RAW_FIELD {
                if let Some(value) = map.next_value::<Option<T>>()? {
                    out.value = value;
                }
            } else if key == VALID_FIELD {
                if let Some(valid) = map.next_value::<Option<bool>>()? {
                    out.valid = valid;
                }
            } else {
                return Err(de::Error::unknown_field(&key, T::RECORD_FIELDS));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::value::{Float, Int};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: Int,
        score: Float,
    }

    #[test]
    fn serialize_values() {
        assert_eq!(serde_json::to_string(&Float::from_value(1.2345)).unwrap(), "1.2345");
        assert_eq!(serde_json::to_string(&Int::from_value(12345)).unwrap(), "12345");
        assert_eq!(serde_json::to_string(&Float::null()).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Int::new(3, false)).unwrap(), "null");
    }

    #[test]
    fn serialize_rejects_non_finite() {
        assert!(serde_json::to_string(&Float::from_value(f64::NAN)).is_err());
        assert!(serde_json::to_string(&Float::from_value(f64::INFINITY)).is_err());
    }

    #[test]
    fn deserialize_shapes() {
        let f: Float = serde_json::from_str("1.2345").unwrap();
        assert_eq!(f, Float::from_value(1.2345));
        let f: Float = serde_json::from_str(r#""1.2345""#).unwrap();
        assert_eq!(f, Float::from_value(1.2345));
        let f: Float = serde_json::from_str(r#"{"Float64":1.2345,"Valid":true}"#).unwrap();
        assert_eq!(f, Float::from_value(1.2345));
        let f: Float = serde_json::from_str("10").unwrap();
        assert_eq!(f, Float::from_value(10.0));
        let f: Float = serde_json::from_str(r#""""#).unwrap();
        assert!(!f.valid);
        let i: Int = serde_json::from_str("null").unwrap();
        assert!(!i.valid);
        let i: Int = serde_json::from_str(r#""12345""#).unwrap();
        assert_eq!(i, Int::from_value(12345));
        let i: Int = serde_json::from_str(r#"{"Int64":12345,"Valid":true}"#).unwrap();
        assert_eq!(i, Int::from_value(12345));
    }

    #[test]
    fn deserialize_errors() {
        assert!(serde_json::from_str::<Int>("1.2345").is_err());
        assert!(serde_json::from_str::<Int>("9223372036854775808").is_err());
        assert!(serde_json::from_str::<Int>("true").is_err());
        assert!(serde_json::from_str::<Float>("[1]").is_err());
        assert!(serde_json::from_str::<Float>(r#""abc""#).is_err());
        assert!(serde_json::from_str::<Float>(r#"{"Float64":1,"Other":true}"#).is_err());
        let i: Int = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(i.value, i64::MAX);
    }

    #[test]
    fn floats_round_trip_exactly() {
        let v = 123456789.123456789_f64;
        let text = serde_json::to_string(&Float::from_value(v)).unwrap();
        assert_eq!(text, "123456789.12345679");
        let back: Float = serde_json::from_str(&text).unwrap();
        assert_eq!(back.value.to_bits(), v.to_bits());

        let row: Row = serde_json::from_str(r#"{"id":1,"score":123456789.12345679}"#).unwrap();
        assert_eq!(row.score.value.to_bits(), v.to_bits());
    }

    #[test]
    fn embedded_in_struct() {
        let row = Row {
            id: Int::from_value(7),
            score: Float::null(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, json!({"id": 7, "score": null}));
        let back: Row = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);

        let row: Row = serde_json::from_str(r#"{"id":"","score":"+Inf"}"#).unwrap();
        assert!(!row.id.valid);
        assert_eq!(row.score.value, f64::INFINITY);
    }
}
