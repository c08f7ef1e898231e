//! Structured (JSON) codec for nullable values.
//!
//! Decoding accepts every shape a nullable number shows up as in the wild:
//!
//! - `null` and `""` are absent;
//! - a bare number is parsed by the kind (integers reject fractions and
//!   report overflow as a range error);
//! - a quoted number or, for floats, one of the sentinels `"NaN"`, `"+Inf"`,
//!   `"-Inf"`;
//! - the decomposed record `{"Float64": 1.5, "Valid": true}` (`Int64` for
//!   integers).
//!
//! Encoding writes `null` for absent values and a bare number otherwise. What
//! happens to non-finite floats depends on [`NonFinite`]: the direct
//! [`Nullable::to_json`] path rejects them, the [`Engine`](crate::Engine)
//! writes sentinels.

pub mod decoder;
pub mod encoder;
pub mod token;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;
pub use token::Token;

use crate::error::{Error, Result};
use crate::numeric::{Numeric, VALID_FIELD};
use crate::value::Nullable;

/// How a valid non-finite float is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    /// Fail with a range error.
    Reject,
    /// Write the quoted sentinel.
    Sentinel,
}

/// Write `value` as a JSON token.
pub fn write_nullable<T: Numeric>(
    value: &Nullable<T>,
    out: &mut JsonEncoder,
    policy: NonFinite,
) -> Result<()> {
    if !value.valid {
        out.write_null();
        return Ok(());
    }
    match (value.value.sentinel_name(), policy) {
        (Some(name), NonFinite::Sentinel) => out.write_str(name),
        (Some(name), NonFinite::Reject) => return Err(Error::range(T::NAME, name)),
        (None, _) => out.write_raw(value.value.to_text().as_bytes()),
    }
    Ok(())
}

/// Interpret a parsed token as a nullable value of kind `T`.
pub fn decode_token<T: Numeric>(token: &Token) -> Result<Nullable<T>> {
    match token {
        Token::Null => Ok(Nullable::null()),
        Token::Number {
            literal,
            fractional,
        } => T::from_json_number(literal, *fractional).map(Nullable::from_value),
        Token::Str(s) if s.is_empty() => Ok(Nullable::null()),
        Token::Str(s) => T::from_json_string(s).map(Nullable::from_value),
        Token::Object(fields) => decode_record(fields),
        other => Err(Error::type_mismatch(T::NAME, other.kind_name())),
    }
}

/// `{"<RAW_FIELD>": number, "Valid": bool}`. Missing keys keep their zero.
fn decode_record<T: Numeric>(fields: &[(String, Token)]) -> Result<Nullable<T>> {
    let mut out = Nullable::null();
    for (key, token) in fields {
        if key == T::RAW_FIELD {
            match token {
                Token::Number {
                    literal,
                    fractional,
                } => out.value = T::from_json_number(literal, *fractional)?,
                Token::Null => {}
                other => return Err(Error::type_mismatch(T::NAME, other.kind_name())),
            }
        } else if key == VALID_FIELD {
            match token {
                Token::Bool(b) => out.valid = *b,
                Token::Null => {}
                other => return Err(Error::type_mismatch("bool", other.kind_name())),
            }
        } else {
            return Err(Error::UnknownField { name: key.clone() });
        }
    }
    Ok(out)
}

impl<T: Numeric> Nullable<T> {
    pub fn from_json(input: &[u8]) -> Result<Self> {
        let token = JsonDecoder::new(input).decode()?;
        decode_token(&token)
    }

    /// Decode `input` in place. On error the value is left absent.
    pub fn decode_json(&mut self, input: &[u8]) -> Result<()> {
        *self = Self::null();
        *self = Self::from_json(input)?;
        Ok(())
    }

    /// Encode as JSON. Non-finite floats are a range error on this path; use
    /// an [`Engine`](crate::Engine) with the float extension to write them as
    /// sentinels.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut out = JsonEncoder::new();
        write_nullable(self, &mut out, NonFinite::Reject)?;
        Ok(out.flush())
    }

    pub fn to_json_string(&self) -> Result<String> {
        // The encoder only writes UTF-8.
        Ok(String::from_utf8_lossy(&self.to_json()?).into_owned())
    }
}
