//! Fast-path JSON engine with pluggable per-type codecs.
//!
//! An [`Engine`] is built once, during initialization, from an
//! [`EngineBuilder`] and the [`Extension`]s registered on it, and is then
//! passed explicitly to whatever needs to encode or decode. There is no
//! process-wide instance.
//!
//! The numeric extensions install one shared [`ValueCodec`] for the raw
//! primitive, its `Option` and its nullable wrapper, so a plain `f64` field
//! holding NaN and a [`Float`](crate::Float) holding NaN are both written as
//! `"NaN"`.
//!
//! Types without a registered codec go through `serde_json`.
//!
//! ```
//! use nullnum::{Engine, Float};
//!
//! let engine = Engine::builder().register(nullnum::float_extension()).build();
//! let bytes = engine.encode(&Float::from_value(f64::NAN)).unwrap();
//! assert_eq!(bytes, br#""NaN""#);
//! let back: f64 = engine.decode(br#""+Inf""#).unwrap();
//! assert_eq!(back, f64::INFINITY);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::json::{decode_token, write_nullable, JsonDecoder, JsonEncoder, NonFinite, Token};
use crate::numeric::Numeric;
use crate::value::Nullable;

/// Encoder/decoder for one or more concrete types, addressed by `TypeId`.
pub trait ValueCodec: Send + Sync {
    fn encode(&self, value: &dyn Any, out: &mut JsonEncoder) -> Result<()>;
    fn decode(&self, token: &Token, slot: &mut dyn Any) -> Result<()>;
}

/// A bundle of codecs installed together.
pub trait Extension {
    fn name(&self) -> &'static str;
    fn codecs(&self) -> Vec<(TypeId, Arc<dyn ValueCodec>)>;
}

/// Sentinel-aware codec for `T`, `Option<T>` and `Nullable<T>`.
pub struct NumericCodec<T>(PhantomData<fn() -> T>);

impl<T> Default for NumericCodec<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Numeric> ValueCodec for NumericCodec<T> {
    fn encode(&self, value: &dyn Any, out: &mut JsonEncoder) -> Result<()> {
        let value = if let Some(v) = value.downcast_ref::<Nullable<T>>() {
            *v
        } else if let Some(raw) = value.downcast_ref::<T>() {
            Nullable::from_value(*raw)
        } else if let Some(opt) = value.downcast_ref::<Option<T>>() {
            Nullable::from_option(*opt)
        } else {
            return Err(Error::type_mismatch(T::NAME, "foreign type"));
        };
        write_nullable(&value, out, NonFinite::Sentinel)
    }

    fn decode(&self, token: &Token, slot: &mut dyn Any) -> Result<()> {
        if let Some(slot) = slot.downcast_mut::<Nullable<T>>() {
            *slot = Nullable::null();
            *slot = decode_token(token)?;
            Ok(())
        } else if let Some(slot) = slot.downcast_mut::<T>() {
            *slot = T::ZERO;
            *slot = decode_token::<T>(token)?.value_or_zero();
            Ok(())
        } else if let Some(slot) = slot.downcast_mut::<Option<T>>() {
            *slot = None;
            *slot = decode_token::<T>(token)?.as_option();
            Ok(())
        } else {
            Err(Error::type_mismatch(T::NAME, "foreign type"))
        }
    }
}

/// Registers [`NumericCodec<T>`] for `T`, `Option<T>` and `Nullable<T>`.
pub struct NumericExtension<T>(PhantomData<fn() -> T>);

impl<T> Default for NumericExtension<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Numeric> Extension for NumericExtension<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn codecs(&self) -> Vec<(TypeId, Arc<dyn ValueCodec>)> {
        let codec: Arc<dyn ValueCodec> = Arc::new(NumericCodec::<T>::default());
        vec![
            (TypeId::of::<T>(), Arc::clone(&codec)),
            (TypeId::of::<Option<T>>(), Arc::clone(&codec)),
            (TypeId::of::<Nullable<T>>(), codec),
        ]
    }
}

/// `f64` / [`Float`](crate::Float) with `"NaN"`, `"+Inf"`, `"-Inf"` sentinels.
pub fn float_extension() -> NumericExtension<f64> {
    NumericExtension::default()
}

/// `i64` / [`Int`](crate::Int).
pub fn int_extension() -> NumericExtension<i64> {
    NumericExtension::default()
}

/// Options controlling engine behaviour.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Escape `<`, `>` and `&` in strings written by the engine.
    pub escape_html: bool,
    /// Fail when a record carries a key it does not declare. When `false`
    /// such keys are skipped.
    pub reject_unknown_fields: bool,
}

#[derive(Default)]
pub struct EngineBuilder {
    options: EngineOptions,
    codecs: HashMap<TypeId, Arc<dyn ValueCodec>>,
    extensions: Vec<&'static str>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Install an extension. Registering the same extension again replaces
    /// its codecs with equivalent ones.
    pub fn register<E: Extension>(mut self, extension: E) -> Self {
        let name = extension.name();
        let codecs = extension.codecs();
        debug!(extension = name, types = codecs.len(), "registering codec extension");
        self.codecs.extend(codecs);
        if !self.extensions.contains(&name) {
            self.extensions.push(name);
        }
        self
    }

    pub fn build(self) -> Engine {
        debug!(
            extensions = ?self.extensions,
            codecs = self.codecs.len(),
            "json engine ready"
        );
        Engine {
            options: self.options,
            codecs: self.codecs,
            extensions: self.extensions,
        }
    }
}

/// Configured JSON codec engine. Immutable once built.
pub struct Engine {
    options: EngineOptions,
    codecs: HashMap<TypeId, Arc<dyn ValueCodec>>,
    extensions: Vec<&'static str>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Names of the installed extensions, in registration order.
    pub fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    pub fn has_codec<T: Any>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    pub fn encode<T: Any + Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let mut out = self.encoder();
        self.write_value(value, &mut out)?;
        Ok(out.flush())
    }

    pub fn encode_to_string<T: Any + Serialize>(&self, value: &T) -> Result<String> {
        let bytes = self.encode(value)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn decode<T: Any + DeserializeOwned + Default>(&self, input: &[u8]) -> Result<T> {
        let token = JsonDecoder::new(input).decode()?;
        let mut slot = T::default();
        self.read_value(&token, &mut slot)?;
        Ok(slot)
    }

    pub fn encode_record<R: Record>(&self, record: &R) -> Result<Vec<u8>> {
        let mut out = self.encoder();
        out.write_start_obj();
        let mut fields = FieldEncoder {
            engine: self,
            out: &mut out,
            first: true,
        };
        record.encode_fields(&mut fields)?;
        out.write_end_obj();
        Ok(out.flush())
    }

    /// Decode a JSON object into a fresh `R`. A `null` input yields
    /// `R::default()`.
    pub fn decode_record<R: Record + Default>(&self, input: &[u8]) -> Result<R> {
        let token = JsonDecoder::new(input).decode()?;
        let mut record = R::default();
        let fields = match &token {
            Token::Object(fields) => fields,
            Token::Null => return Ok(record),
            other => return Err(Error::type_mismatch("record", other.kind_name())),
        };
        for (name, token) in fields {
            let field = FieldDecoder {
                engine: self,
                token,
            };
            if !record.decode_field(name, field)? {
                if self.options.reject_unknown_fields {
                    return Err(Error::UnknownField { name: name.clone() });
                }
                trace!(field = %name, "skipping unknown record field");
            }
        }
        Ok(record)
    }

    fn encoder(&self) -> JsonEncoder {
        JsonEncoder::with_escape_html(self.options.escape_html)
    }

    fn write_value<T: Any + Serialize>(&self, value: &T, out: &mut JsonEncoder) -> Result<()> {
        match self.codecs.get(&TypeId::of::<T>()) {
            Some(codec) => codec.encode(value, out),
            None => {
                trace!(ty = std::any::type_name::<T>(), "no codec registered, using serde");
                reject_non_finite(value)?;
                out.write_raw(&serde_json::to_vec(value)?);
                Ok(())
            }
        }
    }

    fn read_value<T: Any + DeserializeOwned>(&self, token: &Token, slot: &mut T) -> Result<()> {
        match self.codecs.get(&TypeId::of::<T>()) {
            Some(codec) => codec.decode(token, slot),
            None => {
                trace!(ty = std::any::type_name::<T>(), "no codec registered, using serde");
                *slot = serde_json::from_value(token.to_value()?)?;
                Ok(())
            }
        }
    }
}

/// Range error for a non-finite `f64` or `Option<f64>`, which serde_json
/// would otherwise write as `null`.
fn reject_non_finite(value: &dyn Any) -> Result<()> {
    let raw = if let Some(f) = value.downcast_ref::<f64>() {
        Some(*f)
    } else {
        value.downcast_ref::<Option<f64>>().and_then(|f| *f)
    };
    match raw.and_then(f64::sentinel_name) {
        Some(name) => Err(Error::range(f64::NAME, name)),
        None => Ok(()),
    }
}

/// A struct the engine can encode field by field.
///
/// Implementations list their fields explicitly; each field is routed to the
/// registered codec for its type, or to serde.
pub trait Record {
    fn encode_fields(&self, fields: &mut FieldEncoder<'_>) -> Result<()>;

    /// Decode the field called `name`. Returns `false` if the record has no
    /// such field.
    fn decode_field(&mut self, name: &str, field: FieldDecoder<'_>) -> Result<bool>;
}

pub struct FieldEncoder<'a> {
    engine: &'a Engine,
    out: &'a mut JsonEncoder,
    first: bool,
}

impl FieldEncoder<'_> {
    fn key(&mut self, name: &str) {
        if !self.first {
            self.out.write_obj_separator();
        }
        self.first = false;
        self.out.write_key(name);
    }

    pub fn field<T: Any + Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        self.key(name);
        self.engine.write_value(value, self.out)
    }

    /// `None` is written as `null`; `Some` goes through the codec for `T`.
    pub fn optional<T: Any + Serialize>(&mut self, name: &str, value: &Option<T>) -> Result<()> {
        self.key(name);
        match value {
            Some(v) => self.engine.write_value(v, self.out),
            None => {
                self.out.write_null();
                Ok(())
            }
        }
    }
}

pub struct FieldDecoder<'a> {
    engine: &'a Engine,
    token: &'a Token,
}

impl FieldDecoder<'_> {
    pub fn read<T: Any + DeserializeOwned>(self, slot: &mut T) -> Result<()> {
        self.engine.read_value(self.token, slot)
    }

    /// `null` becomes `None`; anything else goes through the codec for `T`.
    pub fn read_optional<T: Any + DeserializeOwned + Default>(
        self,
        slot: &mut Option<T>,
    ) -> Result<()> {
        if self.token.is_null() {
            *slot = None;
            return Ok(());
        }
        let mut value = T::default();
        self.engine.read_value(self.token, &mut value)?;
        *slot = Some(value);
        Ok(())
    }
}
