//! Nullable `f64` / `i64` values that keep "absent" apart from "zero" across
//! JSON, plain text and SQL-style scan/bind.
//!
//! - [`Nullable`] (aliased as [`Float`] and [`Int`]) is a plain
//!   `(value, valid)` pair.
//! - [`json`] decodes every common shape of a nullable number and encodes
//!   absent values as `null`.
//! - [`text`] reads `""`/`null` as absent and writes absent values as `""`.
//! - [`sql`] scans from and binds to a dynamically typed [`SqlValue`].
//! - [`ops`] adds null-propagating arithmetic.
//! - [`engine`] is the fast-path JSON engine whose extensions let raw `f64`
//!   and [`Float`] share one sentinel-aware policy for NaN and the infinities.

pub mod engine;
pub mod error;
pub mod json;
pub mod numeric;
pub mod ops;
pub mod sql;
pub mod text;
pub mod value;

mod serde_impl;

pub use engine::{
    float_extension, int_extension, Engine, EngineBuilder, EngineOptions, Extension,
    FieldDecoder, FieldEncoder, NumericCodec, NumericExtension, Record, ValueCodec,
};
pub use error::{Error, ErrorKind, Result};
pub use json::NonFinite;
pub use numeric::Numeric;
pub use sql::{Scanner, SqlValue, Valuer};
pub use value::{Float, Int, Nullable};
