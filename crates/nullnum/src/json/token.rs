//! Parsed JSON token tree.

use serde_json::{Map, Number, Value};

use crate::error::Result;

/// A parsed JSON value. Numbers keep their literal text so each numeric kind
/// can apply its own range and fraction rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Null,
    Bool(bool),
    Number {
        literal: String,
        /// Literal has a fraction or an exponent.
        fractional: bool,
    },
    Str(String),
    Array(Vec<Token>),
    Object(Vec<(String, Token)>),
}

impl Token {
    /// Shape name used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Null => "null",
            Token::Bool(_) => "bool",
            Token::Number { .. } => "number",
            Token::Str(_) => "string",
            Token::Array(_) => "array",
            Token::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Token::Null)
    }

    /// Convert into a `serde_json::Value` for the serde fallback path.
    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Token::Null => Value::Null,
            Token::Bool(b) => Value::Bool(*b),
            Token::Number { literal, .. } => Value::Number(literal.parse::<Number>()?),
            Token::Str(s) => Value::String(s.clone()),
            Token::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Token::to_value)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Token::Object(fields) => {
                let mut map = Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_value()?);
                }
                Value::Object(map)
            }
        })
    }
}
