//! `JsonDecoder` reads UTF-8 JSON bytes into a [`Token`] tree.
//!
//! The whole input must be exactly one value surrounded by optional
//! whitespace. Every failure is reported as [`Error::Syntax`] with the byte
//! offset it was detected at.

use super::token::Token;
use crate::error::{Error, Result};

/// Nesting limit for arrays and objects.
const MAX_DEPTH: usize = 128;

pub struct JsonDecoder<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
}

impl<'a> JsonDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            depth: 0,
        }
    }

    /// Decode the single value making up the input.
    pub fn decode(mut self) -> Result<Token> {
        let token = self.read_any()?;
        self.skip_whitespace();
        if self.x != self.data.len() {
            return Err(Error::syntax(self.x));
        }
        Ok(token)
    }

    pub fn read_any(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let x = self.x;
        if x >= self.data.len() {
            return Err(Error::syntax(x));
        }
        match self.data[x] {
            b'"' => Ok(Token::Str(self.read_str()?)),
            b'[' => self.read_arr(),
            b'{' => self.read_obj(),
            b'n' => self.read_literal(b"null", Token::Null),
            b't' => self.read_literal(b"true", Token::Bool(true)),
            b'f' => self.read_literal(b"false", Token::Bool(false)),
            b'0'..=b'9' | b'-' => self.read_num(),
            _ => Err(Error::syntax(x)),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.x < self.data.len() {
            match self.data[self.x] {
                b' ' | b'\t' | b'\n' | b'\r' => self.x += 1,
                _ => break,
            }
        }
    }

    fn read_literal(&mut self, word: &[u8], token: Token) -> Result<Token> {
        let end = self.x + word.len();
        if end > self.data.len() || &self.data[self.x..end] != word {
            return Err(Error::syntax(self.x));
        }
        self.x = end;
        Ok(token)
    }

    fn read_num(&mut self) -> Result<Token> {
        let data = self.data;
        let len = data.len();
        let start = self.x;
        let mut x = start;

        if data[x] == b'-' {
            x += 1;
        }
        let int_start = x;
        x = skip_digits(data, x);
        // At least one digit, and no leading zeros.
        if x == int_start || (data[int_start] == b'0' && x - int_start > 1) {
            return Err(Error::syntax(int_start));
        }
        let mut fractional = false;
        if x < len && data[x] == b'.' {
            fractional = true;
            x += 1;
            let frac_start = x;
            x = skip_digits(data, x);
            if x == frac_start {
                return Err(Error::syntax(x));
            }
        }
        if x < len && (data[x] == b'e' || data[x] == b'E') {
            fractional = true;
            x += 1;
            if x < len && (data[x] == b'+' || data[x] == b'-') {
                x += 1;
            }
            let exp_start = x;
            x = skip_digits(data, x);
            if x == exp_start {
                return Err(Error::syntax(x));
            }
        }
        self.x = x;

        let literal = std::str::from_utf8(&data[start..x]).map_err(|_| Error::syntax(start))?;
        Ok(Token::Number {
            literal: literal.to_owned(),
            fractional,
        })
    }

    fn read_str(&mut self) -> Result<String> {
        let x0 = self.x + 1; // skip opening quote
        let x1 = find_ending_quote(self.data, x0)?;
        let s = decode_json_string(&self.data[x0..x1], x0)?;
        self.x = x1 + 1; // skip closing quote
        Ok(s)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::syntax(self.x));
        }
        self.x += 1;
        Ok(())
    }

    fn read_arr(&mut self) -> Result<Token> {
        self.enter()?;
        let mut arr = Vec::new();
        loop {
            self.skip_whitespace();
            if self.x >= self.data.len() {
                return Err(Error::syntax(self.x));
            }
            if self.data[self.x] == b']' && arr.is_empty() {
                self.x += 1;
                break;
            }
            arr.push(self.read_any()?);
            if self.read_separator(b']')? {
                break;
            }
        }
        self.depth -= 1;
        Ok(Token::Array(arr))
    }

    fn read_obj(&mut self) -> Result<Token> {
        self.enter()?;
        let mut obj = Vec::new();
        loop {
            self.skip_whitespace();
            if self.x >= self.data.len() {
                return Err(Error::syntax(self.x));
            }
            match self.data[self.x] {
                b'}' if obj.is_empty() => {
                    self.x += 1;
                    break;
                }
                b'"' => {}
                _ => return Err(Error::syntax(self.x)),
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.x >= self.data.len() || self.data[self.x] != b':' {
                return Err(Error::syntax(self.x));
            }
            self.x += 1;
            let val = self.read_any()?;
            obj.push((key, val));
            if self.read_separator(b'}')? {
                break;
            }
        }
        self.depth -= 1;
        Ok(Token::Object(obj))
    }

    /// Consume `,` or `close`. Returns true when the container is closed.
    fn read_separator(&mut self, close: u8) -> Result<bool> {
        self.skip_whitespace();
        match self.data.get(self.x).copied() {
            Some(b',') => {
                self.x += 1;
                Ok(false)
            }
            Some(c) if c == close => {
                self.x += 1;
                Ok(true)
            }
            _ => Err(Error::syntax(self.x)),
        }
    }
}

fn skip_digits(data: &[u8], mut x: usize) -> usize {
    while x < data.len() && data[x].is_ascii_digit() {
        x += 1;
    }
    x
}

fn find_ending_quote(data: &[u8], start: usize) -> Result<usize> {
    let mut i = start;
    while i < data.len() {
        match data[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i),
            _ => i += 1,
        }
    }
    Err(Error::syntax(start))
}

/// Decode a JSON string body (between the quotes) handling escape sequences.
fn decode_json_string(bytes: &[u8], offset: usize) -> Result<String> {
    if let Some(pos) = bytes.iter().position(|&b| b < 0x20) {
        return Err(Error::syntax(offset + pos));
    }
    if !bytes.contains(&b'\\') {
        return std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| Error::syntax(offset + e.valid_up_to()));
    }
    // Escapes are rare here; let serde_json handle them.
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).map_err(|_| Error::syntax(offset))
}
