//! `JsonEncoder` writes UTF-8 JSON into a growable byte buffer.

pub struct JsonEncoder {
    buf: Vec<u8>,
    /// Escape `<`, `>` and `&` in strings as `\u003c`, `\u003e`, `\u0026`.
    pub escape_html: bool,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            escape_html: false,
        }
    }

    pub fn with_escape_html(escape_html: bool) -> Self {
        Self {
            escape_html,
            ..Self::new()
        }
    }

    /// Take the written bytes, leaving the encoder empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_null(&mut self) {
        self.buf.extend_from_slice(b"null");
    }

    /// Write an already-formatted number or pre-encoded JSON fragment.
    pub fn write_raw(&mut self, raw: &[u8]) {
        self.buf.extend_from_slice(raw);
    }

    /// Write a JSON-encoded string (with escaping).
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let plain = bytes.iter().all(|&b| {
            (32..=126).contains(&b)
                && b != b'"'
                && b != b'\\'
                && !(self.escape_html && matches!(b, b'<' | b'>' | b'&'))
        });
        if plain {
            self.buf.push(b'"');
            self.buf.extend_from_slice(bytes);
            self.buf.push(b'"');
            return;
        }
        // Fall back to serde_json for proper escaping; serializing a str cannot fail.
        let mut json = serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""));
        if self.escape_html {
            json = json
                .replace('<', "\\u003c")
                .replace('>', "\\u003e")
                .replace('&', "\\u0026");
        }
        self.buf.extend_from_slice(json.as_bytes());
    }

    pub fn write_start_obj(&mut self) {
        self.buf.push(b'{');
    }

    pub fn write_end_obj(&mut self) {
        self.buf.push(b'}');
    }

    pub fn write_obj_separator(&mut self) {
        self.buf.push(b',');
    }

    pub fn write_obj_key_separator(&mut self) {
        self.buf.push(b':');
    }

    /// Write `"key":`.
    pub fn write_key(&mut self, key: &str) {
        self.write_str(key);
        self.write_obj_key_separator();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut JsonEncoder)) -> String {
        let mut enc = JsonEncoder::new();
        f(&mut enc);
        String::from_utf8(enc.flush()).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(written(|e| e.write_null()), "null");
        assert_eq!(written(|e| e.write_raw(b"-42")), "-42");
        assert_eq!(written(|e| e.write_str("NaN")), r#""NaN""#);
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(written(|e| e.write_str("a\"b\\c\n")), r#""a\"b\\c\n""#);
        assert_eq!(written(|e| e.write_str("é")), "\"é\"");
        assert_eq!(written(|e| e.write_str("<a&b>")), r#""<a&b>""#);
    }

    #[test]
    fn html_escaping() {
        let mut enc = JsonEncoder::with_escape_html(true);
        enc.write_str("<a&b>");
        assert_eq!(enc.as_bytes(), br#""\u003ca\u0026b\u003e""#);
    }

    #[test]
    fn object() {
        let s = written(|e| {
            e.write_start_obj();
            e.write_key("Float64");
            e.write_raw(b"1.5");
            e.write_obj_separator();
            e.write_key("Valid");
            e.write_raw(b"true");
            e.write_end_obj();
        });
        assert_eq!(s, r#"{"Float64":1.5,"Valid":true}"#);
    }

    #[test]
    fn flush_resets() {
        let mut enc = JsonEncoder::new();
        enc.write_null();
        assert_eq!(enc.flush(), b"null");
        assert!(enc.as_bytes().is_empty());
    }
}
