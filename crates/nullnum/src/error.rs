//! Error type shared by every codec in the crate.

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], for callers that only care about
/// which class of failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token stream.
    Syntax,
    /// Well-formed token of the wrong shape.
    TypeMismatch,
    /// Well-formed string that is not a literal of the target kind.
    Format,
    /// Numeric literal outside the representable range, or a non-finite
    /// float rejected by a codec path that has no sentinel for it.
    Range,
}

/// Errors produced while decoding, encoding or scanning nullable values.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or unterminated JSON.
    #[error("invalid JSON at position {offset}")]
    Syntax {
        /// Byte offset where parsing failed.
        offset: usize,
    },
    /// The token is valid JSON but has the wrong shape.
    #[error("cannot decode {found} into {expected}")]
    TypeMismatch {
        /// Target type description.
        expected: &'static str,
        /// Shape that was found instead.
        found: &'static str,
    },
    /// A record carried a key the target does not know.
    #[error("unknown field {name:?}")]
    UnknownField {
        /// Offending key.
        name: String,
    },
    /// The string does not parse as a literal of the target kind.
    #[error("{input:?} is not a valid {expected} literal")]
    Format {
        /// Target type description.
        expected: &'static str,
        /// Rejected input.
        input: String,
    },
    /// The literal does not fit the target kind.
    #[error("{input} is out of range for {expected}")]
    Range {
        /// Target type description.
        expected: &'static str,
        /// Rejected literal or value.
        input: String,
    },
    /// Failure reported by the serde fallback path.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn syntax(offset: usize) -> Self {
        Error::Syntax { offset }
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    pub(crate) fn format(expected: &'static str, input: &str) -> Self {
        Error::Format {
            expected,
            input: input.to_owned(),
        }
    }

    pub(crate) fn range(expected: &'static str, input: impl ToString) -> Self {
        Error::Range {
            expected,
            input: input.to_string(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::TypeMismatch { .. } | Error::UnknownField { .. } => ErrorKind::TypeMismatch,
            Error::Format { .. } => ErrorKind::Format,
            Error::Range { .. } => ErrorKind::Range,
            Error::Json(err) => match err.classify() {
                serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                    ErrorKind::Syntax
                }
                _ => ErrorKind::TypeMismatch,
            },
        }
    }
}
