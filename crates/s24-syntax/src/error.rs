//! Error handling types and utilities for the s24 toolchain.
//!
//! Every fatal condition the interpreter can hit is described by an
//! [`ErrorKind`]. An [`Error`] pairs that kind with a human-readable message and,
//! when known, the position of the token that was executing.
//!
//! Errors are plain values: the executor and the built-in library return them
//! through [`Result`] and nothing below the command-line driver ever aborts the
//! process.
//!
//! # Examples
//!
//! ```rust
//! use s24_syntax::error::{error, Error, ErrorKind, Result};
//!
//! fn pop_index(stack: &mut Vec<f64>) -> Result<f64> {
//!     stack
//!         .pop()
//!         .ok_or_else(|| Error::new(ErrorKind::StackUnderflow, "nothing to index with"))
//! }
//!
//! fn checked_index(i: f64) -> Result<usize> {
//!     if i.fract() != 0.0 {
//!         return error(ErrorKind::NonIntegerIndex, format!("index {} is not an integer", i));
//!     }
//!     Ok(i as usize)
//! }
//!
//! let mut stack = vec![2.5];
//! let i = pop_index(&mut stack).unwrap();
//! assert_eq!(checked_index(i).unwrap_err().kind, ErrorKind::NonIntegerIndex);
//! assert_eq!(pop_index(&mut stack).unwrap_err().kind, ErrorKind::StackUnderflow);
//! ```

use std::fmt;

use crate::token::Token;

/// The closed set of failure categories.
///
/// The `Display` text is the short, lowercase name used in diagnostics
/// (`stack underflow`, `size mismatch`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,
    #[error("parens mismatch")]
    ParenMismatch,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated nest")]
    UnterminatedNest,
    #[error("unrecognized token")]
    UnrecognizedToken,
    #[error("type mismatch")]
    TypeMismatch,
    #[error("size mismatch")]
    SizeMismatch,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("non-integer index")]
    NonIntegerIndex,
    #[error("label not found")]
    LabelNotFound,
    #[error("loop construct mismatch")]
    LoopConstructMismatch,
    #[error("number parse failure")]
    NumberParseFailure,
    #[error("invalid rewind")]
    InvalidRewind,
    /// Execution was stopped through a cancellation handle.
    #[error("cancelled")]
    Cancelled,
    /// A file could not be read by a loading operator.
    #[error("io error")]
    Io,
}

/// An error raised while tokenizing or executing an s24 program.
///
/// # Fields
///
/// - `kind`: the failure category, used by hosts to decide what to do
/// - `msg`: human-readable detail
/// - `line` / `col`: optional 1-based position of the offending token
///
/// ```rust
/// use s24_syntax::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::LabelNotFound, "couldn't find label \".loop\"").with_span(3, 7);
/// assert_eq!(err.to_string(), "label not found: couldn't find label \".loop\" at 3:7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Failure category
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error without location information.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Attaches a source location, replacing any previous one.
    pub fn with_span(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    /// Attaches the location of `token` unless a location is already present.
    ///
    /// Errors bubbling out of nested calls keep the innermost position.
    pub fn or_at(self, token: &Token) -> Self {
        if self.line.is_some() {
            self
        } else {
            self.with_span(token.line, token.col)
        }
    }

    /// Returns true when a source location is attached.
    pub fn has_span(&self) -> bool {
        self.line.is_some() && self.col.is_some()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{}: {} at {}:{}", self.kind, self.msg, l, c)
        } else {
            write!(f, "{}: {}", self.kind, self.msg)
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for s24 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_span() {
        let err = Error::new(ErrorKind::SizeMismatch, "sizes 2 and 3");
        assert_eq!(err.to_string(), "size mismatch: sizes 2 and 3");
        assert!(!err.has_span());
    }

    #[test]
    fn or_at_keeps_innermost_location() {
        let inner = Token::new("+", 4, 9);
        let outer = Token::new("rdl", 1, 1);
        let err = Error::new(ErrorKind::TypeMismatch, "bad operands").or_at(&inner).or_at(&outer);
        assert_eq!((err.line, err.col), (Some(4), Some(9)));
    }

    #[test]
    fn error_helper_builds_err() {
        let r: Result<()> = error(ErrorKind::InvalidRewind, "not the active frame");
        assert_eq!(r.unwrap_err().kind, ErrorKind::InvalidRewind);
    }
}
