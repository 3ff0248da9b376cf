//! Token definitions for the s24 language.
//!
//! s24 source is a flat sequence of whitespace-separated words. The tokenizer
//! does not classify them: the executor decides what a word means when it
//! reaches it, so a token is just its text plus the position it came from.
//!
//! # Examples
//!
//! ```rust
//! use s24_syntax::Token;
//!
//! let tok = Token::new(".loop", 2, 5);
//! assert!(tok.is_label());
//! assert_eq!(tok.as_str(), ".loop");
//! ```

use std::fmt;

/// A single source word with its location.
///
/// Tokens are compared by text only; two occurrences of `+` at different
/// positions are equal.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    /// Raw text of the word
    pub text: String,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            text: text.into(),
            line,
            col,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Label tokens start with `.` and double as jump targets.
    pub fn is_label(&self) -> bool {
        self.text.starts_with('.')
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
