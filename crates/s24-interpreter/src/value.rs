//! Value types for the s24 interpreter.

use std::fmt;
use std::rc::Rc;

use s24_syntax::error::{error, Error, ErrorKind, Result};
use s24_syntax::Token;

use crate::code::Code;

/// A runtime datum.
///
/// Compound payloads are reference counted and never mutated after
/// construction, so handing the same array to the stack and to a variable is
/// always safe. Use [`Value::deep_copy`] when fresh storage is needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit float
    Constant(f64),
    /// A single byte; arithmetic sees its code
    Char(u8),
    /// An ordered sequence of values
    Array(Rc<[Value]>),
    /// An ordered sequence of characters
    Str(Rc<[u8]>),
    /// A quoted, unevaluated program
    Nest(Rc<Code>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(items.into())
    }

    /// Builds an array, collapsing a single element to the bare element.
    pub fn unit_unwrapped(mut items: Vec<Value>) -> Value {
        if items.len() == 1 {
            items.pop().unwrap_or(Value::Constant(0.0))
        } else {
            Value::array(items)
        }
    }

    pub fn string(text: &str) -> Value {
        Value::Str(text.as_bytes().into())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Value {
        Value::Str(bytes.into())
    }

    pub fn nest(tokens: Vec<Token>) -> Value {
        Value::Nest(Rc::new(Code::new(tokens)))
    }

    /// Short type tag used by the stack and variable dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Constant(_) => "constant",
            Value::Char(_) => "character",
            Value::Array(items) if items.len() == 1 && matches!(items[0], Value::Constant(_)) => "unit",
            Value::Array(_) => "array",
            Value::Str(_) => "string",
            Value::Nest(_) => "nest",
        }
    }

    /// Element count for compounds, token count for nests, 1 for scalars.
    pub fn size(&self) -> usize {
        match self {
            Value::Constant(_) | Value::Char(_) => 1,
            Value::Array(items) => items.len(),
            Value::Str(bytes) => bytes.len(),
            Value::Nest(code) => code.len(),
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Str(_))
    }

    /// Elements of an array or the characters of a string.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.to_vec()),
            Value::Str(bytes) => Some(bytes.iter().map(|&b| Value::Char(b)).collect()),
            _ => None,
        }
    }

    /// Like [`Value::items`] but a scalar counts as a one-element sequence.
    pub fn elements(&self) -> Result<Vec<Value>> {
        match self {
            Value::Nest(_) => error(ErrorKind::TypeMismatch, "expected an array, got a nest"),
            other => Ok(other.items().unwrap_or_else(|| vec![other.clone()])),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Constant(n) => Some(*n),
            Value::Char(c) => Some(f64::from(*c)),
            Value::Array(items) if items.len() == 1 => items[0].as_number(),
            _ => None,
        }
    }

    pub fn expect_number(&self, what: &str) -> Result<f64> {
        self.as_number().ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch, format!("{} expects a number, got {}", what, self.kind_name()))
        })
    }

    /// Numeric truthiness used by `?` and `do`.
    pub fn truthy(&self) -> Result<bool> {
        Ok(self.expect_number("condition")? != 0.0)
    }

    /// An integral constant, as used for indices and counts.
    pub fn as_integer(&self, what: &str) -> Result<i64> {
        let n = self.expect_number(what)?;
        if n.fract() != 0.0 || !n.is_finite() {
            return error(ErrorKind::NonIntegerIndex, format!("{} must be an integer, got {}", what, n));
        }
        Ok(n as i64)
    }

    pub fn as_code(&self) -> Result<&Rc<Code>> {
        match self {
            Value::Nest(code) => Ok(code),
            other => error(ErrorKind::TypeMismatch, format!("expected a nest, got {}", other.kind_name())),
        }
    }

    /// Raw bytes of a string, or of an array made only of characters.
    pub fn text_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Str(bytes) => Some(bytes.to_vec()),
            Value::Array(items) if is_char_run(items) => Some(
                items
                    .iter()
                    .filter_map(|v| match v {
                        Value::Char(c) => Some(*c),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Array(items) if items.len() == 1 => items[0].text_bytes(),
            _ => None,
        }
    }

    pub fn expect_text(&self, what: &str) -> Result<String> {
        match self.text_bytes() {
            Some(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            None => error(ErrorKind::TypeMismatch, format!("{} expects a string, got {}", what, self.kind_name())),
        }
    }

    /// Parses a string operand as a number.
    pub fn parse_number(&self) -> Result<f64> {
        let text = self.expect_text("number conversion")?;
        text.trim()
            .parse::<f64>()
            .map_err(|_| Error::new(ErrorKind::NumberParseFailure, format!("failure at converting \"{}\" to a number", text)))
    }

    /// Copies every nested array, string and nest into fresh storage.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Constant(_) | Value::Char(_) => self.clone(),
            Value::Array(items) => Value::array(items.iter().map(Value::deep_copy).collect()),
            Value::Str(bytes) => Value::from_bytes(bytes.to_vec()),
            Value::Nest(code) => Value::nest(code.tokens().to_vec()),
        }
    }

    /// `( kind ) value`, the form used by stack and variable dumps.
    pub fn repr(&self) -> String {
        format!("( {} ) {}", self.kind_name(), self)
    }
}

fn is_char_run(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|v| matches!(v, Value::Char(_)))
}

fn write_constant(out: &mut Vec<u8>, n: f64) {
    let text = if n.fract() == 0.0 { format!("{:.0}", n) } else { format!("{:.2}", n) };
    out.extend_from_slice(text.as_bytes());
}

fn write_quoted(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'"');
    out.extend_from_slice(bytes);
    out.push(b'"');
}

impl Value {
    /// The printed form as raw bytes. Characters and strings are copied
    /// through unchanged, so output keeps whatever encoding the program used.
    pub fn display_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_display(&mut out);
        out
    }

    fn write_display(&self, out: &mut Vec<u8>) {
        match self {
            Value::Constant(n) => write_constant(out, *n),
            Value::Char(c) => out.push(*c),
            Value::Str(bytes) => write_quoted(out, bytes),
            Value::Array(items) => {
                if is_char_run(items) {
                    if let Some(bytes) = self.text_bytes() {
                        return write_quoted(out, &bytes);
                    }
                }
                if let [Value::Constant(n)] = &items[..] {
                    return write_constant(out, *n);
                }
                out.extend_from_slice(b"((");
                for it in items.iter() {
                    out.push(b' ');
                    it.write_display(out);
                }
                out.extend_from_slice(b" ))");
            }
            Value::Nest(code) => {
                out.push(b'[');
                for tok in code.tokens() {
                    out.push(b' ');
                    out.extend_from_slice(tok.as_str().as_bytes());
                }
                out.extend_from_slice(b" ]");
            }
        }
    }
}

/// Lossy text view of [`Value::display_bytes`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.display_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Value {
        Value::array(ns.iter().map(|&n| Value::Constant(n)).collect())
    }

    #[test]
    fn constants_print_without_needless_fraction() {
        assert_eq!(Value::Constant(5.0).to_string(), "5");
        assert_eq!(Value::Constant(-12.0).to_string(), "-12");
        assert_eq!(Value::Constant(1.0 / 3.0).to_string(), "0.33");
        assert_eq!(Value::Constant(2.5).to_string(), "2.50");
    }

    #[test]
    fn arrays_print_with_double_parens() {
        assert_eq!(nums(&[1.0, 2.0, 3.0]).to_string(), "(( 1 2 3 ))");
        assert_eq!(Value::array(vec![]).to_string(), "(( ))");
        let nested = Value::array(vec![nums(&[1.0, 2.0]), Value::Constant(3.0)]);
        assert_eq!(nested.to_string(), "(( (( 1 2 )) 3 ))");
    }

    #[test]
    fn unit_arrays_print_as_their_element() {
        assert_eq!(nums(&[7.0]).to_string(), "7");
        assert_eq!(nums(&[7.0]).kind_name(), "unit");
    }

    #[test]
    fn strings_and_char_runs_print_quoted() {
        assert_eq!(Value::string("hi there").to_string(), "\"hi there\"");
        let run = Value::array(vec![Value::Char(b'o'), Value::Char(b'k')]);
        assert_eq!(run.to_string(), "\"ok\"");
        let words = Value::array(vec![Value::string("a"), Value::string("b")]);
        assert_eq!(words.to_string(), "(( \"a\" \"b\" ))");
    }

    #[test]
    fn characters_print_as_raw_bytes() {
        let e_acute = Value::string("é");
        let first = e_acute.items().unwrap()[0].clone();
        assert_eq!(first.display_bytes(), vec![0xC3]);
        assert_eq!(e_acute.display_bytes(), "\"é\"".as_bytes());
        let run = Value::array(e_acute.items().unwrap());
        assert_eq!(run.to_string(), "\"é\"");
    }

    #[test]
    fn nests_print_their_tokens() {
        let n = Value::nest(s24_lexer::tokenize("dup +"));
        assert_eq!(n.to_string(), "[ dup + ]");
        assert_eq!(Value::nest(vec![]).to_string(), "[ ]");
    }

    #[test]
    fn sizes() {
        assert_eq!(Value::Constant(1.0).size(), 1);
        assert_eq!(Value::string("abc").size(), 3);
        assert_eq!(nums(&[1.0, 2.0]).size(), 2);
        assert_eq!(Value::nest(s24_lexer::tokenize("1 2 +")).size(), 3);
    }

    #[test]
    fn integers_and_truthiness() {
        assert_eq!(Value::Constant(3.0).as_integer("index").unwrap(), 3);
        assert_eq!(Value::Constant(3.5).as_integer("index").unwrap_err().kind, ErrorKind::NonIntegerIndex);
        assert_eq!(Value::string("x").as_integer("index").unwrap_err().kind, ErrorKind::TypeMismatch);
        assert!(Value::Constant(2.0).truthy().unwrap());
        assert!(!nums(&[0.0]).truthy().unwrap());
        assert!(nums(&[1.0, 2.0]).truthy().is_err());
    }

    #[test]
    fn deep_copy_allocates_fresh_storage() {
        let original = Value::array(vec![Value::string("ab"), Value::Constant(1.0)]);
        let copy = original.deep_copy();
        assert_eq!(original, copy);
        match (&original, &copy) {
            (Value::Array(a), Value::Array(b)) => assert!(!Rc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
        let nest = Value::nest(s24_lexer::tokenize("1"));
        match (nest.as_code(), nest.deep_copy().as_code()) {
            (Ok(a), Ok(b)) => assert!(!Rc::ptr_eq(a, b)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn string_to_number() {
        assert_eq!(Value::string(" 12.5").parse_number().unwrap(), 12.5);
        assert_eq!(Value::string("twelve").parse_number().unwrap_err().kind, ErrorKind::NumberParseFailure);
    }
}
