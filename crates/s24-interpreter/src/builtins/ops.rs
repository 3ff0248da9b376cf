//! Elementwise operators and the broadcasting rule they share.
//!
//! Dispatch order for two operands:
//!
//! 1. two numeric scalars (constants or characters) apply the numeric op
//! 2. two strings: `+` concatenates, anything else fails
//! 3. a constant and a string: the string is parsed as a number first
//! 4. otherwise, if either side is compound, broadcast and recurse
//!
//! Broadcast results of size one collapse to their single element.

use s24_syntax::error::{error, ErrorKind, Result};

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Eq,
    Ne,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Gt0,
    Lt0,
    Round,
    Abs,
    IsPrime,
    Cos,
    Sin,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Or => "or",
        }
    }

    fn apply(self, x: f64, y: f64) -> f64 {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Pow => x.powf(y),
            BinaryOp::Mod => x % y,
            BinaryOp::Eq => truth(x == y),
            BinaryOp::Ne => truth(x != y),
            BinaryOp::Or => truth(x != 0.0 || y != 0.0),
        }
    }
}

impl UnaryOp {
    fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Not => truth(x == 0.0),
            UnaryOp::Gt0 => truth(x > 0.0),
            UnaryOp::Lt0 => truth(x < 0.0),
            UnaryOp::Round => x.round(),
            UnaryOp::Abs => x.abs(),
            UnaryOp::IsPrime => truth(is_prime(x)),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Sin => x.sin(),
        }
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Trial division up to the square root. NaN and infinities are not prime.
pub fn is_prime(x: f64) -> bool {
    if !x.is_finite() || x <= 1.0 {
        return false;
    }
    let root = x.sqrt();
    let mut i = 2.0;
    while i <= root {
        if x % i == 0.0 {
            return false;
        }
        i += 1.0;
    }
    true
}

fn scalar(v: &Value) -> Option<f64> {
    match v {
        Value::Constant(n) => Some(*n),
        Value::Char(c) => Some(f64::from(*c)),
        _ => None,
    }
}

pub fn binary(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    if let (Some(x), Some(y)) = (scalar(a), scalar(b)) {
        return Ok(Value::Constant(op.apply(x, y)));
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => match op {
            BinaryOp::Add => {
                let mut joined = x.to_vec();
                joined.extend_from_slice(y);
                Ok(Value::from_bytes(joined))
            }
            _ => error(
                ErrorKind::TypeMismatch,
                format!("'{}' is not defined for two strings", op.symbol()),
            ),
        },
        (Value::Constant(x), Value::Str(_)) => {
            let y = b.parse_number()?;
            Ok(Value::Constant(string_op(op).apply(*x, y)))
        }
        (Value::Str(_), Value::Constant(y)) => {
            let x = a.parse_number()?;
            Ok(Value::Constant(string_op(op).apply(x, *y)))
        }
        (Value::Nest(_), _) | (_, Value::Nest(_)) => error(
            ErrorKind::TypeMismatch,
            format!("'{}' cannot take a nest operand", op.symbol()),
        ),
        _ => broadcast(a, b, &mut |x, y| binary(op, x, y)),
    }
}

/// `or` against a string operand compares instead of or-ing.
fn string_op(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Or => BinaryOp::Eq,
        other => other,
    }
}

pub fn unary(op: UnaryOp, a: &Value) -> Result<Value> {
    if let Some(x) = scalar(a) {
        return Ok(Value::Constant(op.apply(x)));
    }
    match a {
        Value::Nest(_) => error(ErrorKind::TypeMismatch, "unary operator cannot take a nest operand"),
        _ => map_each(a, &mut |x| unary(op, x)),
    }
}

/// Pairs up the elements of two operands and applies `f` to each pair.
///
/// Scalars count as size one. Equal sizes zip, a size-one side is repeated
/// against every element of the other, anything else is a size mismatch.
pub fn broadcast<F>(a: &Value, b: &Value, f: &mut F) -> Result<Value>
where
    F: FnMut(&Value, &Value) -> Result<Value>,
{
    let xs = a.items().unwrap_or_else(|| vec![a.clone()]);
    let ys = b.items().unwrap_or_else(|| vec![b.clone()]);
    let len = match (xs.len(), ys.len()) {
        (m, n) if m == n => m,
        (1, n) => n,
        (m, 1) => m,
        (m, n) => {
            return error(
                ErrorKind::SizeMismatch,
                format!("cannot broadcast sizes {} and {}", m, n),
            )
        }
    };
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let x = if xs.len() == 1 { &xs[0] } else { &xs[i] };
        let y = if ys.len() == 1 { &ys[0] } else { &ys[i] };
        out.push(f(x, y)?);
    }
    Ok(Value::unit_unwrapped(out))
}

/// Applies `f` to every element of a compound operand.
pub fn map_each<F>(a: &Value, f: &mut F) -> Result<Value>
where
    F: FnMut(&Value) -> Result<Value>,
{
    let xs = a.items().unwrap_or_else(|| vec![a.clone()]);
    let mut out = Vec::with_capacity(xs.len());
    for x in xs.iter() {
        out.push(f(x)?);
    }
    Ok(Value::unit_unwrapped(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: f64) -> Value {
        Value::Constant(n)
    }

    fn nums(ns: &[f64]) -> Value {
        Value::array(ns.iter().map(|&n| c(n)).collect())
    }

    #[test]
    fn scalar_arithmetic() {
        assert_eq!(binary(BinaryOp::Add, &c(2.0), &c(3.0)).unwrap(), c(5.0));
        assert_eq!(binary(BinaryOp::Sub, &c(2.0), &c(3.0)).unwrap(), c(-1.0));
        assert_eq!(binary(BinaryOp::Pow, &c(2.0), &c(10.0)).unwrap(), c(1024.0));
        assert_eq!(binary(BinaryOp::Mod, &c(-7.0), &c(3.0)).unwrap(), c(-1.0));
        assert_eq!(binary(BinaryOp::Div, &c(1.0), &c(0.0)).unwrap(), c(f64::INFINITY));
    }

    #[test]
    fn characters_use_their_codes() {
        assert_eq!(binary(BinaryOp::Add, &Value::Char(b'a'), &Value::Char(1)).unwrap(), c(98.0));
        assert_eq!(binary(BinaryOp::Eq, &Value::Char(b'a'), &Value::Char(b'a')).unwrap(), c(1.0));
        assert_eq!(binary(BinaryOp::Eq, &Value::Char(b'a'), &c(97.0)).unwrap(), c(1.0));
    }

    #[test]
    fn string_pairs() {
        let ab = Value::string("ab");
        let cd = Value::string("cd");
        assert_eq!(binary(BinaryOp::Add, &ab, &cd).unwrap(), Value::string("abcd"));
        assert_eq!(binary(BinaryOp::Eq, &ab, &ab).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(binary(BinaryOp::Ne, &ab, &cd).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(binary(BinaryOp::Mul, &ab, &cd).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(binary(BinaryOp::Or, &ab, &cd).unwrap_err().kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn constant_with_string_parses_the_string() {
        assert_eq!(binary(BinaryOp::Add, &c(3.0), &Value::string("12")).unwrap(), c(15.0));
        assert_eq!(binary(BinaryOp::Sub, &Value::string("12"), &c(2.0)).unwrap(), c(10.0));
        let err = binary(BinaryOp::Add, &c(3.0), &Value::string("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NumberParseFailure);
    }

    #[test]
    fn or_against_a_string_compares() {
        assert_eq!(binary(BinaryOp::Or, &c(0.0), &Value::string("0")).unwrap(), c(1.0));
        assert_eq!(binary(BinaryOp::Or, &c(1.0), &Value::string("2")).unwrap(), c(0.0));
        assert_eq!(binary(BinaryOp::Or, &c(0.0), &c(0.0)).unwrap(), c(0.0));
    }

    #[test]
    fn broadcast_zips_equal_sizes() {
        let a = nums(&[1.0, 2.0, 3.0]);
        let b = nums(&[10.0, 20.0, 30.0]);
        let zipped: Vec<Value> = [(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]
            .iter()
            .map(|&(x, y)| binary(BinaryOp::Mul, &c(x), &c(y)).unwrap())
            .collect();
        assert_eq!(binary(BinaryOp::Mul, &a, &b).unwrap(), Value::array(zipped));
    }

    #[test]
    fn broadcast_repeats_size_one_operands() {
        let a = nums(&[1.0, 2.0, 3.0]);
        assert_eq!(binary(BinaryOp::Add, &a, &c(10.0)).unwrap(), nums(&[11.0, 12.0, 13.0]));
        assert_eq!(binary(BinaryOp::Sub, &nums(&[10.0]), &a).unwrap(), nums(&[9.0, 8.0, 7.0]));
    }

    #[test]
    fn broadcast_rejects_mismatched_sizes() {
        let err = binary(BinaryOp::Add, &nums(&[1.0, 2.0]), &nums(&[1.0, 2.0, 3.0])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SizeMismatch);
    }

    #[test]
    fn broadcast_recurses_into_nested_arrays() {
        let nested = Value::array(vec![nums(&[1.0, 2.0]), c(3.0)]);
        let out = binary(BinaryOp::Mul, &nested, &c(2.0)).unwrap();
        assert_eq!(out.to_string(), "(( (( 2 4 )) 6 ))");
    }

    #[test]
    fn size_one_results_unwrap() {
        assert_eq!(binary(BinaryOp::Add, &nums(&[1.0]), &c(1.0)).unwrap(), c(2.0));
        assert_eq!(unary(UnaryOp::Abs, &nums(&[-4.0])).unwrap(), c(4.0));
    }

    #[test]
    fn empty_arrays_stay_empty() {
        assert_eq!(binary(BinaryOp::Add, &nums(&[]), &c(1.0)).unwrap(), nums(&[]));
        assert_eq!(unary(UnaryOp::Not, &nums(&[])).unwrap(), nums(&[]));
    }

    #[test]
    fn strings_broadcast_as_characters() {
        let out = binary(BinaryOp::Add, &Value::string("ab"), &nums(&[1.0, 2.0])).unwrap();
        assert_eq!(out, nums(&[98.0, 100.0]));
    }

    #[test]
    fn unary_ops() {
        assert_eq!(unary(UnaryOp::Round, &c(2.5)).unwrap(), c(3.0));
        assert_eq!(unary(UnaryOp::Round, &c(-2.5)).unwrap(), c(-3.0));
        assert_eq!(unary(UnaryOp::Not, &nums(&[0.0, 3.0])).unwrap(), nums(&[1.0, 0.0]));
        assert_eq!(unary(UnaryOp::Gt0, &nums(&[-1.0, 0.0, 1.0])).unwrap(), nums(&[0.0, 0.0, 1.0]));
        assert_eq!(unary(UnaryOp::Lt0, &c(-1.0)).unwrap(), c(1.0));
        let primes = unary(UnaryOp::IsPrime, &nums(&[0.0, 1.0, 2.0, 9.0, 13.0])).unwrap();
        assert_eq!(primes, nums(&[0.0, 0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn non_finite_values_are_not_prime() {
        assert!(!is_prime(f64::NAN));
        assert!(!is_prime(f64::INFINITY));
        assert!(!is_prime(f64::NEG_INFINITY));
        assert!(is_prime(7.0));
    }

    #[test]
    fn nests_are_not_operands() {
        let nest = Value::nest(vec![]);
        assert_eq!(binary(BinaryOp::Add, &nest, &c(1.0)).unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(unary(UnaryOp::Abs, &nest).unwrap_err().kind, ErrorKind::TypeMismatch);
    }
}
