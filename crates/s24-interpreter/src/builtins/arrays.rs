//! Array utilities. Each takes its operands already popped and returns a
//! freshly built value; the dispatcher does the stack traffic.

use s24_syntax::error::{error, ErrorKind, Result};

use crate::value::Value;

fn expect_items(v: &Value, what: &str) -> Result<Vec<Value>> {
    v.items().ok_or_else(|| {
        s24_syntax::Error::new(
            ErrorKind::TypeMismatch,
            format!("{} expects an array, got {}", what, v.kind_name()),
        )
    })
}

fn is_one(v: &Value) -> bool {
    v.as_number() == Some(1.0)
}

/// Scalars compare numerically, everything else structurally.
fn same(a: &Value, b: &Value) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Top-level order reversed; nested arrays are left as they are.
pub fn reverse(v: &Value) -> Result<Value> {
    match v {
        Value::Str(bytes) => Ok(Value::from_bytes(bytes.iter().rev().copied().collect())),
        _ => {
            let mut items = expect_items(v, "reverse")?;
            items.reverse();
            Ok(Value::array(items))
        }
    }
}

pub fn at(v: &Value, index: &Value) -> Result<Value> {
    let items = expect_items(v, "at")?;
    let i = index.as_integer("index")?;
    if i < 0 || i as usize >= items.len() {
        return error(
            ErrorKind::IndexOutOfBounds,
            format!("index {} outside an array of size {}", i, items.len()),
        );
    }
    Ok(items[i as usize].clone())
}

pub fn last(v: &Value) -> Result<Value> {
    let items = expect_items(v, "last")?;
    match items.last() {
        Some(item) => Ok(item.clone()),
        None => error(ErrorKind::IndexOutOfBounds, "last of an empty array"),
    }
}

/// Keeps the elements of `values` whose mask entry is exactly one.
pub fn mask(values: &Value, mask: &Value) -> Result<Value> {
    let items = values.elements()?;
    let flags = mask.elements()?;
    if items.len() != flags.len() {
        return error(
            ErrorKind::SizeMismatch,
            format!("mask of size {} against an array of size {}", flags.len(), items.len()),
        );
    }
    let kept: Vec<Value> = items
        .into_iter()
        .zip(flags.iter())
        .filter(|(_, flag)| is_one(flag))
        .map(|(item, _)| item)
        .collect();
    match values {
        Value::Str(_) => Ok(Value::from_bytes(
            kept.iter()
                .filter_map(|v| match v {
                    Value::Char(c) => Some(*c),
                    _ => None,
                })
                .collect(),
        )),
        _ => Ok(Value::array(kept)),
    }
}

pub fn index_of_ones(mask: &Value) -> Result<Value> {
    let flags = mask.elements()?;
    Ok(Value::array(
        flags
            .iter()
            .enumerate()
            .filter(|(_, flag)| is_one(flag))
            .map(|(i, _)| Value::Constant(i as f64))
            .collect(),
    ))
}

/// For each needle, the first index holding it in `haystack`, or -1.
pub fn search(needles: &Value, haystack: &Value) -> Result<Value> {
    let needles = needles.elements()?;
    let haystack = haystack.elements()?;
    Ok(Value::array(
        needles
            .iter()
            .map(|needle| {
                let found = haystack.iter().position(|h| same(needle, h));
                Value::Constant(found.map_or(-1.0, |i| i as f64))
            })
            .collect(),
    ))
}

/// Most elements a single `range` may produce.
pub const MAX_RANGE_LEN: i64 = 1 << 24;

/// `from .. to-1`; empty when `to <= from`.
pub fn range(from: &Value, to: &Value) -> Result<Value> {
    let start = from.as_integer("range start")?;
    let end = to.as_integer("range end")?;
    let count = end.saturating_sub(start);
    if count > MAX_RANGE_LEN {
        return error(
            ErrorKind::IndexOutOfBounds,
            format!("range of {} elements exceeds the limit of {}", count, MAX_RANGE_LEN),
        );
    }
    Ok(Value::array((start..end).map(|n| Value::Constant(n as f64)).collect()))
}

pub fn range1(to: &Value) -> Result<Value> {
    range(&Value::Constant(0.0), to)
}

/// A string, or an array of strings, parsed into constants.
pub fn to_numbers(v: &Value) -> Result<Value> {
    let strings = if v.text_bytes().is_some() {
        vec![v.clone()]
    } else {
        expect_items(v, "a2n")?
    };
    let mut out = Vec::with_capacity(strings.len());
    for s in strings.iter() {
        out.push(Value::Constant(s.parse_number()?));
    }
    Ok(Value::array(out))
}

/// Splits on spaces, tabs and newlines, dropping empty pieces.
pub fn split_whitespace(v: &Value) -> Result<Value> {
    let Some(bytes) = v.text_bytes() else {
        return error(ErrorKind::TypeMismatch, format!("split-ws expects a string, got {}", v.kind_name()));
    };
    let words = bytes
        .split(|b| matches!(b, b' ' | b'\n' | b'\t'))
        .filter(|w| !w.is_empty())
        .map(|w| Value::from_bytes(w.to_vec()))
        .collect();
    Ok(Value::array(words))
}

/// Delimiter split. Only validates its operands and yields an empty array.
// TODO: accumulate the pieces between delimiters once `split` gets a defined contract.
pub fn split(v: &Value, delimiter: &Value) -> Result<Value> {
    v.expect_text("split")?;
    delimiter.expect_text("split delimiter")?;
    Ok(Value::array(Vec::new()))
}
