//! Higher-order builtins. Each step runs a user nest on the shared stack
//! through [`Interpreter::call`], so a failure inside the nest propagates
//! straight out of the combinator.

use std::rc::Rc;

use s24_syntax::error::{error, ErrorKind, Result};
use tracing::debug;

use super::ops;
use crate::code::Code;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Pops `sequence nest` and returns the elements with the nest's code.
fn operands(v: Value, nest: Value, what: &str) -> Result<(Vec<Value>, Rc<Code>)> {
    let code = nest.as_code()?.clone();
    let items = match v.items() {
        Some(items) => items,
        None => return error(ErrorKind::TypeMismatch, format!("{} expects an array, got {}", what, v.kind_name())),
    };
    if items.is_empty() {
        return error(ErrorKind::IndexOutOfBounds, format!("{} of an empty array", what));
    }
    Ok((items, code))
}

impl Interpreter {
    /// `array nest reduce`: left fold seeded with the first element.
    pub(crate) fn reduce(&mut self) -> Result<()> {
        let nest = self.stack.pop()?;
        let v = self.stack.pop()?;
        let (items, code) = operands(v, nest, "reduce")?;
        debug!(size = items.len(), "reduce");
        let mut items = items.into_iter();
        if let Some(seed) = items.next() {
            self.stack.push(seed)?;
        }
        for item in items {
            self.stack.push(item)?;
            self.call(code.clone())?;
        }
        Ok(())
    }

    /// `array nest accumulate`: like `reduce`, collecting the running value
    /// after every step. The seed itself is not part of the output.
    pub(crate) fn accumulate(&mut self) -> Result<()> {
        let nest = self.stack.pop()?;
        let v = self.stack.pop()?;
        let (items, code) = operands(v, nest, "accumulate")?;
        debug!(size = items.len(), "accumulate");
        let mut items = items.into_iter();
        if let Some(seed) = items.next() {
            self.stack.push(seed)?;
        }
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            self.stack.push(item)?;
            self.call(code.clone())?;
            out.push(self.stack.peek()?.clone());
        }
        self.stack.pop()?;
        self.stack.push(Value::array(out))
    }

    /// `a b nest broadcast`
    pub(crate) fn broadcast_nest(&mut self) -> Result<()> {
        let nest = self.stack.pop()?;
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let code = nest.as_code()?.clone();
        let result = self.broadcast_with(&a, &b, &code)?;
        self.stack.push(result)
    }

    /// `a nest unary-broadcast`
    pub(crate) fn unary_broadcast_nest(&mut self) -> Result<()> {
        let nest = self.stack.pop()?;
        let a = self.stack.pop()?;
        let code = nest.as_code()?.clone();
        let result = self.map_with(&a, &code)?;
        self.stack.push(result)
    }

    fn broadcast_with(&mut self, a: &Value, b: &Value, code: &Rc<Code>) -> Result<Value> {
        if a.is_compound() || b.is_compound() {
            return ops::broadcast(a, b, &mut |x, y| self.broadcast_with(x, y, code));
        }
        self.stack.push(a.clone())?;
        self.stack.push(b.clone())?;
        self.call(code.clone())?;
        self.stack.pop()
    }

    fn map_with(&mut self, a: &Value, code: &Rc<Code>) -> Result<Value> {
        if a.is_compound() {
            return ops::map_each(a, &mut |x| self.map_with(x, code));
        }
        self.stack.push(a.clone())?;
        self.call(code.clone())?;
        self.stack.pop()
    }
}
