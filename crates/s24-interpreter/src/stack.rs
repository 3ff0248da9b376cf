//! The bounded data stack shared by every frame of a program.

use s24_syntax::error::{error, ErrorKind, Result};

use crate::value::Value;

#[derive(Debug)]
pub struct Stack {
    values: Vec<Value>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Stack {
            values: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.values.len() >= self.capacity {
            return error(ErrorKind::StackOverflow, format!("max stack achieved ({})", self.capacity));
        }
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value> {
        match self.values.pop() {
            Some(v) => Ok(v),
            None => error(ErrorKind::StackUnderflow, "ran out of stack"),
        }
    }

    pub fn peek(&self) -> Result<&Value> {
        self.peek_at(0)
    }

    /// The value `depth` slots below the top; the handle is shared, not copied.
    pub fn peek_at(&self, depth: usize) -> Result<&Value> {
        let len = self.values.len();
        if depth >= len {
            return error(
                ErrorKind::StackUnderflow,
                format!("cannot reach slot {} of a stack holding {}", depth, len),
            );
        }
        Ok(&self.values[len - depth - 1])
    }

    /// Removes the top `count` values, returned bottom-to-top.
    pub fn pop_many(&mut self, count: usize) -> Result<Vec<Value>> {
        let len = self.values.len();
        if count > len {
            return error(
                ErrorKind::StackUnderflow,
                format!("cannot take {} values from a stack holding {}", count, len),
            );
        }
        Ok(self.values.split_off(len - count))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Bottom-to-top view.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Dump of the top `limit` entries, top first.
    pub fn render(&self, limit: usize) -> String {
        let floor = self.values.len().saturating_sub(limit);
        let mut out = String::new();
        for i in (floor..self.values.len()).rev() {
            out.push_str(&format!("{}: {}\n", i, self.values[i].repr()));
            out.push_str(&"=".repeat(40));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: f64) -> Value {
        Value::Constant(n)
    }

    #[test]
    fn push_pop_peek() {
        let mut s = Stack::new(4);
        s.push(c(1.0)).unwrap();
        s.push(c(2.0)).unwrap();
        assert_eq!(s.peek().unwrap(), &c(2.0));
        assert_eq!(s.peek_at(1).unwrap(), &c(1.0));
        assert_eq!(s.pop().unwrap(), c(2.0));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn bounds_are_errors() {
        let mut s = Stack::new(1);
        assert_eq!(s.pop().unwrap_err().kind, ErrorKind::StackUnderflow);
        assert_eq!(s.peek().unwrap_err().kind, ErrorKind::StackUnderflow);
        s.push(c(1.0)).unwrap();
        assert_eq!(s.push(c(2.0)).unwrap_err().kind, ErrorKind::StackOverflow);
        assert_eq!(s.peek_at(1).unwrap_err().kind, ErrorKind::StackUnderflow);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn pop_many_keeps_order() {
        let mut s = Stack::new(8);
        for n in 1..=4 {
            s.push(c(n as f64)).unwrap();
        }
        assert_eq!(s.pop_many(3).unwrap(), vec![c(2.0), c(3.0), c(4.0)]);
        assert_eq!(s.values(), &[c(1.0)]);
        assert_eq!(s.pop_many(2).unwrap_err().kind, ErrorKind::StackUnderflow);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn render_lists_top_first_and_honours_limit() {
        let mut s = Stack::new(8);
        for n in 1..=3 {
            s.push(c(n as f64)).unwrap();
        }
        let dump = s.render(2);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "2: ( constant ) 3");
        assert_eq!(lines[2], "1: ( constant ) 2");
        assert_eq!(lines.len(), 4);
    }
}
