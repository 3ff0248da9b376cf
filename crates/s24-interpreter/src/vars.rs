//! Variable store for the s24 interpreter.
//!
//! One flat scope for the whole program: nests run with the caller's
//! variables, there is no lexical nesting.

use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Binding {
    /// The bound value
    pub value: Value,
    /// Run the value instead of pushing it when the name is referenced
    pub auto_exec: bool,
}

#[derive(Debug, Default)]
pub struct Vars {
    /// Kept in creation order for dumps
    entries: Vec<(String, Binding)>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites. The previous value is only dropped from this
    /// table; other handles to it stay valid.
    pub fn bind(&mut self, name: &str, value: Value, auto_exec: bool) {
        let binding = Binding { value, auto_exec };
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = binding,
            None => self.entries.push((name.to_string(), binding)),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
