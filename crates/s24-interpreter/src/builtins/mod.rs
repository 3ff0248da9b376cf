//! Built-in operator library.

pub mod arrays;
mod combinators;
mod io;
pub mod ops;

use s24_syntax::error::{error, ErrorKind, Result};

use crate::interpreter::Interpreter;
use crate::value::Value;
use ops::{BinaryOp, UnaryOp};

/// Builtin operator identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    // Stack
    Pop,
    Dup,
    Copy,
    Swap,
    Clear,
    Size,
    Last,
    Unpack,
    // Arithmetic and logic
    Binary(BinaryOp),
    Unary(UnaryOp),
    Increment,
    Decrement,
    // Arrays
    Materialize,
    Reverse,
    At,
    Mask,
    Delete,
    IndexOfOnes,
    Search,
    Range,
    Range1,
    ToNumbers,
    SplitWhitespace,
    Split,
    // Combinators
    Reduce,
    Accumulate,
    Broadcast,
    UnaryBroadcast,
    // Input/output
    PrintTop,
    Format,
    Newline,
    PrintStack,
    PrintVars,
    Load,
}

impl Builtin {
    /// Resolves an operator name or one of its short aliases.
    pub fn lookup(name: &str) -> Option<Builtin> {
        let b = match name {
            "pop" => Builtin::Pop,
            "dup" => Builtin::Dup,
            "copy" => Builtin::Copy,
            "swap" | "swp" => Builtin::Swap,
            "clear" | "clr" => Builtin::Clear,
            "#" => Builtin::Size,
            "last" | "lst" => Builtin::Last,
            "unpack" => Builtin::Unpack,

            "+" => Builtin::Binary(BinaryOp::Add),
            "-" => Builtin::Binary(BinaryOp::Sub),
            "*" => Builtin::Binary(BinaryOp::Mul),
            "/" => Builtin::Binary(BinaryOp::Div),
            "**" => Builtin::Binary(BinaryOp::Pow),
            "%" | "mod" => Builtin::Binary(BinaryOp::Mod),
            "=" => Builtin::Binary(BinaryOp::Eq),
            "!=" => Builtin::Binary(BinaryOp::Ne),
            "or" => Builtin::Binary(BinaryOp::Or),
            "++" => Builtin::Increment,
            "--" => Builtin::Decrement,

            "not" => Builtin::Unary(UnaryOp::Not),
            ">0" => Builtin::Unary(UnaryOp::Gt0),
            "<0" => Builtin::Unary(UnaryOp::Lt0),
            "round" | "rou" => Builtin::Unary(UnaryOp::Round),
            "abs" => Builtin::Unary(UnaryOp::Abs),
            "is-prime" | "ipr" => Builtin::Unary(UnaryOp::IsPrime),
            "cos" => Builtin::Unary(UnaryOp::Cos),
            "sin" => Builtin::Unary(UnaryOp::Sin),

            "materialize" | "a" => Builtin::Materialize,
            "reverse" | "rev" => Builtin::Reverse,
            "at" => Builtin::At,
            "mask" | "msk" => Builtin::Mask,
            "del" => Builtin::Delete,
            "index-of-ones" | "idx" => Builtin::IndexOfOnes,
            "search" | "idx2" => Builtin::Search,
            "range" | "ran" => Builtin::Range,
            "range1" | "ran1" => Builtin::Range1,
            "a2n" => Builtin::ToNumbers,
            "split-ws" | "sws" => Builtin::SplitWhitespace,
            "split" | "ss" => Builtin::Split,

            "reduce" | "rdl" => Builtin::Reduce,
            "accumulate" | "acc" => Builtin::Accumulate,
            "broadcast" => Builtin::Broadcast,
            "unary-broadcast" => Builtin::UnaryBroadcast,

            "pp" => Builtin::PrintTop,
            "fmt" => Builtin::Format,
            "nl" => Builtin::Newline,
            "ps" => Builtin::PrintStack,
            "pv" => Builtin::PrintVars,
            "ld" => Builtin::Load,
            _ => return None,
        };
        Some(b)
    }
}

impl Interpreter {
    /// Runs one builtin against the shared stack. Operands are taken with the
    /// top of the stack as the last argument: `a b -` computes `a - b`.
    pub(crate) fn exec_builtin(&mut self, builtin: Builtin) -> Result<()> {
        match builtin {
            Builtin::Pop => {
                self.stack.pop()?;
            }
            Builtin::Dup => {
                let top = self.stack.peek()?.clone();
                self.stack.push(top)?;
            }
            Builtin::Copy => {
                let top = self.stack.peek()?.deep_copy();
                self.stack.push(top)?;
            }
            Builtin::Swap => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                self.stack.push(b)?;
                self.stack.push(a)?;
            }
            Builtin::Clear => self.stack.clear(),
            Builtin::Size => {
                let size = self.stack.peek()?.size();
                self.stack.push(Value::Constant(size as f64))?;
            }
            Builtin::Last => {
                let v = self.stack.pop()?;
                self.stack.push(arrays::last(&v)?)?;
            }
            Builtin::Unpack => {
                let v = self.stack.pop()?;
                let items = match v.items() {
                    Some(items) => items,
                    None => return error(ErrorKind::TypeMismatch, format!("cannot unpack a {}", v.kind_name())),
                };
                for item in items {
                    self.stack.push(item)?;
                }
            }

            Builtin::Binary(op) => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                self.stack.push(ops::binary(op, &a, &b)?)?;
            }
            Builtin::Unary(op) => {
                let a = self.stack.pop()?;
                self.stack.push(ops::unary(op, &a)?)?;
            }
            Builtin::Increment | Builtin::Decrement => {
                let a = self.stack.pop()?;
                let step = if builtin == Builtin::Increment { 1.0 } else { -1.0 };
                self.stack.push(ops::binary(BinaryOp::Add, &a, &Value::Constant(step))?)?;
            }

            Builtin::Materialize => self.materialize()?,
            Builtin::Reverse => {
                let v = self.stack.pop()?;
                self.stack.push(arrays::reverse(&v)?)?;
            }
            Builtin::At => {
                let index = self.stack.pop()?;
                let v = self.stack.pop()?;
                self.stack.push(arrays::at(&v, &index)?)?;
            }
            Builtin::Mask | Builtin::Delete => {
                let mut flags = self.stack.pop()?;
                let values = self.stack.pop()?;
                if builtin == Builtin::Delete {
                    flags = ops::unary(UnaryOp::Not, &flags)?;
                }
                self.stack.push(arrays::mask(&values, &flags)?)?;
            }
            Builtin::IndexOfOnes => {
                let flags = self.stack.pop()?;
                self.stack.push(arrays::index_of_ones(&flags)?)?;
            }
            Builtin::Search => {
                let haystack = self.stack.pop()?;
                let needles = self.stack.pop()?;
                self.stack.push(arrays::search(&needles, &haystack)?)?;
            }
            Builtin::Range => {
                let to = self.stack.pop()?;
                let from = self.stack.pop()?;
                self.stack.push(arrays::range(&from, &to)?)?;
            }
            Builtin::Range1 => {
                let to = self.stack.pop()?;
                self.stack.push(arrays::range1(&to)?)?;
            }
            Builtin::ToNumbers => {
                let v = self.stack.pop()?;
                self.stack.push(arrays::to_numbers(&v)?)?;
            }
            Builtin::SplitWhitespace => {
                let v = self.stack.pop()?;
                self.stack.push(arrays::split_whitespace(&v)?)?;
            }
            Builtin::Split => {
                let delimiter = self.stack.pop()?;
                let v = self.stack.pop()?;
                self.stack.push(arrays::split(&v, &delimiter)?)?;
            }

            Builtin::Reduce => self.reduce()?,
            Builtin::Accumulate => self.accumulate()?,
            Builtin::Broadcast => self.broadcast_nest()?,
            Builtin::UnaryBroadcast => self.unary_broadcast_nest()?,

            Builtin::PrintTop => {
                let top = self.stack.peek()?.display_bytes();
                self.emit_bytes_line(&top)?;
            }
            Builtin::Format => {
                let v = self.stack.pop()?;
                self.emit_bytes_line(&v.display_bytes())?;
            }
            Builtin::Newline => self.emit_line("")?,
            Builtin::PrintStack => self.print_stack()?,
            Builtin::PrintVars => self.print_vars()?,
            Builtin::Load => self.load()?,
        }
        Ok(())
    }

    /// `n materialize` packs the top `n` values, or the whole stack for -1.
    fn materialize(&mut self) -> Result<()> {
        let n = self.stack.pop()?.as_integer("materialize count")?;
        let count = match n {
            -1 => self.stack.len(),
            n if n < -1 => {
                return error(ErrorKind::IndexOutOfBounds, format!("cannot materialize {} values", n));
            }
            n => n as usize,
        };
        let items = self.stack.pop_many(count)?;
        self.stack.push(Value::array(items))
    }
}
