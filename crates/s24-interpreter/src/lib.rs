//! s24 interpreter: runs token streams against a shared value stack.
//!
//! This crate holds the runtime of the s24 language: the value model, the
//! bounded data stack, the flat variable store, the built-in operator library
//! and the executor that walks token frames (labels, loops, nests and the
//! `rx` tail rewind).

pub mod builtins;
pub mod cancel;
pub mod code;
pub mod config;
mod flow;
pub mod interpreter;
pub mod stack;
pub mod value;
pub mod vars;

pub use builtins::Builtin;
pub use cancel::CancelHandle;
pub use code::Code;
pub use config::Config;
pub use interpreter::Interpreter;
pub use stack::Stack;
pub use value::Value;
pub use vars::{Binding, Vars};
