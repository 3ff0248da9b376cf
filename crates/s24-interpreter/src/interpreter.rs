//! The executor: a frame stack walking token ranges.
//!
//! Each frame is a shared [`Code`] plus a cursor. Calling a nest pushes a
//! frame; exhausting one pops it. Combinators re-enter through
//! [`Interpreter::call`], which runs until the frame stack is back to where it
//! started, so nested runs share the same stack, variables and frame limit.

use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use s24_syntax::error::{error, Error, ErrorKind, Result};
use s24_syntax::Token;
use tracing::{debug, trace};

use crate::builtins::Builtin;
use crate::cancel::CancelHandle;
use crate::code::Code;
use crate::config::Config;
use crate::flow::Flow;
use crate::stack::Stack;
use crate::value::Value;
use crate::vars::Vars;

struct Frame {
    code: Rc<Code>,
    /// Next token to run
    pc: usize,
    /// Open `(` comments
    parens: usize,
}

enum Fetch {
    Exhausted,
    Skip,
    Run(Rc<Code>, usize),
}

impl Frame {
    fn new(code: Rc<Code>) -> Self {
        Frame { code, pc: 0, parens: 0 }
    }

    /// Advances past one token, consuming comment tokens on the way.
    fn fetch(&mut self) -> Result<Fetch> {
        let Some(token) = self.code.get(self.pc) else {
            return Ok(Fetch::Exhausted);
        };
        let idx = self.pc;
        self.pc += 1;
        match token.as_str() {
            "((" | "))" => Ok(Fetch::Skip),
            "(" => {
                self.parens += 1;
                Ok(Fetch::Skip)
            }
            ")" if self.parens == 0 => {
                Err(Error::new(ErrorKind::ParenMismatch, "')' without an open comment").or_at(token))
            }
            ")" => {
                self.parens -= 1;
                Ok(Fetch::Skip)
            }
            _ if self.parens > 0 => Ok(Fetch::Skip),
            _ => Ok(Fetch::Run(self.code.clone(), idx)),
        }
    }
}

pub struct Interpreter {
    pub(crate) stack: Stack,
    pub(crate) vars: Vars,
    frames: Vec<Frame>,
    pub(crate) config: Config,
    /// Sink for the printing builtins
    pub(crate) out: Box<dyn Write>,
    cancel: CancelHandle,
    /// Directory that relative `ld` paths resolve against
    pub(crate) base_dir: Option<PathBuf>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            stack: Stack::new(config.stack_capacity),
            vars: Vars::new(),
            frames: Vec::new(),
            config,
            out: Box::new(io::stdout()),
            cancel: CancelHandle::new(),
            base_dir: None,
        }
    }

    /// Replaces the output sink used by `pp`, `fmt`, `nl`, `ps` and `pv`.
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = Some(dir.into());
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Forgets every value and binding, and re-arms cancellation.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.vars.clear();
        self.frames.clear();
        self.cancel.reset();
    }

    /// Runs a top-level program. Values left on the stack stay there for the
    /// caller to inspect.
    pub fn run(&mut self, tokens: Vec<Token>) -> Result<()> {
        let result = self.call(Rc::new(Code::new(tokens)));
        self.out
            .flush()
            .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;
        result
    }

    /// Runs `code` to completion in a fresh frame on top of the current ones.
    ///
    /// On failure every frame pushed by this call is discarded, so the
    /// interpreter stays usable.
    pub fn call(&mut self, code: Rc<Code>) -> Result<()> {
        let base = self.frames.len();
        self.enter(code)?;
        let result = self.run_frames(base);
        if result.is_err() {
            self.frames.truncate(base);
        }
        result
    }

    fn enter(&mut self, code: Rc<Code>) -> Result<()> {
        if self.frames.len() >= self.config.max_call_depth {
            return error(
                ErrorKind::StackOverflow,
                format!("max call depth achieved ({})", self.config.max_call_depth),
            );
        }
        debug!(depth = self.frames.len() + 1, tokens = code.len(), "enter frame");
        self.frames.push(Frame::new(code));
        Ok(())
    }

    fn run_frames(&mut self, base: usize) -> Result<()> {
        while self.frames.len() > base {
            self.cancel.check()?;
            let fetched = match self.frames.last_mut() {
                Some(frame) => frame.fetch()?,
                None => break,
            };
            let (code, idx) = match fetched {
                Fetch::Exhausted => {
                    self.frames.pop();
                    debug!(depth = self.frames.len(), "leave frame");
                    continue;
                }
                Fetch::Skip => continue,
                Fetch::Run(code, idx) => (code, idx),
            };
            let Some(token) = code.get(idx) else { continue };
            trace!(token = token.as_str(), line = token.line, col = token.col, "exec");

            match self.step(&code, idx).map_err(|e| e.or_at(token))? {
                Flow::Next => {}
                Flow::Jump(pc) => {
                    debug!(from = idx, to = pc, "jump");
                    if let Some(frame) = self.frames.last_mut() {
                        frame.pc = pc;
                    }
                }
                Flow::Call(callee) => self.enter(callee).map_err(|e| e.or_at(token))?,
                Flow::Rewind => {
                    debug!(depth = self.frames.len(), "rewind");
                    if let Some(frame) = self.frames.last_mut() {
                        frame.pc = 0;
                        frame.parens = 0;
                    }
                }
            }
        }
        Ok(())
    }

    /// Executes the token at `idx` of `code`, the code of the innermost frame.
    fn step(&mut self, code: &Rc<Code>, idx: usize) -> Result<Flow> {
        let Some(token) = code.get(idx) else {
            return Ok(Flow::Next);
        };
        let text = token.as_str();

        if text.starts_with('"') {
            let (value, end) = read_string(code, idx)?;
            self.stack.push(value)?;
            return Ok(Flow::Jump(end + 1));
        }
        if text == "[" {
            let (value, end) = capture_nest(code, idx)?;
            self.stack.push(value)?;
            return Ok(Flow::Jump(end + 1));
        }
        if let Ok(n) = text.parse::<f64>() {
            self.stack.push(Value::Constant(n))?;
            return Ok(Flow::Next);
        }
        if token.is_label() {
            return Ok(Flow::Next);
        }

        match text {
            "nop" | "loop" => Ok(Flow::Next),
            "->" | "!->" => {
                let Some(name) = code.get(idx + 1) else {
                    return error(ErrorKind::UnrecognizedToken, format!("'{}' needs a name to bind", text));
                };
                let value = self.stack.pop()?;
                self.vars.bind(name.as_str(), value, text == "!->");
                Ok(Flow::Jump(idx + 2))
            }
            "?" => self.branch(code, idx),
            ";" => match code.next_end(idx + 1) {
                Some(end) => Ok(Flow::Jump(end + 1)),
                None => error(ErrorKind::LabelNotFound, "couldn't find .end label"),
            },
            "do" => {
                if self.stack.pop()?.truthy()? {
                    return Ok(Flow::Next);
                }
                match code.matching_over(idx) {
                    Some(over) => Ok(Flow::Jump(over + 1)),
                    None => error(ErrorKind::LoopConstructMismatch, "'do' without a matching 'over'"),
                }
            }
            "over" => match code.matching_loop(idx) {
                Some(start) => Ok(Flow::Jump(start + 1)),
                None => error(ErrorKind::LoopConstructMismatch, "'over' without a matching 'loop'"),
            },
            "x" => {
                let nest = self.stack.pop()?;
                Ok(Flow::Call(nest.as_code()?.clone()))
            }
            "rx" => {
                let nest = self.stack.pop()?;
                if Rc::ptr_eq(nest.as_code()?, code) {
                    Ok(Flow::Rewind)
                } else {
                    error(
                        ErrorKind::InvalidRewind,
                        "can't rewind a nest outside of itself, try using 'x'",
                    )
                }
            }
            _ if text.len() > 1 && text.starts_with('#') => {
                let depth: usize = text[1..].parse().map_err(|_| {
                    Error::new(ErrorKind::NumberParseFailure, format!("failed parsing stack slot ({})", &text[1..]))
                })?;
                let value = self.stack.peek_at(depth)?.clone();
                self.stack.push(value)?;
                Ok(Flow::Next)
            }
            _ => {
                if let Some(builtin) = Builtin::lookup(text) {
                    self.exec_builtin(builtin)?;
                    return Ok(Flow::Next);
                }
                self.resolve_var(text)
            }
        }
    }

    /// `cond ? .yes .no`: a truthy condition jumps to the label in the next
    /// slot, a falsy one to the label two slots ahead. A slot without a label
    /// falls through, and the next slot is always consumed.
    fn branch(&mut self, code: &Code, idx: usize) -> Result<Flow> {
        let slot = if self.stack.pop()?.truthy()? { idx + 1 } else { idx + 2 };
        match code.get(slot) {
            Some(target) if target.is_label() => {
                let label = target.as_str();
                if label == "." {
                    return error(ErrorKind::LabelNotFound, "goto label \".\" is not a label");
                }
                match code.find_label(label, slot) {
                    Some(at) => Ok(Flow::Jump(at + 1)),
                    None => error(ErrorKind::LabelNotFound, format!("couldn't find label \"{}\"", label)),
                }
            }
            _ => Ok(Flow::Jump(idx + 2)),
        }
    }

    fn resolve_var(&mut self, name: &str) -> Result<Flow> {
        let Some(binding) = self.vars.lookup(name) else {
            return error(ErrorKind::UnrecognizedToken, format!("unrecognized token \"{}\"", name));
        };
        if binding.auto_exec {
            if let Value::Nest(code) = &binding.value {
                return Ok(Flow::Call(code.clone()));
            }
        }
        let value = binding.value.clone();
        self.stack.push(value)?;
        Ok(Flow::Next)
    }
}

/// Reads a string literal starting at `idx`, rejoining the tokens it spans
/// with one space per boundary. Returns the value and the index of the token
/// holding the closing quote.
fn read_string(code: &Code, idx: usize) -> Result<(Value, usize)> {
    let mut bytes = Vec::new();
    let mut at = idx;
    loop {
        let Some(token) = code.get(at) else {
            return error(ErrorKind::UnterminatedString, "string literal is never closed");
        };
        let text = token.as_str().as_bytes();
        let text = if at == idx { &text[1..] } else { text };
        let mut i = 0;
        while i < text.len() {
            match text[i] {
                b'\\' if text.get(i + 1) == Some(&b'"') => {
                    bytes.push(b'"');
                    i += 2;
                }
                b'\\' if i + 1 == text.len() => i += 1,
                b'"' if i + 1 == text.len() => return Ok((Value::from_bytes(bytes), at)),
                b'"' => {
                    return Err(Error::new(ErrorKind::UnterminatedString, "closing quote must end its token").or_at(token));
                }
                b => {
                    bytes.push(b);
                    i += 1;
                }
            }
        }
        bytes.push(b' ');
        at += 1;
    }
}

/// Captures the tokens between `[` at `idx` and its matching `]`.
fn capture_nest(code: &Code, idx: usize) -> Result<(Value, usize)> {
    let mut depth = 1usize;
    let mut body = Vec::new();
    for (at, token) in code.tokens().iter().enumerate().skip(idx + 1) {
        match token.as_str() {
            "[" => depth += 1,
            "]" => {
                depth -= 1;
                if depth == 0 {
                    return Ok((Value::nest(body), at));
                }
            }
            _ => {}
        }
        body.push(token.clone());
    }
    error(ErrorKind::UnterminatedNest, "unmatched nesting")
}
