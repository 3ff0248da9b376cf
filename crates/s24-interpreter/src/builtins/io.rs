//! Printing and file loading.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use s24_syntax::error::{Error, ErrorKind, Result};
use tracing::debug;

use crate::interpreter::Interpreter;
use crate::value::Value;

fn io_error(e: std::io::Error) -> Error {
    Error::new(ErrorKind::Io, e.to_string())
}

impl Interpreter {
    pub(crate) fn emit_line(&mut self, text: &str) -> Result<()> {
        self.emit_bytes_line(text.as_bytes())
    }

    pub(crate) fn emit_bytes_line(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).map_err(io_error)?;
        self.out.write_all(b"\n").map_err(io_error)
    }

    pub(crate) fn print_stack(&mut self) -> Result<()> {
        let dump = self.stack.render(self.config.stack_print_limit);
        self.out.write_all(dump.as_bytes()).map_err(io_error)
    }

    pub(crate) fn print_vars(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .vars
            .iter()
            .map(|(name, binding)| format!("\"{}\": {}", name, binding.value.repr()))
            .collect();
        for line in lines {
            self.emit_line(&line)?;
        }
        Ok(())
    }

    /// `path ld`: pushes the file's content as a string. Relative paths
    /// resolve against the program directory when one is set.
    pub(crate) fn load(&mut self) -> Result<()> {
        let path = PathBuf::from(self.stack.pop()?.expect_text("ld")?);
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };
        debug!(path = %path.display(), "loading file");
        let bytes = fs::read(&path)
            .map_err(|e| Error::new(ErrorKind::Io, format!("failed to read file '{}': {}", path.display(), e)))?;
        self.stack.push(Value::from_bytes(bytes))
    }
}
