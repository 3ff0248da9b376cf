//! Runtime limits.
//!
//! Limits are plain data; the interpreter enforces them.

use std::env;

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of values on the data stack
    pub stack_capacity: usize,

    /// Maximum number of live frames (program, called nests, combinator steps)
    pub max_call_depth: usize,

    /// Entries shown by the `ps` operator
    pub stack_print_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stack_capacity: 1000,
            max_call_depth: 1000,
            stack_print_limit: 12,
        }
    }
}

impl Config {
    /// Defaults overridden by `S24_STACK_CAPACITY`, `S24_MAX_CALL_DEPTH` and
    /// `S24_STACK_PRINT_LIMIT` when they hold a valid number.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_usize("S24_STACK_CAPACITY") {
            config.stack_capacity = n;
        }
        if let Some(n) = env_usize("S24_MAX_CALL_DEPTH") {
            config.max_call_depth = n;
        }
        if let Some(n) = env_usize("S24_STACK_PRINT_LIMIT") {
            config.stack_print_limit = n;
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
