mod common;
mod repl;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use s24_interpreter::{Config, Interpreter};
use s24_lexer::Lexer;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use common::render_error;

#[derive(Parser, Debug)]
#[command(name = "s24", version, about = "Run s24 programs, or start the REPL without a file")]
struct Cli {
    /// Program to run
    file: Option<PathBuf>,

    /// Maximum number of values on the data stack
    #[arg(long, value_name = "N")]
    stack_capacity: Option<usize>,

    /// Maximum number of nested frames
    #[arg(long, value_name = "N")]
    max_call_depth: Option<usize>,

    /// Entries shown by 'ps'
    #[arg(long, value_name = "N")]
    stack_print_limit: Option<usize>,
}

impl Cli {
    /// Environment overrides first, then flags on top.
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(n) = self.stack_capacity {
            config.stack_capacity = n;
        }
        if let Some(n) = self.max_call_depth {
            config.max_call_depth = n;
        }
        if let Some(n) = self.stack_print_limit {
            config.stack_print_limit = n;
        }
        config
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();
    debug!(?config, "starting");

    let path = match &cli.file {
        Some(p) => p.clone(),
        None => {
            repl::start_repl(config);
            return;
        }
    };

    if !path.exists() {
        eprintln!(
            "{}: {}",
            "error".red().bold(),
            format!("File not found: {}", path.display()).red()
        );
        process::exit(1);
    }
    let src = match fs::read(&path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path.display(), e).red()
            );
            process::exit(1);
        }
    };

    let tokens = Lexer::new(&src).tokenize();
    debug!(tokens = tokens.len(), path = %path.display(), "tokenized");

    let mut interp = Interpreter::with_config(config);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        interp.set_base_dir(dir);
    }
    if let Err(e) = interp.run(tokens) {
        render_error("Runtime error", &src, &e);
        process::exit(1);
    }

    let stack = interp.stack();
    match stack.values() {
        [] => {}
        [value] => {
            let mut stdout = io::stdout().lock();
            let mut line = value.display_bytes();
            line.push(b'\n');
            let _ = stdout.write_all(&line).and_then(|_| stdout.flush());
        }
        values => {
            eprintln!("{}", "error: stack remaining!".red().bold());
            print!("{}", stack.render(values.len()));
            process::exit(1);
        }
    }
}
