use std::io::{self, Write};

use owo_colors::OwoColorize;
use s24_interpreter::{Config, Interpreter};
use s24_lexer::{tokenize, Lexer};

use crate::common::render_error;

pub fn start_repl(config: Config) {
    println!("{}", "s24 REPL. Type :help for help, :quit to exit.".bold().green());

    let mut interpreter = Interpreter::with_config(config);

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "s24> ".cyan().to_string() } else { "...> ".cyan().to_string() };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => {
                    print_help();
                    continue;
                }
                ":stack" | ":s" => {
                    print_stack(&interpreter);
                    continue;
                }
                ":vars" => {
                    print_vars(&interpreter);
                    continue;
                }
                ":reset" => {
                    interpreter.reset();
                    println!("{}", "State reset.".yellow());
                    continue;
                }
                _ => {
                    println!("{}", "Unknown command. Type :help.".red());
                    continue;
                }
            }
        }

        buffer.push_str(&line);

        if !is_complete(&buffer) {
            continue;
        }

        let tokens = Lexer::new(&buffer).tokenize();
        match interpreter.run(tokens) {
            Ok(()) => {
                if let Some(top) = interpreter.stack().values().last() {
                    println!("{}", top.to_string().bright_blue());
                }
            }
            Err(e) => render_error("Runtime error", &buffer, &e),
        }

        buffer.clear();
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}  {}", ":help".yellow(), "Show this help");
    println!("  {}  {}", ":quit".yellow(), "Exit the REPL");
    println!("  {}  {}", ":stack".yellow(), "Print the stack, top first");
    println!("  {}  {}", ":vars".yellow(), "List variables");
    println!("  {}  {}", ":reset".yellow(), "Clear the stack and variables");
    println!("Type words to run them. Input continues while a nest, comment or string is open.");
}

fn print_stack(interp: &Interpreter) {
    let stack = interp.stack();
    if stack.is_empty() {
        println!("{}", "<empty stack>".dimmed());
        return;
    }
    print!("{}", stack.render(interp.config().stack_print_limit));
}

fn print_vars(interp: &Interpreter) {
    let vars = interp.vars();
    if vars.is_empty() {
        println!("{}", "<no vars>".dimmed());
        return;
    }
    for (name, binding) in vars.iter() {
        let marker = if binding.auto_exec { " (auto)" } else { "" };
        println!("{}{} = {}", name.yellow(), marker.dimmed(), binding.value.repr().bright_blue());
    }
}

/// True once every `[`, comment and string literal in `input` is closed.
fn is_complete(input: &str) -> bool {
    let mut brackets = 0i32;
    let mut parens = 0i32;
    let mut in_string = false;
    for tk in tokenize(input).iter() {
        let text = tk.as_str();
        if in_string {
            in_string = !closes_string(text);
            continue;
        }
        if parens > 0 {
            match text {
                "(" => parens += 1,
                ")" => parens -= 1,
                _ => {}
            }
            continue;
        }
        match text {
            "(" => parens += 1,
            "[" => brackets += 1,
            "]" => brackets -= 1,
            _ if text.starts_with('"') => in_string = !closes_string(&text[1..]),
            _ => {}
        }
    }
    brackets <= 0 && parens <= 0 && !in_string
}

fn closes_string(text: &str) -> bool {
    text.ends_with('"') && !text.ends_with("\\\"")
}
