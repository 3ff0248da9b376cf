use owo_colors::OwoColorize;
use s24_syntax::error::{Error, ErrorKind};

/// One-line diagnostic, then the offending source line with a caret when the
/// error carries a position.
pub fn render_error(phase: &str, source: &str, err: &Error) {
    eprintln!("{}: {}: {}", phase.red().bold(), err.kind, err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len() + col.saturating_sub(1));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(err.kind);
}

pub fn provide_error_suggestions(kind: ErrorKind) {
    match kind {
        ErrorKind::StackUnderflow => {
            eprintln!("{}", "Help: An operator needed more values than the stack holds.".yellow());
            eprintln!("    {}", "Use 'ps' to print the stack right before the failing token".bright_black());
        }
        ErrorKind::StackOverflow => {
            eprintln!("{}", "Help: The stack or the call depth hit its limit.".yellow());
            eprintln!("    {}", "Self-iterating nests should loop with 'rx' instead of 'x'".bright_black());
            eprintln!("    {}", "Limits: --stack-capacity, --max-call-depth".bright_black());
        }
        ErrorKind::ParenMismatch => {
            eprintln!("{}", "Help: A ')' closes a comment that was never opened.".yellow());
            eprintln!("    {}", "Write '((' and '))' for literal parentheses".bright_black());
        }
        ErrorKind::UnterminatedString => {
            eprintln!("{}", "Help: String is missing its closing quote.".yellow());
            eprintln!("    {}", "The closing \" must be the last character of a word".bright_black());
        }
        ErrorKind::UnterminatedNest => {
            eprintln!("{}", "Help: Every '[' needs a matching ']'.".yellow());
        }
        ErrorKind::UnrecognizedToken => {
            eprintln!("{}", "Help: The word is neither a builtin nor a bound variable.".yellow());
            eprintln!("    {}", "Bind values with: 42 -> answer".bright_black());
            eprintln!("    {}", "Define procedures with: [ dup * ] !-> square".bright_black());
        }
        ErrorKind::TypeMismatch => {
            eprintln!("{}", "Help: The operator does not accept these operand types.".yellow());
            eprintln!("    {}", "Two strings only support '+'".bright_black());
        }
        ErrorKind::SizeMismatch => {
            eprintln!("{}", "Help: Broadcasting needs equal sizes or a size-one operand.".yellow());
            eprintln!("    {}", "Example: 1 2 3 3 a 10 +  gives  (( 11 12 13 ))".bright_black());
        }
        ErrorKind::IndexOutOfBounds | ErrorKind::NonIntegerIndex => {
            eprintln!("{}", "Help: Indices are whole numbers from 0 to size - 1.".yellow());
            eprintln!("    {}", "Use '#' to push the size of the top value".bright_black());
        }
        ErrorKind::LabelNotFound => {
            eprintln!("{}", "Help: Jump targets must exist in the same nest or program.".yellow());
            eprintln!("    {}", "';' jumps to the next '.end'".bright_black());
        }
        ErrorKind::LoopConstructMismatch => {
            eprintln!("{}", "Help: Loops are written: loop <condition> do <body> over".yellow());
        }
        ErrorKind::InvalidRewind => {
            eprintln!("{}", "Help: 'rx' can only restart the nest that is currently running.".yellow());
            eprintln!("    {}", "Use 'x' to call a different nest".bright_black());
        }
        ErrorKind::Io => {
            eprintln!("{}", "Help: File operation failed.".yellow());
            eprintln!("    {}", "Relative paths are resolved against the program's directory".bright_black());
        }
        ErrorKind::NumberParseFailure | ErrorKind::Cancelled => {}
    }
}
