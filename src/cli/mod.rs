// ============================================================================
// CLI Module
// One-shot and interactive front ends over the evaluator
// ============================================================================

pub mod logger;

use crate::engine::Evaluator;
use clap::Parser;
use std::io::{self, BufRead, Write};

/// Printed once when the interactive prompt starts
pub const BANNER: &str = "\
bounded-calc: evaluates <number> <operator> <number> with + - * /
Operands within [-1,000,000, 1,000,000], up to 4 digits after `.`.
Press Enter on an empty line, or type `exit` / `quit`, to leave.";

/// Interactive prompt
pub const PROMPT: &str = "> ";

/// Printed for a line that is not valid UTF-8
pub const UNREADABLE_LINE: &str = "Error: input line is not valid UTF-8.";

#[derive(Debug, Clone, Parser)]
#[command(name = "bounded-calc")]
#[command(about = "Evaluate one bounded decimal expression, or start an interactive prompt")]
pub struct CliArgs {
    /// Expression words, joined with single spaces (e.g. `12.5 * 3`).
    /// Without any, an interactive prompt starts.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub expression: Vec<String>,

    #[arg(short, long, help = "Enable verbose logging on stderr")]
    pub verbose: bool,
}

/// Evaluate the joined `words` once and print the outcome.
///
/// Returns the process exit code: 0 on success, 1 on failure.
pub fn run_one_shot<W: Write>(
    words: &[String],
    evaluator: &Evaluator,
    output: &mut W,
) -> io::Result<u8> {
    let expression = words.join(" ");
    let outcome = evaluator.evaluate(&expression);
    writeln!(output, "{}", outcome.render(&evaluator.config().format))?;
    Ok(outcome.exit_code())
}

/// Read expressions line by line until end of input, an empty line,
/// `exit` or `quit`. A failed evaluation never stops the loop, and
/// neither does a line that is not valid UTF-8.
pub fn run_interactive<R: BufRead, W: Write>(
    evaluator: &Evaluator,
    mut input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "{BANNER}")?;

    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                tracing::debug!("end of input, leaving prompt");
                break;
            }
            Ok(_) => {}
            // The offending bytes are consumed, so the next line can still be read
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                tracing::debug!(%err, "skipping unreadable line");
                writeln!(output, "{UNREADABLE_LINE}")?;
                continue;
            }
            Err(err) => return Err(err),
        }

        let expression = line.trim();
        if is_exit_command(expression) {
            tracing::debug!(command = expression, "leaving prompt");
            break;
        }

        let outcome = evaluator.evaluate(expression);
        writeln!(output, "{}", outcome.render(&evaluator.config().format))?;
    }

    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    line.is_empty() || line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}
