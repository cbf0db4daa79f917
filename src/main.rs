use anyhow::Context;
use bounded_calc::cli::{self, logger, CliArgs};
use bounded_calc::engine::Evaluator;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Starting bounded-calc");

    let evaluator = Evaluator::default();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let code = if args.expression.is_empty() {
        tracing::debug!("no expression given, starting interactive prompt");
        cli::run_interactive(&evaluator, io::stdin().lock(), &mut output)
            .context("interactive prompt failed")?;
        0
    } else {
        cli::run_one_shot(&args.expression, &evaluator, &mut output)
            .context("failed to write result")?
    };

    output.flush().context("failed to flush stdout")?;
    Ok(ExitCode::from(code))
}
