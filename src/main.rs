#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rpncalc::calc_engine::{Calculator, EvaluationTrace};
use rpncalc::stream_mode::{self, StreamOptions};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Read expressions line by line from stdin
    Stream,
    /// Raw terminal line editor with history
    Line,
    /// Full screen terminal interface
    Tui,
}

/// Infix calculator evaluating through reverse Polish notation.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Evaluate a single expression and exit
    expression: Option<String>,

    #[arg(long, value_enum, default_value_t = Mode::Stream)]
    mode: Mode,

    /// Show the postfix form and every evaluation step
    #[arg(long)]
    details: bool,

    /// No banner or prompt in stream mode
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Some(expression) = &args.expression {
        return run_once(expression, args.details);
    }

    log::info!("starting in {:?} mode", args.mode);
    match args.mode {
        Mode::Stream => {
            let options = StreamOptions {
                details: args.details,
                quiet: args.quiet,
            };
            stream_mode::run(io::stdin().lock(), io::stdout().lock(), options)?;
        }
        Mode::Line => run_line()?,
        Mode::Tui => run_tui()?,
    }
    Ok(())
}

fn run_once(expression: &str, details: bool) -> Result<()> {
    let mut trace = EvaluationTrace::new(details);
    match Calculator::new().evaluate_detailed(expression, &mut trace) {
        Ok((postfix, value)) => stream_mode::write_value(&mut io::stdout().lock(), value, &postfix, &trace)?,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[cfg(feature = "line")]
fn run_line() -> Result<()> {
    line_mode::run_line()
}

#[cfg(not(feature = "line"))]
fn run_line() -> Result<()> {
    anyhow::bail!("line mode is not available, rebuild with `--features line`")
}

#[cfg(feature = "tui")]
fn run_tui() -> Result<()> {
    tui_mode::run_tui()
}

#[cfg(not(feature = "tui"))]
fn run_tui() -> Result<()> {
    anyhow::bail!("tui mode is not available, rebuild with `--features tui`")
}
