//! Lox interpreter command-line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop. When called with a script path it runs the
//! script and exits 65 on a syntax error or 70 on a runtime error, so
//! shells and test harnesses can tell the two apart.

use std::env;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process::ExitCode;

use anyhow::{self, Context};

use rslox::interpreter::{Interpreter, LoxError};

const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;

fn main() -> Result<ExitCode, anyhow::Error> {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.as_slice() {
        [] => {
            run_prompt()?;
            Ok(ExitCode::SUCCESS)
        }
        [path] => run_file(path),
        _ => {
            eprintln!("Usage: rslox [script]");
            Ok(ExitCode::from(EX_USAGE))
        }
    }
}

fn run_file(path: &str) -> Result<ExitCode, anyhow::Error> {
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;

    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    match interp.run(&source) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e @ LoxError::Syntax(_)) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EX_DATAERR))
        }
        Err(e @ LoxError::Runtime(_)) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EX_SOFTWARE))
        }
    }
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    // One interpreter for the whole session, so variables defined on one
    // line are visible on the next.
    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all("> ".as_bytes())?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        if let Err(e) = interp.run(&input) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}
