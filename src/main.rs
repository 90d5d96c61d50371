//! # dpll-sat
//!
//! Command line front end for the DPLL solver in the `dpll_sat` library.
//! It reads DIMACS CNF (Conjunctive Normal Form) problems and prints the
//! clause count, the variable count, and `Result: SAT;` or `Result: UNSAT;`.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a DIMACS file
//! dpll-sat problem.cnf
//!
//! # The same, with statistics and a check of the satisfying assignment
//! dpll-sat file --path problem.cnf --stats --verify
//!
//! # Solve a formula given inline
//! dpll-sat text --input "1 -2 0 2 3 0"
//!
//! # Solve every .cnf file below a directory
//! dpll-sat dir --path data/uf20-91
//!
//! # Shell completions
//! dpll-sat completions bash
//! ```
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG` or pass
//! `--debug`. The exit status is 0 when the run completes and 1 on any error.

use crate::command_line::cli::{parse_args, run};
use std::process::ExitCode;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in `--stats`.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    init_logging(cli.common().debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
