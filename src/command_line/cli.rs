#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use dpll_sat::sat::assignment::Assignment;
use dpll_sat::sat::cnf::Cnf;
use dpll_sat::sat::dimacs::{parse_file, parse_str};
use dpll_sat::sat::dpll::Dpll;
use dpll_sat::sat::error::{DimacsError, SolveError};
use dpll_sat::sat::solver::{SolutionStats, SolveResult, Solver, SolverConfig};
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "dpll-sat",
    version,
    about = "Decides satisfiability of DIMACS CNF formulas with DPLL",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// Path to a DIMACS .cnf file, solved when no subcommand is given.
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// CNF input as a string, e.g. "1 -2 0 2 3 0". A `p cnf` line is
        /// optional; without one the variable count is the largest variable used.
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every .cnf file below a directory.
    Dir {
        /// Directory to search recursively.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by every solving command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a satisfying assignment against the formula before reporting SAT.
    #[arg(long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print problem and search statistics.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Give up with an error once this many decisions are open at once.
    #[arg(long)]
    pub(crate) max_depth: Option<usize>,
}

impl CommonOptions {
    pub(crate) const fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_depth: self.max_depth,
        }
    }
}

impl Cli {
    /// The options in force for the selected command.
    pub(crate) fn common(&self) -> &CommonOptions {
        match &self.command {
            Some(
                Commands::File { common, .. }
                | Commands::Text { common, .. }
                | Commands::Dir { common, .. },
            ) => common,
            Some(Commands::Completions { .. }) | None => &self.common,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: DimacsError,
    },

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("solution failed verification: {unsatisfied} clauses unsatisfied")]
    Verification { unsatisfied: usize },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no input given, use --help for usage")]
    NoInput,
}

/// Parses `args`, printing any usage error, help or version text.
///
/// On `Err` there is nothing to run and the value is the exit status:
/// success after `--help` or `--version`, failure for bad arguments.
pub(crate) fn parse_args<I, T>(args: I) -> Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Any parse, search or verification failure of a single-formula command.
/// `dir` reports per-file failures and carries on.
pub(crate) fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Some(Commands::File { path, common }) => solve_file(&path, &common),
        Some(Commands::Text { input, common }) => solve_text(&input, &common),
        Some(Commands::Dir { path, common }) => solve_dir(&path, &common).map(|_| ()),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dpll-sat",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        None => match cli.path {
            Some(path) => solve_file(&path, &cli.common),
            None => Err(CliError::NoInput),
        },
    }
}

pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let time = Instant::now();
    let cnf = parse_file(path).map_err(|source| CliError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let parse_time = time.elapsed();

    solve_and_report(&mut io::stdout(), cnf, common, parse_time)
}

pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), CliError> {
    let time = Instant::now();
    let cnf = parse_textual_cnf(input).map_err(|source| CliError::Parse {
        path: "<input>".to_string(),
        source,
    })?;
    let parse_time = time.elapsed();

    solve_and_report(&mut io::stdout(), cnf, common, parse_time)
}

/// Outcome counts of a `dir` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DirSummary {
    pub sat: usize,
    pub unsat: usize,
    /// Files that could not be read, parsed or solved.
    pub errors: usize,
}

impl DirSummary {
    pub(crate) const fn solved(&self) -> usize {
        self.sat + self.unsat
    }
}

impl fmt::Display for DirSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solved {} files: {} SAT, {} UNSAT, {} errors",
            self.solved(),
            self.sat,
            self.unsat,
            self.errors
        )
    }
}

/// Solves every `.cnf` file below `path`, one summary line per file.
///
/// Symbolic links are followed. A file or directory entry that cannot be
/// read is reported on stderr and counted as an error; the walk goes on.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<DirSummary, CliError> {
    if !path.is_dir() {
        return Err(CliError::NotADirectory(path.to_path_buf()));
    }

    let mut summary = DirSummary::default();

    for entry in walkdir::WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("error: {e}");
                summary.errors += 1;
                continue;
            }
        };

        let file_path = entry.path();
        if !entry.file_type().is_file() || file_path.extension().is_none_or(|ext| ext != "cnf") {
            log::debug!("skipping {}", file_path.display());
            continue;
        }

        let time = Instant::now();
        let outcome = parse_file(file_path)
            .map_err(|source| CliError::Parse {
                path: file_path.display().to_string(),
                source,
            })
            .and_then(|cnf| solve_cnf(cnf, common, time.elapsed()));

        match outcome {
            Ok((result, elapsed)) => {
                println!(
                    "{}: {result} ({:.3}s)",
                    file_path.display(),
                    elapsed.as_secs_f64()
                );
                if result.is_sat() {
                    summary.sat += 1;
                } else {
                    summary.unsat += 1;
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                summary.errors += 1;
            }
        }
    }

    println!("{summary}");
    Ok(summary)
}

/// Writes the clause count, the variable count, then the `Result:` line.
pub(crate) fn solve_and_report<W: Write>(
    out: &mut W,
    cnf: Cnf,
    common: &CommonOptions,
    parse_time: Duration,
) -> Result<(), CliError> {
    writeln!(out, "{}", cnf.num_clauses())?;
    writeln!(out, "{}", cnf.num_vars())?;

    let (result, _) = solve_cnf(cnf, common, parse_time)?;

    writeln!(out, "Result: {result};")?;
    Ok(())
}

/// Runs the solver, verifying and printing statistics as requested.
///
/// Returns the answer and the time spent searching.
pub(crate) fn solve_cnf(
    cnf: Cnf,
    common: &CommonOptions,
    parse_time: Duration,
) -> Result<(SolveResult, Duration), CliError> {
    let mut solver: Dpll = Dpll::with_config(cnf, common.solver_config());

    let time = Instant::now();
    let result = solver.solve()?;
    let elapsed = time.elapsed();

    if common.verify && result.is_sat() {
        verify_solution(solver.cnf(), solver.assignment())?;
    }

    if common.stats {
        print_stats(parse_time, elapsed, solver.cnf(), &solver.stats());
    }

    Ok((result, elapsed))
}

/// Checks the solver's final assignment against the formula.
pub(crate) fn verify_solution(cnf: &Cnf, assignment: &Assignment) -> Result<(), CliError> {
    let unsatisfied = cnf.unsatisfied_clauses(assignment).count();
    if unsatisfied > 0 {
        return Err(CliError::Verification { unsatisfied });
    }
    println!("Verified: true");
    Ok(())
}

/// Parses CNF text typed on the command line.
///
/// With a `p cnf` line the input is read as DIMACS. Without one, clauses
/// are read from the token stream, each `0` closing a clause, and the
/// variable count is the largest variable mentioned. A literal `\n` is
/// accepted as a line break.
pub(crate) fn parse_textual_cnf(input: &str) -> Result<Cnf, DimacsError> {
    let input = input.replace("\\n", "\n");

    if input
        .lines()
        .any(|line| line.split_whitespace().next() == Some("p"))
    {
        return parse_str(&input);
    }

    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut clause = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        if line.trim_start().starts_with('c') {
            continue;
        }
        for token in line.split_whitespace() {
            let lit = token.parse::<i32>().map_err(|_| DimacsError::InvalidToken {
                line: idx + 1,
                token: token.to_string(),
            })?;
            if lit == 0 {
                if !clause.is_empty() {
                    clauses.push(std::mem::take(&mut clause));
                }
            } else {
                clause.push(lit);
            }
        }
    }
    if !clause.is_empty() {
        clauses.push(clause);
    }

    let num_vars = clauses
        .iter()
        .flatten()
        .map(|lit| lit.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);

    Ok(Cnf::new(num_vars, clauses)?)
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(parse_time: Duration, elapsed: Duration, cnf: &Cnf, s: &SolutionStats) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.num_clauses());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]=========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line("Max decision depth", s.max_depth);
    match memory_usage() {
        Some((allocated, resident)) => {
            stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
            stat_line("Resident memory (MiB)", format!("{resident:.2}"));
        }
        None => stat_line("Memory usage (MiB)", "n/a"),
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("======================================================================");
}
