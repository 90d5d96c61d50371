#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The interface shared by solvers, and the values they report.

use crate::sat::cnf::Cnf;
use crate::sat::error::SolveError;
use std::fmt;

/// Outcome of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveResult {
    Sat,
    Unsat,
}

impl SolveResult {
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Sat)
    }
}

impl From<bool> for SolveResult {
    fn from(sat: bool) -> Self {
        if sat { Self::Sat } else { Self::Unsat }
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sat => write!(f, "SAT"),
            Self::Unsat => write!(f, "UNSAT"),
        }
    }
}

/// Counters gathered during one call to `solve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branches taken, counting both the true and the false branch.
    pub decisions: usize,
    pub conflicts: usize,
    /// Literals forced by unit propagation.
    pub propagations: usize,
    /// Deepest stack of open decisions reached.
    pub max_depth: usize,
}

/// Search limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    /// Maximum number of simultaneously open decisions. `None` means no
    /// limit beyond available memory.
    pub max_depth: Option<usize>,
}

impl SolverConfig {
    #[must_use]
    pub const fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }
}

pub trait Solver {
    /// Creates a solver for `cnf` with the default configuration.
    fn new(cnf: Cnf) -> Self;

    /// Decides the formula.
    ///
    /// # Errors
    ///
    /// [`SolveError`] if the search was cut short before an answer.
    fn solve(&mut self) -> Result<SolveResult, SolveError>;

    /// Statistics of the most recent `solve`.
    fn stats(&self) -> SolutionStats;
}
