//! This crate decides the satisfiability of Boolean formulas in conjunctive
//! normal form with the DPLL procedure: unit propagation plus chronological
//! backtracking over the lowest-indexed unassigned variable.
//!
//! ```
//! use dpll_sat::sat::dimacs::parse_str;
//! use dpll_sat::sat::dpll::Dpll;
//! use dpll_sat::sat::solver::{SolveResult, Solver};
//!
//! let cnf = parse_str("p cnf 2 2\n1 2 0\n-1 -2 0\n").unwrap();
//! let mut solver: Dpll = Solver::new(cnf);
//! assert_eq!(solver.solve(), Ok(SolveResult::Sat));
//! ```

/// The `sat` module holds the formula model, the DIMACS reader and the DPLL
/// search engine.
pub mod sat;
