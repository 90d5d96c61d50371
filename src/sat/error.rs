//! Error types for formula construction, DIMACS parsing and search.

use std::io;
use thiserror::Error;

/// A clause list that does not describe a well-formed formula.
///
/// `clause` is the zero-based position of the offending clause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("clause {clause} contains the literal 0")]
    ZeroLiteral { clause: usize },

    #[error("clause {clause} contains literal {literal}, outside variables 1..={num_vars}")]
    InvalidLiteral {
        clause: usize,
        literal: i32,
        num_vars: usize,
    },

    #[error("clause {clause} is empty")]
    EmptyClause { clause: usize },

    #[error("{num_vars} variables exceed the supported maximum of {max}")]
    TooManyVariables { num_vars: usize, max: usize },
}

/// Failure to read a DIMACS CNF document. Line numbers are one-based.
#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no `p cnf` header before the first clause")]
    MissingHeader,

    #[error("line {line}: invalid header `{content}`, expected `p cnf <variables> <clauses>`")]
    InvalidHeader { line: usize, content: String },

    #[error("line {line}: second `p` header")]
    DuplicateHeader { line: usize },

    #[error("line {line}: `{token}` is not an integer literal")]
    InvalidToken { line: usize, token: String },

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

/// Failure of a search that did not reach SAT or UNSAT.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("search depth exceeded the limit of {limit} decisions")]
    SearchDepthExceeded { limit: usize },

    #[error("cannot allocate search state for {num_vars} variables")]
    OutOfMemory { num_vars: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = FormulaError::InvalidLiteral {
            clause: 2,
            literal: -9,
            num_vars: 4,
        };
        assert_eq!(
            e.to_string(),
            "clause 2 contains literal -9, outside variables 1..=4"
        );

        let e = DimacsError::from(FormulaError::EmptyClause { clause: 0 });
        assert_eq!(e.to_string(), "clause 0 is empty");

        let e = SolveError::SearchDepthExceeded { limit: 3 };
        assert_eq!(
            e.to_string(),
            "search depth exceeded the limit of 3 decisions"
        );

        let e = SolveError::OutOfMemory { num_vars: 7 };
        assert_eq!(e.to_string(), "cannot allocate search state for 7 variables");
    }
}
