#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF (Conjunctive Normal Form) file format.
//!
//! The accepted format:
//! - Comment lines starting with 'c', and blank lines, are skipped anywhere.
//! - The first other line is the problem line `p cnf <num_vars> <num_clauses>`.
//! - Every following line is one clause: integers up to a terminating `0`.
//!   Positive integers are variables, negative ones negated variables.
//!   Anything after the `0` is ignored and a missing `0` is tolerated.
//!   A line holding only `0` is skipped.
//! - A line starting with '%' ends the data (used by some benchmark sets).
//!
//! The clause count on the problem line is informational: a mismatch is
//! logged, not rejected. The variable count bounds every literal, which
//! [`Cnf::new`] checks.

use crate::sat::cnf::Cnf;
use crate::sat::error::DimacsError;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// The counts declared by a `p cnf` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub num_vars: usize,
    pub num_clauses: usize,
}

fn parse_header(line_no: usize, line: &str) -> Result<Header, DimacsError> {
    let invalid = || DimacsError::InvalidHeader {
        line: line_no,
        content: line.to_string(),
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    let ["p", "cnf", vars, clauses] = parts.as_slice() else {
        return Err(invalid());
    };

    Ok(Header {
        num_vars: vars.parse().map_err(|_| invalid())?,
        num_clauses: clauses.parse().map_err(|_| invalid())?,
    })
}

fn parse_clause<'a, I: Iterator<Item = &'a str>>(
    line_no: usize,
    tokens: I,
) -> Result<Vec<i32>, DimacsError> {
    let mut literals = Vec::new();

    for token in tokens {
        let lit = token.parse::<i32>().map_err(|_| DimacsError::InvalidToken {
            line: line_no,
            token: token.to_string(),
        })?;
        if lit == 0 {
            break;
        }
        literals.push(lit);
    }

    Ok(literals)
}

/// Parses DIMACS formatted data from a `BufRead` source.
///
/// # Errors
///
/// - [`DimacsError::Io`] if reading fails;
/// - [`DimacsError::MissingHeader`] if a clause comes before the problem
///   line, or there is no problem line;
/// - [`DimacsError::InvalidHeader`] / [`DimacsError::DuplicateHeader`] for
///   a malformed or repeated problem line;
/// - [`DimacsError::InvalidToken`] for a clause token that is not an integer;
/// - [`DimacsError::Formula`] if a literal is out of range for the declared
///   variable count.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf, DimacsError> {
    let mut header: Option<Header> = None;
    let mut clauses: Vec<Vec<i32>> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek().copied() {
            None => {}
            Some(tok) if tok.starts_with('c') => {}
            Some(tok) if tok.starts_with('%') => break,
            Some("p") => {
                if header.is_some() {
                    return Err(DimacsError::DuplicateHeader { line: line_no });
                }
                let h = parse_header(line_no, &line)?;
                log::debug!(
                    "header: {} variables, {} clauses",
                    h.num_vars,
                    h.num_clauses
                );
                header = Some(h);
            }
            Some(_) => {
                if header.is_none() {
                    return Err(DimacsError::MissingHeader);
                }
                let clause = parse_clause(line_no, parts)?;
                if !clause.is_empty() {
                    clauses.push(clause);
                }
            }
        }
    }

    let header = header.ok_or(DimacsError::MissingHeader)?;
    if header.num_clauses != clauses.len() {
        log::warn!(
            "header declares {} clauses, found {}",
            header.num_clauses,
            clauses.len()
        );
    }

    Ok(Cnf::new(header.num_vars, clauses)?)
}

/// Parses a DIMACS document held in memory.
///
/// # Errors
///
/// As [`parse_dimacs`].
pub fn parse_str(input: &str) -> Result<Cnf, DimacsError> {
    parse_dimacs(input.as_bytes())
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// [`DimacsError::Io`] if the file cannot be opened, otherwise as
/// [`parse_dimacs`].
pub fn parse_file<P: AsRef<Path>>(file_path: P) -> Result<Cnf, DimacsError> {
    let file = File::open(file_path)?;
    parse_dimacs(io::BufReader::new(file))
}
