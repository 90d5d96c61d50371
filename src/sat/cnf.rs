#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The formula: a variable count and an ordered list of clauses.
//!
//! A `Cnf` is validated when it is built and never mutated afterwards, so
//! the search can index per-variable tables by any literal it contains.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::error::FormulaError;
use crate::sat::literal::Literal;
use core::ops::Index;
use std::fmt;

/// Largest variable count a formula may declare: every variable must be
/// expressible as a positive `i32` literal.
pub const MAX_VARIABLES: usize = i32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    num_vars: usize,
    clauses: Vec<Clause>,
}

impl Cnf {
    /// Builds a formula over variables `1..=num_vars`.
    ///
    /// # Errors
    ///
    /// - [`FormulaError::ZeroLiteral`] if a clause contains `0`;
    /// - [`FormulaError::InvalidLiteral`] if a literal names a variable
    ///   outside `1..=num_vars`;
    /// - [`FormulaError::EmptyClause`] if a clause has no literals;
    /// - [`FormulaError::TooManyVariables`] if `num_vars` exceeds
    ///   [`MAX_VARIABLES`].
    pub fn new<C, L>(num_vars: usize, clauses: C) -> Result<Self, FormulaError>
    where
        C: IntoIterator<Item = L>,
        L: IntoIterator<Item = i32>,
    {
        if num_vars > MAX_VARIABLES {
            return Err(FormulaError::TooManyVariables {
                num_vars,
                max: MAX_VARIABLES,
            });
        }

        let clauses = clauses
            .into_iter()
            .enumerate()
            .map(|(idx, lits)| Self::clause_from_dimacs(idx, num_vars, lits))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { num_vars, clauses })
    }

    fn clause_from_dimacs<L: IntoIterator<Item = i32>>(
        idx: usize,
        num_vars: usize,
        lits: L,
    ) -> Result<Clause, FormulaError> {
        let clause = lits
            .into_iter()
            .map(|value| {
                let out_of_range = FormulaError::InvalidLiteral {
                    clause: idx,
                    literal: value,
                    num_vars,
                };
                match Literal::try_from(value) {
                    Ok(lit) if lit.index() <= num_vars => Ok(lit),
                    Err(_) if value == 0 => Err(FormulaError::ZeroLiteral { clause: idx }),
                    _ => Err(out_of_range),
                }
            })
            .collect::<Result<Clause, _>>()?;

        if clause.is_empty() {
            return Err(FormulaError::EmptyClause { clause: idx });
        }
        Ok(clause)
    }

    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Every clause has a literal that is true under `assignment`.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.iter().all(|c| c.is_satisfied(assignment))
    }

    #[must_use]
    pub fn count_satisfied(&self, assignment: &Assignment) -> usize {
        self.iter().filter(|c| c.is_satisfied(assignment)).count()
    }

    /// Clauses with no true literal under `assignment`, in formula order.
    pub fn unsatisfied_clauses<'a>(
        &'a self,
        assignment: &'a Assignment,
    ) -> impl Iterator<Item = &'a Clause> + 'a {
        self.iter().filter(move |c| !c.is_satisfied(assignment))
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

/// Renders the formula as a DIMACS document.
impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let cnf = Cnf::new(3, vec![vec![1, -2], vec![3]]).unwrap();
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_literals(), 3);
        assert!(cnf[1].is_unit());
    }

    #[test]
    fn test_empty_formula() {
        let cnf = Cnf::new(0, Vec::<Vec<i32>>::new()).unwrap();
        assert!(cnf.is_empty());
        assert!(cnf.is_satisfied_by(&Assignment::new(0)));
    }

    #[test]
    fn test_literal_out_of_range() {
        let err = Cnf::new(2, vec![vec![1, 2], vec![-3]]).unwrap_err();
        assert_eq!(
            err,
            FormulaError::InvalidLiteral {
                clause: 1,
                literal: -3,
                num_vars: 2
            }
        );
    }

    #[test]
    fn test_zero_literal() {
        let err = Cnf::new(2, vec![vec![1, 0, 2]]).unwrap_err();
        assert_eq!(err, FormulaError::ZeroLiteral { clause: 0 });
    }

    #[test]
    fn test_most_negative_literal_is_out_of_range() {
        let err = Cnf::new(3, vec![vec![i32::MIN]]).unwrap_err();
        assert_eq!(
            err,
            FormulaError::InvalidLiteral {
                clause: 0,
                literal: i32::MIN,
                num_vars: 3
            }
        );
    }

    #[test]
    fn test_empty_clause() {
        let err = Cnf::new(2, vec![vec![1], vec![]]).unwrap_err();
        assert_eq!(err, FormulaError::EmptyClause { clause: 1 });
    }

    #[test]
    fn test_too_many_variables() {
        let err = Cnf::new(MAX_VARIABLES + 1, Vec::<Vec<i32>>::new()).unwrap_err();
        assert!(matches!(err, FormulaError::TooManyVariables { .. }));
    }

    #[test]
    fn test_satisfaction_queries() {
        let cnf = Cnf::new(2, vec![vec![1, 2], vec![-1], vec![-2]]).unwrap();
        let mut a = Assignment::new(2);
        a.assign(Literal::new(1, false));
        a.assign(Literal::new(2, true));

        assert!(!cnf.is_satisfied_by(&a));
        assert_eq!(cnf.count_satisfied(&a), 2);

        let unsat: Vec<Vec<i32>> = cnf.unsatisfied_clauses(&a).map(Vec::from).collect();
        assert_eq!(unsat, vec![vec![-2]]);
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = Cnf::new(3, vec![vec![1, -3], vec![2]]).unwrap();
        assert_eq!(cnf.to_string(), "p cnf 3 2\n1 -3 0\n2 0\n");
    }
}
