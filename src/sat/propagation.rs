#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation by repeated full scans of the clause list.
//!
//! Each pass visits every clause in formula order. A clause with a true
//! literal is skipped; a clause with no unassigned literal left is a
//! conflict; a clause with exactly one unassigned literal forces that
//! literal. Passes repeat until one of them forces nothing. Cost is
//! `passes * clauses * clause length`, with no watch lists.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::trail::{Reason, Trail};

/// A clause found with every literal false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub clause: usize,
}

/// How a clause stands under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseStatus {
    Satisfied,
    Conflicting,
    Unit(Literal),
    Pending,
}

fn clause_status(cnf: &Cnf, idx: usize, assignment: &Assignment) -> ClauseStatus {
    let mut unassigned = None;
    let mut num_unassigned = 0usize;

    for &lit in cnf[idx].iter() {
        match assignment.literal_value(lit) {
            Some(true) => return ClauseStatus::Satisfied,
            Some(false) => {}
            None => {
                num_unassigned += 1;
                unassigned.get_or_insert(lit);
            }
        }
    }

    match (num_unassigned, unassigned) {
        (0, _) => ClauseStatus::Conflicting,
        (1, Some(lit)) => ClauseStatus::Unit(lit),
        _ => ClauseStatus::Pending,
    }
}

/// The propagator. Holds only a running count of forced literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitSearch {
    propagations: usize,
}

impl UnitSearch {
    #[must_use]
    pub const fn new() -> Self {
        Self { propagations: 0 }
    }

    /// Total literals forced since construction or the last [`reset`](Self::reset).
    #[must_use]
    pub const fn propagations(&self) -> usize {
        self.propagations
    }

    pub fn reset(&mut self) {
        self.propagations = 0;
    }

    /// Propagates to a fixpoint, pushing each forced literal on `trail`.
    ///
    /// Stops at the first conflicting clause without undoing anything;
    /// rolling back is the caller's job.
    ///
    /// # Errors
    ///
    /// [`Conflict`] naming the first clause found with every literal false.
    pub fn propagate(
        &mut self,
        cnf: &Cnf,
        assignment: &mut Assignment,
        trail: &mut Trail,
    ) -> Result<(), Conflict> {
        let mut changed = true;

        while changed {
            changed = false;

            for idx in 0..cnf.num_clauses() {
                match clause_status(cnf, idx, assignment) {
                    ClauseStatus::Satisfied | ClauseStatus::Pending => {}
                    ClauseStatus::Conflicting => {
                        log::debug!("conflict in clause {idx}");
                        return Err(Conflict { clause: idx });
                    }
                    ClauseStatus::Unit(lit) => {
                        log::trace!("clause {idx} forces {lit}");
                        trail.push(assignment, lit, Reason::Propagated(idx));
                        self.propagations += 1;
                        changed = true;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(num_vars: usize, clauses: Vec<Vec<i32>>) -> (Cnf, Assignment, Trail) {
        let cnf = Cnf::new(num_vars, clauses).unwrap();
        (cnf, Assignment::new(num_vars), Trail::new())
    }

    #[test]
    fn test_unit_chain() {
        let (cnf, mut a, mut trail) = setup(3, vec![vec![-1, 2], vec![-2, 3], vec![1]]);
        let mut p = UnitSearch::new();

        assert_eq!(p.propagate(&cnf, &mut a, &mut trail), Ok(()));
        assert!(a.all_assigned());
        assert_eq!(a.var_value(3), Some(true));
        assert_eq!(p.propagations(), 3);
        assert_eq!(trail[0].lit, Literal::new(1, true));
        assert_eq!(trail[0].reason, Reason::Propagated(2));
    }

    #[test]
    fn test_conflict_stops_scan() {
        let (cnf, mut a, mut trail) = setup(2, vec![vec![1], vec![-1], vec![2]]);
        let mut p = UnitSearch::new();

        assert_eq!(
            p.propagate(&cnf, &mut a, &mut trail),
            Err(Conflict { clause: 1 })
        );
        // Clause 2 is never reached and nothing is rolled back.
        assert!(a.is_unassigned(2));
        assert_eq!(a.var_value(1), Some(true));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_pending_clauses_untouched() {
        let (cnf, mut a, mut trail) = setup(3, vec![vec![1, 2], vec![2, 3]]);
        let mut p = UnitSearch::new();

        assert_eq!(p.propagate(&cnf, &mut a, &mut trail), Ok(()));
        assert_eq!(a.num_assigned(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_duplicate_literal_is_not_unit() {
        let (cnf, mut a, mut trail) = setup(1, vec![vec![1, 1]]);
        let mut p = UnitSearch::new();

        assert_eq!(p.propagate(&cnf, &mut a, &mut trail), Ok(()));
        assert!(a.is_unassigned(1));
    }

    #[test]
    fn test_fixpoint_is_stable() {
        let (cnf, mut a, mut trail) =
            setup(4, vec![vec![1], vec![-1, 2], vec![3, 4], vec![-2, -3, 4]]);
        let mut p = UnitSearch::new();

        assert_eq!(p.propagate(&cnf, &mut a, &mut trail), Ok(()));
        let before = a.clone();
        let len = trail.len();

        assert_eq!(p.propagate(&cnf, &mut a, &mut trail), Ok(()));
        assert_eq!(a, before);
        assert_eq!(trail.len(), len);
    }
}
