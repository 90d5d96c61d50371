#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) search engine.
//!
//! The engine alternates two steps:
//! 1.  **Unit propagation:** every clause with exactly one unassigned
//!     literal and no true literal forces that literal, repeated to a
//!     fixpoint (see [`UnitSearch`]). A clause with every literal false is
//!     a conflict.
//! 2.  **Decision:** at a conflict-free fixpoint with variables still
//!     unassigned, the lowest-indexed one is set to true; if that subtree
//!     fails it is set to false; if both fail the failure is passed up.
//!
//! Every assignment, decided or forced, goes on a [`Trail`]. Before a
//! branch is tried the trail length is recorded, and a failed branch is
//! undone by popping back to that length, so the sibling branch starts from
//! exactly the assignment that existed before the decision.
//!
//! Open decisions are kept on an explicit stack of frames rather than
//! the native call stack, so deep instances are bounded by memory, or by
//! [`SolverConfig::max_depth`] when one is set.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::error::SolveError;
use crate::sat::literal::{Literal, Variable};
use crate::sat::propagation::UnitSearch;
use crate::sat::solver::{SolutionStats, SolveResult, Solver, SolverConfig};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::{FixedOrder, VariableSelection};
use std::collections::TryReserveError;

/// The branch of a decision currently being explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    True,
    False,
}

/// One open case split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    var: Variable,
    /// Trail length before the decision literal was pushed.
    mark: usize,
    branch: Branch,
}

/// A DPLL solver over a single formula.
///
/// The formula is read-only for the solver's lifetime; the assignment and
/// trail are rebuilt by every call to [`Solver::solve`]. They are allocated
/// on the first [`Dpll::reset`], not at construction, so a header declaring
/// a huge variable count cannot exhaust memory before the search reports it.
#[derive(Debug, Clone)]
pub struct Dpll<V: VariableSelection = FixedOrder> {
    cnf: Cnf,
    assignment: Assignment,
    trail: Trail,
    selector: V,
    propagator: UnitSearch,
    config: SolverConfig,
    stats: SolutionStats,
}

impl<V: VariableSelection + Default> Solver for Dpll<V> {
    fn new(cnf: Cnf) -> Self {
        Self::with_config(cnf, SolverConfig::default())
    }

    /// Resets the assignment to all-unassigned, then searches.
    ///
    /// On `Sat` the satisfying assignment is left in place and can be
    /// inspected through [`Dpll::assignment`].
    fn solve(&mut self) -> Result<SolveResult, SolveError> {
        self.reset()?;

        log::debug!(
            "solving {} variables, {} clauses",
            self.cnf.num_vars(),
            self.cnf.num_clauses()
        );

        let result = self.search();

        match &result {
            Ok(answer) => {
                debug_assert!(
                    !answer.is_sat() || self.cnf.is_satisfied_by(&self.assignment),
                    "SAT reported for an assignment that falsifies the formula"
                );
                log::debug!("{answer} after {:?}", self.stats);
            }
            Err(e) => log::debug!("search aborted: {e}"),
        }

        result
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<V: VariableSelection + Default> Dpll<V> {
    #[must_use]
    pub fn with_config(cnf: Cnf, config: SolverConfig) -> Self {
        Self::from_parts(cnf, V::default(), config)
    }
}

impl<V: VariableSelection> Dpll<V> {
    #[must_use]
    pub fn from_parts(cnf: Cnf, selector: V, config: SolverConfig) -> Self {
        Self {
            assignment: Assignment::default(),
            trail: Trail::new(),
            cnf,
            selector,
            propagator: UnitSearch::new(),
            config,
            stats: SolutionStats::default(),
        }
    }

    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// The current assignment: after a `Sat` answer, a satisfying one.
    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    #[must_use]
    pub const fn trail(&self) -> &Trail {
        &self.trail
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Sets every variable back to unassigned and clears the trail and the
    /// statistics, allocating room for the formula's variables if needed.
    ///
    /// [`Solver::solve`] calls this first; call it directly before driving
    /// [`Dpll::propagate`] by hand.
    ///
    /// # Errors
    ///
    /// [`SolveError::OutOfMemory`] if the search state cannot be allocated.
    pub fn reset(&mut self) -> Result<(), SolveError> {
        let num_vars = self.cnf.num_vars();
        let out_of_memory = |_: TryReserveError| SolveError::OutOfMemory { num_vars };

        self.trail.clear();
        self.trail.try_reserve(num_vars).map_err(out_of_memory)?;
        if self.assignment.num_vars() == num_vars {
            self.assignment.reset();
        } else {
            self.assignment = Assignment::try_new(num_vars).map_err(out_of_memory)?;
        }

        self.propagator.reset();
        self.stats = SolutionStats::default();
        Ok(())
    }

    /// Runs unit propagation to a fixpoint on the current assignment.
    ///
    /// Returns `false` on conflict. Forced literals stay assigned either
    /// way; they sit on the trail for the search to undo.
    pub fn propagate(&mut self) -> bool {
        let outcome = self
            .propagator
            .propagate(&self.cnf, &mut self.assignment, &mut self.trail);
        self.stats.propagations = self.propagator.propagations();

        match outcome {
            Ok(()) => true,
            Err(_) => {
                self.stats.conflicts += 1;
                false
            }
        }
    }

    /// The next decision variable, `None` when every variable is assigned.
    #[must_use]
    pub fn pick_unassigned(&self) -> Option<Variable> {
        self.selector.pick(&self.assignment)
    }

    fn decide(&mut self, var: Variable, value: bool, depth: usize) {
        self.stats.decisions += 1;
        let lit = Literal::new(var, value);
        log::trace!("decide {lit} at depth {depth}");
        self.trail.push(&mut self.assignment, lit, Reason::Decision);
    }

    fn search(&mut self) -> Result<SolveResult, SolveError> {
        let mut frames: Vec<Frame> = Vec::new();

        loop {
            if self.propagate() {
                let Some(var) = self.pick_unassigned() else {
                    return Ok(SolveResult::Sat);
                };

                if let Some(limit) = self.config.max_depth {
                    if frames.len() >= limit {
                        return Err(SolveError::SearchDepthExceeded { limit });
                    }
                }

                frames.push(Frame {
                    var,
                    mark: self.trail.len(),
                    branch: Branch::True,
                });
                self.stats.max_depth = self.stats.max_depth.max(frames.len());
                self.decide(var, true, frames.len());
                continue;
            }

            // Conflict: unwind to the innermost decision with an untried branch.
            loop {
                let Some(frame) = frames.last_mut() else {
                    return Ok(SolveResult::Unsat);
                };

                let undone = self.trail.backtrack_to(&mut self.assignment, frame.mark);
                log::trace!("backtrack over {} ({undone} literals undone)", frame.var);

                match frame.branch {
                    Branch::True => {
                        frame.branch = Branch::False;
                        let var = frame.var;
                        let depth = frames.len();
                        self.decide(var, false, depth);
                        break;
                    }
                    Branch::False => {
                        frames.pop();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::assignment::VarState;
    use crate::sat::cnf::MAX_VARIABLES;

    fn solver(num_vars: usize, clauses: Vec<Vec<i32>>) -> Dpll {
        let mut s = Dpll::new(Cnf::new(num_vars, clauses).unwrap());
        s.reset().unwrap();
        s
    }

    /// Pigeonhole formula: `pigeons` pigeons into `holes` holes.
    fn pigeonhole(pigeons: usize, holes: usize) -> Cnf {
        let var = |p: usize, h: usize| i32::try_from(p * holes + h + 1).unwrap();
        let mut clauses: Vec<Vec<i32>> = (0..pigeons)
            .map(|p| (0..holes).map(|h| var(p, h)).collect())
            .collect();

        for h in 0..holes {
            for p in 0..pigeons {
                for q in p + 1..pigeons {
                    clauses.push(vec![-var(p, h), -var(q, h)]);
                }
            }
        }
        Cnf::new(pigeons * holes, clauses).unwrap()
    }

    fn brute_force(cnf: &Cnf) -> bool {
        let n = cnf.num_vars();
        (0u32..1 << n).any(|bits| {
            let mut a = Assignment::new(n);
            for v in 1..=n {
                let var = Variable::try_from(v).unwrap();
                a.assign(Literal::new(var, bits & (1 << (v - 1)) != 0));
            }
            cnf.is_satisfied_by(&a)
        })
    }

    #[test]
    fn test_vacuous_truth() {
        let mut s = solver(0, vec![]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert_eq!(s.stats().decisions, 0);
    }

    #[test]
    fn test_unit_clause_needs_no_decision() {
        let mut s = solver(1, vec![vec![1]]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert_eq!(s.assignment()[1], VarState::True);
        assert_eq!(s.stats().decisions, 0);
        assert_eq!(s.stats().propagations, 1);
    }

    #[test]
    fn test_direct_contradiction() {
        let mut s = solver(1, vec![vec![1], vec![-1]]);
        assert_eq!(s.solve(), Ok(SolveResult::Unsat));
        assert_eq!(s.stats().decisions, 0);
        assert_eq!(s.stats().conflicts, 1);
    }

    #[test]
    fn test_contradiction_found_on_second_clause() {
        let mut s = solver(1, vec![vec![1], vec![-1]]);
        assert!(!s.propagate());
        assert_eq!(s.assignment()[1], VarState::True);
    }

    #[test]
    fn test_branches_true_first() {
        let mut s = solver(2, vec![vec![1, 2], vec![-1, -2]]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));

        assert_eq!(s.trail()[0].lit, Literal::new(1, true));
        assert_eq!(s.trail()[0].reason, Reason::Decision);
        assert_eq!(s.assignment()[1], VarState::True);
        assert_eq!(s.assignment()[2], VarState::False);
        assert_eq!(s.stats().decisions, 1);
    }

    #[test]
    fn test_false_branch_when_true_fails() {
        let mut s = solver(2, vec![vec![-1, 2], vec![-1, -2], vec![1, 2]]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert_eq!(s.assignment()[1], VarState::False);
        assert_eq!(s.assignment()[2], VarState::True);
        assert_eq!(s.stats().decisions, 2);
        assert_eq!(s.stats().conflicts, 1);
    }

    #[test]
    fn test_lowest_unassigned_after_propagation() {
        let mut s = solver(5, vec![vec![1], vec![2], vec![-3], vec![4, 5], vec![-4, 5, 3]]);
        assert!(s.propagate());
        assert_eq!(s.pick_unassigned(), Some(4));
    }

    #[test]
    fn test_pick_unassigned_none_when_complete() {
        let mut s = solver(2, vec![vec![1], vec![-2]]);
        assert!(s.propagate());
        assert_eq!(s.pick_unassigned(), None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut s = solver(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3], vec![-1, -3, 2]]);
        let first = s.solve();
        let first_stats = s.stats();
        let second = s.solve();

        assert_eq!(first, second);
        assert_eq!(first_stats, s.stats());

        let mut s = Dpll::<FixedOrder>::new(pigeonhole(3, 2));
        assert_eq!(s.solve(), Ok(SolveResult::Unsat));
        assert_eq!(s.solve(), Ok(SolveResult::Unsat));
    }

    #[test]
    fn test_propagation_fixpoint_is_stable() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let clauses = random_clauses(&mut rng, 6, 12);
            let mut s = solver(6, clauses);
            if s.propagate() {
                let before = s.assignment().clone();
                let len = s.trail().len();
                assert!(s.propagate());
                assert_eq!(s.assignment(), &before);
                assert_eq!(s.trail().len(), len);
            }
        }
    }

    #[test]
    fn test_backtrack_undoes_propagated_literals() {
        // x1 = true forces x2 = true and then conflicts. If x2 stayed true
        // after backtracking, x1 = false would conflict on {1, -2} too.
        let mut s = solver(2, vec![vec![-1, 2], vec![-1, -2], vec![1, -2]]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert_eq!(s.assignment()[1], VarState::False);
        assert_eq!(s.assignment()[2], VarState::False);
    }

    #[test]
    fn test_pigeonhole() {
        let mut s = Dpll::<FixedOrder>::new(pigeonhole(4, 3));
        assert_eq!(s.solve(), Ok(SolveResult::Unsat));

        let mut s = Dpll::<FixedOrder>::new(pigeonhole(3, 3));
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert!(s.cnf().is_satisfied_by(s.assignment()));
    }

    #[test]
    fn test_agrees_with_brute_force() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..200 {
            let num_vars = rng.usize(1..=7);
            let num_clauses = rng.usize(1..=30);
            let cnf = Cnf::new(num_vars, random_clauses(&mut rng, num_vars, num_clauses)).unwrap();

            let mut s = Dpll::<FixedOrder>::new(cnf.clone());
            let answer = s.solve().unwrap();

            assert_eq!(answer.is_sat(), brute_force(&cnf), "{cnf}");
            if answer.is_sat() {
                assert!(cnf.is_satisfied_by(s.assignment()), "{cnf}");
            }
        }
    }

    #[test]
    fn test_depth_limit() {
        let cnf = Cnf::new(2, vec![vec![1, 2]]).unwrap();
        let mut s = Dpll::<FixedOrder>::with_config(cnf, SolverConfig::default().with_max_depth(0));
        assert_eq!(
            s.solve(),
            Err(SolveError::SearchDepthExceeded { limit: 0 })
        );

        let cnf = Cnf::new(1, vec![vec![1]]).unwrap();
        let mut s = Dpll::<FixedOrder>::with_config(cnf, SolverConfig::default().with_max_depth(0));
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
    }

    #[test]
    fn test_huge_variable_count_is_not_allocated_up_front() {
        let cnf = Cnf::new(MAX_VARIABLES, vec![vec![1]]).unwrap();
        let s = Dpll::<FixedOrder>::new(cnf);
        assert_eq!(s.assignment().num_vars(), 0);
        assert!(s.trail().is_empty());
        assert_eq!(s.stats(), SolutionStats::default());
    }

    #[test]
    fn test_reset_reuses_state() {
        let mut s = solver(3, vec![vec![1], vec![-1, 2]]);
        assert_eq!(s.assignment().num_vars(), 3);
        assert!(s.propagate());
        assert_eq!(s.trail().len(), 2);

        s.reset().unwrap();
        assert!(s.trail().is_empty());
        assert_eq!(s.assignment().num_assigned(), 0);
        assert_eq!(s.stats().propagations, 0);
    }

    #[test]
    fn test_max_depth_recorded() {
        // Satisfied after the first decision, but every variable still gets one.
        let mut s = solver(3, vec![vec![1, 2, 3]]);
        assert_eq!(s.solve(), Ok(SolveResult::Sat));
        assert_eq!(s.stats().max_depth, 3);
        assert_eq!(s.stats().decisions, 3);

        let mut s = Dpll::<FixedOrder>::new(pigeonhole(3, 2));
        assert_eq!(s.solve(), Ok(SolveResult::Unsat));
        assert!(s.stats().max_depth >= 1);
        assert!(s.stats().max_depth <= 6);
    }

    fn random_clauses(rng: &mut fastrand::Rng, num_vars: usize, num_clauses: usize) -> Vec<Vec<i32>> {
        let max = i32::try_from(num_vars).unwrap();
        (0..num_clauses)
            .map(|_| {
                (0..rng.usize(1..=3))
                    .map(|_| {
                        let v = rng.i32(1..=max);
                        if rng.bool() { v } else { -v }
                    })
                    .collect()
            })
            .collect()
    }
}
