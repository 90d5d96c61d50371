#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The ordered log of assignments made during search.
//!
//! Decisions and propagated literals are both pushed here, so undoing a
//! subtree is a matter of popping back to the length the trail had when
//! the subtree's decision was taken.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use std::collections::TryReserveError;
use std::ops::Index;

/// Why a literal was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    #[default]
    Decision,
    /// Forced by the clause at this index.
    Propagated(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Step {
    pub lit: Literal,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    t: Vec<Step>,
}

impl Index<usize> for Trail {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl Trail {
    #[must_use]
    pub const fn new() -> Self {
        Self { t: Vec::new() }
    }

    /// Makes room for `additional` more steps without reallocating.
    ///
    /// # Errors
    ///
    /// If the allocation fails.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.t.try_reserve(additional)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.t.iter()
    }

    /// Assigns `lit` and records it.
    pub fn push(&mut self, assignment: &mut Assignment, lit: Literal, reason: Reason) {
        assignment.assign(lit);
        self.t.push(Step { lit, reason });
    }

    /// Unassigns every literal pushed after the trail had length `mark`,
    /// newest first. Returns how many literals were undone.
    pub fn backtrack_to(&mut self, assignment: &mut Assignment, mark: usize) -> usize {
        if mark >= self.t.len() {
            return 0;
        }

        let undone = self.t.len() - mark;
        for step in self.t.drain(mark..).rev() {
            assignment.unassign(step.lit.variable());
        }
        undone
    }

    pub fn clear(&mut self) {
        self.t.clear();
    }
}
