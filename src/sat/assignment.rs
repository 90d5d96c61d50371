#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The per-variable truth assignment the search mutates in place.

use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use std::collections::TryReserveError;

/// The state of one variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    True,
    False,
}

impl VarState {
    #[must_use]
    pub const fn from_bool(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }

    #[must_use]
    pub const fn is_assigned(self) -> bool {
        !self.is_unassigned()
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        matches!(self, Self::Unassigned)
    }

    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    /// `Some(value)` for an assigned variable, `None` otherwise.
    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Unassigned => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }
}

/// Truth values for variables `1..=num_vars`.
///
/// Slot `0` exists so that variables index the table directly; it is
/// always `Unassigned` and is never reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, var: Variable) -> &Self::Output {
        &self.0[var as usize]
    }
}

impl Assignment {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    /// As [`Assignment::new`], but an allocation failure is returned
    /// instead of aborting.
    ///
    /// # Errors
    ///
    /// If a table for `num_vars` variables cannot be allocated.
    pub fn try_new(num_vars: usize) -> Result<Self, TryReserveError> {
        let len = num_vars.saturating_add(1);
        let mut states = Vec::new();
        states.try_reserve_exact(len)?;
        states.resize(len, VarState::Unassigned);
        Ok(Self(states))
    }

    /// Number of variables the assignment covers.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Sets every variable back to `Unassigned`.
    pub fn reset(&mut self) {
        self.0.fill(VarState::Unassigned);
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.index()] = VarState::from_bool(lit.polarity());
    }

    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.0.get(var as usize).and_then(|s| s.value())
    }

    /// The truth value of `lit` under this assignment, `None` while its
    /// variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|b| b == lit.polarity())
    }

    #[must_use]
    pub fn is_unassigned(&self, var: Variable) -> bool {
        self[var].is_unassigned()
    }

    /// Iterates over `(variable, state)` for every real variable.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, VarState)> + '_ {
        (1..).zip(self.0.iter().skip(1).copied())
    }

    #[must_use]
    pub fn num_assigned(&self) -> usize {
        self.iter().filter(|(_, s)| s.is_assigned()).count()
    }

    #[must_use]
    pub fn all_assigned(&self) -> bool {
        self.iter().all(|(_, s)| s.is_assigned())
    }
}
