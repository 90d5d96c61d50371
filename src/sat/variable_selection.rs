#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;

/// Chooses the next decision variable.
pub trait VariableSelection {
    /// An unassigned variable, or `None` once every variable is assigned.
    fn pick(&self, assignment: &Assignment) -> Option<Variable>;
}

/// Lowest-indexed unassigned variable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        assignment
            .iter()
            .find(|(_, state)| state.is_unassigned())
            .map(|(var, _)| var)
    }
}
