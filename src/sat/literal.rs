#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variables and literals.
//!
//! A variable is a positive integer in `1..=num_vars`. A literal is a
//! variable together with a polarity, stored the way DIMACS writes it: a
//! non-zero signed integer whose sign is the polarity.

use core::ops::{Neg, Not};
use std::fmt;

/// A propositional variable. `0` is never a valid variable.
pub type Variable = u32;

/// A literal: a variable or its negation.
///
/// The invariant `self.0 != 0` holds for every value produced by the
/// constructors in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

/// An integer that cannot stand for a literal: `0`, or `i32::MIN`, which
/// has no negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotALiteral(pub i32);

impl Literal {
    /// Builds the literal of `var` with the given polarity (`true` for the
    /// positive literal).
    ///
    /// # Panics
    ///
    /// If `var` is `0` or does not fit in an `i32`.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        assert!(var != 0, "variable 0 does not exist");
        let var = i32::try_from(var).expect("literal variable overflowed");

        if polarity { Self(var) } else { Self(-var) }
    }

    /// The variable this literal refers to.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    /// `true` for a positive literal, `false` for a negated one.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.is_positive()
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// The variable index as a `usize`, for indexing per-variable tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.variable() as usize
    }

    /// The DIMACS integer of this literal.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Literal {
    type Error = NotALiteral;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value == 0 || value == i32::MIN {
            Err(NotALiteral(value))
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> Self {
        lit.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}
