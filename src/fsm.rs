//! Capabilities the checkers are written against.
//!
//! The checkers never look inside a state set: every operation goes through
//! the [`StateSpace`], the same way every BDD operation goes through the
//! manager. A backend picks the set representation ([`Ref`] for
//! [`SymbolicModel`], [`BitSet`] for [`ExplicitFsm`]).
//!
//! [`Ref`]: crate::reference::Ref
//! [`SymbolicModel`]: crate::symbolic::SymbolicModel
//! [`BitSet`]: crate::bitset::BitSet
//! [`ExplicitFsm`]: crate::explicit::ExplicitFsm

use std::fmt::{self, Debug, Display};

use num_bigint::BigUint;

use crate::error::Result;
use crate::formula::Formula;
use crate::value::Value;

/// Set algebra over the states of a finite model.
///
/// All sets are subsets of [`StateSpace::universe`]; complement is taken
/// relative to it.
pub trait StateSpace {
    type Set: Clone + Debug;

    fn empty(&self) -> Self::Set;
    fn universe(&self) -> Self::Set;

    fn union(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;
    fn intersection(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;
    fn difference(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;

    fn complement(&self, a: &Self::Set) -> Self::Set {
        self.difference(&self.universe(), a)
    }

    fn is_empty(&self, a: &Self::Set) -> bool;

    fn is_subset(&self, a: &Self::Set, b: &Self::Set) -> bool {
        self.is_empty(&self.difference(a, b))
    }

    fn intersects(&self, a: &Self::Set, b: &Self::Set) -> bool {
        !self.is_empty(&self.intersection(a, b))
    }

    /// Set equality.
    fn same(&self, a: &Self::Set, b: &Self::Set) -> bool {
        self.is_subset(a, b) && self.is_subset(b, a)
    }

    /// Number of states in `a`.
    fn cardinality(&self, a: &Self::Set) -> BigUint;

    /// Number of states in the universe: no monotone fixpoint over this
    /// space needs more iterations (plus one).
    fn state_bound(&self) -> BigUint {
        self.cardinality(&self.universe())
    }
}

/// A finite transition system with its images.
pub trait SymbolicFsm: StateSpace {
    fn initial_states(&self) -> Self::Set;

    /// States with at least one successor in `s`.
    fn pre(&self, s: &Self::Set) -> Self::Set;

    /// Successors of the states in `s`.
    fn post(&self, s: &Self::Set) -> Self::Set;

    /// States satisfying a boolean formula.
    fn evaluate(&self, formula: &Formula) -> Result<Self::Set>;
}

/// A finite run, optionally ending in a loop back to `loop_start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub states: Vec<Vec<(String, Value)>>,
    pub loop_start: Option<usize>,
}

impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.states.iter().enumerate() {
            if self.loop_start == Some(i) {
                writeln!(f, "-- loop starts here")?;
            }
            writeln!(f, "-> State {} <-", i + 1)?;
            for (name, value) in state {
                writeln!(f, "  {} = {}", name, value)?;
            }
        }
        Ok(())
    }
}

/// Produces counterexamples for violated properties.
pub trait Explainer<M: ?Sized> {
    fn explain(&self, fsm: &M, formula: &Formula) -> Option<Trace>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_display() {
        let trace = Trace {
            states: vec![
                vec![("x".to_string(), Value::Bool(false))],
                vec![("x".to_string(), Value::Bool(true))],
            ],
            loop_start: Some(1),
        };
        assert_eq!(
            trace.to_string(),
            "-> State 1 <-\n  x = FALSE\n-- loop starts here\n-> State 2 <-\n  x = TRUE\n"
        );
    }
}
