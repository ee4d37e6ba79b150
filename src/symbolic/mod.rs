//! BDD-backed transition systems.
//!
//! States are assignments to finite-domain variables, encoded in binary
//! (see [`encoding`]). A set of states is the BDD of its characteristic
//! function over the present-state bits; the transition relation `T(s, s')`
//! is a BDD over present and next bits.
//!
//! Images are relational products:
//!
//! - `post(S) = (∃s. S(s) ∧ T(s, s'))[s' := s]`
//! - `pre(S) = ∃s'. T(s, s') ∧ S(s')`

pub mod compile;
pub mod encoding;

use std::collections::HashMap;

use log::debug;
use num_bigint::BigUint;

pub use self::compile::Rhs;
pub use self::encoding::{Domain, Encoding, Frame, StateVar};
use self::compile::Compiler;
use crate::bdd::Bdd;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::fsm::{StateSpace, SymbolicFsm};
use crate::reference::Ref;

/// Builder of a [`SymbolicModel`].
///
/// Both the initial states and the transition relation must be given
/// (directly, as constraints, or through assignments) before
/// [`TransitionSystem::finish`].
#[derive(Debug)]
pub struct TransitionSystem {
    enc: Encoding,
    initial: Option<Ref>,
    transition: Option<Ref>,
    invariant: Ref,
}

impl Default for TransitionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionSystem {
    pub fn new() -> Self {
        let enc = Encoding::new();
        let invariant = enc.bdd.one;
        Self {
            enc,
            initial: None,
            transition: None,
            invariant,
        }
    }

    pub fn bdd(&self) -> &Bdd {
        &self.enc.bdd
    }

    pub fn declare(&mut self, name: &str, domain: Domain) -> Result<()> {
        self.enc.declare(name, domain)
    }

    /// Compile a state predicate.
    pub fn compile_state(&self, formula: &Formula) -> Result<Ref> {
        Compiler::state(&self.enc).compile_bool(formula, Frame::Current)
    }

    /// Compile a transition constraint, where `next(..)` refers to the successor.
    pub fn compile_transition(&self, formula: &Formula) -> Result<Ref> {
        Compiler::transition(&self.enc).compile_bool(formula, Frame::Current)
    }

    pub fn set_initial(&mut self, initial: Ref) {
        self.initial = Some(initial);
    }

    pub fn set_transition(&mut self, transition: Ref) {
        self.transition = Some(transition);
    }

    /// Conjoin a constraint to the initial states.
    pub fn constrain_initial(&mut self, constraint: Ref) {
        let initial = match self.initial {
            Some(initial) => self.enc.bdd.apply_and(initial, constraint),
            None => constraint,
        };
        self.initial = Some(initial);
    }

    /// Conjoin a constraint to the transition relation.
    pub fn constrain_transition(&mut self, constraint: Ref) {
        let transition = match self.transition {
            Some(transition) => self.enc.bdd.apply_and(transition, constraint),
            None => constraint,
        };
        self.transition = Some(transition);
    }

    /// Restrict the state space to the states satisfying `invariant`.
    pub fn add_invariant(&mut self, invariant: Ref) {
        self.invariant = self.enc.bdd.apply_and(self.invariant, invariant);
    }

    /// `init(name) := rhs`
    pub fn assign_init(&mut self, name: &str, rhs: &Rhs) -> Result<()> {
        let relation = Compiler::state(&self.enc).assignment(name, rhs, Frame::Current)?;
        self.constrain_initial(relation);
        Ok(())
    }

    /// `next(name) := rhs`
    pub fn assign_next(&mut self, name: &str, rhs: &Rhs) -> Result<()> {
        let relation = Compiler::state(&self.enc).assignment(name, rhs, Frame::Next)?;
        self.constrain_transition(relation);
        Ok(())
    }

    /// `name := rhs`, in every state.
    pub fn assign_invariant(&mut self, name: &str, rhs: &Rhs) -> Result<()> {
        let relation = Compiler::state(&self.enc).assignment(name, rhs, Frame::Current)?;
        self.add_invariant(relation);
        Ok(())
    }

    pub fn finish(self) -> Result<SymbolicModel> {
        let initial = self.initial.ok_or(Error::Uninitialized("initial states"))?;
        let transition = self.transition.ok_or(Error::Uninitialized("transition relation"))?;

        let enc = self.enc;
        let bdd = &enc.bdd;
        let universe = bdd.apply_and(enc.all_valid(Frame::Current), self.invariant);
        let universe_next = bdd.rename_vars(universe, &enc.vars.present_to_next());

        let initial = bdd.apply_and(initial, universe);
        let transition = bdd.apply_and_many([transition, universe, universe_next]);

        let present = enc.vars.present_vars();
        let next = enc.vars.next_vars();
        debug!(
            "transition system: {} variables, {} bits, {} states, relation of {} nodes",
            enc.vars.vars().len(),
            present.len(),
            bdd.sat_count(universe, &present),
            bdd.size(transition)
        );

        Ok(SymbolicModel {
            to_next: enc.vars.present_to_next(),
            to_present: enc.vars.next_to_present(),
            enc,
            initial,
            transition,
            universe,
            present,
            next,
        })
    }
}

/// A finished transition system; implements [`SymbolicFsm`] over BDDs.
#[derive(Debug)]
pub struct SymbolicModel {
    enc: Encoding,
    initial: Ref,
    transition: Ref,
    universe: Ref,
    present: Vec<u32>,
    next: Vec<u32>,
    to_next: HashMap<u32, u32>,
    to_present: HashMap<u32, u32>,
}

impl SymbolicModel {
    pub fn bdd(&self) -> &Bdd {
        &self.enc.bdd
    }

    pub fn variables(&self) -> &[StateVar] {
        self.enc.vars.vars()
    }

    pub fn transition(&self) -> Ref {
        self.transition
    }
}

impl StateSpace for SymbolicModel {
    type Set = Ref;

    fn empty(&self) -> Ref {
        self.bdd().zero
    }

    fn universe(&self) -> Ref {
        self.universe
    }

    fn union(&self, a: &Ref, b: &Ref) -> Ref {
        self.bdd().apply_or(*a, *b)
    }

    fn intersection(&self, a: &Ref, b: &Ref) -> Ref {
        self.bdd().apply_and(*a, *b)
    }

    fn difference(&self, a: &Ref, b: &Ref) -> Ref {
        self.bdd().apply_diff(*a, *b)
    }

    fn is_empty(&self, a: &Ref) -> bool {
        self.bdd().is_zero(*a)
    }

    fn is_subset(&self, a: &Ref, b: &Ref) -> bool {
        self.bdd().is_implies(*a, *b)
    }

    fn same(&self, a: &Ref, b: &Ref) -> bool {
        a == b
    }

    fn cardinality(&self, a: &Ref) -> BigUint {
        self.bdd().sat_count(*a, &self.present)
    }
}

impl SymbolicFsm for SymbolicModel {
    fn initial_states(&self) -> Ref {
        self.initial
    }

    fn pre(&self, s: &Ref) -> Ref {
        let bdd = self.bdd();
        let s_next = bdd.rename_vars(*s, &self.to_next);
        bdd.rel_product(self.transition, s_next, self.next.iter().copied())
    }

    fn post(&self, s: &Ref) -> Ref {
        let bdd = self.bdd();
        let image = bdd.rel_product(*s, self.transition, self.present.iter().copied());
        bdd.rename_vars(image, &self.to_present)
    }

    fn evaluate(&self, formula: &Formula) -> Result<Ref> {
        let states = Compiler::state(&self.enc).compile_bool(formula, Frame::Current)?;
        Ok(self.bdd().apply_and(states, self.universe))
    }
}
