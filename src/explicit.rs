//! Explicit-state backend: states are numbered, sets are [`BitSet`]s.
//!
//! Small hand-built models for tests and for cross-checking the symbolic
//! backend.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigUint;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::formula::{BinaryOp, Formula};
use crate::fsm::{StateSpace, SymbolicFsm};
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct ExplicitFsm {
    valuations: Vec<BTreeMap<String, Value>>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    initial: BitSet,
    variables: BTreeSet<String>,
}

impl ExplicitFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_states(&self) -> usize {
        self.valuations.len()
    }

    /// Add a state where every variable is unset, returning its index.
    pub fn add_state(&mut self) -> usize {
        self.valuations.push(BTreeMap::new());
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        self.valuations.len() - 1
    }

    pub fn set(&mut self, state: usize, var: impl Into<String>, value: impl Into<Value>) {
        let var = var.into();
        self.variables.insert(var.clone());
        self.valuations[state].insert(var, value.into());
    }

    /// Make the boolean variable `atom` true in `state`.
    ///
    /// Unset boolean variables read as false.
    pub fn label(&mut self, state: usize, atom: impl Into<String>) {
        self.set(state, atom, true);
    }

    pub fn add_transition(&mut self, from: usize, to: usize) {
        assert!(
            from < self.num_states() && to < self.num_states(),
            "Transition {} -> {} refers to an unknown state",
            from,
            to
        );
        if !self.successors[from].contains(&to) {
            self.successors[from].push(to);
            self.predecessors[to].push(from);
        }
    }

    pub fn add_initial(&mut self, state: usize) {
        self.initial.insert(state);
    }

    pub fn successors(&self, state: usize) -> &[usize] {
        &self.successors[state]
    }

    pub fn predecessors(&self, state: usize) -> &[usize] {
        &self.predecessors[state]
    }

    /// Variable assignment of `state`, sorted by name.
    pub fn valuation(&self, state: usize) -> Vec<(String, Value)> {
        self.valuations[state]
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn lookup(&self, state: usize, name: &str) -> Option<Value> {
        if let Some(value) = self.valuations[state].get(name) {
            Some(value.clone())
        } else if self.variables.contains(name) {
            Some(Value::Bool(false))
        } else {
            None
        }
    }

    fn eval_value(&self, state: usize, formula: &Formula) -> Result<Value> {
        match formula {
            Formula::Atom(name) => Ok(self.lookup(state, name).unwrap_or_else(|| Value::symbol(name.as_str()))),
            Formula::Number(n) => Ok(Value::Int(*n)),
            _ => Ok(Value::Bool(self.eval_bool(state, formula)?)),
        }
    }

    fn eval_bool(&self, state: usize, formula: &Formula) -> Result<bool> {
        match formula {
            Formula::True => Ok(true),
            Formula::False => Ok(false),
            Formula::Atom(name) => match self.lookup(state, name) {
                Some(Value::Bool(b)) => Ok(b),
                Some(value) => Err(Error::Type(format!("`{}` has non-boolean value `{}`", name, value))),
                // Atoms never assigned anywhere are false.
                None => Ok(false),
            },
            Formula::Number(n) => Err(Error::Type(format!("integer `{}` used as a condition", n))),
            Formula::Comparison(op, l, r) => {
                let l = self.eval_value(state, l)?;
                let r = self.eval_value(state, r)?;
                l.compare(*op, &r)
            }
            Formula::Not(phi) => Ok(!self.eval_bool(state, phi)?),
            Formula::Binary(op, l, r) => {
                let l = self.eval_bool(state, l)?;
                let r = self.eval_bool(state, r)?;
                Ok(match op {
                    BinaryOp::And => l && r,
                    BinaryOp::Or => l || r,
                    BinaryOp::Xor => l != r,
                    BinaryOp::Xnor | BinaryOp::Iff => l == r,
                    BinaryOp::Implies => !l || r,
                })
            }
            Formula::Next(_) | Formula::Global(_) | Formula::Future(_) | Formula::Until(_, _) | Formula::Context(_, _) => {
                Err(Error::Temporal(formula.to_string()))
            }
        }
    }
}

impl StateSpace for ExplicitFsm {
    type Set = BitSet;

    fn empty(&self) -> BitSet {
        BitSet::new(self.num_states())
    }

    fn universe(&self) -> BitSet {
        BitSet::full(self.num_states())
    }

    fn union(&self, a: &BitSet, b: &BitSet) -> BitSet {
        a.union(b)
    }

    fn intersection(&self, a: &BitSet, b: &BitSet) -> BitSet {
        a.intersection(b)
    }

    fn difference(&self, a: &BitSet, b: &BitSet) -> BitSet {
        a.difference(b)
    }

    fn is_empty(&self, a: &BitSet) -> bool {
        a.is_empty()
    }

    fn is_subset(&self, a: &BitSet, b: &BitSet) -> bool {
        a.is_subset(b)
    }

    fn intersects(&self, a: &BitSet, b: &BitSet) -> bool {
        !a.is_disjoint(b)
    }

    fn same(&self, a: &BitSet, b: &BitSet) -> bool {
        a == b
    }

    fn cardinality(&self, a: &BitSet) -> BigUint {
        BigUint::from(a.len())
    }
}

impl SymbolicFsm for ExplicitFsm {
    fn initial_states(&self) -> BitSet {
        self.initial.clone()
    }

    fn pre(&self, s: &BitSet) -> BitSet {
        s.iter().flat_map(|t| self.predecessors[t].iter().copied()).collect()
    }

    fn post(&self, s: &BitSet) -> BitSet {
        s.iter().flat_map(|t| self.successors[t].iter().copied()).collect()
    }

    fn evaluate(&self, formula: &Formula) -> Result<BitSet> {
        let mut res = self.empty();
        for state in 0..self.num_states() {
            if self.eval_bool(state, formula)? {
                res.insert(state);
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::formula::CompareOp;

    fn states(set: &BitSet) -> Vec<usize> {
        set.iter().collect()
    }

    fn chain() -> ExplicitFsm {
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        let s2 = fsm.add_state();
        fsm.add_transition(s0, s1);
        fsm.add_transition(s1, s2);
        fsm.add_transition(s2, s2);
        fsm.add_initial(s0);
        fsm.label(s1, "p");
        fsm.set(s0, "n", 0i64);
        fsm.set(s1, "n", 1i64);
        fsm.set(s2, "n", 2i64);
        fsm.set(s0, "mode", Value::symbol("run"));
        fsm.set(s1, "mode", Value::symbol("run"));
        fsm.set(s2, "mode", Value::symbol("done"));
        fsm
    }

    #[test]
    fn test_images() {
        let fsm = chain();
        let s1: BitSet = [1].into_iter().collect();
        assert_eq!(states(&fsm.post(&s1)), vec![2]);
        assert_eq!(states(&fsm.pre(&s1)), vec![0]);
        assert_eq!(states(&fsm.pre(&fsm.universe())), vec![0, 1, 2]);
        assert_eq!(states(&fsm.post(&fsm.empty())), Vec::<usize>::new());
    }

    #[test]
    fn test_evaluate_atoms() {
        let fsm = chain();
        assert_eq!(states(&fsm.evaluate(&Formula::atom("p")).unwrap()), vec![1]);
        assert_eq!(states(&fsm.evaluate(&Formula::atom("p").not()).unwrap()), vec![0, 2]);
        assert_eq!(states(&fsm.evaluate(&Formula::atom("unknown")).unwrap()), Vec::<usize>::new());
        assert_eq!(states(&fsm.evaluate(&Formula::True).unwrap()), vec![0, 1, 2]);
    }

    #[test]
    fn test_evaluate_comparisons() {
        let fsm = chain();
        let ge1 = Formula::compare(CompareOp::Ge, Formula::atom("n"), Formula::number(1));
        assert_eq!(states(&fsm.evaluate(&ge1).unwrap()), vec![1, 2]);

        let done = Formula::eq(Formula::atom("mode"), Formula::atom("done"));
        assert_eq!(states(&fsm.evaluate(&done).unwrap()), vec![2]);

        let bad = Formula::compare(CompareOp::Lt, Formula::atom("n"), Formula::True);
        assert!(matches!(fsm.evaluate(&bad), Err(Error::Type(_))));
    }

    #[test]
    fn test_evaluate_rejects_temporal() {
        let fsm = chain();
        let err = fsm.evaluate(&Formula::atom("p").finally()).unwrap_err();
        assert!(matches!(err, Error::Temporal(_)));
    }

    #[test]
    fn test_duplicate_transitions() {
        let mut fsm = chain();
        fsm.add_transition(0, 1);
        assert_eq!(fsm.successors(0), &[1]);
        assert_eq!(fsm.predecessors(1), &[0]);
    }
}
