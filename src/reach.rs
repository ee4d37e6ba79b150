use log::debug;

use crate::error::Result;
use crate::fixpoint::Bound;
use crate::fsm::SymbolicFsm;

/// Forward reachability from the initial states.
pub struct ReachabilitySolver<'a, M: SymbolicFsm + ?Sized> {
    fsm: &'a M,
}

impl<'a, M: SymbolicFsm + ?Sized> ReachabilitySolver<'a, M> {
    pub fn new(fsm: &'a M) -> Self {
        Self { fsm }
    }

    /// Least fixpoint `μZ. init ∪ post(Z)`, computed frontier by frontier.
    pub fn compute(&self) -> Result<M::Set> {
        let fsm = self.fsm;
        let mut bound = Bound::new(fsm, "reachability");

        let mut reach = fsm.initial_states();
        let mut frontier = reach.clone();
        while !fsm.is_empty(&frontier) {
            bound.tick()?;
            frontier = fsm.difference(&fsm.post(&frontier), &reach);
            reach = fsm.union(&reach, &frontier);
        }

        debug!(
            "reachability: {} states after {} iterations",
            fsm.cardinality(&reach),
            bound.iterations()
        );
        Ok(reach)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::explicit::ExplicitFsm;
    use crate::fsm::StateSpace;

    #[test]
    fn test_two_state_cycle() {
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.add_transition(s0, s1);
        fsm.add_transition(s1, s0);
        fsm.add_initial(s0);

        let first = ReachabilitySolver::new(&fsm).compute().unwrap();
        let second = ReachabilitySolver::new(&fsm).compute().unwrap();
        assert_eq!(first.iter().collect::<Vec<_>>(), vec![s0, s1]);
        assert!(fsm.same(&first, &second));
    }

    #[test]
    fn test_unreachable_states_are_excluded() {
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        let s2 = fsm.add_state();
        let s3 = fsm.add_state();
        fsm.add_transition(s0, s1);
        fsm.add_transition(s1, s1);
        fsm.add_transition(s2, s3);
        fsm.add_transition(s3, s0);
        fsm.add_initial(s0);

        let reach = ReachabilitySolver::new(&fsm).compute().unwrap();
        assert_eq!(reach.iter().collect::<Vec<_>>(), vec![s0, s1]);
    }

    #[test]
    fn test_no_initial_states() {
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        fsm.add_transition(s0, s0);

        let reach = ReachabilitySolver::new(&fsm).compute().unwrap();
        assert!(fsm.is_empty(&reach));
    }
}
