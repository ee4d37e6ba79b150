use log::{debug, trace};

use crate::error::Result;
use crate::fixpoint::Bound;
use crate::formula::Formula;
use crate::fsm::SymbolicFsm;

/// Searches for a single reachable execution that visits `f` infinitely
/// often while staying inside `avoid` forever.
///
/// Emerson-Lei with one Büchi condition:
/// `νZ. reach ∩ avoid ∩ EX E[Z U (Z ∩ f)]`.
pub struct FairCycleChecker<'a, M: SymbolicFsm + ?Sized> {
    fsm: &'a M,
}

impl<'a, M: SymbolicFsm + ?Sized> FairCycleChecker<'a, M> {
    pub fn new(fsm: &'a M) -> Self {
        Self { fsm }
    }

    /// States of `reach ∩ avoid` from which such an execution starts.
    pub fn fair_states(&self, reach: &M::Set, f: &Formula, avoid: &Formula) -> Result<M::Set> {
        let fsm = self.fsm;
        let f = fsm.evaluate(f)?;
        let mut z = fsm.intersection(reach, &fsm.evaluate(avoid)?);

        let mut outer = Bound::new(fsm, "fair cycle");
        loop {
            outer.tick()?;

            // E[Z U (Z ∩ f)]
            let mut inner = Bound::new(fsm, "fair cycle backward search");
            let mut y = fsm.intersection(&z, &f);
            loop {
                inner.tick()?;
                let next = fsm.union(&y, &fsm.intersection(&z, &fsm.pre(&y)));
                if fsm.same(&next, &y) {
                    break;
                }
                y = next;
            }

            let next = fsm.intersection(&z, &fsm.pre(&y));
            trace!("fair cycle: {} candidate states", fsm.cardinality(&next));
            if fsm.same(&next, &z) {
                break;
            }
            z = next;
        }

        debug!(
            "fair cycle: {} states after {} iterations",
            fsm.cardinality(&z),
            outer.iterations()
        );
        Ok(z)
    }

    pub fn check(&self, reach: &M::Set, f: &Formula, avoid: &Formula) -> Result<bool> {
        let z = self.fair_states(reach, f, avoid)?;
        Ok(!self.fsm.is_empty(&z))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::explicit::ExplicitFsm;
    use crate::reach::ReachabilitySolver;

    fn check(fsm: &ExplicitFsm, f: &Formula, avoid: &Formula) -> bool {
        let reach = ReachabilitySolver::new(fsm).compute().unwrap();
        FairCycleChecker::new(fsm).check(&reach, f, avoid).unwrap()
    }

    #[test]
    fn test_cycle_inside_avoid() {
        // s0 <-> s1, f on s1, nothing else
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.add_transition(s0, s1);
        fsm.add_transition(s1, s0);
        fsm.add_initial(s0);
        fsm.label(s1, "f");

        assert!(check(&fsm, &Formula::atom("f"), &Formula::True));
        assert!(!check(&fsm, &Formula::atom("f"), &Formula::atom("f").not()));
    }

    #[test]
    fn test_f_and_avoid_on_different_cycles() {
        // s0 -> a (f, g) self-loop, s0 -> b (neither) self-loop
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let a = fsm.add_state();
        let b = fsm.add_state();
        fsm.add_transition(s0, a);
        fsm.add_transition(s0, b);
        fsm.add_transition(a, a);
        fsm.add_transition(b, b);
        fsm.add_initial(s0);
        fsm.label(a, "f");
        fsm.label(a, "g");

        let f = Formula::atom("f");
        let not_g = Formula::atom("g").not();
        assert!(!check(&fsm, &f, &not_g));

        let reach = ReachabilitySolver::new(&fsm).compute().unwrap();
        let fair = FairCycleChecker::new(&fsm).fair_states(&reach, &f, &Formula::True).unwrap();
        assert_eq!(fair.iter().collect::<Vec<_>>(), vec![s0, a]);
    }

    #[test]
    fn test_path_leaving_avoid_is_not_fair() {
        // s0 (f) -> s1 (g) -> s0
        let mut fsm = ExplicitFsm::new();
        let s0 = fsm.add_state();
        let s1 = fsm.add_state();
        fsm.add_transition(s0, s1);
        fsm.add_transition(s1, s0);
        fsm.add_initial(s0);
        fsm.label(s0, "f");
        fsm.label(s1, "g");

        assert!(!check(&fsm, &Formula::atom("f"), &Formula::atom("g").not()));
    }
}
