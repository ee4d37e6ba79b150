use log::{debug, trace};

use crate::error::Result;
use crate::fixpoint::Bound;
use crate::formula::Formula;
use crate::fsm::SymbolicFsm;

/// Decides whether some reachable execution visits `φ` infinitely often.
///
/// Keeps the `φ`-states that can reach `φ`-states again in one or more
/// steps, until either every remaining candidate can reach the candidate
/// set (a cycle through `φ` exists) or no candidate is left.
pub struct RecurrenceChecker<'a, M: SymbolicFsm + ?Sized> {
    fsm: &'a M,
}

impl<'a, M: SymbolicFsm + ?Sized> RecurrenceChecker<'a, M> {
    pub fn new(fsm: &'a M) -> Self {
        Self { fsm }
    }

    pub fn check(&self, reach: &M::Set, phi: &Formula) -> Result<bool> {
        let fsm = self.fsm;
        let mut recur = fsm.intersection(reach, &fsm.evaluate(phi)?);
        debug!("recurrence of `{}`: {} candidate states", phi, fsm.cardinality(&recur));

        let mut outer = Bound::new(fsm, "recurrence");
        while !fsm.is_empty(&recur) {
            outer.tick()?;

            // States reaching `recur` in one or more steps.
            let mut inner = Bound::new(fsm, "recurrence backward search");
            let mut pre_reach = fsm.empty();
            let mut frontier = fsm.pre(&recur);
            loop {
                inner.tick()?;
                pre_reach = fsm.union(&pre_reach, &frontier);
                if fsm.is_subset(&recur, &pre_reach) {
                    debug!("recurrence of `{}`: holds after {} rounds", phi, outer.iterations());
                    return Ok(true);
                }
                frontier = fsm.difference(&fsm.pre(&frontier), &pre_reach);
                if fsm.is_empty(&frontier) {
                    break;
                }
            }

            recur = fsm.intersection(&recur, &pre_reach);
            trace!("recurrence of `{}`: {} candidates left", phi, fsm.cardinality(&recur));
        }

        debug!("recurrence of `{}`: fails after {} rounds", phi, outer.iterations());
        Ok(false)
    }
}
