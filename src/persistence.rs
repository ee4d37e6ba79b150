use log::debug;

use crate::error::Result;
use crate::fixpoint::Bound;
use crate::formula::Formula;
use crate::fsm::SymbolicFsm;

/// How [`PersistenceChecker`] decides that `φ` can hold forever.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Greatest fixpoint `νZ. Z ∩ pre(Z)` inside the reachable `φ`-states.
    #[default]
    Iterated,
    /// Only test whether every reachable `φ`-state has a `φ`-successor.
    SingleStep,
}

/// Decides whether some reachable execution stays in `φ` forever from some point on.
pub struct PersistenceChecker<'a, M: SymbolicFsm + ?Sized> {
    fsm: &'a M,
    mode: PersistenceMode,
}

impl<'a, M: SymbolicFsm + ?Sized> PersistenceChecker<'a, M> {
    pub fn new(fsm: &'a M) -> Self {
        Self {
            fsm,
            mode: PersistenceMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: PersistenceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn check(&self, reach: &M::Set, phi: &Formula) -> Result<bool> {
        let fsm = self.fsm;
        let mut recur = fsm.intersection(reach, &fsm.evaluate(phi)?);
        if fsm.is_empty(&recur) {
            debug!("persistence of `{}`: no reachable state", phi);
            return Ok(false);
        }

        match self.mode {
            PersistenceMode::SingleStep => {
                let res = fsm.is_subset(&recur, &fsm.pre(&recur));
                debug!("persistence of `{}` (single step): {}", phi, res);
                Ok(res)
            }
            PersistenceMode::Iterated => {
                let mut bound = Bound::new(fsm, "persistence");
                loop {
                    bound.tick()?;
                    let next = fsm.intersection(&recur, &fsm.pre(&recur));
                    if fsm.same(&next, &recur) {
                        break;
                    }
                    recur = next;
                }
                debug!(
                    "persistence of `{}`: {} states can stay forever ({} iterations)",
                    phi,
                    fsm.cardinality(&recur),
                    bound.iterations()
                );
                Ok(!fsm.is_empty(&recur))
            }
        }
    }
}
