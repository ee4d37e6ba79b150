//! Verdicts for reactive properties `G F f -> G F g`.

use log::{debug, info};

use crate::classify::parse_reactive;
use crate::error::Result;
use crate::fair::FairCycleChecker;
use crate::formula::Formula;
use crate::fsm::{Explainer, SymbolicFsm, Trace};
use crate::persistence::{PersistenceChecker, PersistenceMode};
use crate::reach::ReachabilitySolver;
use crate::recurrence::RecurrenceChecker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The formula is not of the form `G F f -> G F g`.
    NotApplicable,
    Holds,
    Violated { counterexample: Option<Trace> },
}

impl Verdict {
    pub fn is_holds(&self) -> bool {
        matches!(self, Verdict::Holds)
    }

    pub fn is_violated(&self) -> bool {
        matches!(self, Verdict::Violated { .. })
    }
}

/// How the two halves of the check are combined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Composition {
    /// Violated when `f` recurs on some reachable cycle and `¬g` persists on
    /// some reachable execution. The two need not be the same execution, so
    /// this can report violations that do not exist.
    #[default]
    Independent,
    /// Violated when a single reachable execution visits `f` infinitely
    /// often and `g` only finitely often.
    Joint,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CheckOptions {
    pub persistence: PersistenceMode,
    pub composition: Composition,
}

pub struct ReactiveVerifier<'a, M: SymbolicFsm + ?Sized> {
    fsm: &'a M,
    options: CheckOptions,
    explainer: Option<&'a dyn Explainer<M>>,
}

impl<'a, M: SymbolicFsm + ?Sized> ReactiveVerifier<'a, M> {
    pub fn new(fsm: &'a M) -> Self {
        Self {
            fsm,
            options: CheckOptions::default(),
            explainer: None,
        }
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_explainer(mut self, explainer: &'a dyn Explainer<M>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn verify(&self, spec: &Formula) -> Result<Verdict> {
        let Some(reactive) = parse_reactive(spec) else {
            info!("`{}`: not applicable", spec);
            return Ok(Verdict::NotApplicable);
        };
        let f = reactive.assumption;
        let not_g = reactive.guarantee.clone().not();

        let reach = ReachabilitySolver::new(self.fsm).compute()?;

        let violated = match self.options.composition {
            Composition::Independent => {
                let f_recurs = RecurrenceChecker::new(self.fsm).check(&reach, f)?;
                let g_fails = PersistenceChecker::new(self.fsm)
                    .with_mode(self.options.persistence)
                    .check(&reach, &not_g)?;
                debug!("`{}`: f recurs = {}, g fails = {}", spec, f_recurs, g_fails);
                f_recurs && g_fails
            }
            Composition::Joint => FairCycleChecker::new(self.fsm).check(&reach, f, &not_g)?,
        };

        if !violated {
            info!("`{}`: holds", spec);
            return Ok(Verdict::Holds);
        }

        info!("`{}`: violated", spec);
        let counterexample = self.explainer.and_then(|e| e.explain(self.fsm, spec));
        Ok(Verdict::Violated { counterexample })
    }
}
