use log::trace;
use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Error, Result};
use crate::fsm::StateSpace;

/// Iteration guard for a monotone fixpoint loop.
///
/// Over a finite space a monotone iteration stabilizes within
/// `|universe| + 1` rounds; running longer means the set primitives of the
/// backend are broken.
#[derive(Debug)]
pub struct Bound {
    fixpoint: &'static str,
    limit: BigUint,
    iterations: u64,
}

impl Bound {
    pub fn new<S: StateSpace + ?Sized>(space: &S, fixpoint: &'static str) -> Self {
        Self {
            fixpoint,
            limit: space.state_bound() + BigUint::one(),
            iterations: 0,
        }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Count one more iteration.
    pub fn tick(&mut self) -> Result<()> {
        self.iterations += 1;
        trace!("{}: iteration {}", self.fixpoint, self.iterations);
        if BigUint::from(self.iterations) > self.limit {
            return Err(Error::Divergence {
                fixpoint: self.fixpoint,
                iterations: self.iterations,
            });
        }
        Ok(())
    }
}
