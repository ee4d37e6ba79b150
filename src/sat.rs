use std::collections::HashMap;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Number of assignments to `vars` that satisfy `node`.
    ///
    /// Variables of `node` outside of `vars` are quantified away first, so an
    /// assignment counts when some choice of the other variables satisfies `node`.
    pub fn sat_count(&self, node: Ref, vars: &[u32]) -> BigUint {
        let mut vars = vars.to_vec();
        vars.sort_unstable();
        vars.dedup();
        let positions: HashMap<u32, usize> = vars.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let n = vars.len();

        let others: Vec<u32> = self
            .support(node)
            .into_iter()
            .filter(|v| !positions.contains_key(v))
            .collect();
        let node = if others.is_empty() {
            node
        } else {
            self.exists(node, others)
        };

        let mut cache = HashMap::new();
        let count = self.sat_count_(node, n, &positions, &mut cache);
        count << self.position(node, n, &positions)
    }

    fn position(&self, node: Ref, n: usize, positions: &HashMap<u32, usize>) -> usize {
        if self.is_terminal(node) {
            return n;
        }
        let v = self.variable(node.index());
        debug_assert!(positions.contains_key(&v), "x{} is not among the counted variables", v);
        positions.get(&v).copied().unwrap_or(n)
    }

    /// Models over the variables at or below the position of `node`.
    fn sat_count_(
        &self,
        node: Ref,
        n: usize,
        positions: &HashMap<u32, usize>,
        cache: &mut HashMap<Ref, BigUint>,
    ) -> BigUint {
        if self.is_zero(node) {
            return BigUint::zero();
        }
        if self.is_one(node) {
            return BigUint::one();
        }

        let p = self.position(node, n, positions);
        if node.is_negated() {
            let all = BigUint::one() << (n - p);
            return all - self.sat_count_(-node, n, positions, cache);
        }
        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());
        let low_count = self.sat_count_(low, n, positions, cache) << (self.position(low, n, positions) - p - 1);
        let high_count = self.sat_count_(high, n, positions, cache) << (self.position(high, n, positions) - p - 1);
        let count = low_count + high_count;

        cache.insert(node, count.clone());
        count
    }
}
