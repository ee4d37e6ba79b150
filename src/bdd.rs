//! Reduced ordered BDDs with complement edges.
//!
//! All operations go through the [`Bdd`] manager, which owns the node storage
//! (hash-consed, so equal functions get equal [`Ref`]s) and the computed
//! table. Variables are 1-indexed and ordered by index: a smaller index is
//! closer to the root. Nodes are never freed; a manager lives as long as the
//! model it encodes.
//!
//! Canonical form: the high edge of a stored node is never negated, so every
//! boolean function has exactly one `Ref`. Equivalence is `==`, emptiness is
//! [`Bdd::is_zero`].

use std::cell::RefCell;
use std::cmp::min;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use log::trace;

use crate::cache::Cache;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing2, pairing3, MyHash};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Node {
    variable: u32,
    low: Ref,
    high: Ref,
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.unsigned() as u64,
            self.high.unsigned() as u64,
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum OpKey {
    Ite(Ref, Ref, Ref),
    Exists(Ref, Ref),
    RelProduct(Ref, Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match *self {
            OpKey::Ite(f, g, h) => pairing3(f.unsigned() as u64, g.unsigned() as u64, h.unsigned() as u64),
            OpKey::Exists(f, c) => pairing2(f.unsigned() as u64, c.unsigned() as u64) ^ 0x5555,
            OpKey::RelProduct(f, g, c) => {
                pairing3(f.unsigned() as u64, g.unsigned() as u64, c.unsigned() as u64) ^ 0xaaaa
            }
        }
    }
}

pub struct Bdd {
    storage: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    num_vars: RefCell<u32>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(bits: usize) -> Self {
        let mut storage = Table::new(bits);

        // The single terminal node, at index 1.
        let terminal = Node {
            variable: 0,
            low: Ref::INVALID,
            high: Ref::INVALID,
        };
        let one = storage.alloc(terminal);
        assert_eq!(one, 1);
        let one = Ref::positive(one as u32);

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(min(bits + 2, 20))),
            num_vars: RefCell::new(0),
            zero: -one,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("Bdd")
            .field("nodes", &self.storage.borrow().size())
            .field("variables", &self.num_vars())
            .field("cache_hits", &cache.hits())
            .field("cache_misses", &cache.misses())
            .finish()
    }
}

impl Bdd {
    /// Number of variables allocated so far.
    pub fn num_vars(&self) -> u32 {
        *self.num_vars.borrow()
    }

    /// Allocate a fresh variable below all existing ones in the order.
    pub fn allocate_variable(&self) -> u32 {
        let mut n = self.num_vars.borrow_mut();
        *n += 1;
        *n
    }

    /// Number of nodes stored in the manager (including the terminal).
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().size()
    }

    pub fn variable(&self, index: usize) -> u32 {
        self.storage.borrow().value(index).variable
    }

    pub fn low(&self, index: usize) -> Ref {
        self.storage.borrow().value(index).low
    }

    pub fn high(&self, index: usize) -> Ref {
        self.storage.borrow().value(index).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }

    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }

    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }

    pub fn is_terminal(&self, node: Ref) -> bool {
        node.index() == self.one.index()
    }

    /// Position of the node's variable in the order; terminals sit below every variable.
    fn level(&self, node: Ref) -> u32 {
        if self.is_terminal(node) {
            u32::MAX
        } else {
            self.variable(node.index())
        }
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        assert!(low.is_valid() && high.is_valid(), "Invalid child reference");

        if low == high {
            return low;
        }

        // Keep the high edge regular.
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        let i = self.storage.borrow_mut().put(Node { variable: v, low, high });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of the given positive variables.
    pub fn mk_cube(&self, vars: impl IntoIterator<Item = u32>) -> Ref {
        let mut vars: Vec<u32> = vars.into_iter().collect();
        vars.sort_unstable();
        vars.dedup();
        vars.iter()
            .rev()
            .fold(self.one, |current, &v| self.mk_node(v, self.zero, current))
    }

    /// Cofactors of `node` with respect to the top variable `v`.
    ///
    /// `v` must not be below the top variable of `node`.
    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if self.level(node) != v {
            return (node, node);
        }
        (self.low_node(node), self.high_node(node))
    }

    /// `ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)`.
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        assert!(f.is_valid() && g.is_valid() && h.is_valid(), "ITE on an invalid reference");

        // Terminal cases.
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Standard triples.
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        // Normalize: `f` and `g` regular.
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        let mut negate = false;
        if g.is_negated() {
            negate = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        let cached = self.cache.borrow().get(&key).copied();
        let res = match cached {
            Some(res) => res,
            None => {
                let m = self.level(f).min(self.level(g)).min(self.level(h));
                let (f0, f1) = self.top_cofactors(f, m);
                let (g0, g1) = self.top_cofactors(g, m);
                let (h0, h1) = self.top_cofactors(h, m);
                let high = self.apply_ite(f1, g1, h1);
                let low = self.apply_ite(f0, g0, h0);
                let res = self.mk_node(m, low, high);
                self.cache.borrow_mut().insert(key, res);
                res
            }
        };

        if negate {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.one)
    }

    /// `u ∧ ¬v`
    pub fn apply_diff(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(v, self.zero, u)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node);
            if self.is_one(res) {
                break;
            }
        }
        res
    }

    /// Whether `f → g` is valid, i.e. the set `f` is contained in `g`.
    pub fn is_implies(&self, f: Ref, g: Ref) -> bool {
        self.is_zero(self.apply_diff(f, g))
    }

    /// `∃ vars. f`
    pub fn exists(&self, f: Ref, vars: impl IntoIterator<Item = u32>) -> Ref {
        let cube = self.mk_cube(vars);
        self.exists_cube(f, cube)
    }

    fn skip_cube(&self, mut cube: Ref, level: u32) -> Ref {
        while !self.is_one(cube) && self.variable(cube.index()) < level {
            cube = self.high_node(cube);
        }
        cube
    }

    fn exists_cube(&self, f: Ref, cube: Ref) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        let v = self.level(f);
        let cube = self.skip_cube(cube, v);
        if self.is_one(cube) {
            return f;
        }

        let key = OpKey::Exists(f, cube);
        if let Some(res) = self.cache.borrow().get(&key).copied() {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, v);
        let res = if self.variable(cube.index()) == v {
            let rest = self.high_node(cube);
            let low = self.exists_cube(f0, rest);
            if self.is_one(low) {
                low
            } else {
                self.apply_or(low, self.exists_cube(f1, rest))
            }
        } else {
            let low = self.exists_cube(f0, cube);
            let high = self.exists_cube(f1, cube);
            self.mk_node(v, low, high)
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Relational product `∃ vars. f ∧ g`, without building the conjunction first.
    pub fn rel_product(&self, f: Ref, g: Ref, vars: impl IntoIterator<Item = u32>) -> Ref {
        let cube = self.mk_cube(vars);
        self.rel_product_cube(f, g, cube)
    }

    fn rel_product_cube(&self, f: Ref, g: Ref, cube: Ref) -> Ref {
        if self.is_zero(f) || self.is_zero(g) || f == -g {
            return self.zero;
        }
        if self.is_one(f) || f == g {
            return self.exists_cube(g, cube);
        }
        if self.is_one(g) {
            return self.exists_cube(f, cube);
        }

        let m = self.level(f).min(self.level(g));
        let cube = self.skip_cube(cube, m);
        if self.is_one(cube) {
            return self.apply_and(f, g);
        }

        // Conjunction is commutative.
        let (f, g) = if f <= g { (f, g) } else { (g, f) };
        let key = OpKey::RelProduct(f, g, cube);
        if let Some(res) = self.cache.borrow().get(&key).copied() {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let res = if self.variable(cube.index()) == m {
            let rest = self.high_node(cube);
            let low = self.rel_product_cube(f0, g0, rest);
            if self.is_one(low) {
                low
            } else {
                self.apply_or(low, self.rel_product_cube(f1, g1, rest))
            }
        } else {
            let low = self.rel_product_cube(f0, g0, cube);
            let high = self.rel_product_cube(f1, g1, cube);
            self.mk_node(m, low, high)
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Simultaneous substitution of variables by variables.
    ///
    /// Variables missing from `map` are kept. The map does not need to
    /// preserve the order: nodes are rebuilt through ITE.
    pub fn rename_vars(&self, f: Ref, map: &HashMap<u32, u32>) -> Ref {
        let mut cache = HashMap::new();
        self.rename_vars_(f, map, &mut cache)
    }

    fn rename_vars_(&self, f: Ref, map: &HashMap<u32, u32>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if f.is_negated() {
            return -self.rename_vars_(-f, map, cache);
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let target = map.get(&v).copied().unwrap_or(v);
        let low = self.rename_vars_(self.low(f.index()), map, cache);
        let high = self.rename_vars_(self.high(f.index()), map, cache);
        let res = self.apply_ite(self.mk_var(target), high, low);
        trace!("rename: x{} -> x{}, {} -> {}", v, target, f, res);

        cache.insert(f, res);
        res
    }

    /// Variables `f` depends on.
    pub fn support(&self, f: Ref) -> HashSet<u32> {
        let mut vars = HashSet::new();
        for index in self.descendants([f]) {
            vars.insert(self.variable(index));
        }
        vars
    }

    /// Indices of all internal nodes reachable from the given roots.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<usize> {
        let mut visited = HashSet::new();
        let mut stack: Vec<Ref> = nodes.into_iter().collect();
        while let Some(node) = stack.pop() {
            if self.is_terminal(node) || !visited.insert(node.index()) {
                continue;
            }
            stack.push(self.low(node.index()));
            stack.push(self.high(node.index()));
        }
        visited
    }

    /// Number of internal nodes of `f`.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }
}
