//! Compact BDD manager with complement edges.
//!
//! Variables are numbered from 1, and a variable's number is its level:
//! smaller numbers are closer to the root. Nodes are hash-consed in a unique
//! table and never freed, which is adequate for the short-lived managers the
//! symbolic automata in this crate use.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;
use num_bigint::BigUint;

use crate::node::Node;
use crate::reference::Ref;

type IteKey = (Ref, Ref, Ref);

pub struct Bdd {
    nodes: RefCell<Vec<Node>>,
    unique: RefCell<HashMap<Node, u32>>,
    cache: RefCell<HashMap<IteKey, Ref>>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new() -> Self {
        // Index 0 is unused, index 1 is the terminal node.
        let nodes = vec![Node::TERMINAL, Node::TERMINAL];
        Self {
            nodes: RefCell::new(nodes),
            unique: RefCell::new(HashMap::new()),
            cache: RefCell::new(HashMap::new()),
            zero: Ref::ZERO,
            one: Ref::ONE,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new()
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("nodes", &self.num_nodes())
            .field("cache", &self.cache.borrow().len())
            .finish()
    }
}

impl Bdd {
    /// Returns the number of allocated nodes, including the terminal.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - 1
    }

    pub fn variable(&self, index: u32) -> u32 {
        self.nodes.borrow()[index as usize].variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.nodes.borrow()[index as usize].low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.nodes.borrow()[index as usize].high
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
        self.is_zero(node) || self.is_one(node)
    }

    /// Level of the top variable of `node`, with terminals below every variable.
    fn level(&self, node: Ref) -> u32 {
        if self.is_terminal(node) {
            u32::MAX
        } else {
            self.variable(node.index())
        }
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        debug_assert!(v < self.level(low) && v < self.level(high));

        // Handle duplicates
        if low == high {
            return low;
        }

        // Handle canonicity
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        let node = Node {
            variable: v,
            low,
            high,
        };
        if let Some(&i) = self.unique.borrow().get(&node) {
            return Ref::positive(i);
        }
        let i = {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(node);
            (nodes.len() - 1) as u32
        };
        self.unique.borrow_mut().insert(node, i);
        Ref::positive(i)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        self.mk_node(v, self.zero, self.one)
    }

    /// Builds the conjunction of literals: positive `v` for variable `v`, negative for its negation.
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| std::cmp::Reverse(v.abs()));
        debug!("cube(literals = {:?})", literals);
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), current, self.zero)
            } else {
                self.mk_node(lit as u32, self.zero, current)
            };
        }
        current
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");
        if self.is_terminal(node) || v < self.variable(node.index()) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node.index()));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_synth::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(1);
    /// let y = bdd.mk_var(2);
    /// let z = bdd.mk_var(3);
    /// let f = bdd.apply_ite(x, y, z);
    /// assert_eq!(f, bdd.apply_or(bdd.apply_and(x, y), bdd.apply_and(-x, z)));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
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

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
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

        // ite(~F,G,H) => ite(F,H,G)
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        // ite(F,~G,H) => ~ite(F,G,~H)
        let n = g.is_negated();
        if n {
            g = -g;
            h = -h;
        }

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return if n { -res } else { res };
        }

        let m = self.level(f).min(self.level(g)).min(self.level(h));
        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);
        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);
        let res = self.mk_node(m, e, t);
        self.cache.borrow_mut().insert(key, res);

        if n {
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

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
        }
        res
    }

    /// Existential quantification of `f` over the given variables.
    pub fn exists(&self, f: Ref, vars: impl IntoIterator<Item = u32>) -> Ref {
        let vars: BTreeSet<u32> = vars.into_iter().collect();
        debug!("exists(f = {}, vars = {:?})", f, vars);
        let Some(&last) = vars.last() else {
            return f;
        };
        let mut cache = HashMap::new();
        self.exists_(f, &vars, last, &mut cache)
    }

    fn exists_(&self, f: Ref, vars: &BTreeSet<u32>, last: u32, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        let v = self.variable(f.index());
        if v > last {
            // 'f' does not depend on any quantified variable
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let low = self.exists_(self.low_node(f), vars, last, cache);
        let high = self.exists_(self.high_node(f), vars, last, cache);
        let res = if vars.contains(&v) {
            self.apply_or(low, high)
        } else {
            self.mk_node(v, low, high)
        };
        cache.insert(f, res);
        res
    }

    /// Renames the variables of `f`: each variable `v` in the map is replaced by `map[v]`.
    ///
    /// The renaming need not preserve the variable order.
    pub fn rename(&self, f: Ref, map: &HashMap<u32, u32>) -> Ref {
        debug!("rename(f = {}, map = {:?})", f, map);
        let mut cache = HashMap::new();
        self.rename_(f, map, &mut cache)
    }

    fn rename_(&self, f: Ref, map: &HashMap<u32, u32>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let low = self.rename_(self.low_node(f), map, cache);
        let high = self.rename_(self.high_node(f), map, cache);
        let w = map.get(&v).copied().unwrap_or(v);
        let res = self.apply_ite(self.mk_var(w), high, low);
        cache.insert(f, res);
        res
    }

    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Returns the number of nodes in `f`, including the terminal.
    pub fn size(&self, f: Ref) -> u64 {
        self.descendants([f]).len() as u64
    }

    /// Counts the satisfying assignments of `f` over the variables `1..=num_vars`.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }
        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let count_low = self.sat_count_(self.low_node(node), max, cache);
        let count_high = self.sat_count_(self.high_node(node), max, cache);
        let count: BigUint = (count_low + count_high) >> 1;
        cache.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x.index()), 1);
        assert_eq!(bdd.high_node(x), bdd.one);
        assert_eq!(bdd.low_node(x), bdd.zero);
        assert_eq!(bdd.mk_var(1), x);
    }

    #[test]
    fn test_not_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let not_x = -x;

        assert_eq!(bdd.variable(not_x.index()), 1);
        assert_eq!(bdd.high_node(not_x), bdd.zero);
        assert_eq!(bdd.low_node(not_x), bdd.one);
        assert_eq!(bdd.apply_not(not_x), x);
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);

        assert_eq!(bdd.apply_and(x, bdd.one), x);
        assert_eq!(bdd.apply_and(x, bdd.zero), bdd.zero);
        assert_eq!(bdd.apply_or(x, bdd.one), bdd.one);
        assert_eq!(bdd.apply_or(x, bdd.zero), x);
        assert_eq!(bdd.apply_and(x, -x), bdd.zero);
        assert_eq!(bdd.apply_or(x, -x), bdd.one);
    }

    #[test]
    fn test_cube() {
        let bdd = Bdd::default();
        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.cube([3, -1, 2]);
        assert_eq!(f, bdd.apply_and_many([-x1, x2, x3]));
        assert_eq!(bdd.size(f), 4);
    }

    #[test]
    fn test_de_morgan_and() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        let f = -bdd.apply_and(x, y);
        let g = bdd.apply_or(-x, -y);
        assert_eq!(f, g);
    }

    #[test]
    fn test_eq() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        assert_eq!(bdd.apply_eq(x, x), bdd.one);
        assert_eq!(bdd.apply_eq(x, -x), bdd.zero);
        assert_eq!(bdd.apply_eq(x, y), bdd.apply_or(bdd.apply_and(x, y), bdd.apply_and(-x, -y)));
    }

    #[test]
    fn test_apply_ite_order_independent() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let z = bdd.mk_var(3);

        let f = bdd.apply_ite(z, y, x);
        let g = bdd.apply_or(bdd.apply_and(z, y), bdd.apply_and(-z, x));
        assert_eq!(f, g);
        assert_eq!(bdd.apply_ite(-z, x, y), f);
    }

    #[test]
    fn test_exists() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let z = bdd.mk_var(3);

        let f = bdd.apply_and_many([x, -y, z]);
        assert_eq!(bdd.exists(f, [2]), bdd.apply_and(x, z));
        assert_eq!(bdd.exists(f, [1, 3]), -y);
        assert_eq!(bdd.exists(f, [1, 2, 3]), bdd.one);
        assert_eq!(bdd.exists(f, []), f);
        assert_eq!(bdd.exists(bdd.zero, [1]), bdd.zero);

        let g = bdd.apply_eq(x, y);
        assert_eq!(bdd.exists(g, [1]), bdd.one);
    }

    #[test]
    fn test_rename() {
        let bdd = Bdd::default();
        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let x4 = bdd.mk_var(4);

        let f = bdd.apply_and(x2, -x4);
        let map = HashMap::from([(2, 1), (4, 3)]);
        assert_eq!(bdd.rename(f, &map), bdd.apply_and(x1, -x3));

        // Order-reversing renaming.
        let g = bdd.apply_or(-x1, x2);
        let map = HashMap::from([(1, 4), (2, 3)]);
        assert_eq!(bdd.rename(g, &map), bdd.apply_or(-x4, x3));
    }

    #[test]
    fn test_sat_count() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let z = bdd.mk_var(3);

        assert_eq!(bdd.sat_count(bdd.zero, 3), BigUint::from(0u32));
        assert_eq!(bdd.sat_count(bdd.one, 3), BigUint::from(8u32));
        assert_eq!(bdd.sat_count(x, 3), BigUint::from(4u32));
        assert_eq!(bdd.sat_count(-x, 3), BigUint::from(4u32));
        assert_eq!(bdd.sat_count(bdd.apply_and(x, z), 3), BigUint::from(2u32));
        assert_eq!(bdd.sat_count(bdd.apply_or(y, z), 3), BigUint::from(6u32));
        assert_eq!(bdd.sat_count(bdd.apply_eq(x, y), 2), BigUint::from(2u32));
    }
}
