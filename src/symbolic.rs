//! Symbolic oracle used by the edge workset algorithm and the reachability driver.
//!
//! The workset machinery only needs a handful of capabilities from a synthesis
//! automaton: its ordered edges (per direction), the event and guard of each
//! edge, a one-step image, and predicate conjunction, disjunction and emptiness.
//! [`BddAutomaton`] provides them on top of [`Bdd`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

/// Direction of reachability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        })
    }
}

pub trait SymbolicEdge {
    type Event: Clone + Eq + Hash + fmt::Debug;

    fn event(&self) -> &Self::Event;
}

/// What the dependency set creators require from a synthesis automaton.
pub trait SymbolicAutomaton {
    /// State predicate. Equal predicates denote the same set of states.
    type Pred: Clone + PartialEq;
    type Edge: SymbolicEdge;

    /// Returns the edges, in the order in which they are applied in the given direction.
    fn ordered_edges(&self, direction: Direction) -> &[Self::Edge];

    fn guard(&self, edge: &Self::Edge) -> Self::Pred;

    /// Returns the states reachable by applying the edge once, from any state.
    fn forward_image_of_true(&self, edge: &Self::Edge) -> Self::Pred;

    fn and(&self, a: &Self::Pred, b: &Self::Pred) -> Self::Pred;

    fn is_zero(&self, pred: &Self::Pred) -> bool;
}

/// What the reachability driver requires in addition.
pub trait ReachabilityHost: SymbolicAutomaton {
    /// Applies an edge once: the successors (forward) or predecessors (backward) of `pred`.
    fn apply(&self, edge: &Self::Edge, pred: &Self::Pred, direction: Direction) -> Self::Pred;

    fn or(&self, a: &Self::Pred, b: &Self::Pred) -> Self::Pred;

    /// Describes a predicate, for debug output.
    fn describe(&self, pred: &Self::Pred) -> String;
}

/// Returns the event type of an automaton's edges.
pub type EventOf<A> = <<A as SymbolicAutomaton>::Edge as SymbolicEdge>::Event;

#[derive(Debug, Clone)]
pub struct BddEdge<E> {
    event: E,
    guard: Ref,
    /// Transition relation over current and next state variables, without the guard.
    relation: Ref,
}

impl<E: Clone + Eq + Hash + fmt::Debug> SymbolicEdge for BddEdge<E> {
    type Event = E;

    fn event(&self) -> &E {
        &self.event
    }
}

/// A synthesis automaton over boolean state variables, with BDD predicates.
///
/// State variable `k` (0-based) is BDD variable `2k + 1` in the current state,
/// and `2k + 2` in the next state, so that both copies are interleaved.
#[derive(Debug)]
pub struct BddAutomaton<E> {
    bdd: Bdd,
    num_state_vars: usize,
    edges: Vec<BddEdge<E>>,
    backward_edges: Vec<BddEdge<E>>,
    next_to_cur: HashMap<u32, u32>,
    cur_to_next: HashMap<u32, u32>,
}

impl<E: Clone + Eq + Hash + fmt::Debug> BddAutomaton<E> {
    pub fn new(num_state_vars: usize) -> Self {
        let mut next_to_cur = HashMap::with_capacity(num_state_vars);
        let mut cur_to_next = HashMap::with_capacity(num_state_vars);
        for k in 0..num_state_vars {
            next_to_cur.insert(Self::next_index(k), Self::cur_index(k));
            cur_to_next.insert(Self::cur_index(k), Self::next_index(k));
        }
        Self {
            bdd: Bdd::default(),
            num_state_vars,
            edges: Vec::new(),
            backward_edges: Vec::new(),
            next_to_cur,
            cur_to_next,
        }
    }

    fn cur_index(k: usize) -> u32 {
        2 * k as u32 + 1
    }

    fn next_index(k: usize) -> u32 {
        2 * k as u32 + 2
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    pub fn num_state_vars(&self) -> usize {
        self.num_state_vars
    }

    /// Returns the predicate "state variable `k` is true".
    pub fn var(&self, k: usize) -> Ref {
        assert!(k < self.num_state_vars, "State variable {} does not exist", k);
        self.bdd.mk_var(Self::cur_index(k))
    }

    /// Returns the predicate for a single state, given the values of all state variables.
    pub fn state(&self, values: &[bool]) -> Ref {
        assert_eq!(values.len(), self.num_state_vars, "Expected a value for every state variable");
        let literals = values.iter().enumerate().map(|(k, &value)| {
            let v = Self::cur_index(k) as i32;
            if value {
                v
            } else {
                -v
            }
        });
        self.bdd.cube(literals)
    }

    /// Adds an edge, and returns its index.
    ///
    /// The `updates` assign the new value of state variables, as predicates over the current
    /// state. Variables without an update keep their value.
    pub fn add_edge(&mut self, event: E, guard: Ref, updates: &[(usize, Ref)]) -> usize {
        let mut assigned: Vec<Option<Ref>> = vec![None; self.num_state_vars];
        for &(k, value) in updates {
            assert!(k < self.num_state_vars, "State variable {} does not exist", k);
            assert!(assigned[k].is_none(), "State variable {} is assigned more than once", k);
            assigned[k] = Some(value);
        }

        let bdd = &self.bdd;
        let parts: Vec<Ref> = assigned
            .iter()
            .enumerate()
            .map(|(k, value)| {
                let next = bdd.mk_var(Self::next_index(k));
                let value = value.unwrap_or_else(|| bdd.mk_var(Self::cur_index(k)));
                bdd.apply_eq(next, value)
            })
            .collect();
        let relation = bdd.apply_and_many(parts);

        let edge = BddEdge { event, guard, relation };
        self.edges.push(edge.clone());
        self.backward_edges.push(edge);
        self.edges.len() - 1
    }

    /// Sets the order in which edges are applied backward, as indices into the forward order.
    pub fn set_backward_order(&mut self, order: &[usize]) {
        assert_eq!(order.len(), self.edges.len(), "Backward order must contain every edge exactly once");
        let mut seen = vec![false; order.len()];
        for &i in order {
            assert!(i < order.len(), "Edge {} does not exist", i);
            assert!(!seen[i], "Edge {} occurs more than once", i);
            seen[i] = true;
        }
        self.backward_edges = order.iter().map(|&i| self.edges[i].clone()).collect();
    }

    /// Returns the number of states satisfying the predicate.
    pub fn count_states(&self, pred: Ref) -> BigUint {
        self.bdd.sat_count(pred, 2 * self.num_state_vars) >> self.num_state_vars
    }

    fn cur_vars(&self) -> impl Iterator<Item = u32> {
        (0..self.num_state_vars).map(Self::cur_index)
    }

    fn next_vars(&self) -> impl Iterator<Item = u32> {
        (0..self.num_state_vars).map(Self::next_index)
    }
}

impl<E: Clone + Eq + Hash + fmt::Debug> SymbolicAutomaton for BddAutomaton<E> {
    type Pred = Ref;
    type Edge = BddEdge<E>;

    fn ordered_edges(&self, direction: Direction) -> &[BddEdge<E>] {
        match direction {
            Direction::Forward => &self.edges,
            Direction::Backward => &self.backward_edges,
        }
    }

    fn guard(&self, edge: &BddEdge<E>) -> Ref {
        edge.guard
    }

    fn forward_image_of_true(&self, edge: &BddEdge<E>) -> Ref {
        self.apply(edge, &self.bdd.one, Direction::Forward)
    }

    fn and(&self, a: &Ref, b: &Ref) -> Ref {
        self.bdd.apply_and(*a, *b)
    }

    fn is_zero(&self, pred: &Ref) -> bool {
        self.bdd.is_zero(*pred)
    }
}

impl<E: Clone + Eq + Hash + fmt::Debug> ReachabilityHost for BddAutomaton<E> {
    fn apply(&self, edge: &BddEdge<E>, pred: &Ref, direction: Direction) -> Ref {
        let bdd = &self.bdd;
        match direction {
            Direction::Forward => {
                let enabled = bdd.apply_and(*pred, edge.guard);
                let step = bdd.apply_and(enabled, edge.relation);
                let image = bdd.exists(step, self.cur_vars());
                bdd.rename(image, &self.next_to_cur)
            }
            Direction::Backward => {
                let target = bdd.rename(*pred, &self.cur_to_next);
                let step = bdd.apply_and(edge.relation, target);
                let preimage = bdd.exists(step, self.next_vars());
                bdd.apply_and(preimage, edge.guard)
            }
        }
    }

    fn or(&self, a: &Ref, b: &Ref) -> Ref {
        self.bdd.apply_or(*a, *b)
    }

    fn describe(&self, pred: &Ref) -> String {
        let states = self.count_states(*pred);
        let plural = if states == BigUint::from(1u32) { "" } else { "s" };
        format!("{} state{}", states, plural)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use test_log::test;

    use super::*;
    use crate::bitset::BitSet;

    /// An explicit-state automaton: states are numbered, predicates are sets of states.
    #[derive(Debug)]
    pub(crate) struct ExplicitAutomaton {
        num_states: usize,
        edges: Vec<ExplicitEdge>,
        backward_edges: Vec<ExplicitEdge>,
    }

    #[derive(Debug, Clone)]
    pub(crate) struct ExplicitEdge {
        event: &'static str,
        transitions: Vec<(usize, usize)>,
    }

    impl SymbolicEdge for ExplicitEdge {
        type Event = &'static str;

        fn event(&self) -> &&'static str {
            &self.event
        }
    }

    impl ExplicitAutomaton {
        pub(crate) fn new(num_states: usize, edges: &[(&'static str, &[(usize, usize)])]) -> Self {
            let edges: Vec<ExplicitEdge> = edges
                .iter()
                .map(|&(event, transitions)| ExplicitEdge {
                    event,
                    transitions: transitions.to_vec(),
                })
                .collect();
            Self {
                num_states,
                backward_edges: edges.iter().rev().cloned().collect(),
                edges,
            }
        }

        pub(crate) fn states(&self, states: &[usize]) -> BitSet {
            BitSet::from_indices(self.num_states, states.iter().copied())
        }
    }

    impl SymbolicAutomaton for ExplicitAutomaton {
        type Pred = BitSet;
        type Edge = ExplicitEdge;

        fn ordered_edges(&self, direction: Direction) -> &[ExplicitEdge] {
            match direction {
                Direction::Forward => &self.edges,
                Direction::Backward => &self.backward_edges,
            }
        }

        fn guard(&self, edge: &ExplicitEdge) -> BitSet {
            BitSet::from_indices(self.num_states, edge.transitions.iter().map(|&(from, _)| from))
        }

        fn forward_image_of_true(&self, edge: &ExplicitEdge) -> BitSet {
            BitSet::from_indices(self.num_states, edge.transitions.iter().map(|&(_, to)| to))
        }

        fn and(&self, a: &BitSet, b: &BitSet) -> BitSet {
            let mut result = a.clone();
            result.intersect_with(b);
            result
        }

        fn is_zero(&self, pred: &BitSet) -> bool {
            pred.is_empty()
        }
    }

    impl ReachabilityHost for ExplicitAutomaton {
        fn apply(&self, edge: &ExplicitEdge, pred: &BitSet, direction: Direction) -> BitSet {
            let mut result = BitSet::new(self.num_states);
            for &(from, to) in &edge.transitions {
                match direction {
                    Direction::Forward if pred.contains(from) => {
                        result.insert(to);
                    }
                    Direction::Backward if pred.contains(to) => {
                        result.insert(from);
                    }
                    _ => {}
                }
            }
            result
        }

        fn or(&self, a: &BitSet, b: &BitSet) -> BitSet {
            let mut result = a.clone();
            result.union_with(b);
            result
        }

        fn describe(&self, pred: &BitSet) -> String {
            format!("{:?}", pred)
        }
    }

    /// A 2-bit counter `(b1, b0)`, with events `inc0` (sets b0 when clear), `carry` (sets b1 and clears b0
    /// when b0 is set and b1 clear), and `reset` (clears both when both are set).
    pub(crate) fn counter() -> BddAutomaton<&'static str> {
        let mut aut = BddAutomaton::new(2);
        let b0 = aut.var(0);
        let b1 = aut.var(1);
        let bdd = aut.bdd();
        let (zero, one) = (bdd.zero, bdd.one);

        let guard = bdd.apply_not(b0);
        aut.add_edge("inc0", guard, &[(0, one)]);
        let guard = aut.bdd().apply_and(b0, aut.bdd().apply_not(b1));
        aut.add_edge("carry", guard, &[(0, zero), (1, one)]);
        let guard = aut.bdd().apply_and(b0, b1);
        aut.add_edge("reset", guard, &[(0, zero), (1, zero)]);
        aut
    }

    #[test]
    fn test_forward_apply() {
        let aut = counter();
        let edges = aut.ordered_edges(Direction::Forward);
        let init = aut.state(&[false, false]);

        let next = aut.apply(&edges[0], &init, Direction::Forward);
        assert_eq!(next, aut.state(&[true, false]));

        let next = aut.apply(&edges[1], &next, Direction::Forward);
        assert_eq!(next, aut.state(&[false, true]));

        // 'carry' is disabled in the initial state.
        assert!(aut.is_zero(&aut.apply(&edges[1], &init, Direction::Forward)));
    }

    #[test]
    fn test_backward_apply() {
        let aut = counter();
        let edges = aut.ordered_edges(Direction::Forward);
        let target = aut.state(&[false, false]);

        // Only 'reset' leads to 00.
        let pre = aut.apply(&edges[2], &target, Direction::Backward);
        assert_eq!(pre, aut.state(&[true, true]));
        assert!(aut.is_zero(&aut.apply(&edges[0], &target, Direction::Backward)));

        // 'inc0' keeps b1, so 10 has predecessor 00 and 11 has predecessor 01.
        let both = aut.or(&aut.state(&[true, false]), &aut.state(&[true, true]));
        let pre = aut.apply(&edges[0], &both, Direction::Backward);
        assert_eq!(pre, aut.bdd().apply_not(aut.var(0)));
    }

    #[test]
    fn test_forward_image_of_true() {
        let aut = counter();
        let edges = aut.ordered_edges(Direction::Forward);
        // After 'inc0', b0 is set and b1 is unchanged.
        assert_eq!(aut.forward_image_of_true(&edges[0]), aut.var(0));
        assert_eq!(aut.forward_image_of_true(&edges[2]), aut.state(&[false, false]));
        assert_eq!(aut.guard(&edges[2]), aut.bdd().apply_and(aut.var(0), aut.var(1)));
    }

    #[test]
    fn test_describe() {
        let aut = counter();
        assert_eq!(aut.describe(&aut.bdd().one), "4 states");
        assert_eq!(aut.describe(&aut.var(1)), "2 states");
        assert_eq!(aut.describe(&aut.state(&[true, true])), "1 state");
        assert_eq!(aut.describe(&aut.bdd().zero), "0 states");
    }

    #[test]
    fn test_backward_order() {
        let mut aut = counter();
        aut.set_backward_order(&[2, 0, 1]);
        let events: Vec<_> = aut.ordered_edges(Direction::Backward).iter().map(|e| *e.event()).collect();
        assert_eq!(events, vec!["reset", "inc0", "carry"]);
        let events: Vec<_> = aut.ordered_edges(Direction::Forward).iter().map(|e| *e.event()).collect();
        assert_eq!(events, vec!["inc0", "carry", "reset"]);
    }

    #[test]
    #[should_panic(expected = "occurs more than once")]
    fn test_backward_order_not_a_permutation() {
        let mut aut = counter();
        aut.set_backward_order(&[0, 0, 1]);
    }

    #[test]
    fn test_explicit_automaton() {
        let aut = ExplicitAutomaton::new(3, &[("a", &[(0, 1)]), ("b", &[(1, 2)])]);
        let edges = aut.ordered_edges(Direction::Forward);
        assert_eq!(aut.apply(&edges[0], &aut.states(&[0]), Direction::Forward), aut.states(&[1]));
        assert_eq!(aut.apply(&edges[1], &aut.states(&[2]), Direction::Backward), aut.states(&[1]));
        assert_eq!(aut.ordered_edges(Direction::Backward)[0].event(), &"b");
    }
}
