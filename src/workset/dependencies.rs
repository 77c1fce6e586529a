//! Edge dependency sets.
//!
//! The dependency set of an edge holds the edges that may have become enabled
//! by applying it. Dependency sets may over-approximate, but never
//! under-approximate: a missing dependency makes reachability miss states.

use std::collections::{HashMap, HashSet};

use log::{debug, log_enabled, trace, Level};

use crate::bitset::{fmt_bitsets, BitSet};
use crate::symbolic::{Direction, EventOf, SymbolicAutomaton, SymbolicEdge};

/// Dependency sets of the edges, per direction, indexed as the ordered edges of that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDependencies {
    forward: Option<Vec<BitSet>>,
    backward: Vec<BitSet>,
}

impl EdgeDependencies {
    pub fn new(forward: Option<Vec<BitSet>>, backward: Vec<BitSet>) -> Self {
        if let Some(forward) = &forward {
            assert_eq!(
                forward.len(),
                backward.len(),
                "Forward and backward dependencies must cover the same edges"
            );
        }
        Self { forward, backward }
    }

    /// Returns the forward dependency sets, if they were computed.
    pub fn forward(&self) -> Option<&[BitSet]> {
        self.forward.as_deref()
    }

    pub fn backward(&self) -> &[BitSet] {
        &self.backward
    }

    pub fn get(&self, direction: Direction) -> Option<&[BitSet]> {
        match direction {
            Direction::Forward => self.forward(),
            Direction::Backward => Some(self.backward()),
        }
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.backward.len()
    }
}

pub trait EdgeDependencySetCreator<A: SymbolicAutomaton> {
    /// Creates the dependency sets for the edges of the automaton.
    ///
    /// Backward dependency sets are always created, forward ones only if `forward_enabled`.
    fn create(&self, aut: &A, forward_enabled: bool) -> EdgeDependencies;
}

/// Makes every edge depend on all edges. Always sound, never efficient.
#[derive(Debug, Default, Copy, Clone)]
pub struct AllEdgesEdgeDependencySetCreator;

impl<A: SymbolicAutomaton> EdgeDependencySetCreator<A> for AllEdgesEdgeDependencySetCreator {
    fn create(&self, aut: &A, forward_enabled: bool) -> EdgeDependencies {
        let n = aut.ordered_edges(Direction::Backward).len();
        let all = vec![BitSet::ones(n); n];
        let deps = EdgeDependencies::new(forward_enabled.then(|| all.clone()), all);
        dbg_dependencies(aut, &deps);
        deps
    }
}

/// Derives the dependency sets from which events may follow which other events.
///
/// An event may follow another if the guard of one of its edges overlaps with the
/// states reachable by one of the edges of the other event, from any state. Events
/// are not recorded to follow themselves. Instead, an edge always depends on the other
/// edges of its own event, which the per-event relation can not tell apart.
#[derive(Debug, Default, Copy, Clone)]
pub struct BddBasedEdgeDependencySetCreator;

impl BddBasedEdgeDependencySetCreator {
    /// Computes for each event which other events may follow it.
    fn follow_events<A: SymbolicAutomaton>(aut: &A) -> HashMap<EventOf<A>, HashSet<EventOf<A>>> {
        let edges = aut.ordered_edges(Direction::Forward);
        let mut follow: HashMap<EventOf<A>, HashSet<EventOf<A>>> = HashMap::with_capacity(edges.len());
        for preceding in edges {
            let reachable = aut.forward_image_of_true(preceding);
            for following in edges {
                if preceding.event() == following.event() {
                    continue;
                }
                let enabled = aut.and(&reachable, &aut.guard(following));
                if !aut.is_zero(&enabled) {
                    trace!("Event {:?} may follow event {:?}", following.event(), preceding.event());
                    follow
                        .entry(preceding.event().clone())
                        .or_default()
                        .insert(following.event().clone());
                }
            }
        }
        follow
    }

    fn dependencies<A: SymbolicAutomaton>(
        follow: &HashMap<EventOf<A>, HashSet<EventOf<A>>>,
        edges: &[A::Edge],
        direction: Direction,
    ) -> Vec<BitSet> {
        let follows = |a: &EventOf<A>, b: &EventOf<A>| follow.get(a).is_some_and(|events| events.contains(b));
        edges
            .iter()
            .enumerate()
            .map(|(j, edge1)| {
                let indices = edges.iter().enumerate().filter_map(|(i, edge2)| {
                    if i == j {
                        return None;
                    }
                    let is_dependency = edge1.event() == edge2.event()
                        || match direction {
                            Direction::Forward => follows(edge1.event(), edge2.event()),
                            Direction::Backward => follows(edge2.event(), edge1.event()),
                        };
                    is_dependency.then_some(i)
                });
                BitSet::from_indices(edges.len(), indices)
            })
            .collect()
    }
}

impl<A: SymbolicAutomaton> EdgeDependencySetCreator<A> for BddBasedEdgeDependencySetCreator {
    fn create(&self, aut: &A, forward_enabled: bool) -> EdgeDependencies {
        let follow = Self::follow_events(aut);
        let backward = Self::dependencies::<A>(&follow, aut.ordered_edges(Direction::Backward), Direction::Backward);
        let forward = forward_enabled
            .then(|| Self::dependencies::<A>(&follow, aut.ordered_edges(Direction::Forward), Direction::Forward));
        let deps = EdgeDependencies::new(forward, backward);
        dbg_dependencies(aut, &deps);
        deps
    }
}

fn dbg_dependencies<A: SymbolicAutomaton>(aut: &A, deps: &EdgeDependencies) {
    if !log_enabled!(Level::Debug) || deps.edge_count() == 0 {
        return;
    }
    for direction in [Direction::Forward, Direction::Backward] {
        let Some(sets) = deps.get(direction) else {
            continue;
        };
        debug!("Edge workset algorithm {} dependencies:", direction);
        let edges = aut.ordered_edges(direction);
        let labels: Vec<String> = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| format!("{}: {:?}", i + 1, edge.event()))
            .collect();
        let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
        for (label, set) in labels.iter().zip(fmt_bitsets(sets).lines()) {
            debug!(" - {:<width$} {}", label, set, width = width);
        }
    }
}
