//! Reachability fixpoint driver.

use log::debug;

use super::selectors::EdgeSelector;
use super::PruningEdgeSelector;
use crate::bitset::BitSet;
use crate::symbolic::{Direction, ReachabilityHost, SymbolicEdge};

/// Outcome of a reachability computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityResult<P> {
    /// The fixed point.
    pub pred: P,
    /// Whether the fixed point differs from the initial predicate.
    pub changed: bool,
    /// Number of edge applications it took.
    pub applications: usize,
}

/// Computes reachability fixed points by applying the edges of a host automaton.
pub struct Reachability<'a, H: ReachabilityHost> {
    host: &'a H,
    direction: Direction,
    pred_name: &'a str,
}

impl<'a, H: ReachabilityHost> Reachability<'a, H> {
    /// Creates a driver. The predicate name is used in debug output only.
    pub fn new(host: &'a H, direction: Direction, pred_name: &'a str) -> Self {
        Self {
            host,
            direction,
            pred_name,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies the edge once, and returns the extended predicate if it changed.
    fn step(&self, edge: &H::Edge, pred: &H::Pred) -> Option<H::Pred> {
        let image = self.host.apply(edge, pred, self.direction);
        let new_pred = self.host.or(pred, &image);
        if new_pred == *pred {
            return None;
        }
        debug!(
            "{}: {} -> {} [{} reach with edge: {:?}]",
            self.pred_name,
            self.host.describe(pred),
            self.host.describe(&new_pred),
            self.direction,
            edge.event()
        );
        Some(new_pred)
    }

    /// Applies the masked edges in their fixed order, until none of them has an effect.
    ///
    /// `edge_mask` selects edges by their index in the ordered edges of the direction.
    pub fn perform_fixed_order(&self, pred: H::Pred, edge_mask: &BitSet) -> ReachabilityResult<H::Pred> {
        let edges = self.host.ordered_edges(self.direction);
        assert_eq!(edge_mask.size(), edges.len(), "Edge mask must cover every edge");
        let to_apply: Vec<&H::Edge> = edge_mask.iter().map(|i| &edges[i]).collect();

        let mut pred = pred;
        let mut changed = false;
        let mut applications = 0;
        let mut iteration = 0;
        // Number of edges to apply without effect to reach the fixed point.
        let mut remaining = to_apply.len();
        'outer: while remaining > 0 {
            iteration += 1;
            debug!("{} reachability: iteration {}.", capitalize(&self.direction.to_string()), iteration);
            for edge in &to_apply {
                applications += 1;
                match self.step(edge, &pred) {
                    Some(new_pred) => {
                        pred = new_pred;
                        changed = true;
                        remaining = to_apply.len();
                    }
                    None => {
                        remaining -= 1;
                        if remaining == 0 {
                            break 'outer;
                        }
                    }
                }
            }
        }
        ReachabilityResult {
            pred,
            changed,
            applications,
        }
    }

    /// Applies the masked edges using the edge workset algorithm, with the default selector.
    pub fn perform_workset(
        &self,
        pred: H::Pred,
        edge_mask: &BitSet,
        dependencies: &[BitSet],
    ) -> ReachabilityResult<H::Pred> {
        let mut selector = PruningEdgeSelector::with_rewards(dependencies, 1, -1);
        self.perform_workset_with(pred, edge_mask, dependencies, &mut selector)
    }

    /// Applies the masked edges using the edge workset algorithm.
    ///
    /// The selected edge is applied until it no longer has an effect. If it had an effect,
    /// its dependencies that are in the mask are added to the workset. It is then removed
    /// from the workset, whether or not it depends on itself.
    pub fn perform_workset_with(
        &self,
        pred: H::Pred,
        edge_mask: &BitSet,
        dependencies: &[BitSet],
        selector: &mut dyn EdgeSelector,
    ) -> ReachabilityResult<H::Pred> {
        let edges = self.host.ordered_edges(self.direction);
        assert_eq!(edge_mask.size(), edges.len(), "Edge mask must cover every edge");
        assert_eq!(dependencies.len(), edges.len(), "Expected a dependency set for every edge");

        let mut pred = pred;
        let mut changed = false;
        let mut applications = 0;
        let mut workset = edge_mask.clone();
        while !workset.is_empty() {
            let edge_idx = selector.select(&workset);
            let edge = &edges[edge_idx];

            let mut changed_by_edge = false;
            loop {
                applications += 1;
                match self.step(edge, &pred) {
                    Some(new_pred) => {
                        pred = new_pred;
                        changed = true;
                        changed_by_edge = true;
                    }
                    None => break,
                }
            }

            if changed_by_edge {
                let mut dependents = dependencies[edge_idx].clone();
                dependents.intersect_with(edge_mask);
                workset.union_with(&dependents);
            }
            workset.remove(edge_idx);

            selector.update(edge_idx, changed_by_edge);
        }
        ReachabilityResult {
            pred,
            changed,
            applications,
        }
    }

    /// Computes the fixed point, with the workset algorithm if dependency sets are given.
    pub fn perform(
        &self,
        pred: H::Pred,
        edge_mask: &BitSet,
        dependencies: Option<&[BitSet]>,
    ) -> ReachabilityResult<H::Pred> {
        debug!("{}: {} [initial].", self.pred_name, self.host.describe(&pred));
        let result = match dependencies {
            Some(dependencies) => self.perform_workset(pred, edge_mask, dependencies),
            None => self.perform_fixed_order(pred, edge_mask),
        };
        if result.changed {
            debug!("{}: {} [fixed point].", self.pred_name, self.host.describe(&result.pred));
        }
        result
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::symbolic::tests::{counter, ExplicitAutomaton};
    use crate::symbolic::{BddAutomaton, SymbolicAutomaton};
    use crate::workset::dependencies::{
        AllEdgesEdgeDependencySetCreator, BddBasedEdgeDependencySetCreator, EdgeDependencySetCreator,
    };
    use crate::workset::selectors::RandomEdgeSelector;

    fn chain() -> ExplicitAutomaton {
        // 0 -a-> 1 -b-> 2 -c-> 3, and 4 -d-> 0 (4 not reachable from 0).
        ExplicitAutomaton::new(5, &[("c", &[(2, 3)]), ("b", &[(1, 2)]), ("a", &[(0, 1)]), ("d", &[(4, 0)])])
    }

    #[test]
    fn test_fixed_order() {
        let aut = chain();
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
        let result = reach.perform_fixed_order(aut.states(&[0]), &BitSet::ones(4));
        assert_eq!(result.pred, aut.states(&[0, 1, 2, 3]));
        assert!(result.changed);
    }

    #[test]
    fn test_fixed_order_masked() {
        let aut = chain();
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
        // Without 'b', state 2 is not reached.
        let mask = BitSet::from_indices(4, [0, 2, 3]);
        let result = reach.perform_fixed_order(aut.states(&[0]), &mask);
        assert_eq!(result.pred, aut.states(&[0, 1]));
    }

    #[test]
    fn test_unchanged() {
        let aut = chain();
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
        let result = reach.perform(aut.states(&[3]), &BitSet::ones(4), None);
        assert_eq!(result.pred, aut.states(&[3]));
        assert!(!result.changed);
        assert_eq!(result.applications, 4);

        let result = reach.perform_fixed_order(aut.states(&[3]), &BitSet::new(4));
        assert_eq!(result.applications, 0);
    }

    #[test]
    fn test_workset_matches_fixed_order() {
        let aut = chain();
        let mask = BitSet::ones(4);
        let deps = BddBasedEdgeDependencySetCreator.create(&aut, true);
        for direction in [Direction::Forward, Direction::Backward] {
            let start = match direction {
                Direction::Forward => aut.states(&[0]),
                Direction::Backward => aut.states(&[3]),
            };
            let reach = Reachability::new(&aut, direction, "States");
            let fixed = reach.perform(start.clone(), &mask, None);
            let workset = reach.perform(start, &mask, deps.get(direction));
            assert_eq!(workset.pred, fixed.pred);
            assert_eq!(workset.changed, fixed.changed);
        }
    }

    #[test]
    fn test_workset_fewer_applications() {
        let aut = chain();
        let mask = BitSet::ones(4);
        let deps = BddBasedEdgeDependencySetCreator.create(&aut, true);
        let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
        let fixed = reach.perform_fixed_order(aut.states(&[0]), &mask);
        let workset = reach.perform_workset(aut.states(&[0]), &mask, deps.forward().unwrap());
        assert_eq!(workset.pred, fixed.pred);
        assert!(workset.applications < fixed.applications);
    }

    #[test]
    fn test_workset_random_selector() {
        let aut = counter();
        let mask = BitSet::ones(3);
        let init = aut.state(&[false, false]);
        for creator in [
            &BddBasedEdgeDependencySetCreator as &dyn EdgeDependencySetCreator<BddAutomaton<&'static str>>,
            &AllEdgesEdgeDependencySetCreator,
        ] {
            let deps = creator.create(&aut, true);
            for seed in 0..5 {
                let reach = Reachability::new(&aut, Direction::Forward, "Reachable states");
                let mut selector = RandomEdgeSelector::new(seed);
                let result = reach.perform_workset_with(init, &mask, deps.forward().unwrap(), &mut selector);
                assert_eq!(result.pred, aut.bdd().one);
            }
        }
    }

    #[test]
    fn test_counter_backward() {
        let aut = counter();
        let mask = BitSet::ones(aut.ordered_edges(Direction::Backward).len());
        let deps = BddBasedEdgeDependencySetCreator.create(&aut, false);
        let reach = Reachability::new(&aut, Direction::Backward, "Nonblocking states");
        let target = aut.state(&[false, true]);
        let result = reach.perform(target, &mask, deps.get(Direction::Backward));
        // Every state can reach 01.
        assert_eq!(result.pred, aut.bdd().one);
    }
}
