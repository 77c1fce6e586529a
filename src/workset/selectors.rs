//! Edge selectors: pick the next edge to apply from the workset.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::pruners::{EdgePruner, MaxCardinalityEdgePruner, RewardBasedEdgePruner, SequentialEdgePruner};
use crate::bitset::BitSet;

pub trait EdgeSelector {
    /// Selects an edge from the workset. The workset is not modified.
    ///
    /// # Panics
    ///
    /// Panics if the workset is empty.
    fn select(&mut self, workset: &BitSet) -> usize {
        assert!(!workset.is_empty(), "Cannot select from an empty workset");
        let edge = self.select_internal(workset);
        assert!(workset.contains(edge), "Selected edge {} is not in the workset", edge);
        edge
    }

    /// Selects an edge from a non-empty workset.
    fn select_internal(&mut self, workset: &BitSet) -> usize;

    /// Informs the selector whether applying the given edge had an effect.
    fn update(&mut self, edge: usize, had_effect: bool);
}

/// Selects the lowest edge index.
#[derive(Debug, Default, Copy, Clone)]
pub struct FirstEdgeSelector;

impl EdgeSelector for FirstEdgeSelector {
    fn select_internal(&mut self, workset: &BitSet) -> usize {
        match workset.first() {
            Some(edge) => edge,
            None => unreachable!("workset is not empty"),
        }
    }

    fn update(&mut self, _edge: usize, _had_effect: bool) {}
}

/// Selects an edge uniformly at random, reproducibly for a given seed.
#[derive(Debug, Clone)]
pub struct RandomEdgeSelector {
    rng: ChaCha8Rng,
}

impl RandomEdgeSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEdgeSelector {
    fn default() -> Self {
        Self::new(0)
    }
}

impl EdgeSelector for RandomEdgeSelector {
    fn select_internal(&mut self, workset: &BitSet) -> usize {
        let nr = self.rng.random_range(0..workset.len());
        match workset.nth(nr) {
            Some(edge) => edge,
            None => unreachable!("{} is below the workset size", nr),
        }
    }

    fn update(&mut self, _edge: usize, _had_effect: bool) {}
}

/// Prunes a copy of the workset, then lets another selector choose from what remains.
pub struct PruningEdgeSelector {
    pruner: Box<dyn EdgePruner>,
    selector: Box<dyn EdgeSelector>,
}

impl PruningEdgeSelector {
    pub fn new(pruner: Box<dyn EdgePruner>, selector: Box<dyn EdgeSelector>) -> Self {
        Self { pruner, selector }
    }

    /// Prunes on the maximum dependency set size, then on the highest reward, then selects the first edge.
    pub fn with_rewards(dependencies: &[BitSet], effect_reward: i32, no_effect_reward: i32) -> Self {
        let pruner = SequentialEdgePruner::new(vec![
            Box::new(MaxCardinalityEdgePruner::new(dependencies)),
            Box::new(RewardBasedEdgePruner::new(dependencies.len(), effect_reward, no_effect_reward)),
        ]);
        Self::new(Box::new(pruner), Box::new(FirstEdgeSelector))
    }
}

impl fmt::Debug for PruningEdgeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PruningEdgeSelector").finish_non_exhaustive()
    }
}

impl EdgeSelector for PruningEdgeSelector {
    fn select_internal(&mut self, workset: &BitSet) -> usize {
        let mut pruned = workset.clone();
        self.pruner.prune(&mut pruned);
        self.selector.select(&pruned)
    }

    fn update(&mut self, edge: usize, had_effect: bool) {
        self.pruner.update(edge, had_effect);
        self.selector.update(edge, had_effect);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_first() {
        let mut selector = FirstEdgeSelector;
        assert_eq!(selector.select(&BitSet::from_indices(10, [7, 3, 9])), 3);
    }

    #[test]
    fn test_random_reproducible() {
        let worksets: Vec<BitSet> = (0..20)
            .map(|i| BitSet::from_indices(100, (i..100).step_by(i + 1)))
            .collect();
        let run = |seed| {
            let mut selector = RandomEdgeSelector::new(seed);
            worksets.iter().map(|w| selector.select(w)).collect::<Vec<_>>()
        };
        let first = run(42);
        assert_eq!(first, run(42));
        for (edge, workset) in first.iter().zip(&worksets) {
            assert!(workset.contains(*edge));
        }
    }

    #[test]
    fn test_random_covers_members() {
        let workset = BitSet::from_indices(8, [1, 4, 6]);
        let mut selector = RandomEdgeSelector::default();
        let mut seen = BitSet::new(8);
        for _ in 0..200 {
            seen.insert(selector.select(&workset));
        }
        assert_eq!(seen, workset);
    }

    #[test]
    fn test_pruning_does_not_modify_workset() {
        let deps = vec![
            BitSet::from_indices(3, [1]),
            BitSet::from_indices(3, [0, 2]),
            BitSet::from_indices(3, []),
        ];
        let mut selector = PruningEdgeSelector::with_rewards(&deps, 1, -1);
        let workset = BitSet::ones(3);
        assert_eq!(selector.select(&workset), 1);
        assert_eq!(workset, BitSet::ones(3));
    }

    #[test]
    fn test_pruning_learns_from_updates() {
        let deps = vec![BitSet::from_indices(2, [1]), BitSet::from_indices(2, [0])];
        let mut selector = PruningEdgeSelector::with_rewards(&deps, 1, -1);
        let workset = BitSet::ones(2);
        assert_eq!(selector.select(&workset), 0);
        selector.update(0, false);
        assert_eq!(selector.select(&workset), 1);
        selector.update(1, false);
        selector.update(1, false);
        assert_eq!(selector.select(&workset), 0);
    }

    #[test]
    #[should_panic(expected = "empty workset")]
    fn test_select_empty() {
        FirstEdgeSelector.select(&BitSet::new(4));
    }
}
