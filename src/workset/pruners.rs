//! Edge pruners: heuristics that narrow down the workset before an edge is selected.

use std::fmt;

use crate::bitset::BitSet;

pub trait EdgePruner {
    /// Prunes the workset, in place.
    ///
    /// # Panics
    ///
    /// Panics if the workset is empty.
    fn prune(&self, workset: &mut BitSet) {
        assert!(!workset.is_empty(), "Cannot prune an empty workset");
        self.prune_internal(workset);
        assert!(!workset.is_empty(), "Pruning must keep at least one edge");
    }

    /// Prunes a non-empty workset, keeping at least one edge.
    fn prune_internal(&self, workset: &mut BitSet);

    /// Informs the pruner whether applying the given edge had an effect.
    fn update(&mut self, edge: usize, had_effect: bool);
}

/// Keeps only the workset members with the maximum value.
fn keep_max<T: Ord + Copy>(workset: &mut BitSet, value: impl Fn(usize) -> T) {
    let mut max: Option<T> = None;
    let members: Vec<usize> = workset.iter().collect();
    for i in members {
        let v = value(i);
        match max {
            Some(m) if v < m => {
                workset.remove(i);
            }
            Some(m) if v == m => {}
            _ => {
                // New maximum, so the edges before this one are not the maximum.
                max = Some(v);
                workset.clear_below(i);
            }
        }
    }
}

/// Keeps the edges with the most dependencies, as those may enable the most other edges.
#[derive(Debug, Clone)]
pub struct MaxCardinalityEdgePruner {
    cardinalities: Vec<usize>,
}

impl MaxCardinalityEdgePruner {
    pub fn new(dependencies: &[BitSet]) -> Self {
        Self {
            cardinalities: dependencies.iter().map(|deps| deps.len()).collect(),
        }
    }
}

impl EdgePruner for MaxCardinalityEdgePruner {
    fn prune_internal(&self, workset: &mut BitSet) {
        keep_max(workset, |i| self.cardinalities[i]);
    }

    fn update(&mut self, _edge: usize, _had_effect: bool) {}
}

/// Keeps the edges with the highest cumulative reward.
///
/// Applying an edge adds `effect_reward` to its reward if it had an effect, and
/// `no_effect_reward` otherwise. Rewards saturate at the bounds of `i32`.
#[derive(Debug, Clone)]
pub struct RewardBasedEdgePruner {
    rewards: Vec<i32>,
    effect_reward: i32,
    no_effect_reward: i32,
}

impl RewardBasedEdgePruner {
    pub fn new(edge_count: usize, effect_reward: i32, no_effect_reward: i32) -> Self {
        Self {
            rewards: vec![0; edge_count],
            effect_reward,
            no_effect_reward,
        }
    }

    pub fn reward(&self, edge: usize) -> i32 {
        self.rewards[edge]
    }
}

impl EdgePruner for RewardBasedEdgePruner {
    fn prune_internal(&self, workset: &mut BitSet) {
        keep_max(workset, |i| self.rewards[i]);
    }

    fn update(&mut self, edge: usize, had_effect: bool) {
        let delta = if had_effect { self.effect_reward } else { self.no_effect_reward };
        self.rewards[edge] = self.rewards[edge].saturating_add(delta);
    }
}

/// Applies pruners one after the other.
pub struct SequentialEdgePruner {
    pruners: Vec<Box<dyn EdgePruner>>,
}

impl SequentialEdgePruner {
    pub fn new(pruners: Vec<Box<dyn EdgePruner>>) -> Self {
        assert!(pruners.len() >= 2, "Sequential pruner needs at least two pruners, got {}", pruners.len());
        Self { pruners }
    }
}

impl fmt::Debug for SequentialEdgePruner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialEdgePruner")
            .field("pruners", &self.pruners.len())
            .finish()
    }
}

impl EdgePruner for SequentialEdgePruner {
    fn prune_internal(&self, workset: &mut BitSet) {
        for pruner in &self.pruners {
            pruner.prune(workset);
        }
    }

    fn update(&mut self, edge: usize, had_effect: bool) {
        for pruner in &mut self.pruners {
            pruner.update(edge, had_effect);
        }
    }
}
