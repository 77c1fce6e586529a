use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{VarOrder, VarOrderer, VarOrdererData, VarOrdererEffect};
use crate::helper::{RelationsKind, RepresentationKind, Variable};

/// Orders the variables as in the model.
#[derive(Debug, Copy, Clone)]
pub struct ModelVarOrderer {
    effect: VarOrdererEffect,
}

impl ModelVarOrderer {
    pub fn new(effect: VarOrdererEffect) -> Self {
        Self { effect }
    }
}

impl<V: Variable> VarOrderer<V> for ModelVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        data.helper.dbg(dbg_level, "Applying model variable order:");
        data.helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        let order = VarOrder::from_ordered_vars(data.vars_in_model_order.to_vec());
        data.with_new_order(order, self.effect)
    }
}

impl fmt::Display for ModelVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model(effect={})", self.effect)
    }
}

/// Orders the variables by their natural ordering.
#[derive(Debug, Copy, Clone)]
pub struct SortedVarOrderer {
    effect: VarOrdererEffect,
}

impl SortedVarOrderer {
    pub fn new(effect: VarOrdererEffect) -> Self {
        Self { effect }
    }
}

impl<V: Variable> VarOrderer<V> for SortedVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        data.helper.dbg(dbg_level, "Applying sorted variable order:");
        data.helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        let mut vars = data.vars_in_model_order.to_vec();
        vars.sort();
        data.with_new_order(VarOrder::from_ordered_vars(vars), self.effect)
    }
}

impl fmt::Display for SortedVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sorted(effect={})", self.effect)
    }
}

/// Shuffles the model order of the variables.
///
/// With a seed, the order is reproducible. Without one, the generator is seeded from the OS.
#[derive(Debug, Copy, Clone)]
pub struct RandomVarOrderer {
    seed: Option<u64>,
    effect: VarOrdererEffect,
}

impl RandomVarOrderer {
    pub fn new(seed: Option<u64>, effect: VarOrdererEffect) -> Self {
        Self { seed, effect }
    }
}

impl<V: Variable> VarOrderer<V> for RandomVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        data.helper.dbg(dbg_level, "Applying a random variable order:");
        match self.seed {
            Some(seed) => data.helper.dbg(dbg_level + 1, format_args!("Seed: {}", seed)),
            None => data.helper.dbg(dbg_level + 1, "Seed: random"),
        }
        data.helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let mut vars = data.vars_in_model_order.to_vec();
        vars.shuffle(&mut rng);
        data.with_new_order(VarOrder::from_ordered_vars(vars), self.effect)
    }
}

impl fmt::Display for RandomVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) => write!(f, "random(seed={}, effect={})", seed, self.effect),
            None => write!(f, "random(effect={})", self.effect),
        }
    }
}

/// Reverses the current variable order, both the groups and the variables within each group.
#[derive(Debug, Copy, Clone)]
pub struct ReverseVarOrderer {
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl ReverseVarOrderer {
    pub fn new(relations: RelationsKind, effect: VarOrdererEffect) -> Self {
        Self { relations, effect }
    }
}

impl<V: Variable> VarOrderer<V> for ReverseVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        helper.dbg(dbg_level, "Reversing the variable order:");
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        helper.dbg_representation(dbg_level + 1, RepresentationKind::HyperEdges, self.relations);
        helper.dbg_metrics_for_var_order(dbg_level + 1, &data.var_order.ordered_vars(), "before", self.relations);

        let groups: Vec<Vec<V>> = data
            .var_order
            .groups()
            .iter()
            .rev()
            .map(|group| group.iter().rev().cloned().collect())
            .collect();
        let order = VarOrder::new(groups);

        helper.dbg_metrics_for_var_order(dbg_level + 1, &order.ordered_vars(), "reversed", self.relations);
        data.with_new_order(order, self.effect)
    }
}

impl fmt::Display for ReverseVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reverse(relations={}, effect={})", self.relations, self.effect)
    }
}
