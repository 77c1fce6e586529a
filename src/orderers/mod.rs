//! Variable orderers.
//!
//! An orderer takes [`VarOrdererData`] (the variables in model order, the current
//! variable order, and a [`VarOrderHelper`] for the relations between the
//! variables) and produces new data. Orderers compose: [`SequentialVarOrderer`]
//! chains them, [`ChoiceVarOrderer`] picks the best of several.
//!
//! Every orderer displays as its option syntax, e.g.
//! `force(metric=total-span, relations=linearized, effect=var-order)`.
//!
//! ```
//! use bdd_synth::bitset::BitSet;
//! use bdd_synth::helper::{RelationsKind, VarOrderHelper};
//! use bdd_synth::metrics::VarOrderMetricKind;
//! use bdd_synth::orderers::{ForceVarOrderer, VarOrder, VarOrderer, VarOrdererData, VarOrdererEffect};
//!
//! let vars = vec!["a", "b", "c"];
//! let edges = vec![BitSet::from_indices(3, [0, 2])];
//! let helper = VarOrderHelper::with_hyper_edges(vars.clone(), edges);
//! let data = VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper);
//!
//! let force = ForceVarOrderer::new(VarOrderMetricKind::TotalSpan, RelationsKind::Legacy, VarOrdererEffect::VarOrder);
//! let result = force.order(&data, 0);
//! // "a" and "c" are related, so FORCE moves them together.
//! assert_eq!(result.var_order.ordered_vars(), vec!["a", "c", "b"]);
//! ```

mod basic;
mod composite;
mod force;
mod graph_based;
mod sliding_window;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

pub use basic::{ModelVarOrderer, RandomVarOrderer, ReverseVarOrderer, SortedVarOrderer};
pub use composite::{ChoiceVarOrderer, DcshVarOrderer, SequentialVarOrderer};
pub use force::ForceVarOrderer;
pub use graph_based::{SloanVarOrderer, WeightedCuthillMcKeeVarOrderer};
pub use sliding_window::SlidingWindowVarOrderer;

use crate::error::Error;
use crate::helper::{VarOrderHelper, Variable};

pub trait VarOrderer<V: Variable>: fmt::Display {
    /// Orders the variables. Debug output is indented according to `dbg_level`.
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V>;
}

/// A variable order: ordered groups of interleaved variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarOrder<V> {
    groups: Vec<Vec<V>>,
}

impl<V: Variable> VarOrder<V> {
    pub fn new(groups: Vec<Vec<V>>) -> Self {
        Self { groups }
    }

    /// Creates a variable order without interleaving.
    pub fn from_ordered_vars(vars: Vec<V>) -> Self {
        Self::new(vars.into_iter().map(|v| vec![v]).collect())
    }

    pub fn groups(&self) -> &[Vec<V>] {
        &self.groups
    }

    /// Returns all variables, in order.
    pub fn ordered_vars(&self) -> Vec<V> {
        self.groups.iter().flatten().cloned().collect()
    }
}

/// What an orderer's result replaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VarOrdererEffect {
    /// The variable order.
    VarOrder,
    /// The representations of the relations: hyper-edges and graphs are recreated for the new order.
    Representations,
    /// Both the variable order and the representations.
    Both,
}

impl VarOrdererEffect {
    pub fn updates_var_order(self) -> bool {
        matches!(self, VarOrdererEffect::VarOrder | VarOrdererEffect::Both)
    }

    pub fn updates_representations(self) -> bool {
        matches!(self, VarOrdererEffect::Representations | VarOrdererEffect::Both)
    }
}

impl fmt::Display for VarOrdererEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VarOrdererEffect::VarOrder => "var-order",
            VarOrdererEffect::Representations => "representations",
            VarOrdererEffect::Both => "both",
        })
    }
}

impl FromStr for VarOrdererEffect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "var-order" => Ok(VarOrdererEffect::VarOrder),
            "representations" => Ok(VarOrdererEffect::Representations),
            "both" => Ok(VarOrdererEffect::Both),
            _ => Err(Error::option(
                "effect",
                s,
                "expected \"var-order\", \"representations\" or \"both\"",
            )),
        }
    }
}

/// Input and output of variable orderers.
#[derive(Debug, Clone)]
pub struct VarOrdererData<V> {
    /// The variables, in model order.
    pub vars_in_model_order: Rc<Vec<V>>,
    /// The current variable order.
    pub var_order: VarOrder<V>,
    /// Helper for the relations between the variables.
    pub helper: Rc<VarOrderHelper<V>>,
}

impl<V: Variable> VarOrdererData<V> {
    pub fn new(vars_in_model_order: Vec<V>, var_order: VarOrder<V>, helper: VarOrderHelper<V>) -> Self {
        Self {
            vars_in_model_order: Rc::new(vars_in_model_order),
            var_order,
            helper: Rc::new(helper),
        }
    }

    /// Derives data with a new variable order, applied according to `effect`.
    pub fn with_new_order(&self, new_order: VarOrder<V>, effect: VarOrdererEffect) -> Self {
        let helper = if effect.updates_representations() {
            Rc::new(self.helper.reordered(&new_order.ordered_vars()))
        } else {
            Rc::clone(&self.helper)
        };
        let var_order = if effect.updates_var_order() {
            new_order
        } else {
            self.var_order.clone()
        };
        Self {
            vars_in_model_order: Rc::clone(&self.vars_in_model_order),
            var_order,
            helper,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use test_log::test;

    use super::*;
    use crate::bitset::BitSet;
    use crate::helper::RelationsKind;

    /// Five variables `a`..`e` in model order, with relations that favour the order `a c e b d`.
    pub(crate) fn data() -> VarOrdererData<&'static str> {
        let vars = vec!["a", "b", "c", "d", "e"];
        let edges = [[0, 2], [0, 2], [2, 4], [2, 4], [1, 3], [4, 1]]
            .iter()
            .map(|e| BitSet::from_indices(5, e.iter().copied()))
            .collect();
        let helper = VarOrderHelper::with_hyper_edges(vars.clone(), edges);
        VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper)
    }

    #[test]
    fn test_var_order() {
        let order = VarOrder::new(vec![vec![1, 2], vec![3]]);
        assert_eq!(order.ordered_vars(), vec![1, 2, 3]);
        assert_eq!(order.groups().len(), 2);
        assert_eq!(VarOrder::from_ordered_vars(vec![1, 2]).groups(), &[vec![1], vec![2]]);
    }

    #[test]
    fn test_effect() {
        let data = data();
        let new_order = VarOrder::from_ordered_vars(vec!["e", "d", "c", "b", "a"]);

        let result = data.with_new_order(new_order.clone(), VarOrdererEffect::VarOrder);
        assert_eq!(result.var_order, new_order);
        assert!(Rc::ptr_eq(&result.helper, &data.helper));

        let result = data.with_new_order(new_order.clone(), VarOrdererEffect::Representations);
        assert_eq!(result.var_order, data.var_order);
        assert_eq!(result.helper.variables(), &["e", "d", "c", "b", "a"]);

        let result = data.with_new_order(new_order.clone(), VarOrdererEffect::Both);
        assert_eq!(result.var_order, new_order);
        assert_eq!(result.helper.variables(), &["e", "d", "c", "b", "a"]);
        assert_eq!(result.helper.hyper_edges(RelationsKind::Legacy)[0].to_string(), "..1.1");
        assert!(Rc::ptr_eq(&result.vars_in_model_order, &data.vars_in_model_order));
    }

    #[test]
    fn test_effect_text() {
        for effect in [VarOrdererEffect::VarOrder, VarOrdererEffect::Representations, VarOrdererEffect::Both] {
            assert_eq!(effect.to_string().parse::<VarOrdererEffect>(), Ok(effect));
        }
        assert!("order".parse::<VarOrdererEffect>().is_err());
    }
}
