use std::fmt;

use super::basic::ReverseVarOrderer;
use super::graph_based::{SloanVarOrderer, WeightedCuthillMcKeeVarOrderer};
use super::{VarOrderer, VarOrdererData, VarOrdererEffect};
use crate::error::{Error, Result};
use crate::helper::{RelationsKind, RepresentationKind, Variable};
use crate::metrics::{VarOrderMetric, VarOrderMetricKind};
use crate::node_order::PseudoPeripheralNodeFinderKind;

/// Applies orderers in sequence, each to the result of the previous one.
pub struct SequentialVarOrderer<V> {
    orderers: Vec<Box<dyn VarOrderer<V>>>,
}

impl<V: Variable> SequentialVarOrderer<V> {
    pub fn new(orderers: Vec<Box<dyn VarOrderer<V>>>) -> Result<Self> {
        if orderers.len() < 2 {
            return Err(Error::TooFewOrderers {
                kind: "sequential",
                count: orderers.len(),
            });
        }
        Ok(Self { orderers })
    }
}

impl<V: Variable> VarOrderer<V> for SequentialVarOrderer<V> {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        data.helper.dbg(
            dbg_level,
            format_args!("Applying {} orderers, sequentially:", self.orderers.len()),
        );
        let mut result = data.clone();
        for orderer in &self.orderers {
            result = orderer.order(&result, dbg_level + 1);
        }
        result
    }
}

impl<V> fmt::Display for SequentialVarOrderer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, orderer) in self.orderers.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", orderer)?;
        }
        Ok(())
    }
}

/// Applies several orderers to the same input, and picks the result with the lowest metric value.
///
/// On ties, the first of the best results wins.
pub struct ChoiceVarOrderer<V> {
    name: Option<String>,
    choices: Vec<Box<dyn VarOrderer<V>>>,
    metric: VarOrderMetricKind,
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl<V: Variable> ChoiceVarOrderer<V> {
    pub fn new(
        name: Option<String>,
        choices: Vec<Box<dyn VarOrderer<V>>>,
        metric: VarOrderMetricKind,
        relations: RelationsKind,
        effect: VarOrdererEffect,
    ) -> Result<Self> {
        if choices.len() < 2 {
            return Err(Error::TooFewOrderers {
                kind: "choice",
                count: choices.len(),
            });
        }
        Ok(Self {
            name,
            choices,
            metric,
            relations,
            effect,
        })
    }
}

impl<V: Variable> VarOrderer<V> for ChoiceVarOrderer<V> {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        match &self.name {
            Some(name) => helper.dbg(dbg_level, format_args!("Applying {}:", name)),
            None => helper.dbg(dbg_level, "Applying multiple orderers, and choosing the best result:"),
        }
        helper.dbg(dbg_level + 1, format_args!("Metric: {}", self.metric));
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        helper.dbg_representation(dbg_level + 1, RepresentationKind::HyperEdges, self.relations);

        let hyper_edges = helper.hyper_edges(self.relations);
        if hyper_edges.is_empty() {
            let suffix = if self.name.is_none() { "s" } else { "" };
            helper.dbg(dbg_level + 1, format_args!("Skipping orderer{}: no hyper-edges.", suffix));
            return data.clone();
        }

        let mut best: Option<(VarOrdererData<V>, f64)> = None;
        for choice in &self.choices {
            let result = choice.order(data, dbg_level + 1);
            let value = self
                .metric
                .compute_for_var_order(helper, &result.var_order.ordered_vars(), hyper_edges);
            if best.as_ref().map_or(true, |(_, best_value)| value < *best_value) {
                helper.dbg(dbg_level + 1, "Found new best variable order.");
                best = Some((result, value));
            }
        }

        match best {
            Some((result, _)) => data.with_new_order(result.var_order, self.effect),
            None => data.clone(),
        }
    }
}

impl<V> fmt::Display for ChoiceVarOrderer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "or(metric={}, relations={}, effect={}, choices=[",
            self.metric, self.relations, self.effect
        )?;
        for (i, choice) in self.choices.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", choice)?;
        }
        f.write_str("])")
    }
}

/// DSM-based Cuthill-McKee/Sloan variable ordering Heuristic (DCSH).
///
/// Picks the best of Weighted Cuthill-McKee, Sloan, and their reverses.
/// See Lousberg, Thuijsman and Reniers, "DSM-based variable ordering heuristic for
/// reduced computational effort of symbolic supervisor synthesis", 2020.
pub struct DcshVarOrderer<V> {
    node_finder: PseudoPeripheralNodeFinderKind,
    metric: VarOrderMetricKind,
    relations: RelationsKind,
    effect: VarOrdererEffect,
    choice: ChoiceVarOrderer<V>,
}

impl<V: Variable + 'static> DcshVarOrderer<V> {
    pub fn new(
        node_finder: PseudoPeripheralNodeFinderKind,
        metric: VarOrderMetricKind,
        relations: RelationsKind,
        effect: VarOrdererEffect,
    ) -> Self {
        let wcm = || -> Box<dyn VarOrderer<V>> {
            Box::new(WeightedCuthillMcKeeVarOrderer::new(node_finder, relations, VarOrdererEffect::VarOrder))
        };
        let sloan =
            || -> Box<dyn VarOrderer<V>> { Box::new(SloanVarOrderer::new(relations, VarOrdererEffect::VarOrder)) };
        let reversed = |orderer: Box<dyn VarOrderer<V>>| -> Box<dyn VarOrderer<V>> {
            let reverse = Box::new(ReverseVarOrderer::new(relations, VarOrdererEffect::VarOrder));
            Box::new(SequentialVarOrderer {
                orderers: vec![orderer, reverse],
            })
        };

        let choice = ChoiceVarOrderer {
            name: Some("DCSH algorithm".to_string()),
            choices: vec![wcm(), sloan(), reversed(wcm()), reversed(sloan())],
            metric,
            relations,
            effect,
        };
        Self {
            node_finder,
            metric,
            relations,
            effect,
            choice,
        }
    }
}

impl<V: Variable> VarOrderer<V> for DcshVarOrderer<V> {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        self.choice.order(data, dbg_level)
    }
}

impl<V> fmt::Display for DcshVarOrderer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dcsh(node-finder={}, metric={}, relations={}, effect={})",
            self.node_finder, self.metric, self.relations, self.effect
        )
    }
}
