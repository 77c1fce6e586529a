use std::fmt;

use super::{VarOrder, VarOrderer, VarOrdererData, VarOrdererEffect};
use crate::helper::{RelationsKind, RepresentationKind, Variable};
use crate::node_order::{NodeOrderer, PseudoPeripheralNodeFinderKind, SloanNodeOrderer, WeightedCuthillMcKeeNodeOrderer};

/// Orders the nodes of the relations graph, and turns the node order into a variable order.
fn order_by_graph<V: Variable>(
    data: &VarOrdererData<V>,
    node_orderer: &impl NodeOrderer,
    relations: RelationsKind,
    effect: VarOrdererEffect,
    dbg_level: usize,
) -> VarOrdererData<V> {
    let helper = &data.helper;
    helper.dbg_representation(dbg_level, RepresentationKind::Graph, relations);

    let graph = helper.graph(relations);
    if graph.edge_count() == 0 {
        helper.dbg(dbg_level, "Skipping algorithm: no graph edges.");
        return data.clone();
    }

    helper.dbg_metrics_for_var_order(dbg_level, &data.var_order.ordered_vars(), "before", relations);
    let order = node_orderer.order_nodes(graph);
    helper.dbg_metrics_for_node_order(dbg_level, &order, "after", relations);

    let vars = helper.reorder_for_node_order(&order);
    data.with_new_order(VarOrder::from_ordered_vars(vars), effect)
}

/// Variable orderer based on the Weighted Cuthill-McKee node ordering of the relations graph.
#[derive(Debug, Copy, Clone)]
pub struct WeightedCuthillMcKeeVarOrderer {
    node_finder: PseudoPeripheralNodeFinderKind,
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl WeightedCuthillMcKeeVarOrderer {
    pub fn new(
        node_finder: PseudoPeripheralNodeFinderKind,
        relations: RelationsKind,
        effect: VarOrdererEffect,
    ) -> Self {
        Self {
            node_finder,
            relations,
            effect,
        }
    }
}

impl<V: Variable> VarOrderer<V> for WeightedCuthillMcKeeVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        helper.dbg(dbg_level, "Applying Weighted Cuthill-McKee algorithm:");
        helper.dbg(dbg_level + 1, format_args!("Node finder: {}", self.node_finder));
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        let node_orderer = WeightedCuthillMcKeeNodeOrderer::new(self.node_finder);
        order_by_graph(data, &node_orderer, self.relations, self.effect, dbg_level + 1)
    }
}

impl fmt::Display for WeightedCuthillMcKeeVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weighted-cm(node-finder={}, relations={}, effect={})",
            self.node_finder, self.relations, self.effect
        )
    }
}

/// Variable orderer based on Sloan's node ordering of the relations graph.
#[derive(Debug, Copy, Clone)]
pub struct SloanVarOrderer {
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl SloanVarOrderer {
    pub fn new(relations: RelationsKind, effect: VarOrdererEffect) -> Self {
        Self { relations, effect }
    }
}

impl<V: Variable> VarOrderer<V> for SloanVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        helper.dbg(dbg_level, "Applying Sloan algorithm:");
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        order_by_graph(data, &SloanNodeOrderer, self.relations, self.effect, dbg_level + 1)
    }
}

impl fmt::Display for SloanVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sloan(relations={}, effect={})", self.relations, self.effect)
    }
}
