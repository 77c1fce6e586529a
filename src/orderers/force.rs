use std::fmt;

use super::{VarOrder, VarOrderer, VarOrdererData, VarOrdererEffect};
use crate::helper::{RelationsKind, RepresentationKind, Variable};
use crate::metrics::{VarOrderMetric, VarOrderMetricKind};

/// FORCE variable orderer.
///
/// Repeatedly moves every variable to the average center of gravity of the
/// hyper-edges it occurs in, keeping the best order found.
/// Based on Aloul, Markov and Sakallah, "FORCE: A Fast and Easy-To-Implement
/// Variable-Ordering Heuristic", 2003.
#[derive(Debug, Copy, Clone)]
pub struct ForceVarOrderer {
    metric: VarOrderMetricKind,
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl ForceVarOrderer {
    pub fn new(metric: VarOrderMetricKind, relations: RelationsKind, effect: VarOrdererEffect) -> Self {
        Self {
            metric,
            relations,
            effect,
        }
    }
}

/// Maximum number of iterations for `n` variables: `ceil(ln n) * 10`.
fn max_iterations(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    ((n as f64).ln().ceil() * 10.0) as usize
}

impl<V: Variable> VarOrderer<V> for ForceVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        helper.dbg(dbg_level, "Applying FORCE algorithm:");
        helper.dbg(dbg_level + 1, format_args!("Metric: {}", self.metric));
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        helper.dbg_representation(dbg_level + 1, RepresentationKind::HyperEdges, self.relations);

        let hyper_edges = helper.hyper_edges(self.relations);
        if hyper_edges.is_empty() {
            helper.dbg(dbg_level + 1, "Skipping algorithm: no hyper-edges.");
            return data.clone();
        }

        let n = helper.size();
        let max_iter = max_iterations(n);
        helper.dbg(dbg_level + 1, format_args!("Maximum number of iterations: {}", max_iter));

        // Members of each hyper-edge, and for each variable the hyper-edges it occurs in.
        let members: Vec<Vec<usize>> = hyper_edges.iter().map(|edge| edge.iter().collect()).collect();
        let mut occurrences: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (e, edge) in members.iter().enumerate() {
            for &v in edge {
                occurrences[v].push(e);
            }
        }

        let mut cur_indices = helper.get_new_indices_for_var_order(&data.var_order.ordered_vars());
        let mut cur_metric = self.metric.compute_for_new_indices(&cur_indices, hyper_edges);
        let mut best_indices = cur_indices.clone();
        let mut best_metric = cur_metric;
        helper.dbg_metrics_for_new_indices(dbg_level + 1, &cur_indices, "before", self.relations);

        let mut cogs = vec![0.0; members.len()];
        let mut locations: Vec<(usize, f64)> = Vec::with_capacity(n);
        for iteration in 0..max_iter {
            // Center of gravity of each hyper-edge.
            for (cog, edge) in cogs.iter_mut().zip(&members) {
                let sum: usize = edge.iter().map(|&v| cur_indices[v]).sum();
                *cog = sum as f64 / edge.len() as f64;
            }

            // Tentative new location of each variable. Unrelated variables go last.
            locations.clear();
            for (v, edges) in occurrences.iter().enumerate() {
                let location = if edges.is_empty() {
                    f64::INFINITY
                } else {
                    edges.iter().map(|&e| cogs[e]).sum::<f64>() / edges.len() as f64
                };
                locations.push((v, location));
            }

            // Sort on location, keeping variable order on equal locations.
            locations.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            for (rank, &(v, _)) in locations.iter().enumerate() {
                cur_indices[v] = rank;
            }

            let new_metric = self.metric.compute_for_new_indices(&cur_indices, hyper_edges);
            if new_metric < best_metric {
                best_metric = new_metric;
                best_indices.copy_from_slice(&cur_indices);
            }
            helper.dbg_metrics_for_new_indices(
                dbg_level + 1,
                &cur_indices,
                &format!("iteration {}", iteration + 1),
                self.relations,
            );

            // Stop when there is no change in the metric.
            if new_metric == cur_metric {
                break;
            }
            cur_metric = new_metric;
        }

        helper.dbg_metrics_for_new_indices(dbg_level + 1, &best_indices, "after", self.relations);
        let vars = helper.reorder_for_new_indices(&best_indices);
        data.with_new_order(VarOrder::from_ordered_vars(vars), self.effect)
    }
}

impl fmt::Display for ForceVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "force(metric={}, relations={}, effect={})",
            self.metric, self.relations, self.effect
        )
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bitset::BitSet;
    use crate::helper::VarOrderHelper;
    use crate::orderers::tests::data;

    #[test]
    fn test_max_iterations() {
        assert_eq!(max_iterations(0), 0);
        assert_eq!(max_iterations(1), 0);
        assert_eq!(max_iterations(2), 10);
        assert_eq!(max_iterations(3), 20);
        assert_eq!(max_iterations(100), 50);
    }

    #[test]
    fn test_never_worse() {
        let data = data();
        let edges = data.helper.hyper_edges(RelationsKind::Legacy);
        for order in [vec!["a", "b", "c", "d", "e"], vec!["d", "a", "e", "b", "c"], vec!["e", "c", "a", "d", "b"]] {
            let data = data.with_new_order(VarOrder::from_ordered_vars(order), VarOrdererEffect::VarOrder);
            for metric in [VarOrderMetricKind::TotalSpan, VarOrderMetricKind::Wes] {
                let force = ForceVarOrderer::new(metric, RelationsKind::Legacy, VarOrdererEffect::VarOrder);
                let result = force.order(&data, 0);
                let before = metric.compute_for_var_order(&data.helper, &data.var_order.ordered_vars(), edges);
                let after = metric.compute_for_var_order(&data.helper, &result.var_order.ordered_vars(), edges);
                assert!(after <= before, "{} got worse: {} > {}", force, after, before);
            }
        }
    }

    #[test]
    fn test_unrelated_variables_last() {
        let vars = vec!["a", "b", "c", "d"];
        let edges = vec![BitSet::from_indices(4, [0, 3]), BitSet::from_indices(4, [2, 3])];
        let helper = VarOrderHelper::with_hyper_edges(vars.clone(), edges);
        let data = VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper);
        let force =
            ForceVarOrderer::new(VarOrderMetricKind::TotalSpan, RelationsKind::Legacy, VarOrdererEffect::VarOrder);
        let result = force.order(&data, 0);
        assert_eq!(result.var_order.ordered_vars().last(), Some(&"b"));
    }

    #[test]
    fn test_skip_without_hyper_edges() {
        let vars = vec!["b", "a"];
        let helper = VarOrderHelper::with_hyper_edges(vars.clone(), vec![]);
        let data = VarOrdererData::new(vars.clone(), VarOrder::from_ordered_vars(vars), helper);
        let force = ForceVarOrderer::new(VarOrderMetricKind::TotalSpan, RelationsKind::Legacy, VarOrdererEffect::Both);
        let result = force.order(&data, 0);
        assert_eq!(result.var_order, data.var_order);
        assert_eq!(
            force.to_string(),
            "force(metric=total-span, relations=legacy, effect=both)"
        );
    }
}
