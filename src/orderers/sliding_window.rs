use std::fmt;

use super::{VarOrder, VarOrderer, VarOrdererData, VarOrdererEffect};
use crate::error::{Error, Result};
use crate::helper::{fmt_grouped_int, RelationsKind, RepresentationKind, Variable};
use crate::metrics::{VarOrderMetric, VarOrderMetricKind};

/// Largest supported window size.
pub const MAX_WINDOW_SIZE: usize = 12;

/// Sliding window variable orderer.
///
/// Slides a window over the current new indices, tries every permutation of the
/// indices inside the window, and keeps any permutation that strictly improves the metric.
#[derive(Debug, Copy, Clone)]
pub struct SlidingWindowVarOrderer {
    max_len: usize,
    metric: VarOrderMetricKind,
    relations: RelationsKind,
    effect: VarOrdererEffect,
}

impl SlidingWindowVarOrderer {
    /// Creates the orderer, with a maximum window length of `max_len`, in `1..=12`.
    pub fn new(
        max_len: usize,
        metric: VarOrderMetricKind,
        relations: RelationsKind,
        effect: VarOrdererEffect,
    ) -> Result<Self> {
        if !(1..=MAX_WINDOW_SIZE).contains(&max_len) {
            return Err(Error::option(
                "size",
                max_len.to_string(),
                format!("window size must be in range [1..{}]", MAX_WINDOW_SIZE),
            ));
        }
        Ok(Self {
            max_len,
            metric,
            relations,
            effect,
        })
    }
}

/// Calls `f` for every permutation of `values`, generated in place by Heap's algorithm.
///
/// The first call sees `values` unchanged.
fn for_each_permutation(values: &mut [usize], mut f: impl FnMut(&[usize])) {
    let n = values.len();
    let mut counters = vec![0; n];
    f(values);
    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                values.swap(0, i);
            } else {
                values.swap(counters[i], i);
            }
            f(values);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

impl<V: Variable> VarOrderer<V> for SlidingWindowVarOrderer {
    fn order(&self, data: &VarOrdererData<V>, dbg_level: usize) -> VarOrdererData<V> {
        let helper = &data.helper;
        let n = helper.size();
        let length = self.max_len.min(n);

        helper.dbg(dbg_level, "Applying sliding window algorithm:");
        helper.dbg(dbg_level + 1, format_args!("Size: {}", self.max_len));
        helper.dbg(dbg_level + 1, format_args!("Metric: {}", self.metric));
        helper.dbg(dbg_level + 1, format_args!("Relations: {}", self.relations));
        helper.dbg(dbg_level + 1, format_args!("Effect: {}", self.effect));
        helper.dbg_representation(dbg_level + 1, RepresentationKind::HyperEdges, self.relations);
        helper.dbg(dbg_level + 1, format_args!("Window length: {}", fmt_grouped_int(length as u64)));

        let hyper_edges = helper.hyper_edges(self.relations);
        if hyper_edges.is_empty() {
            helper.dbg(dbg_level + 1, "Skipping algorithm: no hyper-edges.");
            return data.clone();
        }

        let mut cur_indices = helper.get_new_indices_for_var_order(&data.var_order.ordered_vars());
        let mut cur_metric = self.metric.compute_for_new_indices(&cur_indices, hyper_edges);
        helper.dbg_metrics_for_new_indices(dbg_level + 1, &cur_indices, "before", self.relations);

        let mut window_indices = cur_indices.clone();
        let mut best_window: Vec<usize> = Vec::with_capacity(length);
        for offset in 0..=(n - length) {
            let mut window = cur_indices[offset..offset + length].to_vec();
            window_indices.copy_from_slice(&cur_indices);
            best_window.clear();

            for_each_permutation(&mut window, |perm| {
                window_indices[offset..offset + length].copy_from_slice(perm);
                let value = self.metric.compute_for_new_indices(&window_indices, hyper_edges);
                if value < cur_metric {
                    cur_metric = value;
                    best_window.clear();
                    best_window.extend_from_slice(perm);
                }
            });

            if !best_window.is_empty() {
                cur_indices[offset..offset + length].copy_from_slice(&best_window);
                helper.dbg_metrics_for_new_indices(
                    dbg_level + 1,
                    &cur_indices,
                    &format!("window {}..{}", offset, offset + length - 1),
                    self.relations,
                );
            }
        }

        helper.dbg_metrics_for_new_indices(dbg_level + 1, &cur_indices, "after", self.relations);
        let vars = helper.reorder_for_new_indices(&cur_indices);
        data.with_new_order(VarOrder::from_ordered_vars(vars), self.effect)
    }
}

impl fmt::Display for SlidingWindowVarOrderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slidwin(size={}, metric={}, relations={}, effect={})",
            self.max_len, self.metric, self.relations, self.effect
        )
    }
}
