//! Variable order metrics.
//!
//! A metric scores a variable order against a set of hyper-edges, given the new
//! index of each variable (`new_indices[i]` is the new position of the variable
//! originally at position `i`). Lower values are better.

use std::fmt;
use std::str::FromStr;

use crate::bitset::BitSet;
use crate::error::Error;
use crate::helper::{VarOrderHelper, Variable};

pub trait VarOrderMetric {
    /// Computes the metric for the given new indices of the variables.
    fn compute_for_new_indices(&self, new_indices: &[usize], hyper_edges: &[BitSet]) -> f64;

    /// Computes the metric for a variable order.
    fn compute_for_var_order<V: Variable>(
        &self,
        helper: &VarOrderHelper<V>,
        order: &[V],
        hyper_edges: &[BitSet],
    ) -> f64 {
        let new_indices = helper.get_new_indices_for_var_order(order);
        self.compute_for_new_indices(&new_indices, hyper_edges)
    }

    /// Computes the metric for a node order of the helper's graph.
    fn compute_for_node_order<V: Variable>(
        &self,
        helper: &VarOrderHelper<V>,
        order: &[usize],
        hyper_edges: &[BitSet],
    ) -> f64 {
        let new_indices = helper.get_new_indices_for_node_order(order);
        self.compute_for_new_indices(&new_indices, hyper_edges)
    }
}

/// Minimum and maximum new index of the members of a hyper-edge.
fn index_range(new_indices: &[usize], edge: &BitSet) -> Option<(usize, usize)> {
    edge.iter().map(|i| new_indices[i]).fold(None, |range, idx| match range {
        None => Some((idx, idx)),
        Some((lo, hi)) => Some((lo.min(idx), hi.max(idx))),
    })
}

/// Total span: the sum over all hyper-edges of the distance between their outermost variables.
#[derive(Debug, Default, Copy, Clone)]
pub struct TotalSpanMetric;

impl TotalSpanMetric {
    pub fn compute(new_indices: &[usize], hyper_edges: &[BitSet]) -> u64 {
        hyper_edges
            .iter()
            .filter_map(|edge| index_range(new_indices, edge))
            .map(|(lo, hi)| (hi - lo) as u64)
            .sum()
    }
}

impl VarOrderMetric for TotalSpanMetric {
    fn compute_for_new_indices(&self, new_indices: &[usize], hyper_edges: &[BitSet]) -> f64 {
        Self::compute(new_indices, hyper_edges) as f64
    }
}

/// Weighted Event Span (WES).
///
/// For each hyper-edge `e` with top (lowest) new index `x_t` and bottom (highest)
/// new index `x_b`, over `n_x` variables and `n_E` hyper-edges:
///
/// ```text
/// WES = SUM_e (2 * x_b) / n_x * (x_b - x_t + 1) / (n_x * n_E)
/// ```
///
/// Deeper and wider hyper-edges weigh more, as BDD operations on them tend to be more expensive.
/// See Lousberg, Thuijsman and Reniers, "DSM-based variable ordering heuristic for reduced
/// computational effort of symbolic supervisor synthesis", IFAC-PapersOnLine 53(4), 2020.
#[derive(Debug, Default, Copy, Clone)]
pub struct WesMetric;

impl WesMetric {
    pub fn compute(new_indices: &[usize], hyper_edges: &[BitSet]) -> f64 {
        let nx = new_indices.len() as f64;
        let ne = hyper_edges.len() as f64;
        if new_indices.is_empty() || hyper_edges.is_empty() {
            return 0.0;
        }

        hyper_edges
            .iter()
            .filter_map(|edge| index_range(new_indices, edge))
            .map(|(xt, xb)| {
                let (xt, xb) = (xt as f64, xb as f64);
                (2.0 * xb) / nx * (xb - xt + 1.0) / (nx * ne)
            })
            .sum()
    }
}

impl VarOrderMetric for WesMetric {
    fn compute_for_new_indices(&self, new_indices: &[usize], hyper_edges: &[BitSet]) -> f64 {
        Self::compute(new_indices, hyper_edges)
    }
}

/// The available metrics, usable as a metric themselves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VarOrderMetricKind {
    TotalSpan,
    Wes,
}

impl VarOrderMetric for VarOrderMetricKind {
    fn compute_for_new_indices(&self, new_indices: &[usize], hyper_edges: &[BitSet]) -> f64 {
        match self {
            VarOrderMetricKind::TotalSpan => TotalSpanMetric.compute_for_new_indices(new_indices, hyper_edges),
            VarOrderMetricKind::Wes => WesMetric.compute_for_new_indices(new_indices, hyper_edges),
        }
    }
}

impl fmt::Display for VarOrderMetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VarOrderMetricKind::TotalSpan => "total-span",
            VarOrderMetricKind::Wes => "wes",
        })
    }
}

impl FromStr for VarOrderMetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total-span" => Ok(VarOrderMetricKind::TotalSpan),
            "wes" => Ok(VarOrderMetricKind::Wes),
            _ => Err(Error::option("metric", s, "expected \"total-span\" or \"wes\"")),
        }
    }
}
