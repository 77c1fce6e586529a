//! Variable order helper.
//!
//! [`VarOrderHelper`] is the single place where the two representations of a
//! variable order meet: an explicit sequence of variables (or graph nodes), and
//! the `new_indices` permutation, where `new_indices[i]` is the new position of
//! the variable at position `i` of the helper's variables. It also owns the
//! relations between the variables, as hyper-edges and as a weighted graph per
//! [`RelationsKind`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::{debug, log_enabled, Level};

use crate::bitset::BitSet;
use crate::error::Error;
use crate::graph::Graph;
use crate::metrics::{TotalSpanMetric, WesMetric};

/// A synthesis variable, as far as variable ordering is concerned.
pub trait Variable: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Variable for T {}

/// The granularity with which transitions are split into hyper-edges.
///
/// The hyper-edges themselves are created by the caller, the kind only selects them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RelationsKind {
    Legacy,
    Linearized,
}

impl RelationsKind {
    pub const ALL: [RelationsKind; 2] = [RelationsKind::Legacy, RelationsKind::Linearized];

    fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RelationsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationsKind::Legacy => "legacy",
            RelationsKind::Linearized => "linearized",
        })
    }
}

impl FromStr for RelationsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(RelationsKind::Legacy),
            "linearized" => Ok(RelationsKind::Linearized),
            _ => Err(Error::option("relations", s, "expected \"legacy\" or \"linearized\"")),
        }
    }
}

/// Representations of the relations, for debug output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepresentationKind {
    Graph,
    HyperEdges,
}

/// Column widths of the metrics in [`VarOrderHelper::fmt_metrics`].
#[derive(Debug, Clone, Copy, Default)]
struct MetricWidths {
    total_span: usize,
    total_span_avg: usize,
    wes: usize,
    wes_avg: usize,
}

#[derive(Debug, Clone)]
pub struct VarOrderHelper<V> {
    /// The variables, in the order of the bits of the hyper-edges and the nodes of the graphs.
    variables: Vec<V>,
    /// For each variable, its 0-based index in `variables`.
    orig_indices: HashMap<V, usize>,
    /// Per relations kind, the hyper-edges.
    hyper_edges: Vec<Vec<BitSet>>,
    /// Per relations kind, the clique expansion of the hyper-edges.
    graphs: Vec<Graph>,
    /// Per relations kind, the column widths for metric output.
    widths: Vec<MetricWidths>,
}

impl<V: Variable> VarOrderHelper<V> {
    /// Creates a helper for the given variables and their hyper-edges per relations kind.
    ///
    /// A kind without hyper-edges gets an empty list.
    ///
    /// # Panics
    ///
    /// Panics if a variable occurs more than once, or if a hyper-edge is empty or
    /// not over the domain `0..variables.len()`.
    pub fn new(variables: Vec<V>, hyper_edges: impl IntoIterator<Item = (RelationsKind, Vec<BitSet>)>) -> Self {
        let n = variables.len();
        let mut orig_indices = HashMap::with_capacity(n);
        for (i, var) in variables.iter().enumerate() {
            let prev = orig_indices.insert(var.clone(), i);
            assert!(prev.is_none(), "Duplicate variable {:?}", var);
        }

        let mut per_kind = vec![Vec::new(); RelationsKind::ALL.len()];
        for (kind, edges) in hyper_edges {
            for edge in &edges {
                assert_eq!(edge.size(), n, "Hyper-edge domain must match the number of variables");
                assert!(!edge.is_empty(), "Hyper-edges must not be empty");
            }
            per_kind[kind.ordinal()] = edges;
        }

        let graphs = per_kind.iter().map(|edges| clique_graph(n, edges)).collect();

        let mut helper = Self {
            variables,
            orig_indices,
            hyper_edges: per_kind,
            graphs,
            widths: Vec::new(),
        };
        let identity: Vec<usize> = (0..n).collect();
        helper.widths = RelationsKind::ALL
            .iter()
            .map(|&kind| {
                let (span, span_avg, wes, wes_avg) = helper.metric_texts(&identity, kind);
                MetricWidths {
                    total_span: span.len() + 2,
                    total_span_avg: span_avg.len() + 2,
                    wes: wes.len() + 2,
                    wes_avg: wes_avg.len() + 2,
                }
            })
            .collect();
        helper
    }

    /// Creates a helper using the same hyper-edges for every relations kind.
    pub fn with_hyper_edges(variables: Vec<V>, hyper_edges: Vec<BitSet>) -> Self {
        Self::new(
            variables,
            RelationsKind::ALL.map(|kind| (kind, hyper_edges.clone())),
        )
    }

    /// Creates a helper for the same variables in a different order.
    ///
    /// The hyper-edges are permuted along, so that they relate the same variables.
    pub fn reordered(&self, order: &[V]) -> Self {
        let new_indices = self.get_new_indices_for_var_order(order);
        let n = self.size();
        let hyper_edges = RelationsKind::ALL.map(|kind| {
            let edges = self.hyper_edges(kind)
                .iter()
                .map(|edge| BitSet::from_indices(n, edge.iter().map(|i| new_indices[i])))
                .collect();
            (kind, edges)
        });
        Self::new(order.to_vec(), hyper_edges)
    }

    /// Returns the number of variables.
    pub fn size(&self) -> usize {
        self.variables.len()
    }

    /// Returns the variables, in the order the relations are expressed in.
    pub fn variables(&self) -> &[V] {
        &self.variables
    }

    pub fn hyper_edges(&self, kind: RelationsKind) -> &[BitSet] {
        &self.hyper_edges[kind.ordinal()]
    }

    /// Returns the weighted graph of the relations: the clique expansion of the hyper-edges.
    pub fn graph(&self, kind: RelationsKind) -> &Graph {
        &self.graphs[kind.ordinal()]
    }

    /// Gets the new variable indices from a new variable order.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of the helper's variables.
    pub fn get_new_indices_for_var_order(&self, order: &[V]) -> Vec<usize> {
        assert_eq!(order.len(), self.size(), "Variable order must contain every variable exactly once");
        let mut new_indices = vec![usize::MAX; order.len()];
        for (i, var) in order.iter().enumerate() {
            let Some(&orig) = self.orig_indices.get(var) else {
                panic!("Unknown variable {:?}", var);
            };
            assert_eq!(new_indices[orig], usize::MAX, "Variable {:?} occurs more than once", var);
            new_indices[orig] = i;
        }
        new_indices
    }

    /// Gets the new variable indices from a new node order.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..size`.
    pub fn get_new_indices_for_node_order(&self, order: &[usize]) -> Vec<usize> {
        assert_eq!(order.len(), self.size(), "Node order must contain every node exactly once");
        let mut new_indices = vec![usize::MAX; order.len()];
        for (i, &node) in order.iter().enumerate() {
            assert!(node < order.len(), "Node {} does not exist", node);
            assert_eq!(new_indices[node], usize::MAX, "Node {} occurs more than once", node);
            new_indices[node] = i;
        }
        new_indices
    }

    /// Reorders the variables: the variable at position `i` moves to position `new_indices[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `new_indices` is not a permutation of `0..size`.
    pub fn reorder_for_new_indices(&self, new_indices: &[usize]) -> Vec<V> {
        assert_eq!(new_indices.len(), self.size(), "New indices must cover every variable");
        let mut result: Vec<Option<V>> = vec![None; new_indices.len()];
        for (var, &idx) in self.variables.iter().zip(new_indices) {
            assert!(idx < result.len(), "New index {} is out of range", idx);
            assert!(result[idx].is_none(), "New index {} occurs more than once", idx);
            result[idx] = Some(var.clone());
        }
        result.into_iter().flatten().collect()
    }

    /// Reorders the variables to the given node order.
    pub fn reorder_for_node_order(&self, order: &[usize]) -> Vec<V> {
        let new_indices = self.get_new_indices_for_node_order(order);
        self.reorder_for_new_indices(&new_indices)
    }

    /// Formats the metric values, without padding.
    fn metric_texts(&self, new_indices: &[usize], kind: RelationsKind) -> (String, String, String, String) {
        let edges = self.hyper_edges(kind);
        let total_span = TotalSpanMetric::compute(new_indices, edges);
        let wes = WesMetric::compute(new_indices, edges);
        let count = edges.len() as f64;
        (
            fmt_grouped_int(total_span),
            fmt_grouped_float(total_span as f64 / count, 2),
            fmt_grouped_float(wes, 6),
            fmt_grouped_float(wes / count, 6),
        )
    }

    /// Formats the total span and WES metrics for the given new indices, as a single line.
    ///
    /// Columns are right-aligned, sized to fit the values for the helper's own variable order.
    pub fn fmt_metrics(&self, new_indices: &[usize], annotation: &str, kind: RelationsKind) -> String {
        let w = self.widths[kind.ordinal()];
        let (span, span_avg, wes, wes_avg) = self.metric_texts(new_indices, kind);
        format!(
            "Total span: {:>w1$} (total) {:>w2$} (avg/edge) / WES: {:>w3$} (total) {:>w4$} (avg/edge) [{}]",
            span,
            span_avg,
            wes,
            wes_avg,
            annotation,
            w1 = w.total_span,
            w2 = w.total_span_avg,
            w3 = w.wes,
            w4 = w.wes_avg,
        )
    }

    /// Logs a debug message, indented two spaces per debug level.
    pub fn dbg(&self, dbg_level: usize, msg: impl fmt::Display) {
        debug!("{:indent$}{}", "", msg, indent = dbg_level * 2);
    }

    /// Logs the size of a representation of the relations.
    pub fn dbg_representation(&self, dbg_level: usize, representation: RepresentationKind, kind: RelationsKind) {
        match representation {
            RepresentationKind::Graph => {
                let count = self.graph(kind).edge_count() as u64;
                self.dbg(dbg_level, format_args!("Number of graph edges: {}", fmt_grouped_int(count)));
            }
            RepresentationKind::HyperEdges => {
                let count = self.hyper_edges(kind).len() as u64;
                self.dbg(dbg_level, format_args!("Number of hyper-edges: {}", fmt_grouped_int(count)));
            }
        }
    }

    pub fn dbg_metrics_for_new_indices(
        &self,
        dbg_level: usize,
        new_indices: &[usize],
        annotation: &str,
        kind: RelationsKind,
    ) {
        if log_enabled!(Level::Debug) {
            self.dbg(dbg_level, self.fmt_metrics(new_indices, annotation, kind));
        }
    }

    pub fn dbg_metrics_for_var_order(&self, dbg_level: usize, order: &[V], annotation: &str, kind: RelationsKind) {
        if log_enabled!(Level::Debug) {
            let new_indices = self.get_new_indices_for_var_order(order);
            self.dbg(dbg_level, self.fmt_metrics(&new_indices, annotation, kind));
        }
    }

    pub fn dbg_metrics_for_node_order(&self, dbg_level: usize, order: &[usize], annotation: &str, kind: RelationsKind) {
        if log_enabled!(Level::Debug) {
            let new_indices = self.get_new_indices_for_node_order(order);
            self.dbg(dbg_level, self.fmt_metrics(&new_indices, annotation, kind));
        }
    }
}

/// Builds the clique expansion of the hyper-edges, with additive weights.
///
/// The weight between two variables is the number of hyper-edges containing both.
pub fn clique_graph(size: usize, hyper_edges: &[BitSet]) -> Graph {
    let mut weights: HashMap<(usize, usize), u32> = HashMap::new();
    for edge in hyper_edges {
        let members: Vec<usize> = edge.iter().collect();
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                *weights.entry((i, j)).or_insert(0) += 1;
            }
        }
    }

    let mut pairs: Vec<_> = weights.into_iter().collect();
    pairs.sort_unstable();
    let mut graph = Graph::new(size);
    for ((i, j), weight) in pairs {
        graph.add_edge(i, j, weight, true);
    }
    graph
}

/// Groups the digits of a non-negative integer text in threes, separated by commas.
fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (k, c) in digits.chars().enumerate() {
        if k > 0 && (digits.len() - k) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Formats an integer with thousands separators, e.g. `1,234,567`.
pub fn fmt_grouped_int(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Formats a number with thousands separators and a fixed number of decimals, e.g. `1,234.50`.
pub fn fmt_grouped_float(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let text = format!("{:.*}", decimals, value.abs());
    match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}{}.{}", sign, group_digits(int_part), frac_part),
        None => format!("{}{}", sign, group_digits(&text)),
    }
}
