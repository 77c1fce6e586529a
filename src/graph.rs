//! Weighted interaction graph over variable indices.
//!
//! Each node represents one synthesis variable (by its 0-based index), each
//! edge a weighted relation between two different variables. Edges are stored
//! per direction: a graph built by [`Graph::add_edge`] with `symmetric = true`
//! is undirected in effect, but the two directions of a pair are independent
//! and may carry different weights.
//!
//! # Text form
//!
//! For debugging and testing, a graph converts to and from a square matrix of
//! characters: one row per source node, one column per target node, `.` for
//! "no edge" and the weight otherwise. If every weight is a single digit the
//! columns are not separated, otherwise a single space separates them:
//!
//! ```
//! use bdd_synth::graph::Graph;
//!
//! let graph: Graph = ".1.\n1.2\n.2.".parse().unwrap();
//! assert_eq!(graph.size(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(graph.node(1).weight(2), Some(2));
//! assert_eq!(graph.to_string(), ".1.\n1.2\n.2.");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::bitset::BitSet;
use crate::error::Error;

/// A node in a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The 0-based index of the node in the graph.
    index: usize,
    /// The outgoing edges, mapping an edge target node index to the weight of the edge.
    edges: BTreeMap<usize, u32>,
}

impl Node {
    fn new(index: usize) -> Self {
        Self {
            index,
            edges: BTreeMap::new(),
        }
    }

    /// Returns the 0-based index of the node in the graph.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the outgoing edges as `(target, weight)` pairs, in ascending target order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.edges.iter().map(|(&t, &w)| (t, w))
    }

    /// Returns the targets of the outgoing edges, in ascending order.
    pub fn neighbours(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.keys().copied()
    }

    /// Returns the weight of the edge to `target`, if there is one.
    pub fn weight(&self, target: usize) -> Option<u32> {
        self.edges.get(&target).copied()
    }

    /// Returns the degree of this node: the number of nodes its outgoing edges connect it to.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// A weighted graph with empty diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// The nodes, in ascending order of their indices.
    nodes: Vec<Node>,
}

impl Graph {
    /// Creates a graph with `size` nodes and no edges.
    pub fn new(size: usize) -> Self {
        Self {
            nodes: (0..size).map(Node::new).collect(),
        }
    }

    /// Returns the number of nodes in the graph.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node with the given index.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Returns all nodes, in ascending order of their indices.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Adds an edge from `source` to `target`, and optionally the reverse edge with the same weight.
    ///
    /// # Panics
    ///
    /// Panics if `source == target`, if `weight` is zero, or if an edge between the
    /// (ordered) pair already exists. With `symmetric`, the reverse pair is checked as well,
    /// before anything is added.
    pub fn add_edge(&mut self, source: usize, target: usize, weight: u32, symmetric: bool) {
        assert!(source < self.size(), "Source node {} does not exist", source);
        assert!(target < self.size(), "Target node {} does not exist", target);
        assert_ne!(source, target, "Self loops are not allowed (node {})", source);
        assert!(weight > 0, "Edge weight must be positive");
        assert!(
            !self.nodes[source].edges.contains_key(&target),
            "Duplicate edge {} -> {}",
            source,
            target
        );
        if symmetric {
            assert!(
                !self.nodes[target].edges.contains_key(&source),
                "Duplicate edge {} -> {}",
                target,
                source
            );
            self.nodes[target].edges.insert(source, weight);
        }
        self.nodes[source].edges.insert(target, weight);
    }

    /// Returns the number of unique edges: distinct unordered node pairs with an edge in either direction.
    pub fn edge_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.neighbours().map(move |m| (n.index, m)))
            .filter(|&(i, j)| i < j || !self.nodes[j].edges.contains_key(&i))
            .count()
    }

    /// Returns the maximum edge weight, or zero for a graph without edges.
    pub fn max_weight(&self) -> u32 {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.values().copied())
            .max()
            .unwrap_or(0)
    }

    /// Per node, its neighbours over edges in either direction.
    fn undirected_neighbours(&self) -> Vec<Vec<usize>> {
        let mut adjacency: Vec<Vec<usize>> = self
            .nodes
            .iter()
            .map(|n| n.neighbours().collect())
            .collect();
        for node in &self.nodes {
            for target in node.neighbours() {
                if !self.nodes[target].edges.contains_key(&node.index) {
                    adjacency[target].push(node.index);
                }
            }
        }
        adjacency
    }

    /// Partitions this graph, which may be non-connected, into connected sub-graphs.
    ///
    /// An edge in either direction connects its nodes. Partitions are returned in
    /// discovery order (by their lowest node index), each with its nodes in ascending order.
    pub fn partition(&self) -> Vec<Vec<usize>> {
        let n = self.size();
        let adjacency = self.undirected_neighbours();
        let mut partitions = Vec::with_capacity(1); // Optimize for connected graphs.
        let mut unpartitioned = BitSet::ones(n);
        while let Some(start) = unpartitioned.first() {
            // Invariant: 'new_nodes' and 'partition' are disjoint.
            let mut partition = BitSet::new(n);
            let mut new_nodes = BitSet::from_indices(n, [start]);
            while !new_nodes.is_empty() {
                let mut neighbours = BitSet::new(n);
                for i in new_nodes.iter() {
                    neighbours.extend(adjacency[i].iter().copied());
                }
                partition.union_with(&new_nodes);
                new_nodes = neighbours;
                new_nodes.difference_with(&partition);
            }
            partitions.push(partition.iter().collect());
            unpartitioned.difference_with(&partition);
        }
        partitions
    }

    /// Reorders the graph: the node at position `new_order[k]` becomes the node at position `k`.
    ///
    /// # Panics
    ///
    /// Panics if `new_order` is not a permutation of the node indices.
    pub fn reorder(&self, new_order: &[usize]) -> Graph {
        let n = self.size();
        assert_eq!(new_order.len(), n, "New order must contain every node exactly once");
        let mut new_positions = vec![usize::MAX; n];
        for (k, &old) in new_order.iter().enumerate() {
            assert!(old < n, "Node {} does not exist", old);
            assert_eq!(new_positions[old], usize::MAX, "Node {} occurs more than once", old);
            new_positions[old] = k;
        }

        let mut graph = Graph::new(n);
        for node in &self.nodes {
            let source = new_positions[node.index];
            for (target, weight) in node.edges() {
                graph.add_edge(source, new_positions[target], weight, false);
            }
        }
        graph
    }

    /// Converts the graph to its textual matrix form, with `separation` spaces between columns.
    pub fn to_matrix_string(&self, separation: usize) -> String {
        let n = self.size();
        let cells: Vec<Vec<String>> = self
            .nodes
            .iter()
            .map(|node| {
                (0..n)
                    .map(|j| match node.weight(j) {
                        Some(w) => w.to_string(),
                        None => ".".to_string(),
                    })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = (0..n)
            .map(|j| cells.iter().map(|row| row[j].len()).max().unwrap_or(1))
            .collect();
        let sep = " ".repeat(separation);
        cells
            .iter()
            .map(|row| {
                let line = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
                    .collect::<Vec<_>>()
                    .join(&sep);
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Single-digit weights need no separation, otherwise a single space is used.
        let separation = if self.max_weight() <= 9 { 0 } else { 1 };
        f.write_str(&self.to_matrix_string(separation))
    }
}

impl FromStr for Graph {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let lines: &[&str] = match lines.last() {
            Some(last) if last.is_empty() => &lines[..lines.len() - 1],
            _ => &lines,
        };
        let n = lines.len();
        let mut graph = Graph::new(n);
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<&str> = if line.contains(char::is_whitespace) {
                line.split_whitespace().collect()
            } else {
                line.char_indices()
                    .map(|(k, c)| &line[k..k + c.len_utf8()])
                    .collect()
            };
            if cells.len() != n {
                return Err(Error::graph_text(
                    i + 1,
                    format!("expected {} columns, found {}", n, cells.len()),
                ));
            }
            for (j, cell) in cells.into_iter().enumerate() {
                if cell == "." {
                    continue;
                }
                let weight: u32 = cell
                    .parse()
                    .map_err(|_| Error::graph_text(i + 1, format!("invalid weight \"{}\"", cell)))?;
                if weight == 0 {
                    return Err(Error::graph_text(i + 1, "weights must be positive"));
                }
                if i == j {
                    return Err(Error::graph_text(i + 1, "diagonal must be empty"));
                }
                graph.add_edge(i, j, weight, false);
            }
        }
        Ok(graph)
    }
}
