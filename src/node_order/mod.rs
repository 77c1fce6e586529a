//! Graph node ordering algorithms.
//!
//! Every algorithm orders each connected partition of the graph separately.
//! Partitions are processed in descending size (ties in discovery order), which
//! puts nodes without edges at the end of the order.
//!
//! The algorithms walk outgoing edges. Graphs built from hyper-edges are
//! symmetric; for other graphs, nodes that are reachable only over incoming
//! edges are picked up once the walk runs dry.

mod cuthill_mckee;
mod peripheral;
mod rls;
mod sloan;

use std::fmt;
use std::str::FromStr;

pub use cuthill_mckee::WeightedCuthillMcKeeNodeOrderer;
pub use peripheral::{george_liu_pseudo_peripheral_node, sloan_pseudo_peripheral_node_pair};
pub use rls::{level_structure_width, rooted_level_structure};
pub use sloan::SloanNodeOrderer;

use crate::error::Error;
use crate::graph::Graph;

pub trait NodeOrderer {
    /// Orders the nodes of one connected partition of the graph.
    fn order_nodes_partition(&self, graph: &Graph, partition: &[usize]) -> Vec<usize>;

    /// Orders all nodes of the graph. Returns node indices, in their new order.
    fn order_nodes(&self, graph: &Graph) -> Vec<usize> {
        let mut partitions = graph.partition();
        partitions.sort_by_key(|p| std::cmp::Reverse(p.len()));

        let mut order = Vec::with_capacity(graph.size());
        for partition in &partitions {
            order.extend(self.order_nodes_partition(graph, partition));
        }
        assert_eq!(order.len(), graph.size());
        order
    }
}

/// Algorithms to find a pseudo-peripheral node: a node that lies far away from the other nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PseudoPeripheralNodeFinderKind {
    GeorgeLiu,
    Sloan,
}

impl PseudoPeripheralNodeFinderKind {
    /// Finds a pseudo-peripheral node in the given connected partition, optionally starting from `start`.
    pub fn find(&self, graph: &Graph, partition: &[usize], start: Option<usize>) -> usize {
        match self {
            PseudoPeripheralNodeFinderKind::GeorgeLiu => george_liu_pseudo_peripheral_node(graph, partition, start),
            PseudoPeripheralNodeFinderKind::Sloan => sloan_pseudo_peripheral_node_pair(graph, partition, start).0,
        }
    }
}

impl fmt::Display for PseudoPeripheralNodeFinderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PseudoPeripheralNodeFinderKind::GeorgeLiu => "george-liu",
            PseudoPeripheralNodeFinderKind::Sloan => "sloan",
        })
    }
}

impl FromStr for PseudoPeripheralNodeFinderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "george-liu" => Ok(PseudoPeripheralNodeFinderKind::GeorgeLiu),
            "sloan" => Ok(PseudoPeripheralNodeFinderKind::Sloan),
            _ => Err(Error::option("node-finder", s, "expected \"george-liu\" or \"sloan\"")),
        }
    }
}
