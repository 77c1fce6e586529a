//! Pseudo-peripheral node finders.
//!
//! - A. George and J. W. H. Liu, "An Implementation of a Pseudoperipheral Node Finder",
//!   ACM Transactions on Mathematical Software 5(3), 1979 (subroutine `FNROOT`).
//! - S. W. Sloan, "An algorithm for profile and wavefront reduction of sparse matrices",
//!   International Journal for Numerical Methods in Engineering 23(2), 1986 (subroutine `DIAMTR`).

use super::rls::{level_structure_width, rooted_level_structure};
use crate::graph::Graph;

/// Builds an unlimited rooted level structure, which always exists.
fn levels_of(graph: &Graph, root: usize) -> Vec<Vec<usize>> {
    rooted_level_structure(graph, root, None).unwrap_or_else(|| vec![vec![root]])
}

/// Node of minimum degree, the first one on ties.
fn min_degree_node(graph: &Graph, nodes: &[usize]) -> usize {
    nodes
        .iter()
        .copied()
        .min_by_key(|&n| graph.node(n).degree())
        .unwrap_or_else(|| panic!("Expected at least one node"))
}

/// Finds a pseudo-peripheral node using the George-Liu algorithm, with shrinking strategy S2.
pub fn george_liu_pseudo_peripheral_node(graph: &Graph, partition: &[usize], start: Option<usize>) -> usize {
    // Step 1: choose a node 'r' in the partition.
    let mut r = start.unwrap_or(partition[0]);
    // Step 2: construct the rooted level structure at 'r'.
    let mut rls_r = levels_of(graph, r);

    loop {
        // One level, or as many levels as there are nodes: done.
        if rls_r.len() == 1 || rls_r.len() == graph.size() {
            break;
        }

        // Step 3: shrink the last level to a single node of minimum degree.
        let x = min_degree_node(graph, &rls_r[rls_r.len() - 1]);

        // Step 4: if 'x' has a deeper level structure, it becomes the new 'r'.
        let rls_x = levels_of(graph, x);
        if rls_x.len() <= rls_r.len() {
            break;
        }
        r = x;
        rls_r = rls_x;
    }

    // Step 5: exit.
    r
}

/// Finds the endpoints `(s, e)` of a pseudo-diameter using Sloan's algorithm.
pub fn sloan_pseudo_peripheral_node_pair(graph: &Graph, partition: &[usize], start: Option<usize>) -> (usize, usize) {
    // Step 1: first guess for the starting node 's', a node of minimum degree.
    let mut s = start.unwrap_or_else(|| min_degree_node(graph, partition));
    // Step 2: form the level structure rooted at 's'.
    let mut rls_s = levels_of(graph, s);

    'outer: loop {
        // Steps 3 and 4: sort the last level on ascending degree, keeping one node per degree.
        let mut q = rls_s[rls_s.len() - 1].clone();
        q.sort_by_key(|&n| graph.node(n).degree());
        q.dedup_by_key(|n| graph.node(*n).degree());

        // Step 5: w(e) = infinite.
        let mut e = None;
        let mut we = usize::MAX;

        // Step 6: test for termination. Level structures wider than w(e) are aborted.
        for i in q {
            if let Some(rls_i) = rooted_level_structure(graph, i, Some(we)) {
                if rls_i.len() > rls_s.len() {
                    s = i;
                    rls_s = rls_i;
                    continue 'outer;
                }
                e = Some(i);
                we = level_structure_width(&rls_i);
            }
        }

        // Step 7: exit.
        let e = e.unwrap_or_else(|| panic!("No end node found for start node {}", s));
        return (s, e);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    // Path 2 - 0 - 3 - 1.
    const PATH: &str = "..11\n...1\n1...\n11..";

    #[test]
    fn test_george_liu() {
        let graph: Graph = PATH.parse().unwrap();
        assert_eq!(george_liu_pseudo_peripheral_node(&graph, &[0, 1, 2, 3], None), 1);
        assert_eq!(george_liu_pseudo_peripheral_node(&graph, &[0, 1, 2, 3], Some(2)), 2);
    }

    #[test]
    fn test_george_liu_single_node() {
        let graph = Graph::new(3);
        assert_eq!(george_liu_pseudo_peripheral_node(&graph, &[1], None), 1);
    }

    #[test]
    fn test_sloan_pair() {
        let graph: Graph = PATH.parse().unwrap();
        assert_eq!(sloan_pseudo_peripheral_node_pair(&graph, &[0, 1, 2, 3], None), (1, 2));
    }

    #[test]
    fn test_sloan_pair_improves_start() {
        // Path 2 - 0 - 3 - 1, starting in the middle.
        let graph: Graph = PATH.parse().unwrap();
        let (s, e) = sloan_pseudo_peripheral_node_pair(&graph, &[0, 1, 2, 3], Some(0));
        assert_eq!((s, e), (1, 2));
    }

    #[test]
    fn test_sloan_pair_single_node() {
        let graph = Graph::new(2);
        assert_eq!(sloan_pseudo_peripheral_node_pair(&graph, &[1], None), (1, 1));
    }
}
