use super::peripheral::sloan_pseudo_peripheral_node_pair;
use super::rls::rooted_level_structure;
use super::NodeOrderer;
use crate::graph::Graph;

/// Priority weight of the distance to the end node.
const W1: i64 = 1;
/// Priority weight of the current degree.
const W2: i64 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Status {
    Postactive,
    Active,
    Preactive,
    Inactive,
}

/// Sloan's profile and wavefront reducing node orderer (subroutine `NUMBER` of the paper).
#[derive(Debug, Default, Copy, Clone)]
pub struct SloanNodeOrderer;

impl NodeOrderer for SloanNodeOrderer {
    fn order_nodes_partition(&self, graph: &Graph, partition: &[usize]) -> Vec<usize> {
        let n = graph.size();

        // Step 1: the endpoints of a pseudo-diameter.
        let (s, e) = sloan_pseudo_peripheral_node_pair(graph, partition, None);

        // Step 2: distances from 'e', by its level structure.
        let mut dist = vec![0i64; n];
        let levels = rooted_level_structure(graph, e, None).unwrap_or_default();
        for (j, level) in levels.iter().enumerate() {
            for &i in level {
                dist[i] = j as i64;
            }
        }

        // Step 3: initial status and priority.
        let mut status = vec![Status::Inactive; n];
        let mut priority = vec![0i64; n];
        for &i in partition {
            priority[i] = W1 * dist[i] - W2 * (graph.node(i).degree() as i64 + 1);
        }

        // Step 4: start with 's' in the queue.
        let mut result = Vec::with_capacity(partition.len());
        let mut queue = vec![s];
        status[s] = Status::Preactive;

        // Step 5: until all nodes are labeled.
        while result.len() < partition.len() {
            if queue.is_empty() {
                // The rest is only reachable over incoming edges.
                match partition.iter().copied().find(|&i| status[i] == Status::Inactive) {
                    Some(i) => {
                        status[i] = Status::Preactive;
                        queue.push(i);
                    }
                    None => break,
                }
            }

            // Step 6: select the node with maximum priority, the first one on ties.
            let mut m = 0;
            for k in 1..queue.len() {
                if priority[queue[k]] > priority[queue[m]] {
                    m = k;
                }
            }
            let i = queue.swap_remove(m);

            // Step 7: if 'i' is preactive, its neighbours lose one unit of current degree.
            if status[i] == Status::Preactive {
                for j in graph.node(i).neighbours() {
                    priority[j] += W2;
                    if status[j] == Status::Inactive {
                        status[j] = Status::Preactive;
                        queue.push(j);
                    }
                }
            }

            // Step 8: label 'i'.
            result.push(i);
            status[i] = Status::Postactive;

            // Step 9: preactive neighbours become active, their neighbours move up.
            for j in graph.node(i).neighbours() {
                if status[j] == Status::Preactive {
                    status[j] = Status::Active;
                    priority[j] += W2;
                    for k in graph.node(j).neighbours() {
                        if status[k] != Status::Postactive {
                            priority[k] += W2;
                            if status[k] == Status::Inactive {
                                status[k] = Status::Preactive;
                                queue.push(k);
                            }
                        }
                    }
                }
            }
        }

        assert_eq!(result.len(), partition.len());
        result
    }
}
