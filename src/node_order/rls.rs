use crate::bitset::BitSet;
use crate::graph::Graph;

/// Constructs the rooted level structure of `root`: its breadth-first levels.
///
/// Level 0 is the root itself, level `k + 1` the not yet leveled neighbours of level `k`.
/// With a width limit, construction is aborted (returning `None`) as soon as a level
/// reaches the limit.
pub fn rooted_level_structure(graph: &Graph, root: usize, width_limit: Option<usize>) -> Option<Vec<Vec<usize>>> {
    if matches!(width_limit, Some(limit) if limit <= 1) {
        return None;
    }

    let mut levels = vec![vec![root]];
    let mut marked = BitSet::new(graph.size());
    marked.insert(root);

    loop {
        let mut next_level = Vec::new();
        for &node in &levels[levels.len() - 1] {
            for neighbour in graph.node(node).neighbours() {
                if marked.insert(neighbour) {
                    next_level.push(neighbour);
                }
            }
        }

        if let Some(limit) = width_limit {
            if next_level.len() >= limit {
                return None;
            }
        }
        if next_level.is_empty() {
            break;
        }
        levels.push(next_level);
    }

    Some(levels)
}

/// Returns the width of a level structure: the size of its widest level.
pub fn level_structure_width(levels: &[Vec<usize>]) -> usize {
    levels.iter().map(Vec::len).max().unwrap_or(0)
}
