//! Weighted shortest paths over an undirected tree

use crate::matrix::WeightedTree;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier entry, ordered so the heap pops the cheapest node first
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node sequence of the cheapest path from `source` to `target`, both included
///
/// Returns `None` when either endpoint is out of range or unreachable.
pub fn shortest_path(tree: &WeightedTree, source: usize, target: usize) -> Option<Vec<usize>> {
    let n = tree.node_count();
    if source >= n || target >= n {
        return None;
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut predecessor: Vec<Option<usize>> = vec![None; n];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Frontier { cost: 0.0, node: source });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if node == target {
            break;
        }
        if cost > dist[node] {
            continue;
        }
        for (next, weight) in tree.neighbors(node) {
            let candidate = cost + weight;
            if candidate < dist[next] {
                dist[next] = candidate;
                predecessor[next] = Some(node);
                heap.push(Frontier { cost: candidate, node: next });
            }
        }
    }

    if !dist[target].is_finite() {
        return None;
    }

    // Walk back from the target
    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = predecessor[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    Some(path)
}
