//! Undirected weighted tree view over an adjacency matrix

use super::{ensure_square, Matrix};
use crate::error::{VelocityError, VelocityResult};
use std::collections::{BTreeMap, VecDeque};

/// Undirected weighted graph, normally a tree
///
/// Neighbor maps are ordered by node index, so every scan over a node's
/// neighbors visits them in ascending index order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTree {
    adjacency: Vec<BTreeMap<usize, f64>>,
}

impl WeightedTree {
    /// Create a graph with `node_count` nodes and no edges
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeMap::new(); node_count],
        }
    }

    /// Read an adjacency matrix, treating `[u,v]` and `[v,u]` as one edge
    ///
    /// When both entries are set the larger weight wins. Zero means no edge.
    pub fn from_adjacency(matrix: &Matrix) -> VelocityResult<Self> {
        let n = ensure_square("spanning tree", matrix)?;
        let mut tree = Self::with_nodes(n);
        for u in 0..n {
            for v in (u + 1)..n {
                let weight = matrix[[u, v]].max(matrix[[v, u]]);
                if weight != 0.0 {
                    tree.set_edge(u, v, weight);
                }
            }
        }
        Ok(tree)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Get the number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map(BTreeMap::len).unwrap_or(0)
    }

    /// Neighbors of `node` with edge weights, ascending by index
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|nbrs| nbrs.iter().map(|(&v, &w)| (v, w)))
    }

    pub fn weight(&self, u: usize, v: usize) -> Option<f64> {
        self.adjacency.get(u).and_then(|nbrs| nbrs.get(&v)).copied()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.weight(u, v).is_some()
    }

    /// Create or overwrite the edge `(u, v)`
    pub fn set_edge(&mut self, u: usize, v: usize, weight: f64) {
        self.adjacency[u].insert(v, weight);
        self.adjacency[v].insert(u, weight);
    }

    pub fn remove_edge(&mut self, u: usize, v: usize) {
        self.adjacency[u].remove(&v);
        self.adjacency[v].remove(&u);
    }

    /// Drop every edge touching `node`
    pub fn isolate(&mut self, node: usize) {
        let nbrs = std::mem::take(&mut self.adjacency[node]);
        for v in nbrs.keys() {
            self.adjacency[*v].remove(&node);
        }
    }

    /// All edges as `(u, v, weight)` with `u < v`, in index order
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| nbrs.range((u + 1)..).map(move |(&v, &w)| (u, v, w)))
            .collect()
    }

    /// Fail unless the graph is connected with exactly `n - 1` edges
    pub fn ensure_tree(&self) -> VelocityResult<()> {
        let nodes = self.node_count();
        if nodes == 0 {
            return Ok(());
        }
        let edges = self.edge_count();
        if edges != nodes - 1 {
            return Err(VelocityError::NotATree { nodes, edges });
        }

        let mut visited = vec![false; nodes];
        let mut queue = VecDeque::from([0]);
        visited[0] = true;
        while let Some(current) = queue.pop_front() {
            for (next, _) in self.neighbors(current) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        match visited.iter().position(|seen| !seen) {
            Some(node) => Err(VelocityError::Disconnected(node)),
            None => Ok(()),
        }
    }

    /// Keep only nodes `0..node_count`
    ///
    /// Edges reaching past the cut are dropped.
    pub fn truncate(&self, node_count: usize) -> Self {
        let adjacency = self
            .adjacency
            .iter()
            .take(node_count)
            .map(|nbrs| nbrs.range(..node_count).map(|(&v, &w)| (v, w)).collect())
            .collect();
        Self { adjacency }
    }

    /// Symmetric adjacency matrix
    pub fn to_matrix(&self) -> Matrix {
        let n = self.node_count();
        let mut matrix = Matrix::zeros((n, n));
        for (u, v, w) in self.edges() {
            matrix[[u, v]] = w;
            matrix[[v, u]] = w;
        }
        matrix
    }
}
