//! Directed adjacency over a fixed node set

use super::{ensure_square, Matrix};
use crate::error::VelocityResult;

/// Directed graph stored as a dense adjacency matrix
///
/// Each node pair holds at most one direction: setting `u -> v` clears
/// `v -> u`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedGraph {
    adjacency: Matrix,
}

impl DirectedGraph {
    /// Create an empty graph over `node_count` nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: Matrix::zeros((node_count, node_count)),
        }
    }

    /// Wrap an existing square adjacency matrix as-is
    pub fn from_matrix(adjacency: Matrix) -> VelocityResult<Self> {
        ensure_square("directed graph", &adjacency)?;
        Ok(Self { adjacency })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Point the edge between `from` and `to` at `to`
    pub fn set_edge(&mut self, from: usize, to: usize, weight: f64) {
        self.adjacency[[from, to]] = weight;
        self.adjacency[[to, from]] = 0.0;
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency[[from, to]] != 0.0
    }

    /// Nonzero entries as `(from, to)` in row-major order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .indexed_iter()
            .filter(|(_, &w)| w != 0.0)
            .map(|((from, to), _)| (from, to))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().filter(|&&w| w != 0.0).count()
    }

    /// True when no node pair carries both directions
    pub fn is_oriented(&self) -> bool {
        let n = self.node_count();
        (0..n).all(|u| ((u + 1)..n).all(|v| !(self.has_edge(u, v) && self.has_edge(v, u))))
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.adjacency
    }

    pub fn into_matrix(self) -> Matrix {
        self.adjacency
    }
}
