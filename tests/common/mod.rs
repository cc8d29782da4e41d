//! Shared fixtures for the velocity-tree integration tests
//!
//! Random inputs are drawn from a seeded `StdRng` so failures reproduce.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use veltree::Matrix;

/// Deterministic generator for a test case
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random weighted tree over `nodes` nodes, as a symmetric adjacency matrix
///
/// Each node after a shuffled first one attaches to a random earlier node,
/// so real cells and duplicates end up interleaved in arbitrary shapes.
pub fn random_tree(rng: &mut StdRng, nodes: usize) -> Matrix {
    let mut order: Vec<usize> = (0..nodes).collect();
    order.shuffle(rng);

    let mut tree = Matrix::zeros((nodes, nodes));
    for i in 1..nodes {
        let parent = order[rng.gen_range(0..i)];
        let child = order[i];
        let weight = rng.gen_range(0.1..2.0);
        tree[[parent, child]] = weight;
        tree[[child, parent]] = weight;
    }
    tree
}

/// Path tree visiting `order`, with random weights on one triangle only
pub fn path_tree(rng: &mut StdRng, order: &[usize]) -> Matrix {
    let k = order.len();
    let mut tree = Matrix::zeros((k, k));
    for pair in order.windows(2) {
        let (a, b) = if rng.gen_bool(0.5) { (pair[0], pair[1]) } else { (pair[1], pair[0]) };
        tree[[a, b]] = rng.gen_range(0.1..2.0);
    }
    tree
}

/// Nonnegative cells x cells matrix with roughly `sparsity` of entries zero
pub fn random_transitions(rng: &mut StdRng, cells: usize, sparsity: f64) -> Matrix {
    Matrix::from_shape_fn((cells, cells), |_| {
        if rng.gen_bool(sparsity) {
            0.0
        } else {
            rng.gen::<f64>()
        }
    })
}

/// Cells x clusters matrix whose rows are probability distributions
pub fn random_assignments(rng: &mut StdRng, cells: usize, clusters: usize) -> Matrix {
    let mut r = Matrix::from_shape_fn((cells, clusters), |_| rng.gen_range(0.01..1.0));
    for mut row in r.rows_mut() {
        let total = row.sum();
        row /= total;
    }
    r
}

/// Random points, one row per node
pub fn random_embedding(rng: &mut StdRng, nodes: usize, dims: usize) -> Matrix {
    Matrix::from_shape_fn((nodes, dims), |_| rng.gen_range(-5.0..5.0))
}

/// A shuffled permutation of `0..k`
pub fn random_permutation(rng: &mut StdRng, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..k).collect();
    order.shuffle(rng);
    order
}

pub fn assert_all_finite(matrix: &Matrix) {
    assert!(
        matrix.iter().all(|v| v.is_finite()),
        "matrix has non-finite entries: {matrix:?}"
    );
}
