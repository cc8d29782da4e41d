//! Remove velocity duplicates from an augmented spanning tree

use super::node::NodeId;
use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{Matrix, WeightedTree};

/// Validate an augmented tree over `2n` nodes and return `n`
pub fn augmented_cell_count(tree: &WeightedTree) -> VelocityResult<usize> {
    let nodes = tree.node_count();
    if nodes == 0 || nodes % 2 != 0 {
        return Err(VelocityError::OddNodeCount(nodes));
    }
    tree.ensure_tree()?;
    Ok(nodes / 2)
}

/// Contract every duplicate node out of the augmented tree
///
/// Duplicates are visited in ascending order. A duplicate with one neighbor
/// is pruned. Otherwise its lightest neighbor `m` absorbs it: every other
/// neighbor `k` is joined to `m` with weight `w(v,k) + w(v,m)`. Ties for the
/// lightest neighbor go to the lowest index. The result keeps only the `n`
/// real cells and is again a tree.
pub fn contract_duplicates(tree: &WeightedTree) -> VelocityResult<WeightedTree> {
    let cell_count = augmented_cell_count(tree)?;
    let mut graph = tree.clone();

    for index in 0..cell_count {
        let v = NodeId::duplicate(index).position(cell_count);
        let neighbors: Vec<(usize, f64)> = graph.neighbors(v).collect();

        if neighbors.len() > 1 {
            let (m, w_m) = neighbors
                .iter()
                .copied()
                .fold(neighbors[0], |best, nb| if nb.1 < best.1 { nb } else { best });
            for &(k, w_k) in neighbors.iter().filter(|(k, _)| *k != m) {
                graph.set_edge(k, m, w_k + w_m);
            }
        }
        graph.isolate(v);
    }

    let contracted = graph.truncate(cell_count);
    contracted.ensure_tree()?;
    tracing::debug!(
        cells = cell_count,
        edges = contracted.edge_count(),
        "contracted velocity duplicates"
    );
    Ok(contracted)
}

/// Matrix form of [`contract_duplicates`]: `2n x 2n` in, symmetric `n x n` out
pub fn contract_velocity_tree(tree: &Matrix) -> VelocityResult<Matrix> {
    let augmented = WeightedTree::from_adjacency(tree)?;
    Ok(contract_duplicates(&augmented)?.to_matrix())
}
