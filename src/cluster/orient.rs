//! Direct the cluster spanning tree by comparing walk likelihoods

use super::likelihood::SegmentLikelihood;
use super::ordering::ClusterOrdering;
use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{ensure_square, DirectedGraph, Matrix};

/// Orient each tree edge visited by the ordering
///
/// Step `i` runs from `order[i]` to `order[i + 1]`. It keeps that direction
/// when `forward[i] >= reverse[i]` and flips otherwise, so ties keep the
/// given orientation. The surviving entry takes the larger of the two
/// weights. Edges the ordering never steps across are copied unchanged.
pub fn orient_cluster_tree(
    tree: &Matrix,
    ordering: &ClusterOrdering,
    forward: &SegmentLikelihood,
    reverse: &SegmentLikelihood,
) -> VelocityResult<DirectedGraph> {
    let k = ensure_square("cluster spanning tree", tree)?;
    if let Some(index) = ordering.max_index().filter(|&index| index >= k) {
        return Err(VelocityError::IndexOutOfRange {
            what: "ordering",
            index,
            bound: k,
        });
    }
    let steps = ordering.len().saturating_sub(1);
    for likelihood in [forward, reverse] {
        if likelihood.len() != steps {
            return Err(VelocityError::ShapeMismatch {
                what: "segment likelihood length",
                expected: steps,
                found: likelihood.len(),
            });
        }
    }

    let mut oriented = DirectedGraph::from_matrix(tree.clone())?;
    for (step, (r, c)) in ordering.steps().enumerate() {
        let weight = tree[[r, c]].max(tree[[c, r]]);
        if forward.values()[step] >= reverse.values()[step] {
            oriented.set_edge(r, c, weight);
        } else {
            oriented.set_edge(c, r, weight);
        }
    }
    Ok(oriented)
}
