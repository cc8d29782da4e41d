//! End-to-end drivers for the cluster-level and per-cell velocity trees

use crate::cell::{contract_duplicates, vote_branch_directions, BranchSource, VotedGraph};
use crate::cluster::{
    aggregate_cluster_transitions, orient_cluster_tree, segment_likelihood, ClusterOrdering,
    SegmentLikelihood,
};
use crate::config::VelocityConfig;
use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{ensure_square, DirectedGraph, Matrix, WeightedTree};
use tracing::{info, instrument};

/// Result of orienting a cluster spanning tree
#[derive(Debug, Clone)]
pub struct ClusterTreeResult {
    /// Symmetric cluster transition matrix
    pub cluster_transitions: Matrix,
    /// Cumulative likelihood walking the ordering as given
    pub forward: SegmentLikelihood,
    /// Cumulative likelihood walking it backwards
    pub reverse: SegmentLikelihood,
    /// The oriented spanning tree
    pub velocity_tree: DirectedGraph,
}

/// Builds a directed cluster tree from cell transitions
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use veltree::{ClusterOrdering, ClusterVelocityTree, Matrix};
///
/// let transitions = array![[0.0, 2.0, 0.0], [2.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
/// let assignments = Matrix::eye(3);
/// let tree = array![[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
/// let ordering = ClusterOrdering::new(vec![0, 1, 2], 3).unwrap();
///
/// let result = ClusterVelocityTree::new(&transitions, &assignments)
///     .build(&tree, &ordering)
///     .unwrap();
/// assert_eq!(result.velocity_tree.edges(), vec![(0, 1), (1, 2)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClusterVelocityTree<'a> {
    transitions: &'a Matrix,
    assignments: &'a Matrix,
}

impl<'a> ClusterVelocityTree<'a> {
    /// `transitions` is cells x cells, `assignments` is cells x clusters
    pub fn new(transitions: &'a Matrix, assignments: &'a Matrix) -> Self {
        Self {
            transitions,
            assignments,
        }
    }

    /// Aggregate, score the ordering both ways, and orient `spanning_tree`
    ///
    /// `ordering` must list every cluster exactly once.
    #[instrument(
        skip_all,
        fields(clusters = self.assignments.ncols(), steps = ordering.len().saturating_sub(1))
    )]
    pub fn build(
        &self,
        spanning_tree: &Matrix,
        ordering: &ClusterOrdering,
    ) -> VelocityResult<ClusterTreeResult> {
        let clusters = ensure_square("cluster spanning tree", spanning_tree)?;
        if clusters != self.assignments.ncols() {
            return Err(VelocityError::ShapeMismatch {
                what: "cluster spanning tree size",
                expected: self.assignments.ncols(),
                found: clusters,
            });
        }
        if ordering.len() != clusters {
            return Err(VelocityError::ShapeMismatch {
                what: "ordering length",
                expected: clusters,
                found: ordering.len(),
            });
        }

        let cluster_transitions =
            aggregate_cluster_transitions(self.transitions, self.assignments)?;
        let forward = segment_likelihood(&cluster_transitions, ordering)?;
        let reverse = segment_likelihood(&cluster_transitions, &ordering.reversed())?;
        let velocity_tree = orient_cluster_tree(spanning_tree, ordering, &forward, &reverse)?;

        info!(
            edges = velocity_tree.edge_count(),
            oriented = velocity_tree.is_oriented(),
            "built cluster velocity tree"
        );
        Ok(ClusterTreeResult {
            cluster_transitions,
            forward,
            reverse,
            velocity_tree,
        })
    }
}

/// Result of directing the per-cell tree
#[derive(Debug, Clone)]
pub struct CellTreeResult {
    /// Tree over the real cells after contracting duplicates
    pub contracted: WeightedTree,
    /// Directed graph, per-branch verdicts and carried-through positions
    pub voted: VotedGraph,
}

/// Builds a directed per-cell graph from an augmented spanning tree
#[derive(Debug, Clone, Default)]
pub struct CellVelocityTree {
    config: VelocityConfig,
}

impl CellVelocityTree {
    pub fn new(config: VelocityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VelocityConfig {
        &self.config
    }

    /// Contract duplicates out of `tree`, then vote each branch's direction
    ///
    /// `tree` is the `2n x 2n` augmented spanning tree, `embedding` has one
    /// row per augmented node, `positions` one row per cell. Branches come
    /// from `source`, which sees the contracted tree.
    #[instrument(skip_all, fields(nodes = tree.nrows()))]
    pub fn build<B: BranchSource + ?Sized>(
        &self,
        tree: &Matrix,
        embedding: &Matrix,
        positions: &Matrix,
        source: &B,
    ) -> VelocityResult<CellTreeResult> {
        let augmented = WeightedTree::from_adjacency(tree)?;
        let contracted = contract_duplicates(&augmented)?;
        let branches = source.branches(&contracted)?;
        let voted = vote_branch_directions(
            &augmented,
            &contracted,
            &branches,
            embedding,
            positions,
            &self.config,
        )?;

        info!(
            cells = contracted.node_count(),
            branches = voted.verdicts.len(),
            edges = voted.graph.edge_count(),
            "built cell velocity graph"
        );
        Ok(CellTreeResult { contracted, voted })
    }
}
