//! Veltree: Velocity-Tree Construction
//!
//! Derives directed, tree-shaped models of cell-state transitions for
//! single-cell trajectory inference, at two resolutions.
//!
//! # Core Concepts
//!
//! - **Cluster tree**: cell transitions are collapsed into a symmetric
//!   cluster transition matrix, a traversal ordering is scored in both
//!   directions, and each edge of the cluster spanning tree is oriented
//!   toward the likelier walk.
//! - **Cell graph**: a spanning tree over cells and their velocity-shifted
//!   duplicates is contracted back to the cells, and each branch is
//!   oriented by a vote over where the duplicates landed.
//!
//! Embeddings, clustering and rendering happen elsewhere; this crate only
//! consumes their matrices.
//!
//! # Example
//!
//! ```
//! use veltree::{CellVelocityTree, SegmentDecomposition};
//! use ndarray::array;
//!
//! // Two cells joined by an edge, each with a duplicate leaf
//! let tree = array![
//!     [0.0, 1.0, 0.2, 0.0],
//!     [1.0, 0.0, 0.0, 0.2],
//!     [0.2, 0.0, 0.0, 0.0],
//!     [0.0, 0.2, 0.0, 0.0],
//! ];
//! let z = array![[0.0, 0.0], [1.0, 0.0], [0.4, 0.1], [1.4, 0.1]];
//! let y = array![[0.0, 0.0], [1.0, 0.0]];
//!
//! let result = CellVelocityTree::default()
//!     .build(&tree, &z, &y, &SegmentDecomposition::from_root(0))
//!     .unwrap();
//! assert_eq!(result.voted.graph.edges(), vec![(0, 1)]);
//! ```

pub mod cell;
pub mod cluster;
pub mod config;
mod error;
pub mod matrix;
mod pipeline;

pub use cell::{
    augment_with_velocity, Branch, BranchDirection, BranchSource, BranchVerdict, NodeId, NodeKind,
    SegmentDecomposition, VotedGraph,
};
pub use cluster::{ClusterOrdering, SegmentLikelihood};
pub use config::VelocityConfig;
pub use error::{VelocityError, VelocityResult};
pub use matrix::{DirectedGraph, Matrix, WeightedTree};
pub use pipeline::{CellTreeResult, CellVelocityTree, ClusterTreeResult, ClusterVelocityTree};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
