//! Cluster-level velocity tree
//!
//! Aggregates cell transitions into cluster transitions, scores a traversal
//! ordering in both directions, and orients the cluster spanning tree
//! edge by edge.

mod aggregate;
mod likelihood;
mod ordering;
mod orient;

pub use aggregate::{aggregate_cluster_transitions, normalized_cluster_transitions, SoftAssignment};
pub use likelihood::{log_transitions, segment_likelihood, SegmentLikelihood};
pub use ordering::ClusterOrdering;
pub use orient::orient_cluster_tree;
