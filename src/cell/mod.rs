//! Per-cell velocity graph
//!
//! Works on a spanning tree over `2n` nodes: `n` observed cells plus one
//! velocity-shifted duplicate per cell. The duplicates are contracted away,
//! then each branch of the remaining tree is oriented by where the
//! duplicates sat.

mod augment;
mod branch;
mod contract;
mod node;
mod path;
mod vote;

pub use augment::augment_with_velocity;
pub use branch::{Branch, BranchSource, SegmentDecomposition};
pub use contract::{augmented_cell_count, contract_duplicates, contract_velocity_tree};
pub use node::{NodeId, NodeKind};
pub use path::shortest_path;
pub use vote::{vote_branch_directions, BranchDirection, BranchVerdict, DirectionVoter, VotedGraph};
