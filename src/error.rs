//! Error types for velocity-tree construction

use thiserror::Error;

/// Errors that can occur while building a velocity tree
#[derive(Debug, Error)]
pub enum VelocityError {
    #[error("{name} must be square, got {rows}x{cols}")]
    NotSquare {
        name: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("{what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} index {index} out of range (bound {bound})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("Ordering repeats index {0}")]
    DuplicateIndex(usize),

    #[error("Augmented tree must have an even, nonzero node count, got {0}")]
    OddNodeCount(usize),

    #[error("{name} embedding needs {expected} rows, has {found}")]
    EmbeddingShape {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Not a tree: {nodes} nodes with {edges} edges")]
    NotATree { nodes: usize, edges: usize },

    #[error("Tree is disconnected: node {0} unreachable")]
    Disconnected(usize),

    #[error("Branch step {from} -> {to} is not an edge of the contracted tree")]
    BranchEdgeMissing { from: usize, to: usize },

    #[error("No path from cell {0} to its velocity duplicate")]
    NoPath(usize),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for velocity-tree operations
pub type VelocityResult<T> = Result<T, VelocityError>;
