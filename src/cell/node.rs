//! Identifiers for real cells and their velocity-shifted duplicates

use crate::error::{VelocityError, VelocityResult};
use serde::{Deserialize, Serialize};

/// Whether a node is an observed cell or its velocity-shifted duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Real,
    Duplicate,
}

/// A node of the augmented tree, tagged with its kind
///
/// In a tree over `n` cells, real cell `i` occupies position `i` and its
/// duplicate occupies position `n + i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Cell index, shared by a cell and its duplicate
    pub index: usize,
    pub kind: NodeKind,
}

impl NodeId {
    pub fn real(index: usize) -> Self {
        Self {
            index,
            kind: NodeKind::Real,
        }
    }

    pub fn duplicate(index: usize) -> Self {
        Self {
            index,
            kind: NodeKind::Duplicate,
        }
    }

    /// Resolve an augmented-tree position over `cell_count` cells
    pub fn from_position(position: usize, cell_count: usize) -> VelocityResult<Self> {
        if position < cell_count {
            Ok(Self::real(position))
        } else if position < 2 * cell_count {
            Ok(Self::duplicate(position - cell_count))
        } else {
            Err(VelocityError::IndexOutOfRange {
                what: "augmented node",
                index: position,
                bound: 2 * cell_count,
            })
        }
    }

    /// Row/column of this node in the augmented tree
    pub fn position(self, cell_count: usize) -> usize {
        match self.kind {
            NodeKind::Real => self.index,
            NodeKind::Duplicate => cell_count + self.index,
        }
    }

    /// The duplicate of a real cell, or the real cell behind a duplicate
    pub fn counterpart(self) -> Self {
        match self.kind {
            NodeKind::Real => Self::duplicate(self.index),
            NodeKind::Duplicate => Self::real(self.index),
        }
    }

    pub fn is_real(self) -> bool {
        self.kind == NodeKind::Real
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NodeKind::Real => write!(f, "{}", self.index),
            NodeKind::Duplicate => write!(f, "{}'", self.index),
        }
    }
}
