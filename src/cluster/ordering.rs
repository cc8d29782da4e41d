//! Traversal orderings over clusters

use crate::error::{VelocityError, VelocityResult};

/// A path through the cluster tree, as a permutation of the cluster indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterOrdering(Vec<usize>);

impl ClusterOrdering {
    /// Validate an explicit ordering as a permutation of `0..cluster_count`
    pub fn new(indices: Vec<usize>, cluster_count: usize) -> VelocityResult<Self> {
        if indices.len() != cluster_count {
            return Err(VelocityError::ShapeMismatch {
                what: "ordering length",
                expected: cluster_count,
                found: indices.len(),
            });
        }
        let mut seen = vec![false; cluster_count];
        for &index in &indices {
            if index >= cluster_count {
                return Err(VelocityError::IndexOutOfRange {
                    what: "ordering",
                    index,
                    bound: cluster_count,
                });
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(VelocityError::DuplicateIndex(index));
            }
        }
        Ok(Self(indices))
    }

    /// Order clusters by ascending rank
    ///
    /// `ranks[k]` is the position of cluster `k` along the tree layout. Equal
    /// ranks keep index order.
    pub fn from_ranks(ranks: &[f64]) -> Self {
        let mut indices: Vec<usize> = (0..ranks.len()).collect();
        indices.sort_by(|&a, &b| ranks[a].total_cmp(&ranks[b]));
        Self(indices)
    }

    /// The same path walked from the other end
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive `(from, to)` pairs along the path
    pub fn steps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Largest index in the ordering, if any
    pub(crate) fn max_index(&self) -> Option<usize> {
        self.0.iter().copied().max()
    }
}
