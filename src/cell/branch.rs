//! Branches of the contracted tree and the sources that supply them

use crate::error::{VelocityError, VelocityResult};
use crate::matrix::WeightedTree;
use serde::{Deserialize, Serialize};

/// Ordered node path through the contracted tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(Vec<usize>);

impl Branch {
    pub fn new(nodes: Vec<usize>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive `(from, to)` pairs along the branch
    pub fn steps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl From<Vec<usize>> for Branch {
    fn from(nodes: Vec<usize>) -> Self {
        Self(nodes)
    }
}

/// Supplies the branch decomposition of a contracted tree
///
/// Implementations must cover every tree edge exactly once.
pub trait BranchSource {
    fn branches(&self, tree: &WeightedTree) -> VelocityResult<Vec<Branch>>;
}

/// A fixed, caller-supplied list of branches
impl BranchSource for Vec<Branch> {
    fn branches(&self, _tree: &WeightedTree) -> VelocityResult<Vec<Branch>> {
        Ok(self.clone())
    }
}

/// Cuts a tree into maximal unbranched paths, oriented away from a root
///
/// Each branch starts at the root or at a branching node and runs until it
/// reaches a leaf or another branching node, so every edge lands in
/// exactly one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentDecomposition {
    root: usize,
}

impl SegmentDecomposition {
    pub fn from_root(root: usize) -> Self {
        Self { root }
    }

    pub fn root(&self) -> usize {
        self.root
    }
}

impl BranchSource for SegmentDecomposition {
    fn branches(&self, tree: &WeightedTree) -> VelocityResult<Vec<Branch>> {
        let n = tree.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }
        if self.root >= n {
            return Err(VelocityError::IndexOutOfRange {
                what: "decomposition root",
                index: self.root,
                bound: n,
            });
        }
        tree.ensure_tree()?;

        let mut visited = vec![false; n];
        visited[self.root] = true;

        // Pending segments as (start, first step), popped in ascending order
        let mut pending: Vec<(usize, usize)> = tree
            .neighbors(self.root)
            .map(|(child, _)| (self.root, child))
            .collect();
        pending.reverse();

        let mut branches = Vec::new();
        while let Some((start, first)) = pending.pop() {
            let mut nodes = vec![start];
            let mut current = first;
            loop {
                visited[current] = true;
                nodes.push(current);
                let children: Vec<usize> = tree
                    .neighbors(current)
                    .map(|(next, _)| next)
                    .filter(|&next| !visited[next])
                    .collect();
                match children.as_slice() {
                    [only] => current = *only,
                    _ => {
                        pending.extend(children.iter().rev().map(|&child| (current, child)));
                        break;
                    }
                }
            }
            branches.push(Branch(nodes));
        }
        Ok(branches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn y_tree() -> WeightedTree {
        // 0 - 1 - 2, 2 - 3 - 4, 2 - 5
        let mut tree = WeightedTree::with_nodes(6);
        tree.set_edge(0, 1, 1.0);
        tree.set_edge(1, 2, 1.0);
        tree.set_edge(2, 3, 1.0);
        tree.set_edge(3, 4, 1.0);
        tree.set_edge(2, 5, 1.0);
        tree
    }

    #[test]
    fn test_segments_from_leaf_root() {
        let branches = SegmentDecomposition::from_root(0).branches(&y_tree()).unwrap();
        let nodes: Vec<&[usize]> = branches.iter().map(Branch::nodes).collect();
        assert_eq!(nodes, vec![&[0, 1, 2][..], &[2, 3, 4][..], &[2, 5][..]]);
    }

    #[test]
    fn test_segments_from_interior_root() {
        let branches = SegmentDecomposition::from_root(1).branches(&y_tree()).unwrap();
        let nodes: Vec<&[usize]> = branches.iter().map(Branch::nodes).collect();
        assert_eq!(nodes, vec![&[1, 0][..], &[1, 2][..], &[2, 3, 4][..], &[2, 5][..]]);
    }

    #[test]
    fn test_segments_cover_every_edge_once() {
        let tree = y_tree();
        let branches = SegmentDecomposition::from_root(4).branches(&tree).unwrap();
        let mut covered: Vec<(usize, usize)> = branches
            .iter()
            .flat_map(|b| b.steps().map(|(u, v)| (u.min(v), u.max(v))).collect::<Vec<_>>())
            .collect();
        covered.sort_unstable();
        let expected: Vec<(usize, usize)> =
            tree.edges().into_iter().map(|(u, v, _)| (u, v)).collect();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_single_node_has_no_branches() {
        let branches = SegmentDecomposition::default()
            .branches(&WeightedTree::with_nodes(1))
            .unwrap();
        assert!(branches.is_empty());
    }

    #[test]
    fn test_root_out_of_range() {
        let err = SegmentDecomposition::from_root(9).branches(&y_tree()).unwrap_err();
        assert!(matches!(err, VelocityError::IndexOutOfRange { index: 9, .. }));
    }

    #[test]
    fn test_fixed_list_is_returned_verbatim() {
        let list = vec![Branch::from(vec![0, 1]), Branch::from(vec![1, 2])];
        assert_eq!(list.branches(&y_tree()).unwrap(), list);
    }
}
