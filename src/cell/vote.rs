//! Vote a direction for each branch of the contracted tree
//!
//! Every cell on a branch looks at where its velocity duplicate sits in the
//! augmented tree. When the route from the cell to its duplicate passes
//! through another real cell, that cell tells us which way the velocity
//! points along the branch. When the route stays among duplicates, the
//! embedded angle between the branch neighbor and the duplicate decides.

use super::branch::Branch;
use super::node::NodeId;
use super::path::shortest_path;
use crate::config::VelocityConfig;
use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{DirectedGraph, Matrix, WeightedTree};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Orientation chosen for a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchDirection {
    /// Edges run in branch order, first node to last
    Forward,
    /// Edges run from the last node back to the first
    Backward,
}

/// Outcome of voting on one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchVerdict {
    /// Position of the branch in the supplied list
    pub branch: usize,
    pub start: usize,
    pub end: usize,
    pub forward_votes: usize,
    pub backward_votes: usize,
    /// Cells whose evidence was too degenerate to vote
    pub abstentions: usize,
    pub direction: BranchDirection,
}

/// Directed cell graph with the evidence behind it
#[derive(Debug, Clone)]
pub struct VotedGraph {
    /// Directed adjacency over the contracted cells
    pub graph: DirectedGraph,
    /// One verdict per branch with at least two nodes
    pub verdicts: Vec<BranchVerdict>,
    /// Display coordinates of the contracted cells, carried through unchanged
    pub positions: Matrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vote {
    Forward,
    Backward,
    Abstain,
}

impl From<bool> for Vote {
    fn from(forward: bool) -> Self {
        if forward {
            Vote::Forward
        } else {
            Vote::Backward
        }
    }
}

/// Votes branch directions against an augmented tree and its embedding
pub struct DirectionVoter<'a> {
    augmented: &'a WeightedTree,
    contracted: &'a WeightedTree,
    embedding: &'a Matrix,
    cell_count: usize,
    right_angle: f64,
    tolerance: f64,
}

impl<'a> DirectionVoter<'a> {
    /// Check shapes and build a voter
    ///
    /// `augmented` has `2n` nodes, `contracted` has `n`, and `embedding` has
    /// one row per augmented node.
    pub fn new(
        augmented: &'a WeightedTree,
        contracted: &'a WeightedTree,
        embedding: &'a Matrix,
        config: &VelocityConfig,
    ) -> VelocityResult<Self> {
        let cell_count = contracted.node_count();
        if augmented.node_count() != 2 * cell_count {
            return Err(VelocityError::ShapeMismatch {
                what: "augmented tree nodes",
                expected: 2 * cell_count,
                found: augmented.node_count(),
            });
        }
        if embedding.nrows() != 2 * cell_count {
            return Err(VelocityError::EmbeddingShape {
                name: "Z",
                expected: 2 * cell_count,
                found: embedding.nrows(),
            });
        }
        Ok(Self {
            augmented,
            contracted,
            embedding,
            cell_count,
            right_angle: config.right_angle_degrees,
            tolerance: config.degenerate_tolerance,
        })
    }

    /// Vote on one branch; branches shorter than two nodes yield `None`
    pub fn verdict(&self, index: usize, branch: &Branch) -> VelocityResult<Option<BranchVerdict>> {
        if branch.len() < 2 {
            return Ok(None);
        }
        self.check_branch(branch)?;

        let path = branch.nodes();
        let (mut forward_votes, mut backward_votes, mut abstentions) = (0, 0, 0);
        for bp in 0..path.len() {
            match self.vote_at(path, bp)? {
                Vote::Forward => forward_votes += 1,
                Vote::Backward => backward_votes += 1,
                Vote::Abstain => abstentions += 1,
            }
        }

        let direction = if forward_votes >= backward_votes {
            BranchDirection::Forward
        } else {
            BranchDirection::Backward
        };
        Ok(Some(BranchVerdict {
            branch: index,
            start: path[0],
            end: path[path.len() - 1],
            forward_votes,
            backward_votes,
            abstentions,
            direction,
        }))
    }

    fn check_branch(&self, branch: &Branch) -> VelocityResult<()> {
        if let Some(&index) = branch.nodes().iter().find(|&&node| node >= self.cell_count) {
            return Err(VelocityError::IndexOutOfRange {
                what: "branch node",
                index,
                bound: self.cell_count,
            });
        }
        match branch.steps().find(|&(u, v)| !self.contracted.has_edge(u, v)) {
            Some((from, to)) => Err(VelocityError::BranchEdgeMissing { from, to }),
            None => Ok(()),
        }
    }

    /// Vote cast by the cell at position `bp` of `path`
    fn vote_at(&self, path: &[usize], bp: usize) -> VelocityResult<Vote> {
        let u = path[bp];
        let v = NodeId::real(u).counterpart().position(self.cell_count);
        let route = shortest_path(self.augmented, u, v).ok_or(VelocityError::NoPath(u))?;

        // The last cell of a branch can only look back
        let looking_forward = bp + 1 < path.len();
        let adjacent = if looking_forward { path[bp + 1] } else { path[bp - 1] };

        let real_on_route: Vec<usize> = route
            .iter()
            .copied()
            .filter(|&node| node < self.cell_count)
            .collect();
        if let Some(&detour) = real_on_route.get(1) {
            return Ok(topological_vote(looking_forward, adjacent, detour));
        }

        let row = |node: usize| self.embedding.row(node);
        let to_adjacent = &row(adjacent) - &row(u);
        let to_duplicate = &row(v) - &row(u);
        match angle_degrees(to_adjacent.view(), to_duplicate.view(), self.tolerance) {
            Some(angle) if looking_forward => Ok(Vote::from(angle < self.right_angle)),
            Some(angle) => Ok(Vote::from(angle > self.right_angle)),
            None => {
                // Coincident points: use the cell the route first steps toward
                let first_hop = NodeId::from_position(route[1], self.cell_count)?;
                if first_hop.index == u {
                    Ok(Vote::Abstain)
                } else {
                    Ok(topological_vote(looking_forward, adjacent, first_hop.index))
                }
            }
        }
    }
}

/// Forward when the route heads to the next cell, or away from the previous one
fn topological_vote(looking_forward: bool, adjacent: usize, detour: usize) -> Vote {
    if looking_forward {
        Vote::from(detour == adjacent)
    } else {
        Vote::from(detour != adjacent)
    }
}

/// Angle between two vectors in degrees, `None` if either is too short
fn angle_degrees(a: ArrayView1<f64>, b: ArrayView1<f64>, tolerance: f64) -> Option<f64> {
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    let usable = |norm: f64| norm > 0.0 && norm >= tolerance;
    if !(usable(norm_a) && usable(norm_b)) {
        return None;
    }
    let cosine = (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Some(cosine.acos().to_degrees())
}

/// Vote every branch and emit the directed contracted graph
///
/// Forward branches emit `path[i] -> path[i + 1]`; backward branches emit
/// the reverse. A later branch overwrites any edge it shares with an
/// earlier one. `positions` (one row per contracted cell) is returned as-is.
pub fn vote_branch_directions(
    augmented: &WeightedTree,
    contracted: &WeightedTree,
    branches: &[Branch],
    embedding: &Matrix,
    positions: &Matrix,
    config: &VelocityConfig,
) -> VelocityResult<VotedGraph> {
    let voter = DirectionVoter::new(augmented, contracted, embedding, config)?;
    let cell_count = contracted.node_count();
    if positions.nrows() != cell_count {
        return Err(VelocityError::EmbeddingShape {
            name: "Y",
            expected: cell_count,
            found: positions.nrows(),
        });
    }

    let mut graph = DirectedGraph::new(cell_count);
    let mut verdicts = Vec::new();
    for (index, branch) in branches.iter().enumerate() {
        let Some(verdict) = voter.verdict(index, branch)? else {
            continue;
        };
        tracing::debug!(
            branch = index,
            start = verdict.start,
            end = verdict.end,
            pos = verdict.forward_votes,
            neg = verdict.backward_votes,
            abstain = verdict.abstentions,
            "branch verdict"
        );
        if verdict.forward_votes + verdict.backward_votes == 0 {
            tracing::warn!(branch = index, "no cell on branch could vote, keeping it forward");
        }
        for (from, to) in branch.steps() {
            match verdict.direction {
                BranchDirection::Forward => graph.set_edge(from, to, 1.0),
                BranchDirection::Backward => graph.set_edge(to, from, 1.0),
            }
        }
        verdicts.push(verdict);
    }

    Ok(VotedGraph {
        graph,
        verdicts,
        positions: positions.clone(),
    })
}
