//! Collapse a cell-level transition matrix into cluster-level transitions

use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{ensure_square, Matrix};

/// Hard assignment derived from a soft cluster-assignment matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SoftAssignment {
    /// Highest membership weight of each cell
    pub confidence: Vec<f64>,
    /// Cluster holding that weight (first maximum on ties)
    pub assignment: Vec<usize>,
    /// Number of clusters (columns of the assignment matrix)
    pub cluster_count: usize,
}

impl SoftAssignment {
    /// Derive confidence and assignment from a cells x clusters matrix
    pub fn from_matrix(assignments: &Matrix) -> VelocityResult<Self> {
        let (cells, cluster_count) = assignments.dim();
        if cells > 0 && cluster_count == 0 {
            return Err(VelocityError::ShapeMismatch {
                what: "assignment cluster count",
                expected: 1,
                found: 0,
            });
        }

        let mut confidence = Vec::with_capacity(cells);
        let mut assignment = Vec::with_capacity(cells);
        for row in assignments.rows() {
            let mut best = 0;
            for (k, &weight) in row.iter().enumerate().skip(1) {
                if weight > row[best] {
                    best = k;
                }
            }
            confidence.push(row[best]);
            assignment.push(best);
        }

        Ok(Self {
            confidence,
            assignment,
            cluster_count,
        })
    }

    /// Cell indices grouped by assigned cluster
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.cluster_count];
        for (cell, &cluster) in self.assignment.iter().enumerate() {
            members[cluster].push(cell);
        }
        members
    }
}

/// Row-normalized upper-triangular cluster transitions, before symmetrizing
///
/// Entry `[a,b]` for `a <= b` is the confidence-weighted transition mass from
/// cluster `a` to cluster `b`, divided by the total mass accumulated for `a`
/// over `b >= a`. Rows with no mass are left at zero.
pub fn normalized_cluster_transitions(
    transitions: &Matrix,
    assignments: &Matrix,
) -> VelocityResult<Matrix> {
    let cells = ensure_square("transition matrix", transitions)?;
    if assignments.nrows() != cells {
        return Err(VelocityError::ShapeMismatch {
            what: "assignment rows",
            expected: cells,
            found: assignments.nrows(),
        });
    }

    let soft = SoftAssignment::from_matrix(assignments)?;
    let members = soft.members();
    let k = soft.cluster_count;

    let mut mass = Matrix::zeros((k, k));
    let mut totals = vec![0.0; k];
    for a in 0..k {
        for b in a..k {
            let mut q = 0.0;
            for &i in &members[a] {
                for &j in &members[b] {
                    q += soft.confidence[i] * soft.confidence[j] * transitions[[i, j]];
                }
            }
            totals[a] += q;
            mass[[a, b]] = q;
        }
    }

    for ((a, _), value) in mass.indexed_iter_mut() {
        let ratio = *value / totals[a];
        *value = if ratio.is_finite() { ratio } else { 0.0 };
    }
    Ok(mass)
}

/// Symmetric cluster transition matrix
///
/// `M = raw + rawᵀ - diag(raw)`, so each diagonal entry is counted once.
pub fn aggregate_cluster_transitions(
    transitions: &Matrix,
    assignments: &Matrix,
) -> VelocityResult<Matrix> {
    let raw = normalized_cluster_transitions(transitions, assignments)?;
    let k = raw.nrows();
    let mut symmetric = &raw + &raw.t();
    for a in 0..k {
        symmetric[[a, a]] -= raw[[a, a]];
    }
    tracing::debug!(clusters = k, cells = transitions.nrows(), "aggregated cluster transitions");
    Ok(symmetric)
}
