//! Cumulative path log-likelihood along a cluster ordering

use super::ordering::ClusterOrdering;
use crate::error::{VelocityError, VelocityResult};
use crate::matrix::{ensure_square, Matrix};

/// Running log-likelihood of walking an ordering, one entry per step
///
/// Entry `i` is the summed log-transition of the first `i + 1` steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentLikelihood(Vec<f64>);

impl SegmentLikelihood {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<f64> {
        self.0.get(step).copied()
    }
}

impl From<Vec<f64>> for SegmentLikelihood {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Element-wise natural log with non-finite results replaced by zero
///
/// Zero-probability transitions become likelihood-neutral instead of
/// contributing `-inf`.
pub fn log_transitions(transitions: &Matrix) -> Matrix {
    transitions.mapv(|p| {
        let log = p.ln();
        if log.is_finite() {
            log
        } else {
            0.0
        }
    })
}

/// Cumulative log-likelihood of the ordering under `transitions`
///
/// Returns `|ordering| - 1` entries; orderings shorter than two clusters
/// yield an empty likelihood.
pub fn segment_likelihood(
    transitions: &Matrix,
    ordering: &ClusterOrdering,
) -> VelocityResult<SegmentLikelihood> {
    let k = ensure_square("cluster transition matrix", transitions)?;
    if let Some(index) = ordering.max_index().filter(|&index| index >= k) {
        return Err(VelocityError::IndexOutOfRange {
            what: "ordering",
            index,
            bound: k,
        });
    }

    let log = log_transitions(transitions);
    let mut running = 0.0;
    let values = ordering
        .steps()
        .map(|(from, to)| {
            running += log[[from, to]];
            running
        })
        .collect();
    Ok(SegmentLikelihood(values))
}
