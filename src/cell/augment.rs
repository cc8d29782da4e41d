//! Stack cell states with their velocity-shifted duplicates

use crate::error::{VelocityError, VelocityResult};
use crate::matrix::Matrix;
use ndarray::s;

/// Build the `2n`-row input for tree embedding
///
/// Rows `0..n` are `states`; row `n + i` is `states[i] + blend * velocity[i]`.
/// Both inputs are cells x features.
pub fn augment_with_velocity(
    states: &Matrix,
    velocity: &Matrix,
    blend: f64,
) -> VelocityResult<Matrix> {
    let (cells, features) = states.dim();
    if velocity.nrows() != cells {
        return Err(VelocityError::ShapeMismatch {
            what: "velocity rows",
            expected: cells,
            found: velocity.nrows(),
        });
    }
    if velocity.ncols() != features {
        return Err(VelocityError::ShapeMismatch {
            what: "velocity columns",
            expected: features,
            found: velocity.ncols(),
        });
    }

    let mut augmented = Matrix::zeros((2 * cells, features));
    augmented.slice_mut(s![..cells, ..]).assign(states);
    augmented
        .slice_mut(s![cells.., ..])
        .assign(&(states + &(velocity * blend)));
    Ok(augmented)
}
