//! Dense matrices and the graph views built on them

mod directed;
mod tree;


use crate::error::{VelocityError, VelocityResult};
use ndarray::Array2;

pub use directed::DirectedGraph;
pub use tree::WeightedTree;

/// Dense row-major `f64` matrix used for every input and output
pub type Matrix = Array2<f64>;

/// Check that `matrix` is square and return its side length
pub fn ensure_square(name: &'static str, matrix: &Matrix) -> VelocityResult<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(VelocityError::NotSquare { name, rows, cols });
    }
    Ok(rows)
}

/// Build a matrix from a list of rows
///
/// All rows must have the same length. An empty list yields a 0x0 matrix.
pub fn from_rows(rows: &[Vec<f64>]) -> VelocityResult<Matrix> {
    let cols = rows.first().map(Vec::len).unwrap_or(0);
    if let Some(row) = rows.iter().find(|row| row.len() != cols) {
        return Err(VelocityError::ShapeMismatch {
            what: "row length",
            expected: cols,
            found: row.len(),
        });
    }
    Ok(Array2::from_shape_fn((rows.len(), cols), |(i, j)| rows[i][j]))
}

/// Convert a matrix back into a list of rows
pub fn to_rows(matrix: &Matrix) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}
