//! Integer matrix multiplication.

use crate::error::{AlgorithmError, Result};
use serde::{Deserialize, Serialize};

/// Row-major integer matrix.
pub type Matrix = Vec<Vec<i64>>;

/// Input payload for [`matrix_multiply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixMultiplyInput {
    /// Left operand. Defaults to empty (which is rejected).
    #[serde(default)]
    pub matrix_a: Matrix,
    /// Right operand. Defaults to empty (which is rejected).
    #[serde(default)]
    pub matrix_b: Matrix,
}

/// Result of [`matrix_multiply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixMultiplyOutput {
    /// Left operand
    pub matrix_a: Matrix,
    /// Right operand
    pub matrix_b: Matrix,
    /// `matrix_a × matrix_b`
    pub result: Matrix,
    /// Human-readable summary, e.g. `"2x3 × 3x2 = 2x2"`
    pub dimensions: String,
}

/// `(rows, cols)` of a non-empty matrix, using the first row for the column count.
fn shape(matrix: &[Vec<i64>]) -> Option<(usize, usize)> {
    let cols = matrix.first()?.len();
    if cols == 0 {
        return None;
    }
    Some((matrix.len(), cols))
}

fn is_rectangular(matrix: &[Vec<i64>], cols: usize) -> bool {
    matrix.iter().all(|row| row.len() == cols)
}

fn overflow() -> AlgorithmError {
    AlgorithmError::invalid_input("Matrix product overflowed")
}

/// Multiply `a` by `b` with the standard triple loop.
///
/// # Errors
///
/// Returns [`AlgorithmError::InvalidInput`] if either matrix is empty or has
/// an empty first row, if any row's length differs from its first row, if
/// `a`'s column count differs from `b`'s row count, or if an intermediate
/// value overflows.
///
/// # Examples
///
/// ```
/// use algorithm_hub_core::routines::matrix_multiply;
///
/// let out = matrix_multiply(&[vec![1, 2], vec![3, 4]], &[vec![5, 6], vec![7, 8]])?;
/// assert_eq!(out.result, vec![vec![19, 22], vec![43, 50]]);
/// assert_eq!(out.dimensions, "2x2 × 2x2 = 2x2");
/// # Ok::<(), algorithm_hub_core::AlgorithmError>(())
/// ```
pub fn matrix_multiply(a: &[Vec<i64>], b: &[Vec<i64>]) -> Result<MatrixMultiplyOutput> {
    let (Some((rows_a, cols_a)), Some((rows_b, cols_b))) = (shape(a), shape(b)) else {
        return Err(AlgorithmError::invalid_input("Both matrices are required"));
    };

    if !(is_rectangular(a, cols_a) && is_rectangular(b, cols_b)) {
        return Err(AlgorithmError::invalid_input("Matrices must be rectangular"));
    }

    if cols_a != rows_b {
        return Err(AlgorithmError::invalid_input(
            "Matrix dimensions are incompatible for multiplication",
        ));
    }

    let mut result = vec![vec![0_i64; cols_b]; rows_a];
    for (i, out_row) in result.iter_mut().enumerate() {
        for (j, cell) in out_row.iter_mut().enumerate() {
            let mut sum: i64 = 0;
            for (x, b_row) in a[i].iter().zip(b) {
                let product = x.checked_mul(b_row[j]).ok_or_else(overflow)?;
                sum = sum.checked_add(product).ok_or_else(overflow)?;
            }
            *cell = sum;
        }
    }

    Ok(MatrixMultiplyOutput {
        matrix_a: a.to_vec(),
        matrix_b: b.to_vec(),
        result,
        dimensions: format!("{rows_a}x{cols_a} × {rows_b}x{cols_b} = {rows_a}x{cols_b}"),
    })
}

impl MatrixMultiplyInput {
    /// Run the routine on this input.
    ///
    /// # Errors
    ///
    /// Propagates [`matrix_multiply`] errors.
    pub fn run(&self) -> Result<MatrixMultiplyOutput> {
        matrix_multiply(&self.matrix_a, &self.matrix_b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_two_by_two() {
        let out = matrix_multiply(&[vec![1, 2], vec![3, 4]], &[vec![5, 6], vec![7, 8]]).unwrap();
        assert_eq!(out.result, vec![vec![19, 22], vec![43, 50]]);
        assert_eq!(out.dimensions, "2x2 × 2x2 = 2x2");
    }

    #[test]
    fn test_non_square() {
        let a = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let b = vec![vec![7, 8], vec![9, 10], vec![11, 12]];
        let out = matrix_multiply(&a, &b).unwrap();
        assert_eq!(out.result, vec![vec![58, 64], vec![139, 154]]);
        assert_eq!(out.dimensions, "2x3 × 3x2 = 2x2");
        assert_eq!(out.matrix_a, a);
        assert_eq!(out.matrix_b, b);
    }

    #[test]
    fn test_incompatible_dimensions() {
        let a = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let b = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(
            matrix_multiply(&a, &b),
            Err(AlgorithmError::InvalidInput(
                "Matrix dimensions are incompatible for multiplication".into()
            ))
        );
    }

    #[test]
    fn test_empty_matrices_rejected() {
        let msg = Err(AlgorithmError::InvalidInput("Both matrices are required".into()));
        assert_eq!(matrix_multiply(&[], &[vec![1]]), msg);
        assert_eq!(matrix_multiply(&[vec![1]], &[]), msg);
        assert_eq!(matrix_multiply(&[vec![]], &[vec![1]]), msg);
    }

    #[test]
    fn test_ragged_matrix_does_not_panic() {
        let a = vec![vec![1, 2], vec![3]];
        let b = vec![vec![1], vec![2]];
        assert!(matches!(
            matrix_multiply(&a, &b),
            Err(AlgorithmError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_longer_trailing_row_rejected() {
        let ragged = Err(AlgorithmError::InvalidInput("Matrices must be rectangular".into()));

        assert_eq!(matrix_multiply(&[vec![1, 2]], &[vec![1], vec![2, 3]]), ragged);
        assert_eq!(
            matrix_multiply(&[vec![1, 2], vec![3, 4, 5]], &[vec![1], vec![2]]),
            ragged
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let a = vec![vec![i64::MAX, 1]];
        let b = vec![vec![2], vec![1]];
        assert!(matrix_multiply(&a, &b).is_err());
    }

    #[test]
    fn test_default_input_rejected() {
        let input: MatrixMultiplyInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(input.run().is_err());
    }
}
