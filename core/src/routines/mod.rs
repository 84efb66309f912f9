//! Numeric routines.
//!
//! Pure, deterministic, side-effect-free functions over validated input.
//! Each routine has a typed input (decoded from the JSON payload with the
//! documented defaults) and a typed, serializable output.
//!
//! | Routine | Input | Output |
//! |---------|-------|--------|
//! | [`fibonacci`] | [`FibonacciInput`] | [`FibonacciOutput`] |
//! | [`prime_check`] | [`PrimeCheckInput`] | [`PrimeCheckOutput`] |
//! | [`sort`] | [`SortingInput`] | [`SortingOutput`] |
//! | [`matrix_multiply`] | [`MatrixMultiplyInput`] | [`MatrixMultiplyOutput`] |

pub mod fibonacci;
pub mod matrix;
pub mod prime;
pub mod sorting;

pub use fibonacci::{FibonacciInput, FibonacciOutput, MAX_FIBONACCI_INDEX, fibonacci};
pub use matrix::{Matrix, MatrixMultiplyInput, MatrixMultiplyOutput, matrix_multiply};
pub use prime::{PrimeCheckInput, PrimeCheckOutput, prime_check};
pub use sorting::{SortAlgorithm, SortingInput, SortingOutput, mergesort, quicksort, sort};
