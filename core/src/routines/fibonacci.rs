//! Fibonacci sequence generation.

use crate::error::{AlgorithmError, Result};
use serde::{Deserialize, Serialize};

/// Largest index whose Fibonacci value fits in a `u128`.
pub const MAX_FIBONACCI_INDEX: i64 = 186;

const fn default_n() -> Option<i64> {
    Some(10)
}

/// Input payload for [`fibonacci`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciInput {
    /// Index of the Fibonacci number to compute (0-indexed). Defaults to 10.
    #[serde(default = "default_n")]
    pub n: Option<i64>,
}

/// Result of [`fibonacci`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciOutput {
    /// `F(n)`
    pub result: u128,
    /// `F(0)..=F(n)`
    pub sequence: Vec<u128>,
}

/// Compute `F(n)` together with the full sequence `F(0)..=F(n)`.
///
/// `F(0) = 0`, `F(1) = 1`. The sequence always has `n + 1` elements and
/// its last element equals `result`.
///
/// # Errors
///
/// Returns [`AlgorithmError::InvalidInput`] if `n` is negative or greater
/// than [`MAX_FIBONACCI_INDEX`].
///
/// # Examples
///
/// ```
/// use algorithm_hub_core::routines::fibonacci;
///
/// let out = fibonacci(10)?;
/// assert_eq!(out.result, 55);
/// assert_eq!(out.sequence.len(), 11);
/// # Ok::<(), algorithm_hub_core::AlgorithmError>(())
/// ```
pub fn fibonacci(n: i64) -> Result<FibonacciOutput> {
    if n < 0 {
        return Err(AlgorithmError::invalid_input("n must be non-negative"));
    }
    if n > MAX_FIBONACCI_INDEX {
        return Err(AlgorithmError::invalid_input(format!(
            "n must be at most {MAX_FIBONACCI_INDEX}"
        )));
    }

    // Bounded above, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n as usize;

    let mut sequence: Vec<u128> = Vec::with_capacity(n + 1);
    sequence.push(0);
    if n >= 1 {
        sequence.push(1);
    }
    for i in 2..=n {
        let next = sequence[i - 1]
            .checked_add(sequence[i - 2])
            .ok_or_else(|| AlgorithmError::invalid_input("Fibonacci value overflowed"))?;
        sequence.push(next);
    }

    Ok(FibonacciOutput {
        result: sequence[n],
        sequence,
    })
}

impl FibonacciInput {
    /// Run the routine on this input.
    ///
    /// # Errors
    ///
    /// Propagates [`fibonacci`] errors; a `null` `n` is rejected.
    pub fn run(&self) -> Result<FibonacciOutput> {
        let n = self
            .n
            .ok_or_else(|| AlgorithmError::invalid_input("n is required"))?;
        fibonacci(n)
    }
}
