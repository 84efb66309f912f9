//! The closed set of supported algorithms and their static catalog.

use crate::error::{AlgorithmError, Result};
use crate::routines::{FibonacciInput, MatrixMultiplyInput, PrimeCheckInput, SortingInput};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of algorithm a request invokes.
///
/// Closed set: there is no runtime registration. Adding a variant forces
/// every `match` (dispatch, catalog, validation) to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    /// Fibonacci sequence generation
    Fibonacci,
    /// Trial-division primality test
    PrimeCheck,
    /// Integer array sorting
    Sorting,
    /// Integer matrix multiplication
    MatrixMultiply,
}

impl AlgorithmKind {
    /// Every kind, in catalog order.
    pub const ALL: [Self; 4] = [
        Self::Fibonacci,
        Self::PrimeCheck,
        Self::Sorting,
        Self::MatrixMultiply,
    ];

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fibonacci => "fibonacci",
            Self::PrimeCheck => "prime_check",
            Self::Sorting => "sorting",
            Self::MatrixMultiply => "matrix_multiply",
        }
    }

    /// Decode `input` into this kind's typed payload and run the routine.
    ///
    /// Returns the routine output serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidInput`] if `input` is not a JSON
    /// object, has a field of the wrong type, or the routine rejects it.
    pub fn execute(&self, input: &Value) -> Result<Value> {
        match self {
            Self::Fibonacci => to_value(decode::<FibonacciInput>(input)?.run()?),
            Self::PrimeCheck => to_value(decode::<PrimeCheckInput>(input)?.run()?),
            Self::Sorting => to_value(decode::<SortingInput>(input)?.run()?),
            Self::MatrixMultiply => to_value(decode::<MatrixMultiplyInput>(input)?.run()?),
        }
    }

    /// Static description of this kind.
    #[must_use]
    pub fn descriptor(&self) -> AlgorithmDescriptor {
        let description = match self {
            Self::Fibonacci => "Calculate Fibonacci numbers",
            Self::PrimeCheck => "Check if a number is prime",
            Self::Sorting => "Sort an array of integers",
            Self::MatrixMultiply => "Multiply two matrices",
        };
        let fields: &[(&'static str, &'static str)] = match self {
            Self::Fibonacci => &[("n", "integer (0-100) - The nth Fibonacci number to calculate")],
            Self::PrimeCheck => &[("number", "integer (>=2) - The number to check for primality")],
            Self::Sorting => &[
                ("array", "array of integers (max 1000) - Array to sort"),
                (
                    "algorithm",
                    "string (optional) - Sorting algorithm ('quicksort', 'mergesort')",
                ),
            ],
            Self::MatrixMultiply => &[
                ("matrix_a", "2D array of integers - First matrix"),
                ("matrix_b", "2D array of integers - Second matrix"),
            ],
        };

        AlgorithmDescriptor {
            name: *self,
            description,
            input_schema: fields.iter().copied().collect(),
        }
    }
}

fn decode<T: DeserializeOwned>(input: &Value) -> Result<T> {
    if !input.is_object() {
        return Err(AlgorithmError::invalid_input("input_data must be a JSON object"));
    }
    Ok(T::deserialize(input)?)
}

fn to_value<T: Serialize>(output: T) -> Result<Value> {
    Ok(serde_json::to_value(output)?)
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AlgorithmError::invalid_input(format!("Unknown algorithm type: {s}")))
    }
}

/// Catalog entry describing one algorithm and its expected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmDescriptor {
    /// Algorithm kind
    pub name: AlgorithmKind,
    /// One-line description
    pub description: &'static str,
    /// Input field name → human-readable type and meaning
    pub input_schema: BTreeMap<&'static str, &'static str>,
}

/// The fixed catalog of supported algorithms.
#[must_use]
pub fn catalog() -> Vec<AlgorithmDescriptor> {
    AlgorithmKind::ALL.iter().map(AlgorithmKind::descriptor).collect()
}
