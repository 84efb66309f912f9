//! Boundary validation of algorithm payloads.
//!
//! These rules are stricter than what the routines themselves accept
//! (for example Fibonacci is capped at `n <= 100` here). A boundary layer
//! calls [`validate_input`] before handing the payload to the dispatcher;
//! the dispatcher never calls it, so routine-level errors remain reachable
//! for callers that skip this step.

use crate::algorithm::AlgorithmKind;
use serde_json::{Map, Value};
use thiserror::Error;

/// Largest Fibonacci index accepted at the boundary.
pub const MAX_FIBONACCI_N: i64 = 100;

/// Smallest number accepted for a primality check at the boundary.
pub const MIN_PRIME_CANDIDATE: i64 = 2;

/// Longest array accepted for sorting.
pub const MAX_SORT_LEN: usize = 1000;

/// A payload field failed boundary validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Offending field (`input_data` for whole-payload problems).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

type Result<T> = std::result::Result<T, ValidationError>;

/// Check `input` against the boundary rules for `kind`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
///
/// # Examples
///
/// ```
/// use algorithm_hub_core::AlgorithmKind;
/// use algorithm_hub_core::validation::validate_input;
/// use serde_json::json;
///
/// assert!(validate_input(AlgorithmKind::Fibonacci, &json!({ "n": 10 })).is_ok());
/// assert!(validate_input(AlgorithmKind::Fibonacci, &json!({ "n": 101 })).is_err());
/// ```
pub fn validate_input(kind: AlgorithmKind, input: &Value) -> Result<()> {
    let fields = input
        .as_object()
        .ok_or_else(|| ValidationError::new("input_data", "must be a JSON object"))?;

    match kind {
        AlgorithmKind::Fibonacci => {
            let n = required_integer(fields, "n")?;
            if !(0..=MAX_FIBONACCI_N).contains(&n) {
                return Err(ValidationError::new(
                    "n",
                    format!("must be between 0 and {MAX_FIBONACCI_N}"),
                ));
            }
        }
        AlgorithmKind::PrimeCheck => {
            let number = required_integer(fields, "number")?;
            if number < MIN_PRIME_CANDIDATE {
                return Err(ValidationError::new(
                    "number",
                    format!("must be greater than or equal to {MIN_PRIME_CANDIDATE}"),
                ));
            }
        }
        AlgorithmKind::Sorting => {
            let array = integer_array(required(fields, "array")?, "array")?;
            if array.len() > MAX_SORT_LEN {
                return Err(ValidationError::new(
                    "array",
                    format!("must contain at most {MAX_SORT_LEN} items"),
                ));
            }
            if let Some(algorithm) = fields.get("algorithm") {
                if !(algorithm.is_string() || algorithm.is_null()) {
                    return Err(ValidationError::new("algorithm", "must be a string"));
                }
            }
        }
        AlgorithmKind::MatrixMultiply => {
            rectangular(fields, "matrix_a")?;
            rectangular(fields, "matrix_b")?;
        }
    }

    Ok(())
}

fn required<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ValidationError::new(name, "field required")),
        Some(value) => Ok(value),
    }
}

fn required_integer(fields: &Map<String, Value>, name: &str) -> Result<i64> {
    required(fields, name)?
        .as_i64()
        .ok_or_else(|| ValidationError::new(name, "must be an integer"))
}

fn integer_array(value: &Value, name: &str) -> Result<Vec<i64>> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::new(name, "must be an array of integers"))?;
    items
        .iter()
        .map(|item| {
            item.as_i64()
                .ok_or_else(|| ValidationError::new(name, "must be an array of integers"))
        })
        .collect()
}

fn rectangular(fields: &Map<String, Value>, name: &str) -> Result<()> {
    let rows = required(fields, name)?
        .as_array()
        .ok_or_else(|| ValidationError::new(name, "must be a 2D array of integers"))?;

    let mut width = None;
    for row in rows {
        let row = integer_array(row, name)?;
        match width {
            None if row.is_empty() => {
                return Err(ValidationError::new(name, "rows must not be empty"));
            }
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(ValidationError::new(name, "all rows must have the same length"));
            }
            Some(_) => {}
        }
    }

    if width.is_none() {
        return Err(ValidationError::new(name, "must not be empty"));
    }
    Ok(())
}
