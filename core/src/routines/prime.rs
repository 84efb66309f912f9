//! Primality check by trial division.

use crate::error::{AlgorithmError, Result};
use serde::{Deserialize, Serialize};

/// Input payload for [`prime_check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeCheckInput {
    /// Number to test. Required.
    #[serde(default)]
    pub number: Option<i64>,
}

/// Result of [`prime_check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeCheckOutput {
    /// Whether `number` is prime
    pub is_prime: bool,
    /// The number that was tested
    pub number: i64,
    /// Smallest divisor found, only for composite numbers `>= 2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisor: Option<i64>,
}

/// Test `number` for primality.
///
/// Numbers below 2 are reported not prime without a divisor. Otherwise every
/// candidate from 2 up to and including `floor(sqrt(number))` is tried in
/// increasing order, so the reported divisor is the smallest one.
///
/// This is O(sqrt(n)) and intended for demonstration, not cryptography.
///
/// # Examples
///
/// ```
/// use algorithm_hub_core::routines::prime_check;
///
/// assert!(prime_check(17).is_prime);
/// assert_eq!(prime_check(4).divisor, Some(2));
/// ```
#[must_use]
pub fn prime_check(number: i64) -> PrimeCheckOutput {
    if number < 2 {
        return PrimeCheckOutput {
            is_prime: false,
            number,
            divisor: None,
        };
    }

    // `candidate <= number / candidate` is `candidate * candidate <= number` without overflow.
    let mut candidate: i64 = 2;
    while candidate <= number / candidate {
        if number % candidate == 0 {
            return PrimeCheckOutput {
                is_prime: false,
                number,
                divisor: Some(candidate),
            };
        }
        candidate += 1;
    }

    PrimeCheckOutput {
        is_prime: true,
        number,
        divisor: None,
    }
}

impl PrimeCheckInput {
    /// Run the routine on this input.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidInput`] when `number` is absent.
    pub fn run(&self) -> Result<PrimeCheckOutput> {
        let number = self
            .number
            .ok_or_else(|| AlgorithmError::invalid_input("number is required"))?;
        Ok(prime_check(number))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_small_primes() {
        assert!(prime_check(2).is_prime);
        assert!(prime_check(3).is_prime);
        assert!(prime_check(17).is_prime);
        assert!(prime_check(7919).is_prime);
    }

    #[test]
    fn test_composites_report_smallest_divisor() {
        assert_eq!(prime_check(4).divisor, Some(2));
        assert_eq!(prime_check(9).divisor, Some(3));
        assert_eq!(prime_check(91).divisor, Some(7));
        assert!(!prime_check(91).is_prime);
    }

    #[test]
    fn test_below_two_has_no_divisor() {
        for n in [-7, 0, 1] {
            let out = prime_check(n);
            assert!(!out.is_prime);
            assert_eq!(out.divisor, None);
        }
    }

    #[test]
    fn test_large_prime_does_not_overflow() {
        // Largest prime below 2^31.
        assert!(prime_check(2_147_483_647).is_prime);
    }

    #[test]
    fn test_missing_number_is_invalid() {
        let input: PrimeCheckInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            input.run(),
            Err(AlgorithmError::InvalidInput("number is required".into()))
        );
    }

    #[test]
    fn test_divisor_omitted_from_wire_shape() {
        let value = serde_json::to_value(prime_check(17)).unwrap();
        assert_eq!(value, json!({ "is_prime": true, "number": 17 }));
    }
}
