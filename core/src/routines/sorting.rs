//! Integer array sorting.
//!
//! Two hand-written variants plus a lenient fallback:
//!
//! - `"quicksort"`: middle-element pivot, three-way partition (less / equal / greater)
//! - `"mergesort"`: recursive halving with a left-preferring stable merge
//! - anything else: the standard library's stable sort

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Input payload for [`sort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingInput {
    /// Values to sort. Defaults to an empty array.
    #[serde(default)]
    pub array: Vec<i64>,
    /// Requested algorithm name. Absent or `null` means `"quicksort"`.
    #[serde(default)]
    pub algorithm: Option<String>,
}

/// Result of [`sort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingOutput {
    /// The input, unmodified
    pub original: Vec<i64>,
    /// The input in ascending order
    pub sorted: Vec<i64>,
    /// The algorithm name as requested
    pub algorithm: String,
}

/// Sorting strategy selected from a requested algorithm name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    /// Three-way partition quicksort
    Quicksort,
    /// Top-down merge sort
    Mergesort,
    /// Standard library stable sort (fallback for unknown names)
    Standard,
}

impl SortAlgorithm {
    /// Select a strategy by name. Unknown names fall back to [`SortAlgorithm::Standard`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "quicksort" => Self::Quicksort,
            "mergesort" => Self::Mergesort,
            _ => Self::Standard,
        }
    }

    /// Canonical name of the strategy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quicksort => "quicksort",
            Self::Mergesort => "mergesort",
            Self::Standard => "standard",
        }
    }
}

/// Sort `array` with the algorithm named by `algorithm`.
///
/// The returned `original` is a copy of the input; `algorithm` echoes the
/// requested name even when the fallback ran.
///
/// # Examples
///
/// ```
/// use algorithm_hub_core::routines::sort;
///
/// let out = sort(&[5, 3, 1, 4, 2], "mergesort");
/// assert_eq!(out.sorted, vec![1, 2, 3, 4, 5]);
/// assert_eq!(out.original, vec![5, 3, 1, 4, 2]);
/// ```
#[must_use]
pub fn sort(array: &[i64], algorithm: &str) -> SortingOutput {
    let sorted = match SortAlgorithm::from_name(algorithm) {
        SortAlgorithm::Quicksort => quicksort(array),
        SortAlgorithm::Mergesort => mergesort(array),
        SortAlgorithm::Standard => {
            let mut copy = array.to_vec();
            copy.sort();
            copy
        }
    };

    SortingOutput {
        original: array.to_vec(),
        sorted,
        algorithm: algorithm.to_string(),
    }
}

/// Quicksort with the middle element as pivot.
///
/// Partitions into strictly-less, equal and strictly-greater buckets and
/// recurses on the two unequal buckets. Equal elements keep their relative order.
#[must_use]
pub fn quicksort(array: &[i64]) -> Vec<i64> {
    if array.len() <= 1 {
        return array.to_vec();
    }

    let pivot = array[array.len() / 2];
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for &value in array {
        match value.cmp(&pivot) {
            Ordering::Less => less.push(value),
            Ordering::Equal => equal.push(value),
            Ordering::Greater => greater.push(value),
        }
    }

    let mut sorted = quicksort(&less);
    sorted.extend(equal);
    sorted.extend(quicksort(&greater));
    sorted
}

/// Top-down merge sort.
#[must_use]
pub fn mergesort(array: &[i64]) -> Vec<i64> {
    if array.len() <= 1 {
        return array.to_vec();
    }

    let mid = array.len() / 2;
    let left = mergesort(&array[..mid]);
    let right = mergesort(&array[mid..]);
    merge(&left, &right)
}

/// Merge two sorted slices, taking from `left` on ties.
fn merge(left: &[i64], right: &[i64]) -> Vec<i64> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            merged.push(left[i]);
            i += 1;
        } else {
            merged.push(right[j]);
            j += 1;
        }
    }

    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}

impl SortingInput {
    /// Run the routine on this input.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other routines.
    #[allow(clippy::unnecessary_wraps)]
    pub fn run(&self) -> Result<SortingOutput> {
        let algorithm = self
            .algorithm
            .as_deref()
            .unwrap_or(SortAlgorithm::Quicksort.as_str());
        Ok(sort(&self.array, algorithm))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_quicksort_basic() {
        assert_eq!(quicksort(&[3, 6, 1, 8, 1, 2]), vec![1, 1, 2, 3, 6, 8]);
    }

    #[test]
    fn test_mergesort_basic() {
        assert_eq!(mergesort(&[3, 6, 1, 8, 1, 2]), vec![1, 1, 2, 3, 6, 8]);
    }

    #[test]
    fn test_empty_and_single() {
        for name in ["quicksort", "mergesort", "bogosort"] {
            assert!(sort(&[], name).sorted.is_empty());
            assert_eq!(sort(&[42], name).sorted, vec![42]);
        }
    }

    #[test]
    fn test_unknown_name_falls_back_and_is_echoed() {
        let out = sort(&[2, -1, 0], "heapsort");
        assert_eq!(out.sorted, vec![-1, 0, 2]);
        assert_eq!(out.algorithm, "heapsort");
        assert_eq!(SortAlgorithm::from_name("heapsort"), SortAlgorithm::Standard);
    }

    #[test]
    fn test_input_defaults() {
        let input: SortingInput = serde_json::from_value(json!({ "array": [5, 3, 1, 4, 2] })).unwrap();
        let out = input.run().unwrap();
        assert_eq!(out.algorithm, "quicksort");
        assert_eq!(out.sorted, vec![1, 2, 3, 4, 5]);

        let empty: SortingInput = serde_json::from_value(json!({})).unwrap();
        assert!(empty.array.is_empty());
    }

    #[test]
    fn test_null_algorithm_uses_default() {
        let input: SortingInput =
            serde_json::from_value(json!({ "array": [3, 1, 2], "algorithm": null })).unwrap();

        let out = input.run().unwrap();
        assert_eq!(out.algorithm, "quicksort");
        assert_eq!(out.sorted, vec![1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_variants_agree_with_std(array in proptest::collection::vec(any::<i64>(), 0..200)) {
            let mut expected = array.clone();
            expected.sort_unstable();

            let quick = sort(&array, "quicksort");
            let merge = sort(&array, "mergesort");

            prop_assert_eq!(&quick.sorted, &expected);
            prop_assert_eq!(&merge.sorted, &expected);
            prop_assert_eq!(&quick.original, &array);
            prop_assert_eq!(&merge.original, &array);
        }
    }
}
