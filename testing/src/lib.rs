//! # Algorithm Hub Testing
//!
//! Testing utilities and in-memory doubles for the Algorithm Hub crates.
//!
//! This crate provides:
//! - [`FixedClock`] and [`test_clock`] for deterministic time
//! - [`InMemoryRecordStore`], a `RecordStore` with per-operation failure injection
//!
//! ## Example
//!
//! ```
//! use algorithm_hub_testing::{InMemoryRecordStore, test_clock};
//! use algorithm_hub_core::environment::Clock;
//!
//! let store = InMemoryRecordStore::new();
//! assert!(store.is_empty());
//! assert_eq!(test_clock().now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
//! ```

use algorithm_hub_core::environment::Clock;
use chrono::{DateTime, Utc};

pub mod record_store;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use algorithm_hub_testing::mocks::FixedClock;
    /// use algorithm_hub_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a hardcoded valid literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use record_store::{InMemoryRecordStore, StoreOperation};
